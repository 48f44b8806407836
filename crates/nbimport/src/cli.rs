//! Clap derive structures for the `nbimport` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// nbimport -- load wireless access points from CSV into NetBox
#[derive(Debug, Parser)]
#[command(
    name = "nbimport",
    version,
    about = "Import devices and their interfaces from CSV into NetBox",
    long_about = "Reads one device per CSV row, derives interface settings (including\n\
        wireless channel encodings) from prefixed columns, and creates or\n\
        updates each device and its interfaces in NetBox. NetBox credentials\n\
        are read from a HashiCorp Vault KV v2 secret.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub import: ImportOpts,

    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Import Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImportOpts {
    /// CSV file with one device per row
    #[arg(long, short = 'c', default_value = "netbox-import.csv")]
    pub csv_file: PathBuf,

    /// Leave devices that already exist in NetBox untouched
    #[arg(long)]
    pub no_update: bool,

    /// Skip TLS certificate verification for NetBox
    #[arg(long, short = 'n', alias = "no-validate-certs")]
    pub no_tls_verify: bool,

    /// Kind of device described by the CSV rows
    #[arg(long = "type", short = 't', value_enum, default_value = "access-point")]
    pub device_type: DeviceType,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "NBIMPORT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Vault base URL (overrides profile)
    #[arg(long, env = "VAULT_URL", global = true)]
    pub vault_url: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Format of the run summary
    #[arg(
        long,
        short = 'o',
        env = "NBIMPORT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceType {
    /// Wireless access point with a wired uplink and numbered radios
    #[value(alias = "access_point")]
    AccessPoint,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
