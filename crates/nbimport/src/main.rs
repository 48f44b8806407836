mod cli;
mod error;
mod input;
mod output;

use clap::{CommandFactory, Parser};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use nbimport_api::VaultClient;
use nbimport_config::{Settings, TokenSource, resolve_vault_token};
use nbimport_core::{
    DeviceKind, ImportProfile, NetboxConnector, Orchestrator, TlsVerification, UpdatePolicy,
    trace_entry,
};

use crate::cli::{Cli, Command, DeviceType, GlobalOpts, LogFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Command::Completions(args)) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "nbimport", &mut std::io::stdout());
        return;
    }

    // Held until exit so the file writer flushes.
    let _guard = init_tracing(&cli.global);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(global: &GlobalOpts) -> Option<WorkerGuard> {
    let level = match global.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr = match global.log_format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let (file, guard) = match &global.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            let name = path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("nbimport.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .with(filter)
        .init();

    guard
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { import, global, .. } = cli;

    let config = nbimport_config::load_config()?;
    let mut settings = Settings::resolve(&config, global.profile.as_deref())?;
    apply_overrides(&mut settings, &global, &import)?;

    let rows = input::read_rows(&import.csv_file)?;
    info!(
        rows = rows.len(),
        file = %import.csv_file.display(),
        "loaded CSV input"
    );

    let (token, source) = resolve_vault_token(&settings);
    if source == TokenSource::DevelopmentDefault {
        warn!("no Vault token configured, using the development token");
    }
    debug!(?source, vault = %settings.vault_url, "reading NetBox secret from Vault");

    let vault_transport = settings.vault_transport();
    let vault = VaultClient::new(
        settings.vault_url.as_str(),
        &token,
        settings.vault_mount.clone(),
        &vault_transport,
    )?;
    let secret = vault
        .netbox_secret(&settings.secret_path, &settings.url_key, &settings.token_key)
        .await
        .map_err(|e| CliError::from(e).with_profile(&settings.profile))?;
    let netbox = settings.netbox_config(secret)?;

    let kind = match import.device_type {
        DeviceType::AccessPoint => DeviceKind::AccessPoint,
    };
    let orchestrator = Orchestrator::new(
        NetboxConnector::new(netbox),
        ImportProfile::for_kind(kind),
        settings.update_policy,
    );
    orchestrator
        .preflight()
        .await
        .map_err(|e| CliError::from(e).with_profile(&settings.profile))?;

    let summary = orchestrator.run(rows, trace_entry).await?;
    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "import finished"
    );

    output::print_output(&output::render_summary(global.output, &summary)?);
    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(
    settings: &mut Settings,
    global: &GlobalOpts,
    import: &cli::ImportOpts,
) -> Result<(), CliError> {
    if let Some(ref raw) = global.vault_url {
        settings.vault_url = raw.parse().map_err(|e| CliError::Setup {
            message: format!("invalid --vault-url '{raw}': {e}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        settings.timeout = std::time::Duration::from_secs(secs);
    }
    if import.no_tls_verify {
        settings.tls = TlsVerification::DangerAcceptInvalid;
    }
    if import.no_update {
        settings.update_policy = UpdatePolicy::SkipExisting;
    }
    Ok(())
}
