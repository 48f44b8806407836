//! Run summary rendering: table, JSON, YAML.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use nbimport_core::RunSummary;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Outcome")]
    outcome: &'static str,
    #[tabled(rename = "Records")]
    count: usize,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Device")]
    record: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Cause")]
    cause: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Render the summary in the chosen format.
pub fn render_summary(format: OutputFormat, summary: &RunSummary) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_table(summary),
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Yaml => serde_yaml::to_string(summary)?,
    })
}

fn render_table(summary: &RunSummary) -> String {
    let counts = [
        ("created", summary.created),
        ("updated", summary.updated),
        ("skipped", summary.skipped),
        ("failed", summary.failed),
        ("total", summary.records),
    ]
    .map(|(outcome, count)| CountRow { outcome, count });
    let mut out = Table::new(counts).with(Style::rounded()).to_string();

    if !summary.failures.is_empty() {
        let failures = summary.failures.iter().map(|f| FailureRow {
            record: f.record.clone(),
            stage: f.stage.to_string(),
            cause: f.cause.to_string(),
            message: f.message.clone(),
        });
        out.push('\n');
        out.push_str(&Table::new(failures).with(Style::rounded()).to_string());
    }
    out
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nbimport_core::{FailedRecord, FailureCause, RecordKind};

    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            records: 3,
            created: 1,
            updated: 1,
            skipped: 0,
            failed: 1,
            failures: vec![FailedRecord {
                record: "ap3".into(),
                stage: RecordKind::Interface,
                cause: FailureCause::Invalid,
                message: "Device 'ap3': bad channel".into(),
            }],
        }
    }

    #[test]
    fn table_lists_counts_and_failures() {
        let out = render_summary(OutputFormat::Table, &summary()).unwrap();
        assert!(out.contains("created"));
        assert!(out.contains("ap3"));
        assert!(out.contains("invalid input"));
    }

    #[test]
    fn table_omits_failure_section_when_clean() {
        let clean = RunSummary {
            records: 1,
            created: 1,
            ..RunSummary::default()
        };
        let out = render_summary(OutputFormat::Table, &clean).unwrap();
        assert!(!out.contains("Stage"));
    }

    #[test]
    fn json_uses_snake_case_enums() {
        let out = render_summary(OutputFormat::Json, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["failed"], 1);
        assert_eq!(value["failures"][0]["stage"], "interface");
        assert_eq!(value["failures"][0]["cause"], "invalid");
    }
}
