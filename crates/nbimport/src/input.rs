//! CSV input: one device per row, header names become field names.

use std::io;
use std::path::Path;

use nbimport_core::{CoreError, InputRow, RawFields};

use crate::error::CliError;

/// Read every data row from the CSV file at `path`.
///
/// Rows that cannot be parsed (wrong field count, invalid UTF-8) are kept
/// as failed rows so they get their own log line; only an unreadable file
/// aborts the run.
pub fn read_rows(path: &Path) -> Result<Vec<InputRow>, CliError> {
    let file = std::fs::File::open(path).map_err(|e| input_error(path, &e))?;
    read_rows_from(file).map_err(|e| input_error(path, &e))
}

fn input_error(path: &Path, reason: &dyn std::fmt::Display) -> CliError {
    CliError::Input {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_rows_from<R: io::Read>(source: R) -> Result<Vec<InputRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_owned())
        .collect();

    let mut rows = Vec::new();
    let mut next_line = 2;
    for result in reader.records() {
        let row = match result {
            Ok(record) => InputRow {
                line: record.position().map_or(next_line, csv::Position::line),
                fields: Ok(headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_owned))
                    .collect::<RawFields>()),
            },
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err),
            Err(err) => InputRow {
                line: err.position().map_or(next_line, csv::Position::line),
                fields: Err(CoreError::MalformedInput {
                    message: err.to_string(),
                }),
            },
        };
        next_line = row.line + 1;
        rows.push(row);
    }
    Ok(rows)
}
