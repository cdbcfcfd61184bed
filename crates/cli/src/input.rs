//! Record files and command output.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Read a list of records from a `.json`, `.yaml` or `.yml` file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CliError> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)?,
        Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
        _ => return Err(CliError::UnsupportedFormat(path.display().to_string())),
    };

    tracing::debug!(path = %path.display(), "Loaded records");
    Ok(records)
}

/// Write lines to stdout. Logs go to stderr, so stdout stays pipeable.
pub fn emit_lines<I, S>(lines: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = std::io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}

/// Write a value to stdout as pretty JSON.
pub fn emit_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    emit_lines([json])
}
