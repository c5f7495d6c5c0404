//! JSON output on stdout. Everything else goes to stderr through tracing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Render `value` as JSON indented by two spaces.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing result")
}

/// Print `value` as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = to_pretty_json(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("writing to stdout")?;
    stdout.flush().context("flushing stdout")
}
