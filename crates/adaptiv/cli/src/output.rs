//! Output formatting utilities

use std::io::Write;

use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document per line
    #[default]
    Json,
    /// Pretty-printed JSON
    Pretty,
    /// YAML
    Yaml,
}

/// Write a single item in the specified format
pub fn write_item<W: Write, T: Serialize>(
    out: &mut W,
    data: &T,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, data)?;
            writeln!(out)?;
        }
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut *out, data)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            writeln!(out, "---")?;
            serde_yaml::to_writer(&mut *out, data)?;
        }
    }
    Ok(())
}
