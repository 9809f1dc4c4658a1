//! Name list export.

use crate::{Error, ErrorContext, Result};
use std::str::FromStr;

pub const DEFAULT_EXPORT_FILE: &str = "generated-names.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One name per line.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::configuration_with_context(
                format!("Unknown export format '{}'", other),
                ErrorContext::new()
                    .with_field_path("export.format")
                    .with_details("expected text or json"),
            )),
        }
    }
}

pub fn export_names(names: &[String], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(names.join("\n")),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(names)?),
    }
}
