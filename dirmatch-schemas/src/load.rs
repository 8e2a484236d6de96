use camino::{Utf8Path, Utf8PathBuf};
use dirmatch_types::{DirectoryRequirement, SchemaError};
use fs_err as fs;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// On-disk encoding of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFormat {
    Json,
    Toml,
    Yaml,
}

impl SchemaFormat {
    /// Picks the format from the file extension. Anything unrecognised is read as JSON.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => SchemaFormat::Toml,
            Some("yaml") | Some("yml") => SchemaFormat::Yaml,
            _ => SchemaFormat::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaFormat::Json => "json",
            SchemaFormat::Toml => "toml",
            SchemaFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: Utf8PathBuf,
    pub format: SchemaFormat,
    pub requirement: DirectoryRequirement,
}

#[derive(Debug, Error, Clone)]
pub enum SchemaLoadError {
    #[error("io error reading {path}: {message}")]
    Io { path: Utf8PathBuf, message: String },

    #[error("{format} parse error: {message}")]
    Parse {
        format: SchemaFormat,
        message: String,
    },

    #[error("unknown preset '{name}' (available: {available})")]
    UnknownPreset { name: String, available: String },

    #[error("preset '{name}' is invalid: {source}")]
    InvalidPreset {
        name: String,
        #[source]
        source: SchemaError,
    },
}

/// Reads and validates the schema document at `path`.
pub fn load_schema(path: &Utf8Path) -> Result<LoadedSchema, SchemaLoadError> {
    let format = SchemaFormat::from_path(path);
    debug!(path = %path, format = %format, "loading schema document");

    let text = fs::read_to_string(path).map_err(|e| SchemaLoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let requirement = parse_schema(&text, format)?;

    Ok(LoadedSchema {
        path: path.to_path_buf(),
        format,
        requirement,
    })
}

/// Parses a schema document that is already in memory.
pub fn parse_schema(
    text: &str,
    format: SchemaFormat,
) -> Result<DirectoryRequirement, SchemaLoadError> {
    let parsed = match format {
        SchemaFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        SchemaFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        SchemaFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| SchemaLoadError::Parse { format, message })
}
