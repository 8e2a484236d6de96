//! Default port implementations.

use crate::ports::{SchemaSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use dirmatch_types::DirectoryRequirement;
use fs_err as fs;
use tracing::debug;

/// Loads a schema document from disk via `dirmatch_schemas::load_schema`.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    pub path: Utf8PathBuf,
}

impl FsSchemaSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl SchemaSource for FsSchemaSource {
    fn load(&self) -> anyhow::Result<DirectoryRequirement> {
        let loaded = dirmatch_schemas::load_schema(&self.path)
            .with_context(|| format!("load schema from {}", self.path))?;
        debug!(path = %loaded.path, format = %loaded.format, "schema loaded");
        Ok(loaded.requirement)
    }

    fn describe(&self) -> String {
        self.path.to_string()
    }
}

/// Resolves one of the built-in presets by name.
#[derive(Debug, Clone)]
pub struct PresetSchemaSource {
    pub name: String,
}

impl PresetSchemaSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SchemaSource for PresetSchemaSource {
    fn load(&self) -> anyhow::Result<DirectoryRequirement> {
        dirmatch_schemas::find_preset(&self.name)
            .with_context(|| format!("resolve preset {}", self.name))
    }

    fn describe(&self) -> String {
        format!("preset:{}", self.name)
    }
}

/// Already-built requirement, for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemorySchemaSource {
    requirement: DirectoryRequirement,
    label: String,
}

impl InMemorySchemaSource {
    pub fn new(requirement: DirectoryRequirement) -> Self {
        Self {
            requirement,
            label: "inline".to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn load(&self) -> anyhow::Result<DirectoryRequirement> {
        Ok(self.requirement.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
