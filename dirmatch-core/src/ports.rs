//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use dirmatch_types::DirectoryRequirement;

/// Source of the expected layout.
pub trait SchemaSource {
    fn load(&self) -> anyhow::Result<DirectoryRequirement>;

    /// Short label recorded in the report, e.g. a path or `preset:<name>`.
    fn describe(&self) -> String;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
