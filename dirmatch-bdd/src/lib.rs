//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates. The helpers
//! here build real directory trees from the compact `path/` (directory) and `path` (file)
//! notation the feature files use.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// Creates `entry` under `root`. A trailing `/` makes it a directory, anything else an empty
/// file. Missing parents are created.
pub fn materialize(root: &Utf8Path, entry: &str) -> anyhow::Result<()> {
    if let Some(dir) = entry.strip_suffix('/') {
        fs::create_dir_all(root.join(dir)).with_context(|| format!("create {dir}"))?;
        return Ok(());
    }
    let path = root.join(entry);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create parent of {entry}"))?;
    }
    fs::write(&path, b"").with_context(|| format!("write {entry}"))
}
