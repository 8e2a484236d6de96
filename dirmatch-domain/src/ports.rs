use camino::{Utf8Path, Utf8PathBuf};
use dirmatch_types::EntryKind;
use fs_err as fs;
use std::io;
use tracing::debug;

/// One direct child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Read-only tree access.
///
/// The matchers only ever go through this trait, so they can be tested against
/// [`MemTreeView`](crate::MemTreeView) without real I/O. Implementations must report a missing
/// path as [`io::ErrorKind::NotFound`]; every other error kind is treated as an access failure.
pub trait TreeView {
    /// Direct children of `path`, sorted by name.
    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<TreeEntry>>;

    /// Kind of the object at `path`.
    fn stat(&self, path: &Utf8Path) -> io::Result<EntryKind>;
}

impl<T: TreeView + ?Sized> TreeView for &T {
    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<TreeEntry>> {
        (**self).list_dir(path)
    }

    fn stat(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        (**self).stat(path)
    }
}

/// File-system backed `TreeView`.
#[derive(Debug, Clone)]
pub struct FsTreeView {
    root: Utf8PathBuf,
}

impl FsTreeView {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }
}

impl TreeView for FsTreeView {
    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<TreeEntry>> {
        let abs = self.abs(path);
        debug!(path = %abs, "listing directory");

        let mut out = Vec::new();
        for entry in fs::read_dir(&abs)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Dangling links and entries that vanish mid-scan show up as `Other`.
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) => kind_of(&meta),
                Err(_) => EntryKind::Other,
            };
            out.push(TreeEntry { name, kind });
        }

        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn stat(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(self.abs(path))?;
        Ok(kind_of(&meta))
    }
}

fn kind_of(meta: &std::fs::Metadata) -> EntryKind {
    if meta.is_file() {
        EntryKind::File
    } else if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    }
}
