use crate::ports::{TreeEntry, TreeView};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use dirmatch_types::EntryKind;
use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemNode {
    File,
    Dir,
    /// Shows up as a directory, but listing it fails.
    LockedDir,
    /// Any inspection fails; the parent lists it as `Other`.
    Unreadable,
}

/// In-memory tree for embedding and testing.
///
/// Paths are relative; the empty path (or `.`) is the root and always exists. Intermediate
/// directories are created implicitly. Every `stat` call is recorded so tests can assert which
/// candidates were inspected.
#[derive(Debug, Default)]
pub struct MemTreeView {
    nodes: BTreeMap<Utf8PathBuf, MemNode>,
    stat_calls: Mutex<Vec<Utf8PathBuf>>,
}

impl MemTreeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Utf8Path>) -> Self {
        self.with_node(path.as_ref(), MemNode::File)
    }

    pub fn with_dir(self, path: impl AsRef<Utf8Path>) -> Self {
        self.with_node(path.as_ref(), MemNode::Dir)
    }

    /// A directory whose listing fails with `PermissionDenied`.
    pub fn with_locked_dir(self, path: impl AsRef<Utf8Path>) -> Self {
        self.with_node(path.as_ref(), MemNode::LockedDir)
    }

    /// An entry whose every inspection fails with `PermissionDenied`.
    pub fn with_unreadable(self, path: impl AsRef<Utf8Path>) -> Self {
        self.with_node(path.as_ref(), MemNode::Unreadable)
    }

    /// Paths passed to [`TreeView::stat`], in call order.
    pub fn stat_calls(&self) -> Vec<Utf8PathBuf> {
        self.stat_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn with_node(mut self, path: &Utf8Path, node: MemNode) -> Self {
        let path = normalize(path);
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_str().is_empty() {
                break;
            }
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(MemNode::Dir);
        }
        self.nodes.insert(path, node);
        self
    }

    fn node(&self, path: &Utf8Path) -> Option<MemNode> {
        if path.as_str().is_empty() {
            return Some(MemNode::Dir);
        }
        self.nodes.get(path).copied()
    }
}

impl TreeView for MemTreeView {
    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<TreeEntry>> {
        let path = normalize(path);
        match self.node(&path) {
            None => Err(not_found(&path)),
            Some(MemNode::File) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {path}"),
            )),
            Some(MemNode::LockedDir | MemNode::Unreadable) => Err(denied(&path)),
            Some(MemNode::Dir) => Ok(self
                .nodes
                .iter()
                .filter(|(p, _)| p.parent() == Some(path.as_path()))
                .map(|(p, node)| {
                    let kind = match node {
                        MemNode::File => EntryKind::File,
                        MemNode::Dir | MemNode::LockedDir => EntryKind::Directory,
                        MemNode::Unreadable => EntryKind::Other,
                    };
                    TreeEntry::new(p.file_name().unwrap_or(p.as_str()), kind)
                })
                .collect()),
        }
    }

    fn stat(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        let path = normalize(path);
        if let Ok(mut calls) = self.stat_calls.lock() {
            calls.push(path.clone());
        }
        match self.node(&path) {
            None => Err(not_found(&path)),
            Some(MemNode::File) => Ok(EntryKind::File),
            Some(MemNode::Dir | MemNode::LockedDir) => Ok(EntryKind::Directory),
            Some(MemNode::Unreadable) => Err(denied(&path)),
        }
    }
}

fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    path.components()
        .filter_map(|c| match c {
            Utf8Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

fn not_found(path: &Utf8Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such entry: {path}"))
}

fn denied(path: &Utf8Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {path}"),
    )
}
