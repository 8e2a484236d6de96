//! Scan results produced by the matchers.
//!
//! Results are built fresh for every matcher call and never mutated once returned; callers treat
//! them as read-only reports.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Delimiter between rendered diagnostics in an aggregate message.
pub const MESSAGE_DELIMITER: &str = ";\n";

/// Kind of a filesystem object as seen by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    /// Anything else: sockets, devices, dangling links.
    Other,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Other => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxonomy of discrepancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Declared entry not found under its quantifier.
    StructuralAbsence,
    /// Entry exists but is the wrong kind of filesystem object.
    TypeMismatch,
    /// Inspection failed for a reason other than non-existence.
    AccessError,
    /// Real entry not declared in a strict schema.
    ExtraEntry,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::StructuralAbsence => "structural_absence",
            DiagnosticKind::TypeMismatch => "type_mismatch",
            DiagnosticKind::AccessError => "access_error",
            DiagnosticKind::ExtraEntry => "extra_entry",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A missing or extra entry, relative to the directory that was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub path: Utf8PathBuf,
    pub kind: EntryKind,
    pub diagnostic: DiagnosticKind,
    pub message: String,

    /// Number of files inside, when the entry is a directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<usize>,

    /// Number of subdirectories inside, when the entry is a directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdirs: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsAccessError {
    pub path: Utf8PathBuf,
    pub message: String,
}

impl FsAccessError {
    pub fn rendered(&self) -> String {
        format!("FS Access Error at '{}': {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub path: Utf8PathBuf,
    pub expected: EntryKind,
    pub found: EntryKind,
}

impl TypeMismatch {
    pub fn rendered(&self) -> String {
        format!(
            "Type Mismatch at '{}': expected {} but found {}",
            self.path, self.expected, self.found
        )
    }
}

/// Outcome of resolving one file requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileScanResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_mismatches: Vec<TypeMismatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fs_access_errors: Vec<FsAccessError>,

    /// Extensions confirmed present.
    #[serde(default)]
    pub resolved: BTreeSet<String>,

    #[serde(default)]
    pub message: String,
}

/// One flattened diagnostic of a single directory level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: Utf8PathBuf,
    pub message: String,
}

/// Outcome of matching one directory requirement; nested levels mirror the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryScanResult {
    pub success: bool,
    pub message: String,

    #[serde(default)]
    pub missing_files: Vec<ErrorEntry>,

    #[serde(default)]
    pub missing_dirs: Vec<ErrorEntry>,

    #[serde(default)]
    pub extra_files: Vec<ErrorEntry>,

    #[serde(default)]
    pub extra_dirs: Vec<ErrorEntry>,

    #[serde(default)]
    pub fs_access_errors: Vec<FsAccessError>,

    #[serde(default)]
    pub type_mismatches: Vec<TypeMismatch>,

    #[serde(default)]
    pub nested_results: BTreeMap<String, DirectoryScanResult>,
}

impl Default for DirectoryScanResult {
    fn default() -> Self {
        Self {
            success: true,
            message: String::new(),
            missing_files: Vec::new(),
            missing_dirs: Vec::new(),
            extra_files: Vec::new(),
            extra_dirs: Vec::new(),
            fs_access_errors: Vec::new(),
            type_mismatches: Vec::new(),
            nested_results: BTreeMap::new(),
        }
    }
}

impl DirectoryScanResult {
    /// This level's diagnostics in message order: missing files, missing directories, extra
    /// files, extra directories, access errors, type mismatches.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let entries = self
            .missing_files
            .iter()
            .chain(&self.missing_dirs)
            .chain(&self.extra_files)
            .chain(&self.extra_dirs)
            .map(|e| Diagnostic {
                kind: e.diagnostic,
                path: e.path.clone(),
                message: e.message.clone(),
            });
        let access = self.fs_access_errors.iter().map(|e| Diagnostic {
            kind: DiagnosticKind::AccessError,
            path: e.path.clone(),
            message: e.rendered(),
        });
        let mismatches = self.type_mismatches.iter().map(|t| Diagnostic {
            kind: DiagnosticKind::TypeMismatch,
            path: t.path.clone(),
            message: t.rendered(),
        });
        entries.chain(access).chain(mismatches).collect()
    }

    /// Aggregate message for this level only; nested levels keep their own.
    pub fn render_message(&self) -> String {
        self.diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect::<Vec<_>>()
            .join(MESSAGE_DELIMITER)
    }

    /// Visits this level and every nested level depth-first, in key order. `rel` is the path of
    /// each level relative to the scanned root (empty for the root itself).
    pub fn visit<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&Utf8Path, &'a DirectoryScanResult),
    {
        self.visit_at(Utf8Path::new(""), f);
    }

    fn visit_at<'a, F>(&'a self, rel: &Utf8Path, f: &mut F)
    where
        F: FnMut(&Utf8Path, &'a DirectoryScanResult),
    {
        f(rel, self);
        for (name, nested) in &self.nested_results {
            nested.visit_at(&rel.join(name), f);
        }
    }
}
