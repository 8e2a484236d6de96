use crate::counter::{ExpectedSize, count_expected};
use crate::error::ScanError;
use crate::file_matcher::match_file;
use crate::ports::{TreeEntry, TreeView};
use camino::{Utf8Path, Utf8PathBuf};
use dirmatch_types::{
    DiagnosticKind, DirectoryRequirement, DirectoryScanResult, EntryKind, ErrorEntry,
    FileRequirement, FsAccessError, Quantifier, TypeMismatch,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use tracing::{debug, warn};

/// Matches `requirement` against the real directory at `dir`, recursing into every declared
/// subdirectory that exists.
///
/// A missing `dir` is reported inside the result. A `dir` that exists but cannot be listed is
/// returned as [`ScanError`]; when that happens to a nested directory the parent captures it as an
/// access error, so only the outermost call can fail.
pub fn match_directory(
    view: &dyn TreeView,
    requirement: &DirectoryRequirement,
    dir: &Utf8Path,
) -> Result<DirectoryScanResult, ScanError> {
    let entries = match view.list_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %dir, "directory does not exist");
            return Ok(missing_root(dir));
        }
        Err(source) => {
            return Err(ScanError::ListDir {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut level = Level::new(view, dir, &entries);
    level.check_files(requirement);
    level.check_subdirs(requirement);
    if requirement.is_strict() {
        level.check_extras(requirement);
    }
    Ok(level.finish())
}

fn missing_root(dir: &Utf8Path) -> DirectoryScanResult {
    let name = display_name(dir);
    DirectoryScanResult {
        success: false,
        message: format!("Missing directory: '{name}'"),
        fs_access_errors: vec![FsAccessError {
            path: dir.to_path_buf(),
            message: format!("Root target directory does not exist: '{name}'"),
        }],
        ..Default::default()
    }
}

fn display_name(dir: &Utf8Path) -> &str {
    dir.file_name().unwrap_or(dir.as_str())
}

/// Accumulates one directory level. `ok` only ever goes from true to false.
struct Level<'a> {
    view: &'a dyn TreeView,
    dir: &'a Utf8Path,
    entries: &'a [TreeEntry],
    kinds: BTreeMap<&'a str, EntryKind>,
    /// Exact file names confirmed by the file requirements.
    whitelist: BTreeSet<String>,
    /// Names already reported as the wrong kind; never reported again as extras.
    mismatched: BTreeSet<String>,
    ok: bool,
    result: DirectoryScanResult,
}

impl<'a> Level<'a> {
    fn new(view: &'a dyn TreeView, dir: &'a Utf8Path, entries: &'a [TreeEntry]) -> Self {
        Self {
            view,
            dir,
            entries,
            kinds: entries.iter().map(|e| (e.name.as_str(), e.kind)).collect(),
            whitelist: BTreeSet::new(),
            mismatched: BTreeSet::new(),
            ok: true,
            result: DirectoryScanResult::default(),
        }
    }

    fn check_files(&mut self, requirement: &DirectoryRequirement) {
        for (base, file_req) in requirement.files() {
            let file = match_file(self.view, file_req, self.dir, base);

            for ext in &file.resolved {
                self.whitelist
                    .insert(FileRequirement::candidate_name(base, ext));
            }
            for mismatch in &file.type_mismatches {
                if let Some(name) = mismatch.path.file_name() {
                    self.mismatched.insert(name.to_string());
                }
            }

            if !file.success {
                debug!(dir = %self.dir, file = %base, "file requirement not satisfied");
                match file_req.quantifier() {
                    Quantifier::All => {
                        for ext in &file.missing_extensions {
                            let name = FileRequirement::candidate_name(base, ext);
                            self.result.missing_files.push(ErrorEntry {
                                message: format!("Missing file: '{name}'"),
                                path: Utf8PathBuf::from(name),
                                kind: EntryKind::File,
                                diagnostic: DiagnosticKind::StructuralAbsence,
                                files: None,
                                subdirs: None,
                            });
                        }
                    }
                    Quantifier::Any if !file.missing_extensions.is_empty() => {
                        self.result.missing_files.push(ErrorEntry {
                            path: Utf8PathBuf::from(base),
                            kind: EntryKind::File,
                            diagnostic: DiagnosticKind::StructuralAbsence,
                            message: file.message.clone(),
                            files: None,
                            subdirs: None,
                        });
                    }
                    Quantifier::Any => {}
                }
            }

            self.ok &= file.success;
            self.result.fs_access_errors.extend(file.fs_access_errors);
            self.result.type_mismatches.extend(file.type_mismatches);
        }
    }

    fn check_subdirs(&mut self, requirement: &DirectoryRequirement) {
        for (name, nested_req) in requirement.subdirs() {
            let path = self.dir.join(name);

            match self.kinds.get(name.as_str()).copied() {
                None => {
                    let size = count_expected(nested_req, true);
                    debug!(path = %path, files = size.files, subdirs = size.subdirs, "directory missing");
                    self.result.missing_dirs.push(ErrorEntry {
                        path: Utf8PathBuf::from(name),
                        kind: EntryKind::Directory,
                        diagnostic: DiagnosticKind::StructuralAbsence,
                        message: format!("Missing directory: '{name}' with {}", size.describe()),
                        files: Some(size.files),
                        subdirs: Some(size.subdirs),
                    });
                    self.ok = false;
                }
                Some(EntryKind::Directory) => match match_directory(self.view, nested_req, &path) {
                    Ok(nested) => {
                        self.ok &= nested.success;
                        self.result.nested_results.insert(name.clone(), nested);
                    }
                    Err(ScanError::ListDir { path, source }) => {
                        warn!(path = %path, error = %source, "cannot list subdirectory");
                        self.result.fs_access_errors.push(FsAccessError {
                            message: format!("Error listing {path}: {source}"),
                            path,
                        });
                        self.ok = false;
                    }
                },
                Some(found) => {
                    self.result.type_mismatches.push(TypeMismatch {
                        path,
                        expected: EntryKind::Directory,
                        found,
                    });
                    self.mismatched.insert(name.clone());
                    self.ok = false;
                }
            }
        }
    }

    fn check_extras(&mut self, requirement: &DirectoryRequirement) {
        for entry in self.entries {
            if self.mismatched.contains(&entry.name) {
                continue;
            }
            let name = entry.name.as_str();
            match entry.kind {
                EntryKind::File if !self.whitelist.contains(name) => {
                    self.result.extra_files.push(extra(name, EntryKind::File, None));
                }
                EntryKind::Directory if requirement.subdir(name).is_none() => {
                    let size = self.local_size(name);
                    self.result
                        .extra_dirs
                        .push(extra(name, EntryKind::Directory, size));
                }
                EntryKind::Other => {
                    self.result.extra_files.push(extra(name, EntryKind::Other, None));
                }
                _ => {}
            }
        }

        if !self.result.extra_files.is_empty() || !self.result.extra_dirs.is_empty() {
            self.ok = false;
        }
    }

    /// One-level listing of an extra directory; not a schema walk.
    fn local_size(&self, name: &str) -> Option<ExpectedSize> {
        let children = self.view.list_dir(&self.dir.join(name)).ok()?;
        Some(ExpectedSize {
            files: children
                .iter()
                .filter(|c| c.kind == EntryKind::File)
                .count(),
            subdirs: children
                .iter()
                .filter(|c| c.kind == EntryKind::Directory)
                .count(),
        })
    }

    fn finish(mut self) -> DirectoryScanResult {
        self.result.success = self.ok;
        self.result.message = self.result.render_message();
        self.result
    }
}

fn extra(name: &str, kind: EntryKind, size: Option<ExpectedSize>) -> ErrorEntry {
    let message = match (kind, size) {
        (EntryKind::Directory, Some(size)) => {
            format!("Extra directory: '{name}' with {}", size.describe())
        }
        (EntryKind::Directory, None) => format!("Extra directory: '{name}'"),
        (EntryKind::File, _) => format!("Extra file: '{name}'"),
        (EntryKind::Other, _) => format!("Extra entry: '{name}'"),
    };
    ErrorEntry {
        path: Utf8PathBuf::from(name),
        kind,
        diagnostic: DiagnosticKind::ExtraEntry,
        message,
        files: size.map(|s| s.files),
        subdirs: size.map(|s| s.subdirs),
    }
}
