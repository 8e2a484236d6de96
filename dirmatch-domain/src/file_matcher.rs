use crate::ports::TreeView;
use camino::Utf8Path;
use dirmatch_types::{
    EntryKind, FileRequirement, FileScanResult, FsAccessError, Quantifier, TypeMismatch,
};
use std::collections::BTreeSet;
use std::io;
use tracing::{debug, warn};

/// Resolves one named file requirement inside `dir`.
///
/// Candidates `<base>.<ext>` are inspected strictly in declared extension order:
/// - absent: missing under `All`; under `Any` it only counts once nothing else matched;
/// - a file: resolved; under `Any` this ends the scan and clears earlier misses;
/// - a directory (or other object): type mismatch, and missing under either quantifier;
/// - inspection error: access error, never missing and never a match.
///
/// `Any` succeeds only on a confirmed match. `All` succeeds only when every extension is confirmed
/// present, so an inaccessible candidate fails the requirement without being listed as missing.
/// Never fails; every outcome is encoded in the result.
pub fn match_file(
    view: &dyn TreeView,
    requirement: &FileRequirement,
    dir: &Utf8Path,
    base: &str,
) -> FileScanResult {
    let quantifier = requirement.quantifier();
    let mut result = FileScanResult::default();
    let mut inaccessible = BTreeSet::new();
    let mut matched = false;

    for ext in requirement.extensions() {
        let path = dir.join(FileRequirement::candidate_name(base, ext));

        match view.stat(&path) {
            Ok(EntryKind::File) => {
                debug!(path = %path, "candidate present");
                result.resolved.insert(ext.clone());
                if quantifier == Quantifier::Any {
                    result.missing_extensions.clear();
                    matched = true;
                    break;
                }
            }
            Ok(found) => {
                debug!(path = %path, found = %found, "candidate has wrong kind");
                result.type_mismatches.push(TypeMismatch {
                    path: path.clone(),
                    expected: EntryKind::File,
                    found,
                });
                result.missing_extensions.push(ext.clone());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path, "candidate absent");
                if quantifier == Quantifier::All {
                    result.missing_extensions.push(ext.clone());
                }
            }
            Err(err) => {
                warn!(path = %path, error = %err, "cannot inspect candidate");
                result.fs_access_errors.push(FsAccessError {
                    message: format!("Error accessing {path}: {err}"),
                    path,
                });
                inaccessible.insert(ext.as_str());
            }
        }
    }

    result.success = match quantifier {
        Quantifier::Any => {
            if !matched {
                // Nothing matched: every candidate that was absent or mistyped is missing.
                result.missing_extensions = requirement
                    .extensions()
                    .iter()
                    .filter(|ext| !inaccessible.contains(ext.as_str()))
                    .cloned()
                    .collect();
            }
            matched
        }
        Quantifier::All => {
            result.missing_extensions.is_empty()
                && result.resolved.len() == requirement.extensions().len()
        }
    };

    if !result.success {
        result.message = failure_message(requirement, base, &result, &inaccessible);
    }

    result
}

fn failure_message(
    requirement: &FileRequirement,
    base: &str,
    result: &FileScanResult,
    inaccessible: &BTreeSet<&str>,
) -> String {
    match requirement.quantifier() {
        Quantifier::Any => format!(
            "Missing file: '{base}' with any valid extension: {}",
            requirement.extensions().join(", ")
        ),
        Quantifier::All if !result.missing_extensions.is_empty() => format!(
            "Missing file: '{base}' with missing extensions: {}",
            result.missing_extensions.join(", ")
        ),
        Quantifier::All => format!(
            "Unverified file: '{base}' with inaccessible extensions: {}",
            inaccessible.iter().copied().collect::<Vec<_>>().join(", ")
        ),
    }
}
