//! Shared DTOs (schemas-as-code) for the dirmatch workspace.
//!
//! # Design constraints
//! - Schema Model values are immutable once built; the only way in is through validation.
//! - Scan results and reports are intended to be serialized to disk.
//! - Prefer adding optional fields over changing semantics.

pub mod report;
pub mod requirement;
pub mod scan;

pub use requirement::{
    DirectoryRequirement, DirectoryRequirementBuilder, FileRequirement, Quantifier, SchemaError,
};
pub use scan::{
    Diagnostic, DiagnosticKind, DirectoryScanResult, EntryKind, ErrorEntry, FileScanResult,
    FsAccessError, MESSAGE_DELIMITER, TypeMismatch,
};

/// Schema identifiers.
pub mod schema {
    pub const DIRMATCH_SCHEMA_V1: &str = "dirmatch.schema.v1";
    pub const DIRMATCH_REPORT_V1: &str = "dirmatch.report.v1";
}
