use crate::scan::{DiagnosticKind, DirectoryScanResult};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serialized outcome of one `check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirmatchReport {
    pub schema: String,
    pub tool: ReportToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,

    /// Every diagnostic of every level, flattened in visit order.
    #[serde(default)]
    pub findings: Vec<ReportFinding>,

    /// Pointers to related artifact files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ReportArtifacts>,

    /// The full nested scan result.
    pub result: DirectoryScanResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportToolInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunInfo {
    pub run_id: Uuid,
    pub root: Utf8PathBuf,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Where the schema came from, e.g. a file path or `preset:texture-pack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,
    pub counts: ReportCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub structural_absence: u64,
    pub type_mismatch: u64,
    pub access_error: u64,
    pub extra_entry: u64,
}

impl ReportCounts {
    pub fn record(&mut self, kind: DiagnosticKind) {
        match kind {
            DiagnosticKind::StructuralAbsence => self.structural_absence += 1,
            DiagnosticKind::TypeMismatch => self.type_mismatch += 1,
            DiagnosticKind::AccessError => self.access_error += 1,
            DiagnosticKind::ExtraEntry => self.extra_entry += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.structural_absence + self.type_mismatch + self.access_error + self.extra_entry
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFinding {
    pub severity: ReportSeverity,
    pub code: DiagnosticKind,
    pub message: String,
    pub location: ReportLocation,

    /// Stable key for deduplication across runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSeverity {
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocation {
    /// Directory level the diagnostic belongs to, relative to the scanned root.
    pub dir: Utf8PathBuf,
    pub path: Utf8PathBuf,
}

/// Pointers to related artifact files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}
