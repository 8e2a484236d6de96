//! The check pipeline, extracted from the CLI.
//!
//! The entry point is I/O-agnostic: the tree is read through [`TreeView`], the schema comes from a
//! [`SchemaSource`] and artifacts go through a [`WritePort`].

use crate::ports::{SchemaSource, WritePort};
use crate::settings::CheckSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use dirmatch_domain::{TreeView, match_directory};
use dirmatch_render::render_report_md;
use dirmatch_types::report::{
    DirmatchReport, ReportArtifacts, ReportCounts, ReportFinding, ReportLocation, ReportRunInfo,
    ReportSeverity, ReportStatus, ReportToolInfo, ReportVerdict,
};
use dirmatch_types::{DiagnosticKind, DirectoryScanResult};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

/// Error type for pipeline results. Exit code 2 = tree does not match, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("layout mismatch")]
    Mismatch,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Mismatch => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome of `run_check`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: DirmatchReport,
    pub mismatch: bool,
}

impl CheckOutcome {
    pub fn result(&self) -> &DirectoryScanResult {
        &self.report.result
    }

    /// `Err(ToolError::Mismatch)` when the tree did not match.
    pub fn into_verdict(self) -> Result<DirmatchReport, ToolError> {
        if self.mismatch {
            Err(ToolError::Mismatch)
        } else {
            Ok(self.report)
        }
    }
}

/// Runs one check: load the schema, match the tree and build the report.
///
/// Artifacts are written to `settings.out_dir` when it is set. A tree that does not match is not
/// an error here; see [`CheckOutcome::mismatch`].
pub fn run_check(
    settings: &CheckSettings,
    schema: &dyn SchemaSource,
    view: &dyn TreeView,
    writer: &dyn WritePort,
    tool: ReportToolInfo,
) -> Result<CheckOutcome, ToolError> {
    let started_at = Utc::now();

    let mut requirement = schema.load()?;
    if let Some(strict) = settings.strict {
        requirement = requirement.with_strict(strict);
    }
    let source = schema.describe();
    info!(root = %settings.root, schema = %source, "checking layout");

    let result = match_directory(view, &requirement, &settings.root)
        .with_context(|| format!("scan {}", settings.root))?;

    let ended_at = Utc::now();
    let mut report = report_from_result(
        result,
        &settings.root,
        Some(source),
        tool,
        started_at,
        ended_at,
    );

    if let Some(out_dir) = &settings.out_dir {
        report.artifacts = Some(ReportArtifacts {
            json: Some("report.json".to_string()),
            markdown: Some("report.md".to_string()),
        });
        write_check_artifacts(&report, out_dir, writer)?;
    }

    let mismatch = report.verdict.status == ReportStatus::Fail;
    debug!(
        mismatch,
        findings = report.findings.len(),
        "check finished"
    );
    Ok(CheckOutcome { report, mismatch })
}

/// Write `report.json` and `report.md` to the output directory.
pub fn write_check_artifacts(
    report: &DirmatchReport,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), json.as_bytes())?;

    let md = render_report_md(report);
    writer.write_file(&out_dir.join("report.md"), md.as_bytes())?;

    info!("wrote report to {}", out_dir);
    Ok(())
}

/// Builds the report envelope around a finished scan.
pub fn report_from_result(
    result: DirectoryScanResult,
    root: &Utf8Path,
    schema_source: Option<String>,
    tool: ReportToolInfo,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> DirmatchReport {
    let findings = collect_findings(&result, root);

    let mut counts = ReportCounts::default();
    for f in &findings {
        counts.record(f.code);
    }

    let status = if result.success {
        ReportStatus::Pass
    } else {
        ReportStatus::Fail
    };
    let reasons = [
        (counts.structural_absence, DiagnosticKind::StructuralAbsence),
        (counts.type_mismatch, DiagnosticKind::TypeMismatch),
        (counts.access_error, DiagnosticKind::AccessError),
        (counts.extra_entry, DiagnosticKind::ExtraEntry),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(_, kind)| kind.as_str().to_string())
    .collect();

    let duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;

    DirmatchReport {
        schema: dirmatch_types::schema::DIRMATCH_REPORT_V1.to_string(),
        tool,
        run: ReportRunInfo {
            run_id: Uuid::new_v4(),
            root: root.to_path_buf(),
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
            schema_source,
        },
        verdict: ReportVerdict {
            status,
            counts,
            reasons,
        },
        findings,
        artifacts: None,
        result,
    }
}

/// Flattens every level's diagnostics, in visit order, with paths relative to `root`.
fn collect_findings(result: &DirectoryScanResult, root: &Utf8Path) -> Vec<ReportFinding> {
    let mut findings = Vec::new();
    result.visit(&mut |rel: &Utf8Path, level: &DirectoryScanResult| {
        for d in level.diagnostics() {
            let path = match d.kind {
                // Entry names are bare; access errors and mismatches carry the scanned path.
                DiagnosticKind::StructuralAbsence | DiagnosticKind::ExtraEntry => rel.join(&d.path),
                DiagnosticKind::AccessError | DiagnosticKind::TypeMismatch => {
                    match d.path.strip_prefix(root) {
                        // A missing root is reported at the root path itself.
                        Ok(rel) if rel.as_str().is_empty() => d.path.clone(),
                        Ok(rel) => rel.to_path_buf(),
                        Err(_) => d.path.clone(),
                    }
                }
            };
            findings.push(ReportFinding {
                severity: ReportSeverity::Error,
                code: d.kind,
                message: d.message,
                fingerprint: Some(fingerprint(d.kind, &path)),
                location: ReportLocation {
                    dir: rel.to_path_buf(),
                    path,
                },
            });
        }
    });
    findings
}

fn fingerprint(kind: DiagnosticKind, path: &Utf8Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(path.as_str().as_bytes());
    hex::encode(hasher.finalize())
}
