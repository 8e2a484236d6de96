//! Rendering helpers (markdown and plain text) for human-readable output.

use camino::Utf8Path;
use dirmatch_types::DirectoryScanResult;
use dirmatch_types::report::{DirmatchReport, ReportStatus};

pub fn render_report_md(report: &DirmatchReport) -> String {
    let mut out = String::new();
    out.push_str("# dirmatch report\n\n");
    out.push_str(&format!(
        "- Status: `{}`\n",
        status_label(report.verdict.status)
    ));
    out.push_str(&format!("- Root: `{}`\n", report.run.root));
    if let Some(source) = &report.run.schema_source {
        out.push_str(&format!("- Schema: `{}`\n", source));
    }
    let counts = &report.verdict.counts;
    out.push_str(&format!(
        "- Findings: {} (missing {}, mismatched {}, inaccessible {}, extra {})\n",
        counts.total(),
        counts.structural_absence,
        counts.type_mismatch,
        counts.access_error,
        counts.extra_entry
    ));
    if let Some(ms) = report.run.duration_ms {
        out.push_str(&format!("- Duration: {} ms\n", ms));
    }
    out.push('\n');

    out.push_str("## Levels\n\n");
    report
        .result
        .visit(&mut |rel: &Utf8Path, level: &DirectoryScanResult| {
            out.push_str(&format!(
                "- `{}` {}\n",
                level_label(rel),
                if level.success { "ok" } else { "failed" }
            ));
        });
    out.push('\n');

    out.push_str("## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("_No findings._\n");
        return out;
    }

    for f in &report.findings {
        out.push_str(&format!(
            "- `{}` `{}` {}\n",
            level_label(&f.location.dir),
            f.code,
            f.message
        ));
    }

    out
}

/// Terminal output: an overall verdict line, then the diagnostics of each failing level.
pub fn render_result_text(result: &DirectoryScanResult) -> String {
    let mut out = String::new();
    out.push_str(if result.success { "PASS\n" } else { "FAIL\n" });

    result.visit(&mut |rel: &Utf8Path, level: &DirectoryScanResult| {
        let diagnostics = level.diagnostics();
        if diagnostics.is_empty() {
            return;
        }
        out.push_str(&format!("{}:\n", level_label(rel)));
        for d in diagnostics {
            out.push_str(&format!("  - {}\n", d.message));
        }
    });

    out
}

fn level_label(rel: &Utf8Path) -> &str {
    if rel.as_str().is_empty() {
        "."
    } else {
        rel.as_str()
    }
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Fail => "fail",
    }
}
