//! Two-pane dashboard for a received analysis.

use std::fmt::{self, Write as _};

use shared::domain::{AnalysisResult, ReviewStatus};

const RULE: &str = "────────────────────────────────────────";

pub fn badge(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::NeedsHumanReview => "[! Needs Human Review]",
        ReviewStatus::Validated => "[✓ Validated by Guardrail]",
    }
}

/// Renders `result` as the scan/metadata pane followed by the report pane.
///
/// Returns `None` when there is nothing to show. Report text is emitted as
/// received; nothing is wrapped or truncated.
pub fn render_result(result: Option<&AnalysisResult>) -> Option<String> {
    let result = result?;
    let mut out = String::new();
    write_dashboard(&mut out, result).ok()?;
    Some(out)
}

fn write_dashboard(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    let metadata = &result.metadata;
    let report = &result.report;

    writeln!(out, "┌ DICOM Scan")?;
    writeln!(out, "{}", result.image)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Patient Metadata")?;
    writeln!(out, "  Modality   {}", metadata.modality)?;
    writeln!(out, "  Body Part  {}", metadata.body_part_examined)?;
    writeln!(out)?;

    writeln!(out, "┌ Radimal AI Insight  {}", badge(result.status))?;
    writeln!(out, "{RULE}")?;
    write_section(out, "FINDINGS", &report.findings)?;
    write_section(out, "IMPRESSION", &report.impression)?;
    write_section(out, "RECOMMENDATIONS", &report.recommendations)
}

fn write_section(out: &mut String, title: &str, body: &str) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{body}")?;
    writeln!(out)
}
