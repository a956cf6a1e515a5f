//! Markdown report rendering.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use codetime_core::EstimationResult;

/// Everything that goes into a report.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub user: &'a str,
    pub repos: &'a [String],
    pub result: &'a EstimationResult,
}

/// Formats hours with two decimals, e.g. `2.00`.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Renders the report as Markdown.
pub fn render_markdown(report: &Report<'_>) -> String {
    let repos = if report.repos.is_empty() {
        "N/A".to_string()
    } else {
        report.repos.join(", ")
    };

    // Writing to a String cannot fail
    let mut out = String::new();
    let _ = writeln!(out, "# CodeTime Waster Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "**User**: `{}`", report.user);
    let _ = writeln!(out, "**Repos analyzed**: {repos}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Estimated coding sessions**: `{}`",
        report.result.session_count
    );
    let _ = writeln!(
        out,
        "**Total time wasted**: `{} hours`",
        format_hours(report.result.total_hours)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## Instead, you could have:");
    let _ = writeln!(out);
    for line in &report.result.activity_lines {
        let _ = writeln!(out, "- {line}");
    }
    out
}

/// Writes the rendered report to `path`, creating parent directories.
pub fn write_report(path: &Path, report: &Report<'_>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render_markdown(report))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote report");
    Ok(())
}
