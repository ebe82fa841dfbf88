// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Human-readable run summaries
//!
//! The pipeline only produces a [`RunReport`]; everything printed to the
//! user is derived from it here.

use std::collections::BTreeMap;

use crate::ingest::{FileStatus, RunReport, RunStatus};

/// Naming convention shown when files could not be classified
pub const NAMING_HINT: &str = "<stage>__<type>__<topic>__v01.png (e.g. C__template__needs-statement__v01.png)";

/// Render a run report as plain text
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    match &report.status {
        RunStatus::SourceCreated => {
            out.push_str(&format!("Source folder not found, created: {}\n", report.source_dir.display()));
            out.push_str(&format!("Add screenshots there using {}\n", NAMING_HINT));
            return out;
        }
        RunStatus::NoImages => {
            out.push_str(&format!("No images in {}\n", report.source_dir.display()));
            return out;
        }
        RunStatus::NothingNew => {
            out.push_str(&format!("All {} images already cataloged. Nothing to do.\n", report.found));
            return out;
        }
        _ => {}
    }

    out.push_str(&format!("Found {} images, {} already cataloged\n", report.found, report.skipped().len()));

    for outcome in &report.files {
        let Some(descriptor) = &outcome.descriptor else {
            continue;
        };
        match &outcome.status {
            FileStatus::Planned => {
                out.push_str(&format!("  would copy {} -> {}\n", outcome.filename, descriptor.relative_path));
            }
            FileStatus::Copied => {
                out.push_str(&format!("  copied {} -> {}\n", outcome.filename, descriptor.relative_path));
            }
            FileStatus::CopyFailed { error } => {
                out.push_str(&format!("  FAILED {}: {}\n", outcome.filename, error));
            }
            FileStatus::SkippedDuplicate => {}
        }
    }

    let unclassifiable = report.unclassifiable();
    if !unclassifiable.is_empty() {
        out.push_str(&format!("\n{} files don't follow the naming convention:\n", unclassifiable.len()));
        for outcome in unclassifiable {
            out.push_str(&format!("  - {}\n", outcome.filename));
        }
        out.push_str(&format!("Rename using: {}\n", NAMING_HINT));
    }

    out.push('\n');
    match &report.status {
        RunStatus::DryRun => {
            out.push_str(&format!("Dry run: {} files would be ingested\n", report.planned().len()));
        }
        RunStatus::NothingCopied => {
            out.push_str(&format!("No files could be copied ({} failures)\n", report.failed().len()));
        }
        RunStatus::PublishFailed { error } => {
            out.push_str(&format!("Publish failed: {}\n", error));
            out.push_str("Copied files were left in place; the catalog was not updated. Re-run to retry.\n");
        }
        RunStatus::Cataloged { entries, created } => {
            let verb = if *created { "Created" } else { "Updated" };
            out.push_str(&format!("{} {} with {} new entries\n", verb, report.catalog_path.display(), entries));
            out.push_str("\nBy category:\n");
            for (label, count) in category_counts(report) {
                out.push_str(&format!("  {}: {}\n", label, count));
            }
            out.push_str(&format!("\nNext: fill in descriptions and triggers in {}\n", report.catalog_path.display()));
        }
        _ => {}
    }

    let failed = report.failed().len();
    if failed > 0 && !matches!(report.status, RunStatus::NothingCopied) {
        out.push_str(&format!("{} files failed to copy and will be retried next run\n", failed));
    }

    out
}

/// Copied file counts per category label
pub fn category_counts(report: &RunReport) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for outcome in report.copied() {
        if let Some(descriptor) = &outcome.descriptor {
            *counts.entry(descriptor.category.label()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{FileDescriptor, FileOutcome};
    use crate::resolve::PathResolver;
    use crate::AppConfig;
    use std::path::{Path, PathBuf};

    fn report(status: RunStatus, files: Vec<FileOutcome>) -> RunReport {
        RunReport {
            run_id: "r".to_string(),
            source_dir: PathBuf::from("shots"),
            catalog_path: PathBuf::from("catalog.md"),
            found: files.len(),
            files,
            status,
        }
    }

    fn outcome(name: &str, status: FileStatus) -> FileOutcome {
        let resolver = PathResolver::new(&AppConfig::default());
        FileOutcome {
            filename: name.to_string(),
            descriptor: FileDescriptor::describe(Path::new(name), &resolver),
            status,
        }
    }

    #[test]
    fn test_nothing_new() {
        let mut r = report(RunStatus::NothingNew, Vec::new());
        r.found = 4;
        assert_eq!(render_text(&r), "All 4 images already cataloged. Nothing to do.\n");
    }

    #[test]
    fn test_cataloged_summary_lists_warnings() {
        let r = report(
            RunStatus::Cataloged { entries: 2, created: true },
            vec![
                outcome("C__template__needs-statement__v01.png", FileStatus::Copied),
                outcome("randomshot.png", FileStatus::Copied),
                outcome("broken.png", FileStatus::CopyFailed { error: "denied".to_string() }),
            ],
        );
        let text = render_text(&r);
        assert!(text.contains("copied randomshot.png -> images/uncategorized/randomshot.png"));
        assert!(text.contains("FAILED broken.png: denied"));
        assert!(text.contains("files don't follow the naming convention"));
        assert!(text.contains("Created catalog.md with 2 new entries"));
        assert!(text.contains("  C/template: 1"));
        assert!(text.contains("1 files failed to copy"));
    }

    #[test]
    fn test_dry_run_text() {
        let r = report(
            RunStatus::DryRun,
            vec![outcome("C__template__needs-statement__v01.png", FileStatus::Planned)],
        );
        assert_eq!(
            render_text(&r),
            "Found 1 images, 0 already cataloged\n\
             \x20 would copy C__template__needs-statement__v01.png -> images/C_user-research-synthesis/templates/C__template__needs-statement__v01.png\n\
             \n\
             Dry run: 1 files would be ingested\n"
        );
    }

    #[test]
    fn test_publish_failure_message() {
        let r = report(
            RunStatus::PublishFailed { error: "rejected".to_string() },
            vec![outcome("a.png", FileStatus::Copied)],
        );
        let text = render_text(&r);
        assert!(text.contains("Publish failed: rejected"));
        assert!(text.contains("catalog was not updated"));
    }
}
