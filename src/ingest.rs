// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ingestion pipeline
//!
//! One synchronous pass: scan the source folder, drop files the catalog
//! already references, copy the rest into the categorized tree, publish the
//! batch, then append the new entries to the catalog. A publish failure stops
//! the run before the catalog is touched; copies already made stay on disk
//! and are picked up again on the next run.

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::catalog::{self, CatalogSection};
use crate::enrichment::EnrichmentIndex;
use crate::history::{self, History};
use crate::publish::Publisher;
use crate::resolve::PathResolver;
use crate::taxonomy::{Category, SectionEntry, Taxonomy};
use crate::{AppConfig, Result};

/// A discovered source file with its classification and destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub filename: String,
    pub category: Category,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    /// Destination relative to the repository root
    pub relative_path: String,
    pub public_url: String,
}

impl FileDescriptor {
    /// Classify and resolve a source file. `None` for paths without a UTF-8 filename.
    pub fn describe(source: &Path, resolver: &PathResolver) -> Option<Self> {
        let filename = source.file_name()?.to_str()?.to_string();
        let category = resolver.taxonomy().classify(&filename);
        let destination = resolver.resolve(&category, &filename);

        Some(Self {
            filename,
            category,
            source_path: source.to_path_buf(),
            destination_path: destination.path,
            relative_path: destination.relative,
            public_url: destination.url,
        })
    }
}

/// What happened to one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Already referenced by the catalog; not copied, not re-cataloged
    SkippedDuplicate,
    /// Would be copied (dry run)
    Planned,
    Copied,
    CopyFailed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub filename: String,
    /// Absent for skipped files, which are never classified
    pub descriptor: Option<FileDescriptor>,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_unclassifiable(&self) -> bool {
        self.descriptor.as_ref().is_some_and(|d| d.category.is_uncategorized())
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunStatus {
    /// Source folder was missing and has been created
    SourceCreated,
    NoImages,
    /// Every image is already cataloged
    NothingNew,
    DryRun,
    /// New images were found but none could be copied
    NothingCopied,
    PublishFailed { error: String },
    Cataloged { entries: usize, created: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub source_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub found: usize,
    pub files: Vec<FileOutcome>,
    pub status: RunStatus,
}

impl RunReport {
    fn new(config: &AppConfig, run_id: String) -> Self {
        Self {
            run_id,
            source_dir: config.source_dir(),
            catalog_path: config.catalog_path(),
            found: 0,
            files: Vec::new(),
            status: RunStatus::NoImages,
        }
    }

    fn with_status(&self, status: &FileStatus) -> impl Iterator<Item = &FileOutcome> + '_ {
        let wanted = std::mem::discriminant(status);
        self.files
            .iter()
            .filter(move |f| std::mem::discriminant(&f.status) == wanted)
    }

    pub fn copied(&self) -> Vec<&FileOutcome> {
        self.with_status(&FileStatus::Copied).collect()
    }

    pub fn skipped(&self) -> Vec<&FileOutcome> {
        self.with_status(&FileStatus::SkippedDuplicate).collect()
    }

    pub fn planned(&self) -> Vec<&FileOutcome> {
        self.with_status(&FileStatus::Planned).collect()
    }

    pub fn failed(&self) -> Vec<&FileOutcome> {
        self.with_status(&FileStatus::CopyFailed { error: String::new() }).collect()
    }

    /// Files routed to the uncategorized section
    pub fn unclassifiable(&self) -> Vec<&FileOutcome> {
        self.files.iter().filter(|f| f.is_unclassifiable()).collect()
    }

    /// Whether the run should end the process with a failure status
    pub fn is_failure(&self) -> bool {
        matches!(self.status, RunStatus::PublishFailed { .. })
    }
}

/// Result of scanning the source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The folder did not exist and has been created
    Created,
    Images(Vec<PathBuf>),
}

/// List image files in `dir`, sorted by filename. Creates the folder if missing.
pub fn scan_source(dir: &Path, extensions: &[String]) -> Result<ScanOutcome> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!("Created source directory: {:?}", dir);
        return Ok(ScanOutcome::Created);
    }

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let base = Pattern::escape(&dir.to_string_lossy());

    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    for ext in extensions {
        let pattern = format!("{}/*.{}", base, Pattern::escape(ext.trim_start_matches('.')));
        for entry in glob::glob_with(&pattern, options)? {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !path.is_file() || !should_process(&path) {
                continue;
            }
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => {
                    found.entry(name.to_string()).or_insert(path);
                }
                None => warn!("Skipping file with non UTF-8 name: {:?}", path),
            }
        }
    }

    debug!("Found {} images in {:?}", found.len(), dir);
    Ok(ScanOutcome::Images(found.into_values().collect()))
}

/// Check if a file should be ingested
pub fn should_process(path: &Path) -> bool {
    let filename = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    // Skip hidden files
    if filename.starts_with('.') {
        return false;
    }

    // Skip system files
    let skip_names = ["desktop.ini", "thumbs.db", ".ds_store"];
    !skip_names.iter().any(|n| filename.eq_ignore_ascii_case(n))
}

/// Group files by catalog section, in taxonomy order, preserving encounter
/// order within each group. Files whose section is unknown fall into the
/// uncategorized group.
pub fn group_by_section<'a>(
    taxonomy: &'a Taxonomy,
    files: &[&'a FileDescriptor],
) -> Vec<(&'a SectionEntry, Vec<&'a FileDescriptor>)> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();

    for section in taxonomy.sections() {
        if !seen.insert(section.key.as_str()) {
            continue;
        }
        let members: Vec<&FileDescriptor> = files
            .iter()
            .copied()
            .filter(|f| taxonomy.section(f.category.section_key()).key == section.key)
            .collect();
        if !members.is_empty() {
            groups.push((section, members));
        }
    }

    groups
}

/// Runs one ingestion pass against a configuration and a publisher
pub struct Ingestor<'a, P: Publisher + ?Sized> {
    config: &'a AppConfig,
    resolver: PathResolver,
    publisher: &'a P,
    history: History,
    dry_run: bool,
}

impl<'a, P: Publisher + ?Sized> Ingestor<'a, P> {
    pub fn new(config: &'a AppConfig, publisher: &'a P) -> Self {
        Self {
            config,
            resolver: PathResolver::new(config),
            publisher,
            history: History::new(config.history_path()),
            dry_run: false,
        }
    }

    /// Classify and report without copying, publishing or writing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Split images into already-cataloged outcomes and new descriptors
    pub fn partition(
        &self,
        images: &[PathBuf],
        existing: &BTreeSet<String>,
    ) -> (Vec<FileOutcome>, Vec<FileDescriptor>) {
        let mut skipped = Vec::new();
        let mut fresh = Vec::new();

        for path in images {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if existing.contains(filename) {
                debug!("Already cataloged: {}", filename);
                skipped.push(FileOutcome {
                    filename: filename.to_string(),
                    descriptor: None,
                    status: FileStatus::SkippedDuplicate,
                });
            } else if let Some(descriptor) = FileDescriptor::describe(path, &self.resolver) {
                fresh.push(descriptor);
            }
        }

        (skipped, fresh)
    }

    /// Execute the run
    pub fn run(&self) -> Result<RunReport> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = RunReport::new(self.config, run_id.clone());
        let source_dir = self.config.source_dir();

        let images = match scan_source(&source_dir, &self.config.extensions)? {
            ScanOutcome::Created => {
                report.status = RunStatus::SourceCreated;
                return Ok(report);
            }
            ScanOutcome::Images(images) => images,
        };
        report.found = images.len();
        if images.is_empty() {
            info!("No images in {:?}", source_dir);
            report.status = RunStatus::NoImages;
            return Ok(report);
        }
        info!("Found {} images", images.len());

        let catalog_path = self.config.catalog_path();
        let existing = catalog::load_existing(&catalog_path, &self.config.extensions);
        let (skipped, fresh) = self.partition(&images, &existing);
        report.files.extend(skipped);

        if fresh.is_empty() {
            info!("All {} images already cataloged", images.len());
            report.status = RunStatus::NothingNew;
            return Ok(report);
        }
        info!("{} new images to ingest", fresh.len());

        if self.dry_run {
            for descriptor in fresh {
                info!("DRY RUN: Would copy {} to {}", descriptor.filename, descriptor.relative_path);
                report.files.push(FileOutcome {
                    filename: descriptor.filename.clone(),
                    descriptor: Some(descriptor),
                    status: FileStatus::Planned,
                });
            }
            report.status = RunStatus::DryRun;
            return Ok(report);
        }

        let total = fresh.len();
        for (i, descriptor) in fresh.into_iter().enumerate() {
            let status = match copy_file(&descriptor) {
                Ok(()) => {
                    info!("[{}/{}] {} -> {}", i + 1, total, descriptor.filename, descriptor.relative_path);
                    match history::create_entry(&run_id, &descriptor) {
                        Ok(entry) => {
                            if let Err(e) = self.history.append(&entry) {
                                warn!("Failed to record history for {}: {}", descriptor.filename, e);
                            }
                        }
                        Err(e) => warn!("Failed to hash {}: {}", descriptor.filename, e),
                    }
                    FileStatus::Copied
                }
                Err(e) => {
                    error!("[{}/{}] Failed to copy {}: {}", i + 1, total, descriptor.filename, e);
                    FileStatus::CopyFailed { error: e.to_string() }
                }
            };
            report.files.push(FileOutcome {
                filename: descriptor.filename.clone(),
                descriptor: Some(descriptor),
                status,
            });
        }

        let copied: Vec<&FileDescriptor> = report
            .files
            .iter()
            .filter(|f| f.status == FileStatus::Copied)
            .filter_map(|f| f.descriptor.as_ref())
            .collect();
        if copied.is_empty() {
            warn!("No files could be copied");
            report.status = RunStatus::NothingCopied;
            return Ok(report);
        }

        let paths: Vec<PathBuf> = copied.iter().map(|d| d.destination_path.clone()).collect();
        let message = self.config.commit_message(paths.len());
        if let Err(e) = self.publisher.publish(&paths, &message) {
            error!("Publish failed, catalog left untouched: {}", e);
            report.status = RunStatus::PublishFailed { error: e.to_string() };
            return Ok(report);
        }

        let enrichment = EnrichmentIndex::load(&self.config.enrichment_path());
        let taxonomy = self.resolver.taxonomy();
        let groups = group_by_section(taxonomy, &copied);
        let sections: Vec<CatalogSection> = catalog::build_sections(&groups, taxonomy, &enrichment);
        let entries: usize = sections.iter().map(|s| s.entries.len()).sum();
        let created = catalog::append(&catalog_path, &self.config.catalog, &sections)?;
        info!("Appended {} entries to {:?}", entries, catalog_path);

        report.status = RunStatus::Cataloged { entries, created };
        Ok(report)
    }
}

/// Copy with overwrite, creating parent directories
fn copy_file(descriptor: &FileDescriptor) -> Result<()> {
    if let Some(parent) = descriptor.destination_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&descriptor.source_path, &descriptor.destination_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"img").unwrap();
    }

    #[test]
    fn test_scan_creates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shots");
        let exts = AppConfig::default().extensions;
        assert_eq!(scan_source(&source, &exts).unwrap(), ScanOutcome::Created);
        assert!(source.is_dir());
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "c.jpeg", ".hidden.png", "notes.txt", "descriptions.yaml"] {
            touch(&dir.path().join(name));
        }
        fs::create_dir(dir.path().join("folder.png")).unwrap();

        let exts = AppConfig::default().extensions;
        let ScanOutcome::Images(images) = scan_source(dir.path(), &exts).unwrap() else {
            panic!("Expected images");
        };
        let names: Vec<&str> = images
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.jpeg"]);
    }

    #[test]
    fn test_should_process() {
        assert!(should_process(Path::new("shots/a.png")));
        assert!(!should_process(Path::new("shots/.DS_Store")));
        assert!(!should_process(Path::new("shots/Thumbs.db")));
    }

    #[test]
    fn test_group_by_section_keeps_order() {
        let config = AppConfig::default();
        let resolver = PathResolver::new(&config);
        let names = [
            "randomshot.png",
            "shared__diagram__loop__v01.png",
            "C__template__b__v01.png",
            "C__example__a__v01.png",
        ];
        let descriptors: Vec<FileDescriptor> = names
            .iter()
            .filter_map(|n| FileDescriptor::describe(Path::new(n), &resolver))
            .collect();
        let refs: Vec<&FileDescriptor> = descriptors.iter().collect();

        let groups = group_by_section(resolver.taxonomy(), &refs);
        let keys: Vec<&str> = groups.iter().map(|(s, _)| s.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "shared", "uncategorized"]);

        let c_files: Vec<&str> = groups[0].1.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(c_files, vec!["C__template__b__v01.png", "C__example__a__v01.png"]);
    }

    #[test]
    fn test_partition_skips_cataloged() {
        let config = AppConfig::default();
        struct Never;
        impl Publisher for Never {
            fn publish(&self, _: &[PathBuf], _: &str) -> Result<()> {
                unreachable!()
            }
        }
        let ingestor = Ingestor::new(&config, &Never);
        let images = vec![PathBuf::from("s/a.png"), PathBuf::from("s/b.png")];
        let existing: BTreeSet<String> = ["a.png".to_string()].into_iter().collect();

        let (skipped, fresh) = ingestor.partition(&images, &existing);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].status, FileStatus::SkippedDuplicate);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].filename, "b.png");
        assert!(fresh[0].category.is_uncategorized());
    }
}
