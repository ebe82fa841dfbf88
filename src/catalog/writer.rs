// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rendering and appending catalog sections

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::CatalogConfig;
use crate::enrichment::{EnrichmentIndex, Triggers};
use crate::ingest::FileDescriptor;
use crate::taxonomy::{SectionEntry, Taxonomy};
use crate::{Result, VislibError};

/// Description written when no enrichment is available
pub const DESCRIPTION_PLACEHOLDER: &str = "[ADD DESCRIPTION]";

/// One rendered image block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub display_name: String,
    pub category_label: String,
    /// Pre-formatted trigger line content
    pub triggers: String,
    pub description: String,
    pub use_when: Option<String>,
    pub best_for: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSection {
    pub title: String,
    pub entries: Vec<CatalogEntry>,
}

fn quote_all(items: &[String]) -> String {
    items
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CatalogEntry {
    /// Build an entry from a copied file, layering enrichment over defaults
    pub fn from_descriptor(file: &FileDescriptor, taxonomy: &Taxonomy, enrichment: &EnrichmentIndex) -> Self {
        let display_name = taxonomy.display_name(&file.category, &file.filename);
        let extra = enrichment.get(&file.filename).cloned().unwrap_or_default();

        let triggers = match extra.triggers {
            Some(Triggers::Text(text)) => text,
            Some(Triggers::List(list)) => quote_all(&list),
            None => quote_all(&taxonomy.default_triggers(&file.category, &display_name)),
        };

        Self {
            category_label: file.category.label(),
            triggers,
            description: extra.description.unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
            use_when: extra.use_when,
            best_for: extra.best_for,
            image_url: file.public_url.clone(),
            display_name,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("### {}\n", self.display_name));
        out.push_str(&format!("**Category:** {}\n", self.category_label));
        out.push_str(&format!("**Triggers:** {}\n", self.triggers));
        out.push_str(&format!("**Description:** {}\n", self.description));
        if let Some(ref use_when) = self.use_when {
            out.push_str(&format!("**Use When:** {}\n", use_when));
        }
        if let Some(ref best_for) = self.best_for {
            out.push_str(&format!("**Best For:** {}\n", best_for));
        }
        out.push_str(&format!("**Image:** ![{}]({})\n\n", self.display_name, self.image_url));
        out
    }
}

impl CatalogSection {
    pub fn render(&self) -> String {
        let mut out = format!("\n## {}\n\n", self.title);
        for entry in &self.entries {
            out.push_str(&entry.render());
        }
        out.push_str("---\n\n");
        out
    }
}

/// One section per non-empty group, in the order given
pub fn build_sections(
    groups: &[(&SectionEntry, Vec<&FileDescriptor>)],
    taxonomy: &Taxonomy,
    enrichment: &EnrichmentIndex,
) -> Vec<CatalogSection> {
    groups
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(section, files)| CatalogSection {
            title: section.title.clone(),
            entries: files
                .iter()
                .map(|f| CatalogEntry::from_descriptor(f, taxonomy, enrichment))
                .collect(),
        })
        .collect()
}

/// Preamble for a new catalog document
pub fn render_header(config: &CatalogConfig) -> String {
    format!(
        "# {}\n\n*{}*\n\n{}\n\n---\n\n",
        config.title,
        config.subtitle,
        super::format_marker()
    )
}

/// Append rendered sections, creating the document with its preamble when it
/// does not exist. Existing bytes are never rewritten. Returns whether the
/// document was created.
pub fn append(path: &Path, config: &CatalogConfig, sections: &[CatalogSection]) -> Result<bool> {
    if sections.is_empty() {
        return Ok(false);
    }

    append_sections(path, config, sections)
        .map_err(|e| VislibError::Catalog(format!("cannot write {}: {}", path.display(), e)))
}

fn append_sections(path: &Path, config: &CatalogConfig, sections: &[CatalogSection]) -> io::Result<bool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    let len = file.metadata()?.len();
    let created = len == 0;

    let mut out = String::new();
    if created {
        out.push_str(&render_header(config));
    } else {
        // Keep the join point on a fresh line
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            out.push('\n');
        }
    }
    for section in sections {
        out.push_str(&section.render());
    }

    file.write_all(out.as_bytes())?;
    file.flush()?;
    Ok(created)
}
