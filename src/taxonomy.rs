// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Taxonomy table and filename classifier
//!
//! Two schemes are supported. The structured scheme reads the filename
//! convention `<stage>__<type>__<topic>__<version>.<ext>`; the flat scheme
//! guesses a bucket from prefixes and keywords. Classification is total: any
//! filename the structured scheme cannot read lands in the uncategorized
//! section, which always has a table entry.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Section key used for files that do not follow the naming convention
pub const UNCATEGORIZED: &str = "uncategorized";

/// A row of the taxonomy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Category key as it appears in filenames
    pub key: String,
    /// Directory name under the images root
    pub directory: String,
    /// Markdown section title in the catalog
    pub title: String,
}

impl SectionEntry {
    fn new(key: &str, directory: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            directory: directory.to_string(),
            title: title.to_string(),
        }
    }
}

/// A content type of the structured scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub key: String,
    pub directory: String,
}

/// Substring rule used when the type field is not a known content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTaxonomy {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Valid stages, in catalog section order. The shared catch-all is one of them.
    pub stages: Vec<SectionEntry>,
    pub types: Vec<ContentType>,
    /// Checked in order; the first keyword found in the filename wins
    #[serde(default)]
    pub type_keywords: Vec<KeywordRule>,
    pub default_type: String,
    #[serde(default = "default_topic")]
    pub default_topic: String,
    #[serde(default = "default_version")]
    pub default_version: String,
}

/// One bucket of the flat scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatBucket {
    #[serde(flatten)]
    pub section: SectionEntry,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTaxonomy {
    /// Buckets in catalog section order
    pub buckets: Vec<FlatBucket>,
    pub default_bucket: String,
    /// Words dropped from display names
    #[serde(default)]
    pub title_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Structured(StructuredTaxonomy),
    Flat(FlatTaxonomy),
}

/// Static mapping from category to destination directory and section title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub scheme: Scheme,
    #[serde(default = "default_uncategorized")]
    pub uncategorized: SectionEntry,
}

/// Classification result for one filename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Category {
    Structured {
        stage: String,
        #[serde(rename = "type")]
        content_type: String,
        topic: String,
        version: String,
    },
    Flat {
        folder: String,
    },
    Uncategorized,
}

impl Category {
    /// Key of the catalog section this category is grouped under
    pub fn section_key(&self) -> &str {
        match self {
            Category::Structured { stage, .. } => stage,
            Category::Flat { folder } => folder,
            Category::Uncategorized => UNCATEGORIZED,
        }
    }

    /// Short human-readable label, e.g. `C/template`
    pub fn label(&self) -> String {
        match self {
            Category::Structured { stage, content_type, .. } => format!("{}/{}", stage, content_type),
            Category::Flat { folder } => folder.clone(),
            Category::Uncategorized => UNCATEGORIZED.to_string(),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Category::Uncategorized)
    }
}

fn default_delimiter() -> String { "__".to_string() }
fn default_topic() -> String { "unnamed".to_string() }
fn default_version() -> String { "v01".to_string() }
fn default_uncategorized() -> SectionEntry {
    SectionEntry::new(UNCATEGORIZED, "uncategorized", "⚠️  UNCATEGORIZED")
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::structured_default()
    }
}

impl Taxonomy {
    /// Six exercise stages plus a shared catch-all
    pub fn structured_default() -> Self {
        let stages = vec![
            SectionEntry::new("A", "A_user-identification", "📋 EXERCISE A: User Identification"),
            SectionEntry::new("B", "B_mission-statement", "🎯 EXERCISE B: Mission Statement"),
            SectionEntry::new("C", "C_user-research-synthesis", "🔍 EXERCISE C: User Research & Synthesis"),
            SectionEntry::new("D", "D_ideation-concept-development", "💡 EXERCISE D: Ideation & Concept Development"),
            SectionEntry::new("E", "E_prototyping-testing", "🧪 EXERCISE E: Prototyping & Testing"),
            SectionEntry::new("F", "F_finalization-presentation", "🎨 EXERCISE F: Finalization & Presentation"),
            SectionEntry::new("shared", "shared", "🔧 SHARED: Core Methods & Templates"),
        ];
        let types = [
            ("template", "templates"),
            ("example", "examples"),
            ("diagram", "diagrams"),
            ("checklist", "checklists"),
            ("rubric", "rubrics"),
        ]
        .into_iter()
        .map(|(key, directory)| ContentType { key: key.to_string(), directory: directory.to_string() })
        .collect();
        let type_keywords = ["template", "example", "diagram"]
            .into_iter()
            .map(|k| KeywordRule { keyword: k.to_string(), content_type: k.to_string() })
            .collect();

        Self {
            scheme: Scheme::Structured(StructuredTaxonomy {
                delimiter: default_delimiter(),
                stages,
                types,
                type_keywords,
                default_type: "example".to_string(),
                default_topic: default_topic(),
                default_version: default_version(),
            }),
            uncategorized: default_uncategorized(),
        }
    }

    /// Two folders: reference material and everything else
    pub fn flat_default() -> Self {
        Self {
            scheme: Scheme::Flat(FlatTaxonomy {
                buckets: vec![
                    FlatBucket {
                        section: SectionEntry::new("examples", "examples", "✨ Examples"),
                        prefixes: to_strings(&["example_", "examples_"]),
                        keywords: Vec::new(),
                    },
                    FlatBucket {
                        section: SectionEntry::new("reference", "reference", "📚 Reference"),
                        prefixes: to_strings(&["reference_"]),
                        keywords: to_strings(&[
                            "diagram", "rule", "guide", "framework", "process",
                            "rubric", "checklist", "criteria", "instruction",
                        ]),
                    },
                ],
                default_bucket: "examples".to_string(),
                title_keywords: to_strings(&["template", "example", "diagram", "reference"]),
            }),
            uncategorized: default_uncategorized(),
        }
    }

    /// Classify a filename. Deterministic and total.
    pub fn classify(&self, filename: &str) -> Category {
        match &self.scheme {
            Scheme::Structured(s) => classify_structured(s, filename),
            Scheme::Flat(f) => classify_flat(f, filename),
        }
    }

    /// Sections in catalog order, uncategorized last
    pub fn sections(&self) -> Vec<&SectionEntry> {
        let mut sections: Vec<&SectionEntry> = match &self.scheme {
            Scheme::Structured(s) => s.stages.iter().collect(),
            Scheme::Flat(f) => f.buckets.iter().map(|b| &b.section).collect(),
        };
        sections.push(&self.uncategorized);
        sections
    }

    /// Table entry for a section key, falling back to the uncategorized entry
    pub fn section(&self, key: &str) -> &SectionEntry {
        self.sections()
            .into_iter()
            .find(|s| s.key == key)
            .unwrap_or(&self.uncategorized)
    }

    /// Directory segments under the images root for a category
    pub fn directories(&self, category: &Category) -> Vec<String> {
        match (category, &self.scheme) {
            (Category::Structured { stage, content_type, .. }, Scheme::Structured(s)) => {
                let stage_dir = self.section(stage).directory.clone();
                let type_dir = s
                    .types
                    .iter()
                    .find(|t| t.key == *content_type)
                    .map(|t| t.directory.clone())
                    .unwrap_or_else(|| content_type.clone());
                vec![stage_dir, type_dir]
            }
            (Category::Flat { folder }, Scheme::Flat(_)) => {
                vec![self.section(folder).directory.clone()]
            }
            _ => vec![self.uncategorized.directory.clone()],
        }
    }

    /// Readable title for a catalog entry
    pub fn display_name(&self, category: &Category, filename: &str) -> String {
        let stem = file_stem(filename);
        match (&self.scheme, category) {
            (Scheme::Structured(s), Category::Structured { topic, .. }) => {
                humanize(topic, &type_words(s))
            }
            (Scheme::Structured(s), _) => humanize(stem, &type_words(s)),
            (Scheme::Flat(f), _) => {
                let words: Vec<&str> = f.title_keywords.iter().map(String::as_str).collect();
                humanize(stem, &words)
            }
        }
    }

    /// Trigger phrases used when no enrichment is supplied
    pub fn default_triggers(&self, category: &Category, display_name: &str) -> Vec<String> {
        let tag = match category {
            Category::Structured { content_type, .. } => content_type.clone(),
            Category::Flat { folder } => folder.clone(),
            Category::Uncategorized => UNCATEGORIZED.to_string(),
        };
        vec![display_name.to_lowercase(), tag]
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn type_words(s: &StructuredTaxonomy) -> Vec<&str> {
    s.types.iter().map(|t| t.key.as_str()).collect()
}

fn classify_structured(s: &StructuredTaxonomy, filename: &str) -> Category {
    let stem = file_stem(filename);
    if s.delimiter.is_empty() {
        return Category::Uncategorized;
    }

    let fields: Vec<&str> = stem.splitn(4, s.delimiter.as_str()).map(str::trim).collect();
    if fields.len() < 3 {
        return Category::Uncategorized;
    }

    let stage = match s.stages.iter().find(|st| st.key.eq_ignore_ascii_case(fields[0])) {
        Some(st) => st.key.clone(),
        None => return Category::Uncategorized,
    };

    let content_type = s
        .types
        .iter()
        .find(|t| t.key.eq_ignore_ascii_case(fields[1]) || t.directory.eq_ignore_ascii_case(fields[1]))
        .map(|t| t.key.clone())
        .unwrap_or_else(|| guess_type(s, filename));

    let topic = non_empty(fields.get(2)).unwrap_or(&s.default_topic).to_string();
    let version = non_empty(fields.get(3)).unwrap_or(&s.default_version).to_string();

    Category::Structured { stage, content_type, topic, version }
}

fn guess_type(s: &StructuredTaxonomy, filename: &str) -> String {
    let lower = filename.to_lowercase();
    s.type_keywords
        .iter()
        .find(|rule| !rule.keyword.is_empty() && lower.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.content_type.clone())
        .unwrap_or_else(|| s.default_type.clone())
}

fn classify_flat(f: &FlatTaxonomy, filename: &str) -> Category {
    let lower = filename.to_lowercase();

    // Prefixes take precedence over keywords
    let by_prefix = f.buckets.iter().find(|b| {
        b.prefixes.iter().any(|p| !p.is_empty() && lower.starts_with(&p.to_lowercase()))
    });
    let bucket = by_prefix.or_else(|| {
        f.buckets.iter().find(|b| {
            b.keywords.iter().any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
        })
    });

    let folder = bucket
        .map(|b| b.section.key.clone())
        .unwrap_or_else(|| f.default_bucket.clone());
    Category::Flat { folder }
}

fn non_empty<'a>(field: Option<&&'a str>) -> Option<&'a str> {
    field.copied().filter(|f| !f.is_empty())
}

/// Filename without its final extension
pub fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Turn `needs-statement_template` into `Needs Statement`, dropping the
/// given keywords (and their plurals) as whole words.
pub fn humanize(raw: &str, drop_words: &[&str]) -> String {
    let words: Vec<String> = raw
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let kept: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| {
            !drop_words.iter().any(|k| {
                let k = k.to_lowercase();
                *w == k || w.strip_suffix('s') == Some(k.as_str())
            })
        })
        .collect();

    let chosen = if kept.is_empty() {
        words.iter().map(String::as_str).collect::<Vec<_>>()
    } else {
        kept
    };

    if chosen.is_empty() {
        return raw.to_string();
    }
    title_case(&chosen.join(" "))
}

/// Uppercase every letter that follows a non-letter, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
