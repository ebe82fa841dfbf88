// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Optional per-file descriptions from a YAML side document
//!
//! ```yaml
//! drew-persona-example.png:
//!   triggers: '"persona", "user profile"'
//!   description: Filled-in persona for a student commuter
//!   use_when: Students ask what a finished persona looks like
//!   best_for: Exercise C
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Trigger phrases, either pre-formatted text or a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Triggers {
    Text(String),
    List(Vec<String>),
}

/// Descriptive fields for one file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub triggers: Option<Triggers>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub use_when: Option<String>,
    #[serde(default)]
    pub best_for: Option<String>,
}

impl Enrichment {
    fn normalized(self) -> Self {
        let keep = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        let triggers = match self.triggers {
            Some(Triggers::Text(t)) if t.trim().is_empty() => None,
            Some(Triggers::List(l)) if l.is_empty() => None,
            other => other,
        };
        Self {
            triggers,
            description: keep(self.description),
            use_when: keep(self.use_when),
            best_for: keep(self.best_for),
        }
    }
}

/// Enrichment data keyed by filename
#[derive(Debug, Clone, Default)]
pub struct EnrichmentIndex {
    entries: HashMap<String, Enrichment>,
}

impl EnrichmentIndex {
    /// Load the side document. Absent, unreadable or malformed documents
    /// yield an empty index; malformed entries are skipped individually.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No enrichment document at {:?}", path);
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read descriptions {:?}: {}", path, e);
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(index) => {
                info!("Loaded {} descriptions from {:?}", index.len(), path);
                index
            }
            Err(e) => {
                warn!("Could not parse descriptions {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse YAML text into an index
    pub fn parse(content: &str) -> crate::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: Option<HashMap<String, serde_yaml::Value>> = serde_yaml::from_str(content)?;

        let mut entries = HashMap::new();
        for (filename, value) in raw.unwrap_or_default() {
            match serde_yaml::from_value::<Enrichment>(value) {
                Ok(entry) => {
                    entries.insert(filename, entry.normalized());
                }
                Err(e) => warn!("Skipping malformed description for {}: {}", filename, e),
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, filename: &str) -> Option<&Enrichment> {
        self.entries.get(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let yaml = r#"
drew-persona-example.png:
  description: Filled-in persona for a commuter
  triggers: '"persona", "drew"'
  best_for: Exercise C
C__template__needs-statement__v01.png:
  triggers: [needs, statement]
  use_when: ""
"#;
        let index = EnrichmentIndex::parse(yaml).unwrap();
        assert_eq!(index.len(), 2);

        let drew = index.get("drew-persona-example.png").unwrap();
        assert_eq!(drew.description.as_deref(), Some("Filled-in persona for a commuter"));
        assert_eq!(drew.triggers, Some(Triggers::Text("\"persona\", \"drew\"".to_string())));
        assert_eq!(drew.best_for.as_deref(), Some("Exercise C"));
        assert!(drew.use_when.is_none());

        let needs = index.get("C__template__needs-statement__v01.png").unwrap();
        assert_eq!(needs.triggers, Some(Triggers::List(vec!["needs".to_string(), "statement".to_string()])));
        assert!(needs.use_when.is_none());
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let yaml = "good.png:\n  description: ok\nbad.png:\n  description: [1, 2]\n";
        let index = EnrichmentIndex::parse(yaml).unwrap();
        assert!(index.get("good.png").is_some());
        assert!(index.get("bad.png").is_none());
    }

    #[test]
    fn test_empty_document() {
        assert!(EnrichmentIndex::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("descriptions.yaml");
        std::fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(EnrichmentIndex::load(&path).is_empty());
        assert!(EnrichmentIndex::load(&dir.path().join("absent.yaml")).is_empty());
    }
}
