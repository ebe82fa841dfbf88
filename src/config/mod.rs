// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for vislib

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::taxonomy::Taxonomy;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Folder the screenshots are dropped into
    pub source_dir: String,

    /// Root of the publishing repository
    pub destination_root: String,

    /// Images directory, relative to the destination root
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Image extensions picked up from the source folder
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Publishing and public URL settings
    pub publish: PublishConfig,

    /// Catalog document settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Side document with per-file descriptions (defaults to the source folder)
    #[serde(default)]
    pub enrichment_path: Option<String>,

    /// Ledger of copied files
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Category table
    #[serde(default)]
    pub taxonomy: Taxonomy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PublishConfig {
    /// Account that owns the public repository
    pub identity: String,
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Placeholders: `{identity}`, `{repository}`, `{branch}`, `{path}`
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// `{count}` is replaced by the number of files in the batch
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_catalog_title")]
    pub title: String,
    #[serde(default = "default_catalog_subtitle")]
    pub subtitle: String,
}

// Default value functions
fn default_images_dir() -> String { "images".to_string() }
fn default_history_path() -> String { "vislib_history.jsonl".to_string() }
fn default_branch() -> String { "main".to_string() }
fn default_remote() -> String { "origin".to_string() }
fn default_catalog_path() -> String { "visual_reference_library.md".to_string() }
fn default_catalog_title() -> String { "Visual Reference Library".to_string() }
fn default_catalog_subtitle() -> String { "Organized by exercise stage".to_string() }
fn default_commit_message() -> String { "Add {count} visual references".to_string() }

fn default_url_template() -> String {
    "https://raw.githubusercontent.com/{identity}/{repository}/{branch}/{path}".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["png", "jpg", "jpeg"].into_iter().map(String::from).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir: "./screenshots".to_string(),
            destination_root: ".".to_string(),
            images_dir: default_images_dir(),
            extensions: default_extensions(),
            publish: PublishConfig {
                identity: "your-username".to_string(),
                repository: "visual-library".to_string(),
                branch: default_branch(),
                remote: default_remote(),
                url_template: default_url_template(),
                commit_message: default_commit_message(),
            },
            catalog: CatalogConfig::default(),
            enrichment_path: None,
            history_path: default_history_path(),
            taxonomy: Taxonomy::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            title: default_catalog_title(),
            subtitle: default_catalog_subtitle(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::VislibError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        use crate::taxonomy::Scheme;
        use crate::VislibError;

        if self.extensions.is_empty() {
            return Err(VislibError::Config("At least one image extension is required".to_string()));
        }
        if !self.publish.url_template.contains("{path}") {
            return Err(VislibError::Config("url_template must contain {path}".to_string()));
        }
        match &self.taxonomy.scheme {
            Scheme::Structured(s) => {
                if s.delimiter.is_empty() {
                    return Err(VislibError::Config("Taxonomy delimiter must not be empty".to_string()));
                }
                if s.stages.is_empty() {
                    return Err(VislibError::Config("Taxonomy needs at least one stage".to_string()));
                }
            }
            Scheme::Flat(f) => {
                if f.buckets.is_empty() {
                    return Err(VislibError::Config("Taxonomy needs at least one bucket".to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn source_dir(&self) -> PathBuf {
        PathBuf::from(&self.source_dir)
    }

    pub fn destination_root(&self) -> PathBuf {
        PathBuf::from(&self.destination_root)
    }

    pub fn catalog_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog.path)
    }

    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(&self.history_path)
    }

    pub fn enrichment_path(&self) -> PathBuf {
        match &self.enrichment_path {
            Some(p) => PathBuf::from(p),
            None => self.source_dir().join("descriptions.yaml"),
        }
    }

    /// Commit message for a batch of `count` files
    pub fn commit_message(&self, count: usize) -> String {
        self.publish.commit_message.replace("{count}", &count.to_string())
    }
}
