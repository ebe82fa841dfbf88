// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for vislib

use thiserror::Error;

/// Result type alias for vislib operations
pub type Result<T> = std::result::Result<T, VislibError>;

/// vislib error types
#[derive(Error, Debug)]
pub enum VislibError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}
