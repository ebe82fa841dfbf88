// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! vislib: Screenshot Ingester & Visual Reference Catalog
//!
//! Classifies screenshots by filename convention, copies them into a
//! categorized tree, publishes the batch and appends new entries to a
//! human-edited markdown catalog without touching what is already there.

pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod history;
pub mod ingest;
pub mod publish;
pub mod report;
pub mod resolve;
pub mod taxonomy;

pub use config::AppConfig;
pub use error::{Result, VislibError};
