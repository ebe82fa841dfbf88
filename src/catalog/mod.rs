// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Markdown catalog of ingested images
//!
//! The catalog is edited by hand between runs, so it is only ever appended
//! to. The one line-level fact the tool reads back is the image reference
//! (`](<url>)`), whose last path segment is the cataloged filename.

pub mod reader;
pub mod writer;

/// Version of the image-reference grammar written into new documents
pub const FORMAT_VERSION: u32 = 1;

/// Marker line identifying the grammar version
pub fn format_marker() -> String {
    format!("<!-- catalog-format: {} -->", FORMAT_VERSION)
}

pub use reader::{existing_names, load_existing};
pub use writer::{append, build_sections, CatalogEntry, CatalogSection};
