// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Extraction of already-cataloged filenames

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::FORMAT_VERSION;

// Targets may hold one level of balanced parentheses (unescaped legacy names)
static LINK_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\]\(((?:[^()\n]|\([^()\n]*\))+)\)").expect("valid regex")
});

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*catalog-format:\s*(\d+)\s*-->").expect("valid regex")
});

/// Grammar version declared by a document; unmarked documents are version 1
pub fn format_version(text: &str) -> u32 {
    MARKER_RE
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(FORMAT_VERSION)
}

/// Filenames referenced by any link or image target in the document
pub fn existing_names(text: &str, extensions: &[String]) -> BTreeSet<String> {
    LINK_TARGET_RE
        .captures_iter(text)
        .filter_map(|c| filename_of(&c[1], extensions))
        .collect()
}

/// Read the catalog and collect its filenames. Missing or unreadable
/// documents count as empty.
pub fn load_existing(path: &Path, extensions: &[String]) -> BTreeSet<String> {
    if !path.exists() {
        debug!("Catalog {:?} does not exist yet", path);
        return BTreeSet::new();
    }

    let text = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Could not read catalog {:?}: {}; treating it as empty", path, e);
            return BTreeSet::new();
        }
    };

    let version = format_version(&text);
    if version != FORMAT_VERSION {
        warn!("Catalog declares format {} (expected {}); reading image references anyway", version, FORMAT_VERSION);
    }

    existing_names(&text, extensions)
}

/// Last path segment of a link target, percent-decoded, if it names an image
fn filename_of(target: &str, extensions: &[String]) -> Option<String> {
    let mut target = target.trim();

    // ![alt](url "title")
    if let Some(idx) = target.find(" \"") {
        target = &target[..idx];
    }
    let target = target.trim_start_matches('<').trim_end_matches('>');
    let target = target.split(['?', '#']).next().unwrap_or(target);

    let segment = target.rsplit(['/', '\\']).next()?.trim();
    let name = percent_decode_str(segment).decode_utf8_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    if extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
        Some(name.into_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
    }

    #[test]
    fn test_extracts_across_directory_depths() {
        let doc = "\
### Needs Statement
**Image:** ![Needs Statement](https://raw.githubusercontent.com/u/r/main/images/C_user-research-synthesis/templates/C__template__needs-statement__v01.png)

### Drew Persona
**Image:** ![Drew Persona](https://raw.githubusercontent.com/u/r/main/images/examples/drew-persona-example.jpg)

### Legacy
**Image:** ![Legacy](https://raw.githubusercontent.com/u/r/main/images/old.JPEG)
";
        let names = existing_names(doc, &exts());
        assert_eq!(names.len(), 3);
        assert!(names.contains("C__template__needs-statement__v01.png"));
        assert!(names.contains("drew-persona-example.jpg"));
        assert!(names.contains("old.JPEG"));
    }

    #[test]
    fn test_ignores_non_image_links() {
        let doc = "See [the syllabus](https://example.com/syllabus.pdf) and [home](https://example.com/).";
        assert!(existing_names(doc, &exts()).is_empty());
    }

    #[test]
    fn test_handles_titles_queries_and_spaces() {
        let doc = "![a](images/x/a.png \"Title\") ![b](<images/y/b c.png>) ![c](images/z/c.jpg?raw=true)";
        let names = existing_names(doc, &exts());
        assert!(names.contains("a.png"));
        assert!(names.contains("b c.png"));
        assert!(names.contains("c.jpg"));
    }

    #[test]
    fn test_decodes_escaped_names() {
        let doc = "![s](https://raw.githubusercontent.com/u/r/main/images/uncategorized/Screenshot%20%281%29.png)\n\
                   ![m](images/x/my%20shot.PNG) ![p](images/x/100%25.png)";
        let names = existing_names(doc, &exts());
        assert!(names.contains("Screenshot (1).png"));
        assert!(names.contains("my shot.PNG"));
        assert!(names.contains("100%.png"));
    }

    #[test]
    fn test_reads_unescaped_parentheses() {
        let doc = "**Image:** ![Screenshot (1)](https://raw.githubusercontent.com/u/r/main/images/uncategorized/Screenshot (1).png)\n";
        let names = existing_names(doc, &exts());
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Screenshot (1).png"]);
    }

    #[test]
    fn test_empty_and_missing_documents() {
        assert!(existing_names("", &exts()).is_empty());
        let dir = tempfile::tempdir().unwrap();
        assert!(load_existing(&dir.path().join("missing.md"), &exts()).is_empty());
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version("# Title\n<!-- catalog-format: 1 -->\n"), 1);
        assert_eq!(format_version("<!-- catalog-format: 7 -->"), 7);
        assert_eq!(format_version("no marker"), FORMAT_VERSION);
    }

    #[test]
    fn test_invalid_utf8_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.md");
        let mut bytes = b"![x](images/a/x.png)\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00]);
        std::fs::write(&path, bytes).unwrap();
        let names = load_existing(&path, &exts());
        assert!(names.contains("x.png"));
    }
}
