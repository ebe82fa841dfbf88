// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Destination and public URL resolution

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::PathBuf;

use crate::taxonomy::{Category, Taxonomy};
use crate::AppConfig;

/// Bytes escaped inside a URL path segment. `(` and `)` are included so the
/// URL stays a single markdown link target.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode each segment of a `/`-separated relative path
pub fn encode_path(relative: &str) -> String {
    relative
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Where a categorized file goes and where it can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Path relative to the destination root, `/`-separated
    pub relative: String,
    /// Absolute or root-joined path on disk
    pub path: PathBuf,
    /// Public URL with the path percent-encoded
    pub url: String,
}

/// Maps categories onto the destination tree and the public URL template
#[derive(Debug, Clone)]
pub struct PathResolver {
    taxonomy: Taxonomy,
    destination_root: PathBuf,
    images_dir: String,
    url_base: String,
}

impl PathResolver {
    pub fn new(config: &AppConfig) -> Self {
        // Everything except {path} is fixed for the lifetime of a run
        let url_base = config
            .publish
            .url_template
            .replace("{identity}", &config.publish.identity)
            .replace("{repository}", &config.publish.repository)
            .replace("{branch}", &config.publish.branch);

        Self {
            taxonomy: config.taxonomy.clone(),
            destination_root: config.destination_root(),
            images_dir: config.images_dir.trim_matches('/').to_string(),
            url_base,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Directory (relative to the root) a category's files are copied into
    pub fn relative_dir(&self, category: &Category) -> String {
        let mut segments = Vec::new();
        if !self.images_dir.is_empty() {
            segments.push(self.images_dir.clone());
        }
        segments.extend(self.taxonomy.directories(category));
        segments.join("/")
    }

    pub fn resolve(&self, category: &Category, filename: &str) -> Destination {
        let relative = format!("{}/{}", self.relative_dir(category), filename);
        let path = relative
            .split('/')
            .fold(self.destination_root.clone(), |acc, segment| acc.join(segment));
        let url = self.url_base.replace("{path}", &encode_path(&relative));

        Destination { relative, path, url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        let mut config = AppConfig::default();
        config.destination_root = "/repo".to_string();
        config.publish.identity = "kdlin".to_string();
        config.publish.repository = "itp-326-agent".to_string();
        PathResolver::new(&config)
    }

    #[test]
    fn test_structured_destination() {
        let resolver = resolver();
        let name = "C__template__needs-statement__v01.png";
        let category = resolver.taxonomy().classify(name);
        let dest = resolver.resolve(&category, name);

        assert_eq!(dest.relative, "images/C_user-research-synthesis/templates/C__template__needs-statement__v01.png");
        assert_eq!(
            dest.path,
            PathBuf::from("/repo/images/C_user-research-synthesis/templates/C__template__needs-statement__v01.png")
        );
        assert_eq!(
            dest.url,
            "https://raw.githubusercontent.com/kdlin/itp-326-agent/main/images/C_user-research-synthesis/templates/C__template__needs-statement__v01.png"
        );
    }

    #[test]
    fn test_uncategorized_falls_back() {
        let resolver = resolver();
        let dest = resolver.resolve(&Category::Uncategorized, "randomshot.png");
        assert_eq!(dest.relative, "images/uncategorized/randomshot.png");
        assert!(dest.url.ends_with("/main/images/uncategorized/randomshot.png"));
    }

    #[test]
    fn test_flat_destination() {
        let mut config = AppConfig::default();
        config.taxonomy = Taxonomy::flat_default();
        let resolver = PathResolver::new(&config);
        let category = resolver.taxonomy().classify("flow-diagram.png");
        assert_eq!(resolver.relative_dir(&category), "images/reference");
    }

    #[test]
    fn test_url_escapes_filename() {
        let resolver = resolver();
        let dest = resolver.resolve(&Category::Uncategorized, "Screenshot (1).png");
        assert_eq!(dest.relative, "images/uncategorized/Screenshot (1).png");
        assert_eq!(dest.path, PathBuf::from("/repo/images/uncategorized/Screenshot (1).png"));
        assert!(dest.url.ends_with("/main/images/uncategorized/Screenshot%20%281%29.png"));
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("images/shared/a_b-c.png"), "images/shared/a_b-c.png");
        assert_eq!(encode_path("images/x/my shot #2?.png"), "images/x/my%20shot%20%232%3F.png");
        assert_eq!(encode_path("images/x/100%.png"), "images/x/100%25.png");
        assert_eq!(encode_path("images/x/café.png"), "images/x/caf%C3%A9.png");
    }

    #[test]
    fn test_empty_images_dir() {
        let mut config = AppConfig::default();
        config.images_dir = String::new();
        let resolver = PathResolver::new(&config);
        assert_eq!(resolver.relative_dir(&Category::Uncategorized), "uncategorized");
    }
}
