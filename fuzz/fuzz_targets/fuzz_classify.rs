// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use vislib::catalog::existing_names;
use vislib::config::AppConfig;
use vislib::resolve::{encode_path, PathResolver};
use vislib::taxonomy::Taxonomy;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    for taxonomy in [Taxonomy::structured_default(), Taxonomy::flat_default()] {
        let category = taxonomy.classify(name);
        assert_eq!(category, taxonomy.classify(name));
        let _ = taxonomy.display_name(&category, name);

        let mut config = AppConfig::default();
        config.taxonomy = taxonomy;
        let resolver = PathResolver::new(&config);
        let dest = resolver.resolve(&category, name);
        assert!(dest.relative.ends_with(name));
        assert!(dest.url.ends_with(&encode_path(name)));
    }

    let _ = existing_names(name, &AppConfig::default().extensions);
});
