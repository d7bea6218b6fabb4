//! Property tests for output path mapping.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use tsrig::domain::services::{normalize, OutputLayout};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}").unwrap()
}

fn relative_dir() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 0..=4)
}

fn layout() -> OutputLayout {
    OutputLayout::new(Path::new("/proj"), Path::new("src"), Path::new("dist"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: sources under rootDir keep their relative directory under outDir.
    #[test]
    fn property_output_mirrors_source_tree(
        dirs in relative_dir(),
        stem in segment(),
    ) {
        let mut source = PathBuf::from("/proj/src");
        let mut expected = PathBuf::from("/proj/dist");
        for dir in &dirs {
            source.push(dir);
            expected.push(dir);
        }
        source.push(format!("{}.ts", stem));
        expected.push(format!("{}.js", stem));

        prop_assert_eq!(layout().output_path_for(&source, Some("js")), expected);
    }

    /// PROPERTY: output paths never leave outDir, even for sources outside rootDir.
    #[test]
    fn property_output_stays_inside_out_dir(
        ups in 0usize..4,
        dirs in relative_dir(),
        stem in segment(),
    ) {
        let mut source = PathBuf::from("/proj/src");
        for _ in 0..ups {
            source.push("..");
        }
        for dir in &dirs {
            source.push(dir);
        }
        source.push(format!("{}.ts", stem));

        let out = layout().output_path_for(&source, Some("js"));
        prop_assert!(out.starts_with("/proj/dist"), "{} escaped", out.display());
    }

    /// PROPERTY: mapping is pure; relative and absolute spellings agree.
    #[test]
    fn property_relative_and_absolute_sources_agree(
        dirs in relative_dir(),
        stem in segment(),
    ) {
        let mut relative = PathBuf::from("src");
        for dir in &dirs {
            relative.push(dir);
        }
        relative.push(format!("{}.tsx", stem));
        let absolute = normalize(&Path::new("/proj").join(&relative));

        prop_assert_eq!(
            layout().output_path_for(&relative, Some("js")),
            layout().output_path_for(&absolute, Some("js"))
        );
    }
}
