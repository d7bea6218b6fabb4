//! Property tests for the comment-tolerant JSON reader.

use proptest::prelude::*;

use tsrig::config::jsonc;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,256}") {
        let _ = jsonc::parse(&s);
    }

    /// PROPERTY: comments and trailing commas do not change the value.
    #[test]
    fn property_comments_and_trailing_commas_are_ignored(
        key in "[a-z]{1,8}",
        value in "[A-Za-z0-9 ./*]{0,16}",
        comment in "[A-Za-z0-9 ]{0,16}",
    ) {
        let plain = format!("{{\"{}\": \"{}\"}}", key, value);
        let noisy = format!(
            "// {c}\n{{\n  /* {c} */ \"{k}\": \"{v}\", // {c}\n}}\n",
            c = comment,
            k = key,
            v = value
        );

        prop_assert_eq!(jsonc::parse(&noisy).unwrap(), jsonc::parse(&plain).unwrap());
    }
}
