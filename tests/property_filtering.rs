// tests/property_filtering.rs

use proptest::prelude::*;
use waybridge::cli;

/// Tokens drawn from the interesting corners of the dialect: recognized
/// flags with and without operands, unknown dashed flags and positional-ish
/// junk that must pass through.
fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("-geometry".to_string()),
        Just("-depth".to_string()),
        Just("-quiet".to_string()),
        Just("-rootless".to_string()),
        Just("-verbose".to_string()),
        "[a-z0-9:]{1,8}",
        "-[a-z]{1,8}",
    ]
}

fn token_sequences() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(token_strategy(), 0..16)
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut iter = haystack.iter();
    needle.iter().all(|token| iter.any(|other| other == token))
}

proptest! {
    #[test]
    fn filtering_is_idempotent(tokens in token_sequences()) {
        let once = cli::filter_passthrough(&tokens);
        let twice = cli::filter_passthrough(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn passthrough_preserves_relative_order(tokens in token_sequences()) {
        let filtered = cli::filter_passthrough(&tokens);
        prop_assert!(is_subsequence(&filtered, &tokens));
    }

    #[test]
    fn recognized_names_never_survive_filtering(tokens in token_sequences()) {
        // This is exactly why filtering is idempotent: operands are removed
        // together with their options, so nothing recognizable remains.
        let filtered = cli::filter_passthrough(&tokens);
        for name in ["-geometry", "-depth", "-quiet", "-rootless", "-verbose"] {
            prop_assert!(!filtered.iter().any(|token| token == name));
        }
    }

    #[test]
    fn filtering_never_grows_the_sequence(tokens in token_sequences()) {
        prop_assert!(cli::filter_passthrough(&tokens).len() <= tokens.len());
    }
}
