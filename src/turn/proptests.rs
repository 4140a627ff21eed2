//! Property-based tests for crisis detection and reply annotation
//!
//! These cover the pure pieces of the turn processor:
//! - crisis detection is case-insensitive and position-independent
//! - text with no keyword never trips the crisis branch
//! - annotation preserves the reply verbatim

use super::{annotate_reply, contains_crisis_keyword};
use crate::config;
use proptest::prelude::*;

/// A crisis keyword with per-character random casing
fn arb_cased_keyword() -> impl Strategy<Value = String> {
    prop::sample::select(config::CRISIS_KEYWORDS.to_vec()).prop_flat_map(|keyword| {
        prop::collection::vec(any::<bool>(), keyword.len()).prop_map(move |mask| {
            keyword
                .chars()
                .zip(mask)
                .map(|(c, upper)| {
                    if upper {
                        c.to_ascii_uppercase()
                    } else {
                        c
                    }
                })
                .collect()
        })
    })
}

/// Filler text that cannot itself form a keyword
fn arb_safe_text() -> impl Strategy<Value = String> {
    "[a-z .,!?]{0,40}".prop_filter("must not contain a crisis keyword", |text| {
        !contains_crisis_keyword(text)
    })
}

proptest! {
    #[test]
    fn embedded_keyword_is_detected_regardless_of_case_and_position(
        prefix in arb_safe_text(),
        keyword in arb_cased_keyword(),
        suffix in arb_safe_text(),
    ) {
        let utterance = format!("{prefix}{keyword}{suffix}");
        prop_assert!(contains_crisis_keyword(&utterance));
    }

    #[test]
    fn keyword_free_text_is_never_a_crisis(text in arb_safe_text()) {
        prop_assert!(!contains_crisis_keyword(&text));
    }

    #[test]
    fn annotation_preserves_reply_and_label(
        reply in "[a-zA-Z0-9 .,!?]{1,80}",
        label in prop::sample::select(config::EMOTION_LABELS.to_vec()),
    ) {
        let annotated = annotate_reply(&reply, label);
        let expected_suffix = format!("(Detected emotion: *{}*)", label);
        prop_assert!(annotated.starts_with(&reply));
        prop_assert!(annotated.ends_with(&expected_suffix));
    }
}
