//! Property-based tests for the facade: JSON dispatch and logging modes

use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

use parking_lot::Mutex;

use envoi::logging::{LoggingError, LoggingMode};
use envoi::Envoi;

// ============================================================================
// Test Helpers
// ============================================================================

/// Strategy for small JSON values of mixed shape
fn json_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        proptest::collection::vec(any::<u8>(), 0..4).prop_map(|bytes| json!(bytes)),
    ]
}

/// Strategy for mode spellings with random case and padding
fn mode_spelling_strategy() -> impl Strategy<Value = (String, LoggingMode)> {
    (
        prop_oneof![
            Just(("silent", LoggingMode::Silent)),
            Just(("development", LoggingMode::Development)),
            Just(("dev", LoggingMode::Development)),
            Just(("debug", LoggingMode::Debug)),
        ],
        proptest::collection::vec(any::<bool>(), 11),
        " {0,2}",
    )
        .prop_map(|((word, mode), upper, pad)| {
            let cased: String = word
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            (format!("{pad}{cased}{pad}"), mode)
        })
}

// ============================================================================
// JSON dispatch
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every matching subscriber receives the published values unchanged and in order
    #[test]
    fn prop_json_arguments_arrive_unchanged(
        args in proptest::collection::vec(json_strategy(), 0..5),
        depth in 1usize..4,
    ) {
        let bus: Envoi = Envoi::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe("root", move |_ctx, args| {
            sink.lock().push(args.to_vec());
            Ok(())
        });

        let namespace = std::iter::repeat("child")
            .take(depth)
            .fold("root".to_string(), |ns, segment| format!("{ns}::{segment}"));

        prop_assert!(bus.publish(&namespace, &args).unwrap());
        prop_assert_eq!(seen.lock().clone(), vec![args]);
    }
}

// ============================================================================
// Logging modes
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Mode parsing ignores case and surrounding whitespace
    #[test]
    fn prop_mode_parse_ignores_case_and_padding((spelling, mode) in mode_spelling_strategy()) {
        prop_assert_eq!(LoggingMode::parse(&spelling).unwrap(), mode);
    }

    /// Any other word is rejected as an invalid environment value
    #[test]
    fn prop_unknown_mode_rejected(word in "[a-z]{1,12}") {
        prop_assume!(!matches!(word.as_str(), "silent" | "development" | "dev" | "debug"));

        let err = LoggingMode::parse(&word).unwrap_err();
        prop_assert!(matches!(err, LoggingError::InvalidEnv(_)));
    }
}
