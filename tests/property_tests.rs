//! Property-based tests for leveled_logger using proptest

use leveled_logger::appenders::MemoryAppender;
use leveled_logger::{FieldValue, LogLevel, Logger, OutputFormat};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

/// Levels that can be logged without exiting the process
fn callable_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

fn field_map() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..6)
}

fn capture(level: LogLevel, format: OutputFormat) -> (Logger, MemoryAppender) {
    let output = MemoryAppender::new();
    let logger = Logger::builder()
        .min_level(level)
        .format(format)
        .show_caller(false)
        .colors(false)
        .appender(output.clone())
        .build();
    (logger, output)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering matches the numeric discriminants
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert_eq!(LogLevel::try_from(val1).unwrap(), level1);
    }

    /// Out-of-range numeric levels are configuration errors
    #[test]
    fn test_out_of_range_levels_rejected(raw in 5u8..=u8::MAX) {
        let err = LogLevel::try_from(raw).unwrap_err();
        prop_assert!(err.is_config_error());
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    /// A record is written iff its level reaches the threshold
    #[test]
    fn test_threshold_law(threshold in any_level(), level in callable_level()) {
        let (logger, output) = capture(threshold, OutputFormat::Text);
        logger.log(level, "threshold check");

        let written = !output.contents().is_empty();
        prop_assert_eq!(written, level >= threshold);
    }

    /// Deriving twice equals deriving once with the merged map (B wins)
    #[test]
    fn test_derivation_law(a in field_map(), b in field_map()) {
        let (base, _) = capture(LogLevel::Info, OutputFormat::Text);

        let twice = base.with_fields(a.clone()).with_fields(b.clone());

        let mut merged = a.clone();
        merged.extend(b.clone());
        let once = base.with_fields(merged);

        prop_assert_eq!(twice.fields(), once.fields());
        for (key, value) in &b {
            prop_assert_eq!(twice.fields().get(key), Some(&FieldValue::Int(*value)));
        }
        prop_assert!(base.fields().is_empty());
    }

    /// JSON lines always parse and carry the envelope
    #[test]
    fn test_json_always_valid(
        message in any::<String>(),
        fields in prop::collection::btree_map(any::<String>(), any::<String>(), 0..5),
        level in callable_level(),
    ) {
        let (logger, output) = capture(LogLevel::Debug, OutputFormat::Json);
        logger.with_fields(fields).log(level, &message);

        let contents = output.contents();
        prop_assert!(contents.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(contents.trim_end_matches('\n')).unwrap();
        prop_assert_eq!(parsed["level"].as_str(), Some(level.to_str()));
        prop_assert_eq!(parsed["message"].as_str(), Some(message.as_str()));
        prop_assert!(parsed["time"].is_string());
    }

    /// Text lines start with the level and carry the message verbatim
    #[test]
    fn test_text_shape(
        message in "[a-zA-Z0-9 ,.!?]{0,40}",
        fields in field_map(),
        level in callable_level(),
    ) {
        let (logger, output) = capture(LogLevel::Debug, OutputFormat::Text);
        let has_fields = !fields.is_empty();
        logger.with_fields(fields).log(level, &message);

        let line = output.contents();
        let prefix = format!("[{}] ", level);
        prop_assert!(line.starts_with(&prefix));
        prop_assert!(line.contains(&message));
        prop_assert_eq!(line.contains(" | "), has_fields);
    }
}
