//! Tests for the statement facade: enable switch, memoization and limits.

use std::sync::Arc;

use dbscrub::{SanitizerConfig, SqlDialect, StatementInfo, StatementSanitizer};

fn config_with(f: impl FnOnce(&mut SanitizerConfig)) -> SanitizerConfig {
    let mut config = SanitizerConfig::default();
    f(&mut config);
    config
}

// ---------------------------------------------------------------------------
// Enable switch
// ---------------------------------------------------------------------------

#[test]
fn disabled_sanitizer_passes_text_through() {
    let sanitizer = StatementSanitizer::new(&config_with(|c| c.enabled = false));
    assert!(!sanitizer.is_enabled());

    let raw = "SELECT * FROM users WHERE name = 'alice'";
    let info = sanitizer.sanitize(raw);
    assert_eq!(*info, StatementInfo::passthrough(Some(raw)));
    assert_eq!(info.operation, None);
    assert_eq!(info.table, None);
    assert!(!sanitizer.is_cached(raw));
}

#[test]
fn missing_statement_yields_empty_info() {
    let sanitizer = StatementSanitizer::default();
    let info = sanitizer.sanitize_opt(None);
    assert_eq!(*info, StatementInfo::default());
    assert_eq!(info.span_name(), None);

    let info = sanitizer.sanitize_opt(Some("DELETE FROM t WHERE id = 7"));
    assert_eq!(info.sanitized_text.as_deref(), Some("DELETE FROM t WHERE id = ?"));
    assert_eq!(info.span_name().as_deref(), Some("DELETE t"));
}

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

#[test]
fn repeated_statements_hit_the_cache() {
    let sanitizer = StatementSanitizer::default();
    let raw = "UPDATE accounts SET balance = 100 WHERE id = 5";

    let first = sanitizer.sanitize(raw);
    assert!(sanitizer.is_cached(raw));
    let second = sanitizer.sanitize(raw);

    assert!(Arc::ptr_eq(&first, &second));
    let stats = sanitizer.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.total_entries, 1);
}

#[test]
fn cached_and_uncached_results_match() {
    let cached = StatementSanitizer::default();
    let uncached = StatementSanitizer::new(&config_with(|c| c.cache_capacity = 0));
    let statements = [
        "SELECT * FROM users WHERE name = 'alice'",
        "INSERT INTO orders (id, total) VALUES (42, 19.99)",
        "CALL refresh_totals()",
        "CREATE TABLE IF NOT EXISTS audit (id INT)",
        "not sql at all",
    ];
    for raw in statements {
        let a = cached.sanitize(raw);
        let b = cached.sanitize(raw);
        let c = uncached.sanitize(raw);
        assert_eq!(a, b);
        assert_eq!(a, c, "statement {raw:?}");
    }
    assert_eq!(uncached.cache_stats().total_entries, 0);
}

#[test]
fn cache_size_is_bounded_by_config() {
    let sanitizer = StatementSanitizer::new(&config_with(|c| c.cache_capacity = 10));
    for i in 0..500 {
        sanitizer.sanitize(&format!("SELECT * FROM t{i} WHERE x = {i}"));
    }
    let stats = sanitizer.cache_stats();
    assert_eq!(stats.capacity, 10);
    assert_eq!(stats.total_entries, 10);
    assert_eq!(stats.evictions, 490);
}

#[test]
fn oversized_statements_are_not_memoized() {
    let sanitizer = StatementSanitizer::new(&config_with(|c| c.max_statement_length = 64));
    let raw = format!("SELECT * FROM events WHERE payload = '{}'", "x".repeat(100));

    let info = sanitizer.sanitize(&raw);
    assert_eq!(info.operation.as_deref(), Some("SELECT"));
    assert_eq!(info.table.as_deref(), Some("events"));
    assert!(info.sanitized_text.as_deref().unwrap().len() <= 64);
    assert!(!sanitizer.is_cached(&raw));
    assert_eq!(sanitizer.cache_stats().misses, 0);
}

#[test]
fn dialect_is_taken_from_config() {
    let ansi = StatementSanitizer::new(&config_with(|c| {
        c.dialect = SqlDialect::DoubleQuotedIdentifiers;
    }));
    let info = ansi.sanitize("SELECT \"name\" FROM \"users\" WHERE id = 1");
    assert_eq!(
        info.sanitized_text.as_deref(),
        Some("SELECT \"name\" FROM \"users\" WHERE id = ?")
    );
    assert_eq!(info.table.as_deref(), Some("users"));

    let default = StatementSanitizer::default();
    let info = default.sanitize("SELECT \"name\" FROM t");
    assert_eq!(info.sanitized_text.as_deref(), Some("SELECT ? FROM t"));
}

// ---------------------------------------------------------------------------
// Sharing across threads
// ---------------------------------------------------------------------------

#[test]
fn facade_is_shareable_across_threads() {
    let sanitizer = Arc::new(StatementSanitizer::default());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sanitizer = Arc::clone(&sanitizer);
            std::thread::spawn(move || {
                for i in 0..250 {
                    let info = sanitizer.sanitize(&format!("SELECT * FROM t WHERE id = {}", i % 20));
                    assert_eq!(
                        info.sanitized_text.as_deref(),
                        Some("SELECT * FROM t WHERE id = ?"),
                        "thread {t}"
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(sanitizer.cache_stats().total_entries, 20);
}
