use std::sync::Arc;

use crate::cache::{BoundedCache, CacheStats};
use crate::config::SanitizerConfig;
use crate::sql::SqlParser;
use crate::statement::StatementInfo;

/// Facade for SQL-like statements. Owns its cache for its whole lifetime.
pub struct StatementSanitizer {
    enabled: bool,
    parser: SqlParser,
    cache: BoundedCache<String, StatementInfo>,
}

impl Default for StatementSanitizer {
    fn default() -> Self {
        Self::new(&SanitizerConfig::default())
    }
}

impl StatementSanitizer {
    pub fn new(config: &SanitizerConfig) -> Self {
        tracing::debug!(
            "statement sanitizer: enabled={}, cache_capacity={}, dialect={}",
            config.enabled,
            config.cache_capacity,
            config.dialect
        );
        Self {
            enabled: config.enabled,
            parser: SqlParser::from_config(config),
            cache: BoundedCache::new(config.cache_capacity),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sanitize and classify `raw`.
    ///
    /// Disabled: `raw` comes back verbatim with no operation or table.
    /// Enabled: the parse result is memoized by the exact raw text, except for
    /// statements longer than the configured maximum, which are parsed every time.
    pub fn sanitize(&self, raw: &str) -> Arc<StatementInfo> {
        if !self.enabled {
            return Arc::new(StatementInfo::passthrough(Some(raw)));
        }
        if raw.len() > self.parser.max_length() {
            tracing::debug!(
                "statement of {} bytes exceeds {} bytes; not memoized",
                raw.len(),
                self.parser.max_length()
            );
            return Arc::new(self.parser.parse(raw));
        }
        self.cache.get_or_compute(raw, || self.parser.parse(raw))
    }

    /// Nullable form: `None` yields an info with no text, operation or table.
    pub fn sanitize_opt(&self, raw: Option<&str>) -> Arc<StatementInfo> {
        match raw {
            Some(raw) => self.sanitize(raw),
            None => Arc::new(StatementInfo::passthrough(None)),
        }
    }

    pub fn is_cached(&self, raw: &str) -> bool {
        self.cache.contains(raw)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
