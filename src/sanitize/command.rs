use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::cache::{BoundedCache, CacheStats};
use crate::command::{normalize, CommandStrategy};
use crate::config::SanitizerConfig;

/// SHA-256 of the length-prefixed `(command, args)` encoding. Memoized keys
/// never retain argument payloads.
type CommandKey = [u8; 32];

/// Facade for argument-list protocols (Redis, Valkey).
pub struct CommandSanitizer {
    enabled: bool,
    cache: BoundedCache<CommandKey, String>,
}

impl Default for CommandSanitizer {
    fn default() -> Self {
        Self::new(&SanitizerConfig::default())
    }
}

impl CommandSanitizer {
    pub fn new(config: &SanitizerConfig) -> Self {
        tracing::debug!(
            "command sanitizer: enabled={}, cache_capacity={}",
            config.enabled,
            config.cache_capacity
        );
        Self {
            enabled: config.enabled,
            cache: BoundedCache::new(config.cache_capacity),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render `command` and its arguments. Disabled: every argument verbatim.
    pub fn sanitize<A: AsRef<[u8]>>(&self, command: &str, args: &[A]) -> Arc<String> {
        if !self.enabled {
            return Arc::new(CommandStrategy::KeepAll.apply(command, args));
        }
        let key = command_key(command, args);
        self.cache.get_or_compute(&key, || normalize(command, args))
    }

    pub fn is_cached<A: AsRef<[u8]>>(&self, command: &str, args: &[A]) -> bool {
        self.cache.contains(&command_key(command, args))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn command_key<A: AsRef<[u8]>>(command: &str, args: &[A]) -> CommandKey {
    let mut hasher = Sha256::new();
    hasher.update((command.len() as u64).to_le_bytes());
    hasher.update(command.as_bytes());
    hasher.update((args.len() as u64).to_le_bytes());
    for arg in args {
        let arg = arg.as_ref();
        hasher.update((arg.len() as u64).to_le_bytes());
        hasher.update(arg);
    }
    hasher.finalize().into()
}
