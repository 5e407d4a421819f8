/*!
 * Cost estimation for dry runs.
 *
 * Counts the characters a translation run would send to the provider without
 * making any call. A text is charged once per (source, target) pair, and only
 * when the persistent cache does not already hold it.
 */

use log::debug;

use super::cache::{CacheStore, TranslationCache};

/// Provider price in the absence of configuration, per million characters
pub const DEFAULT_PRICE_PER_MILLION_CHARS: f64 = 20.0;

/// Dry-run counterpart of the batch translator
pub struct CostEstimator<'a> {
    /// Cache whose entries are never charged; only read
    cache: &'a dyn CacheStore,

    /// Texts already charged during this estimate
    seen: TranslationCache,

    /// Running character total
    total_chars: usize,
}

impl<'a> CostEstimator<'a> {
    /// Create an estimator over the given persistent cache
    pub fn new(cache: &'a dyn CacheStore) -> Self {
        Self {
            cache,
            seen: TranslationCache::new(),
            total_chars: 0,
        }
    }

    /// Account for one text; returns the characters charged for it
    pub fn estimate(&mut self, text: &str, source_language: &str, target_language: &str) -> usize {
        if text.is_empty()
            || self.seen.contains(text, source_language, target_language)
            || self.cache.contains(text, source_language, target_language)
        {
            return 0;
        }

        self.seen.set(text, source_language, target_language, "");
        let chars = text.chars().count();
        self.total_chars += chars;
        chars
    }

    /// Account for a list of texts; returns the characters charged for them
    pub fn estimate_all(&mut self, texts: &[String], source_language: &str, target_language: &str) -> usize {
        let charged: usize = texts
            .iter()
            .map(|text| self.estimate(text, source_language, target_language))
            .sum();
        debug!(
            "Estimated {} chars for {} texts ({} -> {})",
            charged,
            texts.len(),
            source_language,
            target_language
        );
        charged
    }

    /// Characters charged so far
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Cost of the characters charged so far at the given price
    pub fn estimated_cost(&self, price_per_million_chars: f64) -> f64 {
        self.total_chars as f64 / 1_000_000.0 * price_per_million_chars
    }
}
