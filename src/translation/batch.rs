/*!
 * Batch translation processing.
 *
 * This module sends texts to the provider in character-budgeted batches:
 * - texts already in the cache are answered without a call
 * - the remaining texts are packed greedily, in input order, into batches
 *   whose total character count stays within the budget
 * - every batch is one provider call; its results are written to the cache,
 *   the cache is saved, and each result is scattered back to its position
 *
 * Batches are sent one after the other. A failed call aborts the run; batches
 * committed before it stay in the saved cache.
 */

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::{Provider, TranslationRequest};

use super::cache::CacheStore;

/// Default character budget of a single provider call
pub const DEFAULT_MAX_CHARS_PER_REQUEST: usize = 50_000;

/// A text waiting for translation and every position that needs it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingText {
    /// Text as it will be sent to the provider
    pub text: String,
    /// Positions in the original request that receive the translation
    pub indices: Vec<usize>,
}

impl PendingText {
    /// Number of characters billed for this text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One provider call worth of pending texts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationBatch {
    /// Texts in send order
    pub items: Vec<PendingText>,
    /// Sum of the items' character counts
    pub char_count: usize,
}

impl TranslationBatch {
    fn push(&mut self, item: PendingText) {
        self.char_count += item.char_count();
        self.items.push(item);
    }

    /// Whether the batch holds no texts
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of texts in the batch
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Texts in send order
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }
}

/// Split pending texts into batches of at most `max_chars` characters.
///
/// A batch is closed as soon as the next text would push it over the budget.
/// A text longer than the budget on its own is sent alone.
pub fn plan_batches(pending: Vec<PendingText>, max_chars: usize) -> Vec<TranslationBatch> {
    let mut batches = Vec::new();
    let mut current = TranslationBatch::default();

    for item in pending {
        if !current.is_empty() && current.char_count + item.char_count() > max_chars {
            batches.push(std::mem::take(&mut current));
        }
        current.push(item);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

/// Counters describing one `translate_batch` run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Number of texts requested
    pub total_texts: usize,
    /// Texts answered from the cache
    pub cached_texts: usize,
    /// Distinct texts sent to the provider
    pub translated_texts: usize,
    /// Provider calls made
    pub batches: usize,
    /// Characters sent to the provider
    pub characters: usize,
}

/// Batch translator for sending texts to a provider under a character budget
pub struct BatchTranslator {
    /// The provider performing the translation
    provider: Arc<dyn Provider>,

    /// Cache consulted before and updated after every call
    cache: Arc<dyn CacheStore>,

    /// Character budget of a single call
    max_chars_per_request: usize,
}

impl BatchTranslator {
    /// Create a new batch translator with the default budget
    pub fn new(provider: Arc<dyn Provider>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            provider,
            cache,
            max_chars_per_request: DEFAULT_MAX_CHARS_PER_REQUEST,
        }
    }

    /// Override the per-call character budget
    pub fn with_max_chars(mut self, max_chars_per_request: usize) -> Self {
        self.max_chars_per_request = max_chars_per_request.max(1);
        self
    }

    /// Character budget of a single call
    pub fn max_chars_per_request(&self) -> usize {
        self.max_chars_per_request
    }

    /// Translate `texts`, returning one translation per text in the same order
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let (translations, _) = self
            .translate_batch_with_progress(texts, source_language, target_language, |_, _| {})
            .await?;
        Ok(translations)
    }

    /// Translate `texts` and report progress after every provider call.
    ///
    /// The callback receives the number of distinct texts translated so far
    /// and the number that needed translation.
    pub async fn translate_batch_with_progress(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<(Vec<String>, BatchStats), TranslationError> {
        let start_time = Instant::now();
        let mut stats = BatchStats {
            total_texts: texts.len(),
            ..Default::default()
        };

        let mut results: Vec<Option<String>> = vec![None; texts.len()];
        let pending = self.collect_pending(texts, source_language, target_language, &mut results, &mut stats);

        let pending_count = pending.len();
        let batches = plan_batches(pending, self.max_chars_per_request);
        debug!(
            "{} -> {}: {} cached, {} to translate in {} batches",
            source_language,
            target_language,
            stats.cached_texts,
            pending_count,
            batches.len()
        );

        for (batch_index, batch) in batches.iter().enumerate() {
            let request = TranslationRequest::new(batch.texts(), source_language, target_language);
            let response = self.provider.complete(request).await?;

            if response.translations.len() != batch.len() {
                return Err(ProviderError::CountMismatch {
                    expected: batch.len(),
                    actual: response.translations.len(),
                }
                .into());
            }

            for (item, translation) in batch.items.iter().zip(response.translations) {
                self.cache.set(&item.text, source_language, target_language, &translation);
                for &index in &item.indices {
                    results[index] = Some(translation.clone());
                }
            }
            self.cache.save()?;

            stats.batches += 1;
            stats.translated_texts += batch.len();
            stats.characters += batch.char_count;
            debug!(
                "Batch {}/{} done: {} texts, {} chars",
                batch_index + 1,
                batches.len(),
                batch.len(),
                batch.char_count
            );
            progress_callback(stats.translated_texts, pending_count);
        }

        if stats.batches > 0 {
            info!(
                "Translated {} texts ({} chars) to {} in {} requests, {:?}",
                stats.translated_texts,
                stats.characters,
                target_language,
                stats.batches,
                start_time.elapsed()
            );
        }

        // Every slot is filled by now: cached, empty, or scattered from a batch
        let translations = results.into_iter().map(Option::unwrap_or_default).collect();
        Ok((translations, stats))
    }

    /// Fill cached and empty texts in `results` and collect the rest, deduplicated
    fn collect_pending(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        results: &mut [Option<String>],
        stats: &mut BatchStats,
    ) -> Vec<PendingText> {
        let mut pending: Vec<PendingText> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (index, text) in texts.iter().enumerate() {
            if text.is_empty() {
                results[index] = Some(String::new());
                continue;
            }

            if let Some(&slot) = positions.get(text.as_str()) {
                pending[slot].indices.push(index);
                continue;
            }

            match self.cache.get(text, source_language, target_language) {
                Some(translation) => {
                    stats.cached_texts += 1;
                    results[index] = Some(translation);
                }
                None => {
                    positions.insert(text.as_str(), pending.len());
                    pending.push(PendingText {
                        text: text.clone(),
                        indices: vec![index],
                    });
                }
            }
        }

        pending
    }
}
