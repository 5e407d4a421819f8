/*!
 * Machine translation of catalog messages.
 *
 * This module contains the pieces between the catalogs and the provider:
 *
 * - `placeholders`: protects `{name}` template tokens during translation
 * - `cache`: persistent (source, target, text) -> translation store
 * - `batch`: character-budgeted batching against a provider
 * - `estimator`: dry-run character and cost estimation
 */

// Re-export main types for easier usage
pub use self::batch::{BatchStats, BatchTranslator, PendingText, TranslationBatch, plan_batches};
pub use self::cache::{CacheStore, FileCache, TranslationCache};
pub use self::estimator::CostEstimator;

// Submodules
pub mod batch;
pub mod cache;
pub mod estimator;
pub mod placeholders;
