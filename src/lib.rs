/*!
 * # i18n-harvest
 *
 * A Rust library for harvesting translatable strings from source code and
 * translating them with a machine translation provider.
 *
 * ## Features
 *
 * - Lenient scan for `t({...})` declarations in TypeScript/JavaScript sources
 * - Conflict detection when one key is declared with different messages
 * - Sorted JSON catalogs with provenance in every description
 * - Placeholder protection (`{name}`) around machine translation
 * - Persistent translation cache, saved atomically after every request
 * - Requests packed under a per-call character budget
 * - Dry-run cost estimation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: Declaration scanning and conflict resolution:
 *   - `extraction::scanner`: `t({...})` scanner
 *   - `extraction::resolver`: grouping by key and canonical selection
 * - `catalog`: Catalog file model, reading and writing
 * - `translation`: Translation pipeline:
 *   - `translation::placeholders`: Placeholder neutralization and restoration
 *   - `translation::cache`: Persistent translation cache
 *   - `translation::batch`: Budgeted batch translation
 *   - `translation::estimator`: Cost estimation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Locale code utilities
 * - `providers`: Translation provider clients:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::mock`: Offline provider for tests
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, TranslateOptions};
pub use catalog::{CatalogEntry, CatalogTranslation};
pub use extraction::{Entry, Resolution, extract_from_content, resolve};
pub use language_utils::{get_language_name, language_codes_match};
pub use errors::{AppError, PersistenceError, ProviderError, ScanError, TranslationError, ValidationError};
