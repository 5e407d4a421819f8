/*!
 * Provider implementations for machine translation services.
 *
 * This module contains the transport used by the batch translator:
 * - DeepL: DeepL REST API integration
 * - Mock: deterministic in-process provider for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One batch of texts to translate in a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Texts in the order they must be returned
    pub texts: Vec<String>,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        texts: Vec<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            texts,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Total number of characters in the request
    pub fn char_count(&self) -> usize {
        self.texts.iter().map(|t| t.chars().count()).sum()
    }
}

/// Translations returned for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    /// Translated texts, same order as the request
    pub translations: Vec<String>,
}

/// Common trait for all translation providers
///
/// A call either returns a translation for every text of the request, in
/// order, or fails as a whole. Retry policy belongs to the implementation.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Translate every text of the request
    ///
    /// # Arguments
    /// * `request` - The batch to translate
    ///
    /// # Returns
    /// * `Result<TranslationResponse, ProviderError>` - The translations or an error
    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod deepl;
pub mod mock;
