/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with tagged text
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_on_request(n)` - Fails only on the n-th call
 * - `MockProvider::short_response()` - Drops the last translation of each batch
 *
 * Every request is recorded so tests can assert how texts were batched.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the given 1-based request number, succeeds otherwise
    FailOnRequest { request: usize },
    /// Returns one translation fewer than requested
    ShortResponse,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Requests received so far
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom translation function (text, target language) -> translation
    custom_response: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails on its n-th request
    pub fn fail_on_request(request: usize) -> Self {
        Self::new(MockBehavior::FailOnRequest { request })
    }

    /// Create a mock that returns too few translations
    pub fn short_response() -> Self {
        Self::new(MockBehavior::ShortResponse)
    }

    /// Set a custom translation function
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// The default translation: the text tagged with the target language
    pub fn mock_translation(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    /// Number of calls received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn translate_all(&self, request: &TranslationRequest) -> Vec<String> {
        let generator = self.custom_response.unwrap_or(Self::mock_translation);
        request
            .texts
            .iter()
            .map(|text| generator(text, &request.target_language))
            .collect()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let count = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len()
        };

        match self.behavior {
            MockBehavior::Working => Ok(TranslationResponse {
                translations: self.translate_all(&request),
            }),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::FailOnRequest { request: failing } => {
                if count == failing {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated failure (request #{})", count),
                        status_code: 503,
                    })
                } else {
                    Ok(TranslationResponse {
                        translations: self.translate_all(&request),
                    })
                }
            }

            MockBehavior::ShortResponse => {
                let mut translations = self.translate_all(&request);
                translations.pop();
                Ok(TranslationResponse { translations })
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
