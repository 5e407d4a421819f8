use std::time::Duration;
use serde::{Serialize, Deserialize};
use reqwest::{Client, StatusCode};
use async_trait::async_trait;
use log::{debug, error, warn};

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Default endpoint of the free API tier
pub const DEFAULT_API_URL: &str = "https://api-free.deepl.com";

/// DeepL client for interacting with the DeepL REST API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, without the `/v2/...` path
    endpoint: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// DeepL translate request body
#[derive(Debug, Serialize, PartialEq)]
pub struct DeepLRequest {
    /// Texts to translate, in order
    pub text: Vec<String>,

    /// Target language code, uppercase (`FR`, `PT-BR`)
    pub target_lang: String,

    /// Source language code; DeepL auto-detects when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

/// DeepL translate response body
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One entry per requested text, same order
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Language DeepL detected for the source text
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// The translated text
    pub text: String,
}

/// Account usage returned by `/v2/usage`
#[derive(Debug, Deserialize)]
pub struct DeepLUsage {
    /// Characters translated in the current billing period
    pub character_count: u64,
    /// Character limit of the current billing period
    pub character_limit: u64,
}

impl DeepLRequest {
    /// Build the wire request for a batch
    pub fn from_request(request: &TranslationRequest) -> Self {
        let source_lang = if request.source_language.trim().is_empty() {
            None
        } else {
            Some(language_utils::to_provider_source_code(&request.source_language))
        };

        Self {
            text: request.texts.clone(),
            target_lang: language_utils::to_provider_target_code(&request.target_language),
            source_lang,
        }
    }
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self::new_with_config(api_key, endpoint, timeout_secs, 3, 1000)
    }

    /// Create a new DeepL client with retry configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.trim().is_empty() {
                DEFAULT_API_URL.to_string()
            } else {
                endpoint.trim_end_matches('/').to_string()
            },
            max_retries,
            backoff_base_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Send one translate call, retrying transient failures
    pub async fn translate(&self, request: &DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        let url = self.url("/v2/translate");

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self.client.post(&url)
                .header("Authorization", self.auth_header())
                .json(request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<DeepLResponse>().await
                            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL API response: {}", e)));
                    }

                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    let err = map_status_error(status, error_text);

                    if !is_retryable_status(status) {
                        error!("DeepL API error ({}): {}", status, err);
                        return Err(err);
                    }

                    error!("DeepL API error ({}): {} - attempt {}/{}", status, err, attempt + 1, self.max_retries + 1);
                    last_error = Some(err);
                }
                Err(e) => {
                    let err = if e.is_timeout() || e.is_connect() {
                        ProviderError::ConnectionError(format!("Failed to reach DeepL API: {}", e))
                    } else {
                        ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e))
                    };
                    error!("DeepL API network error: {} - attempt {}/{}", err, attempt + 1, self.max_retries + 1);
                    last_error = Some(err);
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                warn!("Retrying DeepL request in {}ms", backoff_ms);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!("DeepL request failed after {} attempts", self.max_retries + 1))
        }))
    }

    /// Fetch account usage; used as a cheap authenticated probe
    pub async fn usage(&self) -> Result<DeepLUsage, ProviderError> {
        let response = self.client.get(self.url("/v2/usage"))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to reach DeepL API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(map_status_error(status, error_text));
        }

        response.json::<DeepLUsage>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL usage response: {}", e)))
    }
}

#[async_trait]
impl Provider for DeepL {
    fn name(&self) -> &str {
        "deepl"
    }

    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let body = DeepLRequest::from_request(&request);
        debug!(
            "Sending {} texts ({} chars) to DeepL, {} -> {}",
            body.text.len(),
            request.char_count(),
            body.source_lang.as_deref().unwrap_or("auto"),
            body.target_lang
        );

        let response = self.translate(&body).await?;
        if response.translations.len() != body.text.len() {
            return Err(ProviderError::CountMismatch {
                expected: body.text.len(),
                actual: response.translations.len(),
            });
        }

        Ok(TranslationResponse {
            translations: response.translations.into_iter().map(|t| t.text).collect(),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let usage = self.usage().await?;
        debug!(
            "DeepL usage: {}/{} characters",
            usage.character_count, usage.character_limit
        );
        Ok(())
    }
}

/// Map a non-success HTTP status to a provider error
pub fn map_status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

/// Whether a failed call with this status is worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Delay before retry number `attempt` (1-based)
pub fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(16))
}
