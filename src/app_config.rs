use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

use crate::file_utils::SourceFilter;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language the catalog messages are written in
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Languages to translate the catalog into
    #[serde(default)]
    pub target_languages: Vec<String>,

    /// Extraction config
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepL REST API
    #[default]
    DeepL,
    // @provider: Offline provider that tags texts with the target language
    Mock,
}

impl TranslationProvider {
    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepL => "deepl".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Where declarations are looked for and where the source catalog goes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    // @field: Root directory scanned for declarations
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    // @field: Source-language catalog written by `extract`
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    // @field: File extensions to scan
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    // @field: Directory names never descended into
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

impl ExtractionConfig {
    /// File filter for the source walk
    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter::new(self.allowed_extensions.clone(), self.ignored_dirs.clone())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_file: default_output_file(),
            allowed_extensions: default_allowed_extensions(),
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

/// Provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub provider_type: TranslationProvider,

    // @field: Service URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    // @field: Environment variable holding the API key
    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: String,

    // @field: Max chars per request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries after a failed call
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff between retries, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(anyhow!(
                "API key environment variable {} is not set",
                self.api_key_env_var
            )),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: TranslationProvider::default(),
            api_url: default_api_url(),
            api_key_env_var: default_api_key_env_var(),
            max_chars_per_request: default_max_chars_per_request(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Translation run settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Directory holding one subdirectory of catalogs per domain
    #[serde(default = "default_locales_dir")]
    pub locales_dir: PathBuf,

    /// Subdirectories of `locales_dir` to translate
    #[serde(default = "default_subdirs")]
    pub subdirs: Vec<String>,

    /// Cache snapshot file; `<locales_dir>/api-cache/data.json` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Provider price per million characters, for estimates
    #[serde(default = "default_price_per_million_chars")]
    pub price_per_million_chars: f64,

    /// Number of entries translated in sample mode
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl TranslationConfig {
    /// Resolved cache snapshot path
    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| self.locales_dir.join("api-cache").join("data.json"))
    }

    /// Catalog path of `language` in `subdir`
    pub fn catalog_path(&self, subdir: &str, language: &str) -> PathBuf {
        self.locales_dir.join(subdir).join(format!("{}.json", language))
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            locales_dir: default_locales_dir(),
            subdirs: default_subdirs(),
            cache_file: None,
            price_per_million_chars: default_price_per_million_chars(),
            sample_size: default_sample_size(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("app")
}

fn default_output_file() -> PathBuf {
    Path::new("app").join("locales").join("app").join("en.json")
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".ts".to_string(), ".tsx".to_string()]
}

fn default_ignored_dirs() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_locales_dir() -> PathBuf {
    Path::new("app").join("locales")
}

fn default_subdirs() -> Vec<String> {
    vec!["app".to_string()]
}

fn default_price_per_million_chars() -> f64 {
    20.0
}

fn default_sample_size() -> usize {
    10
}

fn default_api_url() -> String {
    "https://api-free.deepl.com".to_string()
}

fn default_api_key_env_var() -> String {
    "DEEPL_API_KEY".to_string()
}

fn default_max_chars_per_request() -> usize {
    50_000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)?;

        for language in &self.target_languages {
            language_utils::validate_language_code(language)?;
            if language_utils::language_codes_match(language, &self.source_language) {
                return Err(anyhow!(
                    "source language {:?} cannot be in the target languages",
                    self.source_language
                ));
            }
        }

        if self.extraction.allowed_extensions.is_empty() {
            return Err(anyhow!("At least one allowed extension is required"));
        }

        if self.translation.provider.max_chars_per_request == 0 {
            return Err(anyhow!("max_chars_per_request must be greater than zero"));
        }

        let api_url = &self.translation.provider.api_url;
        if !api_url.is_empty() {
            let parsed = Url::parse(api_url).map_err(|e| anyhow!("Invalid api_url {:?}: {}", api_url, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(anyhow!("api_url must use http or https: {:?}", api_url));
            }
        }

        Ok(())
    }

    /// Validation specific to translation runs
    pub fn validate_for_translation(&self) -> Result<()> {
        self.validate()?;

        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }
        if self.translation.subdirs.is_empty() {
            return Err(anyhow!("At least one locales subdirectory is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_languages: vec!["fr".to_string(), "de".to_string(), "es".to_string()],
            extraction: ExtractionConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
