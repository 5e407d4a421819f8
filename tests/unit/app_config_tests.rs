/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use i18n_harvest::app_config::{Config, LogLevel, TranslationProvider};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.extraction.source_dir, PathBuf::from("app"));
    assert_eq!(config.extraction.allowed_extensions, vec![".ts", ".tsx"]);
    assert_eq!(config.extraction.ignored_dirs, vec!["node_modules"]);
    assert_eq!(config.translation.subdirs, vec!["app"]);
    assert_eq!(config.translation.sample_size, 10);
    assert_eq!(config.translation.provider.provider_type, TranslationProvider::DeepL);
    assert_eq!(config.translation.provider.max_chars_per_request, 50_000);
    assert_eq!(config.translation.provider.api_url, "https://api-free.deepl.com");
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_cachePath_withoutExplicitFile_shouldLiveUnderLocalesDir() {
    let config = Config::default();
    assert_eq!(
        config.translation.cache_path(),
        PathBuf::from("app").join("locales").join("api-cache").join("data.json")
    );
    assert_eq!(
        config.translation.catalog_path("content", "fr"),
        PathBuf::from("app").join("locales").join("content").join("fr.json")
    );
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "zz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Source language among the targets
    config.target_languages = vec!["fr".to_string(), "EN".to_string()];
    assert!(config.validate().is_err());

    // Regional variants are accepted
    config.target_languages = vec!["pt-BR".to_string(), "zh-Hans".to_string()];
    assert!(config.validate().is_ok());

    // A zero budget can never send anything
    config.translation.provider.max_chars_per_request = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validateForTranslation_withoutTargets_shouldFail() {
    let mut config = Config::default();
    config.target_languages.clear();

    assert!(config.validate().is_ok());
    assert!(config.validate_for_translation().is_err());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "source_language": "en",
        "target_languages": ["fr", "de"],
        "translation": { "provider": { "type": "mock", "max_chars_per_request": 1000 } },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_languages, vec!["fr", "de"]);
    assert_eq!(config.translation.provider.provider_type, TranslationProvider::Mock);
    assert_eq!(config.translation.provider.max_chars_per_request, 1000);
    assert_eq!(config.translation.provider.retry_count, 3);
    assert_eq!(config.extraction.output_file, PathBuf::from("app/locales/app/en.json"));
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_config_serializeThenDeserialize_shouldBeEqual() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_translationProvider_fromStr_shouldParseKnownNames() {
    assert_eq!("DeepL".parse::<TranslationProvider>().unwrap(), TranslationProvider::DeepL);
    assert_eq!("mock".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("openai".parse::<TranslationProvider>().is_err());
}

#[test]
fn test_apiKey_withUnsetVariable_shouldNameTheVariable() {
    let mut config = Config::default();
    config.translation.provider.api_key_env_var = "I18N_HARVEST_TEST_UNSET_KEY".to_string();

    let err = config.translation.provider.api_key().unwrap_err();
    assert!(err.to_string().contains("I18N_HARVEST_TEST_UNSET_KEY"));
}

#[test]
fn test_config_validation_withBadApiUrl_shouldFail() {
    let mut config = Config::default();

    config.translation.provider.api_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.translation.provider.api_url = "ftp://api.deepl.com".to_string();
    assert!(config.validate().is_err());

    config.translation.provider.api_url = "https://api.deepl.com".to_string();
    assert!(config.validate().is_ok());
}
