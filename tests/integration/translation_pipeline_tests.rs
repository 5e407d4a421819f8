/*!
 * End-to-end tests for the translate workflow using the mock provider
 */

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use i18n_harvest::catalog::{self, CatalogTranslation};
use i18n_harvest::providers::mock::MockProvider;
use i18n_harvest::translation::{CacheStore, FileCache};
use i18n_harvest::{AppError, Config, Controller, TranslateOptions, TranslationError};

use crate::common;

/// Extract the sample project so that a source catalog exists
fn prepare_project(root: &Path) -> Result<Config> {
    common::create_sample_project(root)?;
    let config = common::test_config(root);
    Controller::with_config(config.clone())?.run_extract()?;
    Ok(config)
}

#[tokio::test]
async fn test_runTranslate_shouldWriteCatalogPerLanguageWithPlaceholdersRestored() -> Result<()> {
    common::init_test_logging();
    let dir = common::create_temp_dir()?;
    let config = prepare_project(dir.path())?;
    let provider = MockProvider::working();

    let summary = Controller::with_config(config.clone())?
        .with_provider(Arc::new(provider.clone()))
        .run_translate(TranslateOptions::default())
        .await?;

    assert_eq!(summary.written_files.len(), 2);
    assert_eq!(provider.request_count(), 2);

    let fr = catalog::read_catalog(&config.translation.catalog_path("app", "fr"))?;
    let source = catalog::read_catalog(&config.extraction.output_file)?;
    assert_eq!(fr.len(), source.len());
    assert_eq!(fr[2].id, "home.title");
    assert_eq!(fr[2].description, source[2].description);
    assert_eq!(fr[2].translation, CatalogTranslation::Text("[fr] Welcome {name}".to_string()));

    let CatalogTranslation::Plural(forms) = &fr[0].translation else {
        panic!("expected plural forms for files.count");
    };
    assert_eq!(forms["one"], "[fr] {n} file");
    assert_eq!(forms["other"], "[fr] {n} files");

    // The provider only ever sees neutralized text
    let sent: Vec<String> = provider.requests().into_iter().flat_map(|r| r.texts).collect();
    assert!(sent.iter().all(|text| !text.contains("{name}") && !text.contains("{n}")));

    let de = catalog::read_catalog(&config.translation.catalog_path("app", "de"))?;
    assert_eq!(de[2].translation, CatalogTranslation::Text("[de] Welcome {name}".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_secondRun_shouldBeServedFromCache() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = prepare_project(dir.path())?;

    Controller::with_config(config.clone())?
        .with_provider(Arc::new(MockProvider::working()))
        .run_translate(TranslateOptions::default())
        .await?;

    let provider = MockProvider::working();
    let summary = Controller::with_config(config.clone())?
        .with_provider(Arc::new(provider.clone()))
        .run_translate(TranslateOptions::default())
        .await?;

    assert_eq!(provider.request_count(), 0);
    assert_eq!(summary.estimated_chars, 0);
    assert!(summary.stats.iter().all(|s| s.batches == 0 && s.cached_texts == 4));

    let cache = FileCache::load(config.translation.cache_path())?;
    assert_eq!(cache.get("Welcome {0}", "en", "fr"), Some("[fr] Welcome {0}".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_dryRun_shouldEstimateWithoutCallsOrFiles() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = prepare_project(dir.path())?;
    let provider = MockProvider::failing();

    let summary = Controller::with_config(config.clone())?
        .with_provider(Arc::new(provider.clone()))
        .run_translate(TranslateOptions {
            dry_run: true,
            sample: false,
        })
        .await?;

    // 64 characters of neutralized text, once per target language
    assert_eq!(summary.estimated_chars, 128);
    assert!((summary.estimated_cost - 128.0 / 1_000_000.0 * 20.0).abs() < 1e-12);
    assert_eq!(provider.request_count(), 0);
    assert!(summary.written_files.is_empty());
    assert!(!config.translation.catalog_path("app", "fr").exists());
    assert!(!config.translation.cache_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_sample_shouldOnlyTranslateFirstEntries() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = prepare_project(dir.path())?;
    config.translation.sample_size = 1;
    config.target_languages = vec!["es".to_string()];

    Controller::with_config(config.clone())?
        .with_provider(Arc::new(MockProvider::working()))
        .run_translate(TranslateOptions {
            dry_run: false,
            sample: true,
        })
        .await?;

    let es = catalog::read_catalog(&config.translation.catalog_path("app", "es"))?;
    assert_eq!(es.len(), 1);
    assert_eq!(es[0].id, "files.count");
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_smallBudget_shouldSplitIntoSeveralRequests() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = prepare_project(dir.path())?;
    config.target_languages = vec!["fr".to_string()];
    config.translation.provider.max_chars_per_request = 20;
    let provider = MockProvider::working();

    let summary = Controller::with_config(config)?
        .with_provider(Arc::new(provider.clone()))
        .run_translate(TranslateOptions::default())
        .await?;

    let sizes: Vec<usize> = provider.requests().iter().map(|r| r.texts.len()).collect();
    assert_eq!(sizes, vec![2, 1, 1]);
    assert_eq!(summary.stats[0].batches, 3);
    assert_eq!(summary.stats[0].characters, 64);
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_failureMidRun_shouldKeepEarlierBatchesCached() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = prepare_project(dir.path())?;
    config.target_languages = vec!["fr".to_string()];
    config.translation.provider.max_chars_per_request = 20;

    let result = Controller::with_config(config.clone())?
        .with_provider(Arc::new(MockProvider::fail_on_request(2)))
        .run_translate(TranslateOptions::default())
        .await;

    assert!(matches!(result, Err(AppError::Translation(TranslationError::Provider(_)))));
    assert!(!config.translation.catalog_path("app", "fr").exists());

    let cache = FileCache::load(config.translation.cache_path())?;
    assert!(cache.contains("{0} file", "en", "fr"));
    assert!(cache.contains("{0} files", "en", "fr"));
    assert!(!cache.contains("Welcome {0}", "en", "fr"));
    Ok(())
}

#[tokio::test]
async fn test_runTranslate_missingSourceCatalog_shouldReportPersistenceError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());

    let result = Controller::with_config(config)?
        .with_provider(Arc::new(MockProvider::working()))
        .run_translate(TranslateOptions::default())
        .await;

    assert!(matches!(result, Err(AppError::Persistence(_))));
    Ok(())
}

#[test]
fn test_runTranslate_withConfiguredMockProvider_shouldNotNeedApiKey() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = prepare_project(dir.path())?;
    let controller = Controller::with_config(config.clone())?;

    let summary = tokio_test::block_on(controller.run_translate(TranslateOptions::default()))?;

    assert_eq!(summary.written_files.len(), 2);
    assert!(config.translation.catalog_path("app", "de").exists());
    Ok(())
}
