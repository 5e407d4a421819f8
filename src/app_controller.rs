use anyhow::{Result, Context};
use log::{warn, info, debug};
use std::path::PathBuf;
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, ProviderConfig, TranslationProvider};
use crate::catalog::{self, CatalogEntry};
use crate::errors::AppError;
use crate::extraction::{self, DeclarationScanner, Entry};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::deepl::DeepL;
use crate::providers::mock::MockProvider;
use crate::translation::{BatchStats, BatchTranslator, CostEstimator, FileCache};

// @module: Application controller for extraction and translation runs

/// Options of a translation run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TranslateOptions {
    /// Only estimate the cost, never call the provider
    pub dry_run: bool,
    /// Only translate the first few entries of each catalog
    pub sample: bool,
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractSummary {
    /// Source files scanned
    pub files_scanned: usize,
    /// Declarations found across all files
    pub declarations: usize,
    /// Distinct keys written to the catalog
    pub keys: usize,
    /// Keys declared with diverging content
    pub conflicts: usize,
    /// Catalog file written
    pub output_file: PathBuf,
}

/// Outcome of a translation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateSummary {
    /// Characters that needed translation at estimate time
    pub estimated_chars: usize,
    /// Cost of those characters at the configured price
    pub estimated_cost: f64,
    /// Catalogs written, in write order
    pub written_files: Vec<PathBuf>,
    /// Per-catalog batch statistics, same order as `written_files`
    pub stats: Vec<BatchStats>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Provider override; built from the configuration when absent
    provider: Option<Arc<dyn Provider>>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            provider: None,
        })
    }

    /// Use the given provider instead of the configured one
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Scan the source tree and write the source-language catalog
    pub fn run_extract(&self) -> Result<ExtractSummary, AppError> {
        let extraction = &self.config.extraction;
        if !FileManager::dir_exists(&extraction.source_dir) {
            return Err(AppError::File(format!(
                "Source directory does not exist: {:?}",
                extraction.source_dir
            )));
        }

        let files = FileManager::find_source_files(&extraction.source_dir, &extraction.source_filter())?;
        info!("Scanning {} files in {:?}", files.len(), extraction.source_dir);

        let progress_bar = create_progress_bar(files.len() as u64, "files");
        let scanner = DeclarationScanner::new();
        let mut entries: Vec<Entry> = Vec::new();

        for file in &files {
            let label = FileManager::relative_label(file, &extraction.source_dir);
            progress_bar.set_message(label.clone());

            let data = FileManager::read_bytes(file)?;
            let found = scanner.scan(&label, &data)?;
            for entry in &found {
                entry.validate()?;
            }
            debug!("{}: {} declarations", label, found.len());

            entries.extend(found);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        let declarations = entries.len();
        let resolution = extraction::resolve(entries);
        let catalog = catalog::build_catalog(&resolution);
        catalog::write_catalog(&extraction.output_file, &catalog)?;

        if !resolution.conflicts.is_empty() {
            warn!("{} keys have conflicting translations", resolution.conflicts.len());
        }
        info!(
            "Extracted {} keys from {} declarations in {} files to {:?}",
            catalog.len(),
            declarations,
            files.len(),
            extraction.output_file
        );

        Ok(ExtractSummary {
            files_scanned: files.len(),
            declarations,
            keys: catalog.len(),
            conflicts: resolution.conflicts.len(),
            output_file: extraction.output_file.clone(),
        })
    }

    /// Translate the source catalog of every configured subdirectory into every target language
    pub async fn run_translate(&self, options: TranslateOptions) -> Result<TranslateSummary, AppError> {
        self.config
            .validate_for_translation()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let translation = &self.config.translation;
        let source_language = &self.config.source_language;
        let cache = FileCache::load(translation.cache_path())?;

        let mut summary = TranslateSummary::default();
        let mut translator: Option<BatchTranslator> = None;

        for subdir in &translation.subdirs {
            let source_file = translation.catalog_path(subdir, source_language);
            let mut entries = catalog::read_catalog(&source_file)?;

            if options.sample {
                entries = catalog::sample(&entries, translation.sample_size).to_vec();
            }

            let texts = catalog::collect_texts(&entries);

            let mut estimator = CostEstimator::new(&cache);
            for language in &self.config.target_languages {
                estimator.estimate_all(&texts, source_language, language);
            }
            let cost = estimator.estimated_cost(translation.price_per_million_chars);
            info!("Total estimated characters to translate: {}", estimator.total_chars());
            info!(
                "Estimated cost ({:.2} per 1M characters): {:.4}",
                translation.price_per_million_chars, cost
            );
            summary.estimated_chars += estimator.total_chars();
            summary.estimated_cost += cost;

            if options.dry_run {
                continue;
            }

            if translator.is_none() {
                translator = Some(self.create_translator(&cache).await?);
            }
            let Some(translator) = translator.as_ref() else {
                continue;
            };

            for language in &self.config.target_languages {
                let (target_file, stats) = self
                    .translate_catalog(translator, &entries, &texts, subdir, language)
                    .await?;
                summary.written_files.push(target_file);
                summary.stats.push(stats);
            }
        }

        let (hits, misses, hit_rate) = cache.cache().stats();
        debug!(
            "Cache {:?}: {} hits, {} misses ({:.1}% hit rate), {} entries",
            cache.path(),
            hits,
            misses,
            hit_rate * 100.0,
            cache.cache().len()
        );

        Ok(summary)
    }

    /// Translate one catalog into one language and write it next to the source
    async fn translate_catalog(
        &self,
        translator: &BatchTranslator,
        entries: &[CatalogEntry],
        texts: &[String],
        subdir: &str,
        language: &str,
    ) -> Result<(PathBuf, BatchStats), AppError> {
        let language_name = language_utils::get_language_name(language).unwrap_or_else(|_| language.to_string());
        let progress_bar = create_progress_bar(texts.len() as u64, "texts");
        progress_bar.set_message(format!("{} ({})", language_name, subdir));

        let pb = progress_bar.clone();
        let (translations, stats) = translator
            .translate_batch_with_progress(
                texts,
                &self.config.source_language,
                language,
                move |completed, _total| {
                    pb.set_position(completed as u64);
                },
            )
            .await?;
        progress_bar.finish_and_clear();

        let translated = catalog::apply_translations(entries, &translations);
        let target_file = self.config.translation.catalog_path(subdir, language);
        catalog::write_catalog(&target_file, &translated)?;

        info!(
            "Translated {} entries to {} and wrote to {:?}",
            entries.len(),
            language,
            target_file
        );

        Ok((target_file, stats))
    }

    async fn create_translator(&self, cache: &FileCache) -> Result<BatchTranslator, AppError> {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => create_provider(&self.config.translation.provider)?,
        };

        provider.test_connection().await?;
        debug!("Connected to {} provider", provider.name());

        Ok(BatchTranslator::new(provider, Arc::new(cache.clone()))
            .with_max_chars(self.config.translation.provider.max_chars_per_request))
    }
}

/// Build the provider described by the configuration
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match config.provider_type {
        TranslationProvider::DeepL => {
            let api_key = config.api_key()?;
            Ok(Arc::new(DeepL::new_with_config(
                api_key,
                config.api_url.clone(),
                config.timeout_secs,
                config.retry_count,
                config.retry_backoff_ms,
            )))
        }
        TranslationProvider::Mock => Ok(Arc::new(MockProvider::working())),
    }
}

fn create_progress_bar(len: u64, unit: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
        unit
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

