// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use i18n_harvest::app_config::{self, Config, TranslationProvider};
use i18n_harvest::{Controller, TranslateOptions};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deepl")]
    DeepL,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepL => TranslationProvider::DeepL,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that reads the configuration
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, env = "I18N_HARVEST_CONFIG", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory to scan for t({...}) declarations
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Catalog file to write
    #[arg(short, long)]
    output_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory with one subdirectory of catalogs per domain
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Source language code (e.g., 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Comma-separated target languages (e.g., 'fr,de,es')
    #[arg(long, value_delimiter = ',')]
    langs: Option<Vec<String>>,

    /// Comma-separated subdirectories of --dir (e.g., 'app,content')
    #[arg(long, value_delimiter = ',')]
    subdirs: Option<Vec<String>>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Provider API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Environment variable to read the API key from
    #[arg(long)]
    api_key_env_var: Option<String>,

    /// Only count the characters to translate, no API calls
    #[arg(long)]
    dry_run: bool,

    /// Only translate a small sample of each catalog
    #[arg(long)]
    sample: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan sources and write the source-language catalog
    Extract(ExtractArgs),

    /// Translate the source catalogs into every target language
    Translate(TranslateArgs),

    /// Generate shell completions for i18n-harvest
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// i18n-harvest - translatable string extraction and machine translation
///
/// Finds t({...}) declarations in source files, writes them to a catalog and
/// translates the catalog with a cached, batched machine translation provider.
#[derive(Parser, Debug)]
#[command(name = "i18n-harvest")]
#[command(version)]
#[command(about = "Extract translatable strings and machine-translate them")]
#[command(long_about = "i18n-harvest scans source files for t({...}) declarations, writes a sorted
JSON catalog, and translates catalogs into other languages with DeepL.

EXAMPLES:
    i18n-harvest extract                               # Scan ./app using conf.json
    i18n-harvest extract -s src -o locales/app/en.json # Override source dir and output
    i18n-harvest translate --langs fr,de --dry-run     # Estimate translation cost only
    i18n-harvest translate --sample                    # Translate the first entries only
    i18n-harvest translate --subdirs app,content       # Translate several catalogs
    i18n-harvest completions bash > i18n-harvest.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

    The DeepL API key is read from the environment variable named by
    translation.provider.api_key_env_var (DEEPL_API_KEY by default).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Max level is narrowed once the configuration is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "i18n-harvest", &mut std::io::stdout());
            Ok(())
        }
        Commands::Extract(args) => run_extract(args),
        Commands::Translate(args) => run_translate(args).await,
    };

    if let Err(e) = result {
        error!("Failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run_extract(options: ExtractArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    if let Some(source_dir) = options.source_dir {
        config.extraction.source_dir = source_dir;
    }
    if let Some(output_file) = options.output_file {
        config.extraction.output_file = output_file;
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run_extract()?;

    info!("Success: {:?}", summary.output_file);
    Ok(())
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    if let Some(dir) = options.dir {
        config.translation.locales_dir = dir;
    }
    if let Some(source_language) = options.source_language {
        config.source_language = source_language;
    }
    if let Some(langs) = options.langs {
        config.target_languages = langs.into_iter().filter(|l| !l.trim().is_empty()).collect();
    }
    if let Some(subdirs) = options.subdirs {
        config.translation.subdirs = subdirs;
    }
    if let Some(provider) = options.provider {
        config.translation.provider.provider_type = provider.into();
    }
    if let Some(api_url) = options.api_url {
        config.translation.provider.api_url = api_url;
    }
    if let Some(api_key_env_var) = options.api_key_env_var {
        config.translation.provider.api_key_env_var = api_key_env_var;
    }

    let controller = Controller::with_config(config)?;
    let summary = controller
        .run_translate(TranslateOptions {
            dry_run: options.dry_run,
            sample: options.sample,
        })
        .await?;

    if options.dry_run {
        info!(
            "Dry run: {} characters, estimated cost {:.4}",
            summary.estimated_chars, summary.estimated_cost
        );
    } else {
        info!("Wrote {} catalogs", summary.written_files.len());
    }
    Ok(())
}

/// Load the configuration file, creating a default one when missing, and apply the log level
fn load_config(options: &CommonArgs) -> Result<Config> {
    let config_path = &options.config_path;

    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}
