/*!
 * Common test utilities for the i18n-harvest test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use i18n_harvest::Config;
use i18n_harvest::app_config::TranslationProvider;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file, and its parent directories, under `dir`
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route captured log output to the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Configuration rooted at `root`, translating to French and German with the mock provider
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.target_languages = vec!["fr".to_string(), "de".to_string()];
    config.extraction.source_dir = root.join("app");
    config.extraction.output_file = root.join("app/locales/app/en.json");
    config.translation.locales_dir = root.join("app/locales");
    config.translation.provider.provider_type = TranslationProvider::Mock;
    config
}

/// A small application with singular, multi-line and plural declarations
pub fn create_sample_project(root: &Path) -> Result<()> {
    create_test_file(
        root,
        "app/routes/home.tsx",
        r#"import { t } from "~/i18n";

export function Home() {
  const title = t({"code":"home.title","desc":"Page title","msg":"Welcome {name}"},{name:user.name});
  return <h1>{title}</h1>;
}
"#,
    )?;
    create_test_file(
        root,
        "app/routes/files.ts",
        r#"export const labels = {
  count: t({"code":"files.count","msgs":{"one":"{n} file","other":"{n} files"}}),
  help: t({"code":"files.help","msg":["Drop files here.","Or click to browse."]}),
};
"#,
    )?;
    create_test_file(
        root,
        "app/node_modules/lib/index.ts",
        r#"t({"code":"vendor.ignored","msg":"Never extracted"})"#,
    )?;
    create_test_file(root, "app/styles.css", r#"t({"code":"css.ignored","msg":"x"})"#)?;
    Ok(())
}
