/*!
 * End-to-end tests for the extract workflow
 */

use anyhow::Result;
use std::fs;

use i18n_harvest::catalog::{self, CatalogTranslation};
use i18n_harvest::{AppError, Controller};

use crate::common;

#[test]
fn test_runExtract_sampleProject_shouldWriteSortedCatalog() -> Result<()> {
    common::init_test_logging();
    let dir = common::create_temp_dir()?;
    common::create_sample_project(dir.path())?;
    let config = common::test_config(dir.path());

    let summary = Controller::with_config(config.clone())?.run_extract()?;

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.declarations, 3);
    assert_eq!(summary.keys, 3);
    assert_eq!(summary.conflicts, 0);

    let entries = catalog::read_catalog(&config.extraction.output_file)?;
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["files.count", "files.help", "home.title"]);

    let home = &entries[2];
    assert_eq!(home.description, "Page title File: routes/home.tsx:4");
    assert_eq!(home.translation, CatalogTranslation::Text("Welcome {name}".to_string()));

    assert_eq!(
        entries[1].translation,
        CatalogTranslation::Text("Drop files here.\nOr click to browse.".to_string())
    );
    assert!(matches!(entries[0].translation, CatalogTranslation::Plural(_)));
    Ok(())
}

#[test]
fn test_runExtract_absoluteSourceDir_shouldLabelFilesRelativeToIt() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_sample_project(dir.path())?;
    let config = common::test_config(dir.path());
    assert!(config.extraction.source_dir.is_absolute());

    Controller::with_config(config.clone())?.run_extract()?;

    let written = fs::read_to_string(&config.extraction.output_file)?;
    assert!(written.contains("\"File: routes/home.tsx:4\""));
    assert!(written.contains("\"File: routes/files.ts:2\""));
    assert!(!written.contains(&*dir.path().to_string_lossy()));
    Ok(())
}

#[test]
fn test_runExtract_conflictingDeclarations_shouldWarnAndKeepFirst() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "app/a.ts", r#"x = t({"code":"save","msg":"Save"})"#)?;
    common::create_test_file(
        dir.path(),
        "app/b.ts",
        r#"y = t({"code":"save","desc":"Toolbar","msg":"Store"})"#,
    )?;
    let config = common::test_config(dir.path());

    let summary = Controller::with_config(config.clone())?.run_extract()?;
    assert_eq!(summary.conflicts, 1);

    let entries = catalog::read_catalog(&config.extraction.output_file)?;
    assert_eq!(entries.len(), 1);
    // Promoted for its description even though its message differs
    assert_eq!(entries[0].translation, CatalogTranslation::Text("Store".to_string()));
    Ok(())
}

#[test]
fn test_runExtract_malformedDeclaration_shouldFailWithoutWriting() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "app/ok.ts", r#"t({"code":"ok","msg":"Fine"})"#)?;
    common::create_test_file(dir.path(), "app/z.ts", "\nconst x = t({code: \"bad\"});")?;
    let config = common::test_config(dir.path());

    let result = Controller::with_config(config.clone())?.run_extract();

    match result {
        Err(AppError::Scan(err)) => assert!(err.to_string().contains("at z.ts:2")),
        other => panic!("expected scan error, got {:?}", other),
    }
    assert!(!config.extraction.output_file.exists());
    Ok(())
}

#[test]
fn test_runExtract_declarationWithoutCode_shouldFailValidation() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "app/a.ts", r#"t({"msg":"Orphan"})"#)?;
    let config = common::test_config(dir.path());

    let result = Controller::with_config(config)?.run_extract();

    assert!(matches!(result, Err(AppError::Validation(_))));
    Ok(())
}

#[test]
fn test_runExtract_rerun_shouldProduceIdenticalCatalog() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_sample_project(dir.path())?;
    let config = common::test_config(dir.path());
    let controller = Controller::with_config(config.clone())?;

    controller.run_extract()?;
    let first = fs::read_to_string(&config.extraction.output_file)?;
    controller.run_extract()?;
    let second = fs::read_to_string(&config.extraction.output_file)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_runExtract_missingSourceDir_shouldReportFileError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path());

    let result = Controller::with_config(config)?.run_extract();

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}
