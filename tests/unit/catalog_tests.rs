/*!
 * Tests for catalog files
 */

use std::collections::BTreeMap;
use std::fs;

use i18n_harvest::catalog::{self, CatalogEntry, CatalogTranslation};
use i18n_harvest::{PersistenceError, extract_from_content, resolve};

use crate::common;

fn text_entry(id: &str, text: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        description: format!("File: app/{}.ts:1", id),
        translation: CatalogTranslation::Text(text.to_string()),
    }
}

#[test]
fn test_writeCatalog_shouldSortByIdAndPrettyPrint() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("locales/app/en.json");

    catalog::write_catalog(&path, &[text_entry("b.second", "B"), text_entry("a.first", "A")])?;

    let written = fs::read_to_string(&path)?;
    assert!(written.starts_with("[\n  {\n    \"id\": \"a.first\""));

    let entries = catalog::read_catalog(&path)?;
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a.first", "b.second"]);
    Ok(())
}

#[test]
fn test_readCatalog_withPluralAndMissingTranslation_shouldParse() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "en.json",
        r#"[
  {"id": "files.count", "description": "File: a.ts:2", "translation": {"one": "{n} file", "other": "{n} files"}},
  {"id": "legacy", "description": "File: b.ts:9"}
]"#,
    )?;

    let entries = catalog::read_catalog(&path)?;

    let expected = BTreeMap::from([
        ("one".to_string(), "{n} file".to_string()),
        ("other".to_string(), "{n} files".to_string()),
    ]);
    assert_eq!(entries[0].translation, CatalogTranslation::Plural(expected));
    assert_eq!(entries[1].translation, CatalogTranslation::Text(String::new()));
    Ok(())
}

#[test]
fn test_readCatalog_withMissingFile_shouldReportPath() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("missing.json");

    let err = catalog::read_catalog(&path).unwrap_err();
    assert!(matches!(err, PersistenceError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
    Ok(())
}

#[test]
fn test_buildCatalog_fromScannedEntries_shouldCarryProvenance() {
    let mut entries = extract_from_content(
        "app/a.ts",
        br#"x = t({"code":"z.last","msg":"Last"}); y = t({"code":"a.first","desc":"Shown first","msg":"First"})"#,
    )
    .unwrap();
    entries.extend(
        extract_from_content("app/b.ts", b"\n\nt({\"code\":\"m.plural\",\"msgs\":{\"one\":\"One\",\"other\":\"Many\"}})").unwrap(),
    );

    let built = catalog::build_catalog(&resolve(entries));

    let ids: Vec<_> = built.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a.first", "m.plural", "z.last"]);
    assert_eq!(built[0].description, "Shown first File: app/a.ts:1");
    assert_eq!(built[1].description, "File: app/b.ts:3");
    assert!(matches!(built[1].translation, CatalogTranslation::Plural(_)));
}

#[test]
fn test_collectThenApply_withIdentityTranslation_shouldReproduceCatalog() {
    let entries = vec![
        text_entry("greet", "Hello {name}, you have {count} messages"),
        CatalogEntry {
            id: "files".to_string(),
            description: "File: app/f.ts:1".to_string(),
            translation: CatalogTranslation::Plural(BTreeMap::from([
                ("one".to_string(), "{n} file".to_string()),
                ("other".to_string(), "{n} files".to_string()),
            ])),
        },
    ];

    let texts = catalog::collect_texts(&entries);
    assert_eq!(texts[0], "Hello {0}, you have {1} messages");

    assert_eq!(catalog::apply_translations(&entries, &texts), entries);
}
