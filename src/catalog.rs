/*!
 * Translation catalog files.
 *
 * A catalog is a JSON array of `{id, description, translation}` objects
 * sorted by id. The extractor writes the source-language catalog from the
 * canonical entries; the translator reads it, sends every message through
 * the batch translator and writes one catalog per target language with the
 * same ids and descriptions.
 *
 * Messages leave this module neutralized (`{0}`, `{1}`, ...) and come back
 * with their original placeholders restored.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::PersistenceError;
use crate::extraction::{Entry, Resolution, Translation};
use crate::file_utils::FileManager;
use crate::translation::placeholders;

/// Translation payload of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogTranslation {
    /// Single message
    Text(String),
    /// Plural form name to message
    Plural(BTreeMap<String, String>),
}

impl Default for CatalogTranslation {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// One record of a catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Translation key
    pub id: String,
    /// Translator context followed by the declaring `File: path:line`
    pub description: String,
    /// Message or plural messages
    #[serde(default)]
    pub translation: CatalogTranslation,
}

impl CatalogEntry {
    /// Catalog record for a canonical entry
    pub fn from_entry(entry: &Entry) -> Self {
        let mut description = entry.description.clone();
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str("File: ");
        description.push_str(&entry.location);

        let translation = match entry.translation() {
            Translation::Singular(message) => CatalogTranslation::Text(message.to_string()),
            Translation::Plural(messages) => CatalogTranslation::Plural(messages.clone()),
        };

        Self {
            id: entry.code.clone(),
            description,
            translation,
        }
    }

    /// Messages of this entry in catalog order (plural forms sorted by name)
    fn messages(&self) -> Vec<&str> {
        match &self.translation {
            CatalogTranslation::Text(text) => vec![text.as_str()],
            CatalogTranslation::Plural(forms) => forms.values().map(String::as_str).collect(),
        }
    }
}

/// Source-language catalog for the canonical entries, sorted by id
pub fn build_catalog(resolution: &Resolution) -> Vec<CatalogEntry> {
    // BTreeMap iteration is already ordered by code
    resolution
        .canonical
        .values()
        .map(CatalogEntry::from_entry)
        .collect()
}

/// Read a catalog file
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>, PersistenceError> {
    let data = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_slice(&data).map_err(|source| PersistenceError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a catalog file atomically, pretty-printed and sorted by id
pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<(), PersistenceError> {
    let mut sorted: Vec<&CatalogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let json = serde_json::to_vec_pretty(&sorted).map_err(|source| PersistenceError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    FileManager::write_atomically(path, &json)
}

/// First `size` entries, used for trial runs
pub fn sample(entries: &[CatalogEntry], size: usize) -> &[CatalogEntry] {
    &entries[..entries.len().min(size)]
}

/// Every message of the catalog, neutralized, in the order `apply_translations` expects
pub fn collect_texts(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.messages())
        .map(placeholders::neutralize)
        .collect()
}

/// Build the target-language catalog from the source catalog and the
/// translations of `collect_texts(entries)`, restoring placeholders.
///
/// Translations that lost a positional token are kept as returned and
/// reported with a warning.
pub fn apply_translations(entries: &[CatalogEntry], translations: &[String]) -> Vec<CatalogEntry> {
    let mut results = translations.iter();

    let mut restore = |id: &str, source: &str| -> String {
        let Some(translated) = results.next() else {
            warn!("No translation returned for '{}', keeping source text", id);
            return source.to_string();
        };

        let originals = placeholders::extract(source);
        let missing = placeholders::unresolved_slots(translated, originals.len());
        if !missing.is_empty() {
            let dropped: Vec<&str> = missing.iter().map(|&slot| originals[slot].as_str()).collect();
            warn!(
                "Translation of '{}' lost placeholders {:?}: {:?}",
                id, dropped, translated
            );
        }

        placeholders::restore(translated, &originals)
    };

    entries
        .iter()
        .map(|entry| {
            let translation = match &entry.translation {
                CatalogTranslation::Text(text) => CatalogTranslation::Text(restore(&entry.id, text)),
                CatalogTranslation::Plural(forms) => CatalogTranslation::Plural(
                    forms
                        .iter()
                        .map(|(form, text)| (form.clone(), restore(&entry.id, text)))
                        .collect(),
                ),
            };

            CatalogEntry {
                id: entry.id.clone(),
                description: entry.description.clone(),
                translation,
            }
        })
        .collect()
}
