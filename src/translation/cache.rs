/*!
 * Translation caching functionality.
 *
 * This module provides the persistent translation cache used to avoid
 * redundant API calls across runs. Translations are held in a three-level
 * mapping (source language -> target language -> text -> translation):
 * - `TranslationCache`: in-memory store with hit/miss statistics
 * - `FileCache`: the same store backed by a JSON snapshot file that is
 *   replaced atomically on every save
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::PersistenceError;
use crate::file_utils::FileManager;

/// text -> translation
type TextMap = HashMap<String, String>;

/// source language -> target language -> text -> translation
type LanguageMap = HashMap<String, HashMap<String, TextMap>>;

/// Lookup and insert operations shared by every cache flavor
pub trait CacheStore: Send + Sync {
    /// Get a translation from the cache
    fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String>;

    /// Whether a translation exists, without counting a hit or miss
    fn contains(&self, text: &str, source_language: &str, target_language: &str) -> bool {
        self.get(text, source_language, target_language).is_some()
    }

    /// Store a translation in the cache
    fn set(&self, text: &str, source_language: &str, target_language: &str, translation: &str);

    /// Make the current contents durable
    fn save(&self) -> Result<(), PersistenceError>;
}

/// Translation cache for storing and retrieving translations
pub struct TranslationCache {
    /// Internal cache storage
    data: Arc<RwLock<LanguageMap>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,
}

impl TranslationCache {
    /// Create a new, empty translation cache
    pub fn new() -> Self {
        Self::from_map(LanguageMap::new())
    }

    fn from_map(data: LanguageMap) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String> {
        let data = self.data.read();
        let found = data
            .get(source_language)
            .and_then(|targets| targets.get(target_language))
            .and_then(|texts| texts.get(text))
            .cloned();

        match found {
            Some(translation) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Cache hit for '{}' ({} -> {})",
                    truncate_text(text, 30),
                    source_language,
                    target_language
                );
                Some(translation)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Cache miss for '{}' ({} -> {})",
                    truncate_text(text, 30),
                    source_language,
                    target_language
                );
                None
            }
        }
    }

    /// Whether a translation exists, without touching the statistics
    pub fn contains(&self, text: &str, source_language: &str, target_language: &str) -> bool {
        self.data
            .read()
            .get(source_language)
            .and_then(|targets| targets.get(target_language))
            .is_some_and(|texts| texts.contains_key(text))
    }

    /// Store a translation in the cache
    pub fn set(&self, text: &str, source_language: &str, target_language: &str, translation: &str) {
        let mut data = self.data.write();
        data.entry(source_language.to_string())
            .or_default()
            .entry(target_language.to_string())
            .or_default()
            .insert(text.to_string(), translation.to_string());
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of cached translations across all language pairs
    pub fn len(&self) -> usize {
        self.data
            .read()
            .values()
            .flat_map(|targets| targets.values())
            .map(|texts| texts.len())
            .sum()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the whole mapping, used for snapshots and comparisons
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>> {
        self.data
            .read()
            .iter()
            .map(|(source, targets)| {
                let targets = targets
                    .iter()
                    .map(|(target, texts)| {
                        let texts = texts
                            .iter()
                            .map(|(text, translation)| (text.clone(), translation.clone()))
                            .collect();
                        (target.clone(), texts)
                    })
                    .collect();
                (source.clone(), targets)
            })
            .collect()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

impl CacheStore for TranslationCache {
    fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String> {
        TranslationCache::get(self, text, source_language, target_language)
    }

    fn contains(&self, text: &str, source_language: &str, target_language: &str) -> bool {
        TranslationCache::contains(self, text, source_language, target_language)
    }

    fn set(&self, text: &str, source_language: &str, target_language: &str, translation: &str) {
        TranslationCache::set(self, text, source_language, target_language, translation)
    }

    /// Memory-only caches have nothing to flush
    fn save(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Translation cache backed by a JSON snapshot file
#[derive(Clone)]
pub struct FileCache {
    cache: TranslationCache,
    path: PathBuf,
}

impl FileCache {
    /// Load the cache from `path`.
    ///
    /// A missing or zero-byte file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();

        let data = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => LanguageMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                PersistenceError::Deserialize {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LanguageMap::new(),
            Err(e) => return Err(PersistenceError::io(&path, e)),
        };

        let cache = TranslationCache::from_map(data);
        debug!("Loaded {} cached translations from {:?}", cache.len(), path);

        Ok(Self { cache, path })
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory store behind this file
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Serialize the entire mapping and atomically replace the snapshot file
    pub fn save(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(&self.cache.snapshot()).map_err(|source| {
            PersistenceError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        FileManager::write_atomically(&self.path, &json)?;
        debug!("Saved {} cached translations to {:?}", self.cache.len(), self.path);
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String> {
        self.cache.get(text, source_language, target_language)
    }

    fn contains(&self, text: &str, source_language: &str, target_language: &str) -> bool {
        self.cache.contains(text, source_language, target_language)
    }

    fn set(&self, text: &str, source_language: &str, target_language: &str, translation: &str) {
        self.cache.set(text, source_language, target_language, translation)
    }

    fn save(&self) -> Result<(), PersistenceError> {
        FileCache::save(self)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
