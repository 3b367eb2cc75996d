//! Process-wide caches shared by every request.

use crate::catalog::{CatalogCache, LocalizedCatalog};
use crate::data::{DataSource, FsDataSource};
use crate::error::Result;
use crate::i18n::{Language, TranslationStore, Translator};
use std::path::PathBuf;
use std::sync::Arc;

/// Owns the translation store and the catalog cache. Built once at startup
/// and handed to the router; nothing is invalidated while it lives.
pub struct AppContext {
    translations: Arc<TranslationStore>,
    catalog: CatalogCache,
}

impl AppContext {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let translations = Arc::new(TranslationStore::new(Arc::clone(&source)));
        let catalog = CatalogCache::new(source, Arc::clone(&translations));
        Self {
            translations,
            catalog,
        }
    }

    /// Serve the JSON files under `root`.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsDataSource::new(root)))
    }

    pub async fn localized(&self, language: Language) -> Result<LocalizedCatalog> {
        self.catalog.localized(language).await
    }

    /// Never fails; see [`TranslationStore::load`].
    pub async fn translator(&self, language: Language) -> Translator {
        self.translations.translator(language).await
    }

    /// Warm every cache. Translation failures are logged and tolerated; a
    /// catalog failure is returned.
    pub async fn preload(&self) -> Result<()> {
        self.translations.preload().await;
        self.catalog.preload().await
    }
}
