//! Per-language translation table cache.

use crate::data::{DataKey, DataSource, DataSourceError, TranslationTable};
use crate::i18n::{ExerciseText, Language, TranslationData, TranslationValidator, Translator};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
enum TranslationLoadError {
    #[error(transparent)]
    Source(#[from] DataSourceError),

    #[error("invalid JSON in {key}: {source}")]
    Parse {
        key: DataKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and memoizes the translation tables of every registered language.
///
/// Loading is fail-open: when any table of a language cannot be read or
/// parsed, the failure is logged and an empty table set is returned, so every
/// lookup falls back to canonical text. Failed loads are not memoized.
pub struct TranslationStore {
    source: Arc<dyn DataSource>,
    cells: HashMap<Language, OnceCell<Arc<TranslationData>>>,
    canonical: Arc<TranslationData>,
}

impl TranslationStore {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let cells = Language::all()
            .into_iter()
            .filter(|language| !language.is_canonical())
            .map(|language| (language, OnceCell::new()))
            .collect();

        Self {
            source,
            cells,
            canonical: Arc::new(TranslationData::canonical()),
        }
    }

    /// Translation tables for `language`. Never fails.
    pub async fn load(&self, language: Language) -> Arc<TranslationData> {
        let Some(cell) = self.cells.get(&language) else {
            return Arc::clone(&self.canonical);
        };

        let loaded = cell
            .get_or_try_init(|| async {
                let data = self.read_tables(language).await?;
                Ok::<_, TranslationLoadError>(Arc::new(data))
            })
            .await;

        match loaded {
            Ok(data) => Arc::clone(data),
            Err(e) => {
                error!("Failed to load translations for {}: {}", language, e);
                Arc::new(TranslationData::unavailable())
            }
        }
    }

    /// A translator bound to `language`.
    pub async fn translator(&self, language: Language) -> Translator {
        Translator::new(language, self.load(language).await)
    }

    /// Load every registered language up front.
    pub async fn preload(&self) {
        let languages = Language::all();
        futures::future::join_all(languages.iter().map(|language| self.load(*language))).await;

        let codes: Vec<&str> = languages.iter().map(|language| language.code()).collect();
        info!("Translations preloaded for: {}", codes.join(", "));
    }

    async fn read_tables(&self, language: Language) -> Result<TranslationData, TranslationLoadError> {
        debug!("Reading translation tables for {}", language);

        let (exercises, body_parts, equipments, muscles, messages) = futures::try_join!(
            self.read_table::<HashMap<String, ExerciseText>>(language, TranslationTable::Exercises),
            self.read_table::<BTreeMap<String, String>>(language, TranslationTable::BodyParts),
            self.read_table::<BTreeMap<String, String>>(language, TranslationTable::Equipments),
            self.read_table::<BTreeMap<String, String>>(language, TranslationTable::Muscles),
            self.read_table::<HashMap<String, String>>(language, TranslationTable::Messages),
        )?;

        let data = TranslationData::loaded(exercises, body_parts, equipments, muscles, messages);

        let report = TranslationValidator::validate(&data);
        if report.has_warnings() {
            warn!(
                "Translation validation warnings for {}: {:?}",
                language, report.warnings
            );
        }
        if report.has_errors() {
            warn!(
                "Translation validation errors for {}: {:?}",
                language, report.errors
            );
        }

        Ok(data)
    }

    async fn read_table<T: DeserializeOwned>(
        &self,
        language: Language,
        table: TranslationTable,
    ) -> Result<T, TranslationLoadError> {
        let key = DataKey::Translation(language, table);
        let bytes = self.source.load(key).await?;
        serde_json::from_slice(&bytes).map_err(|source| TranslationLoadError::Parse { key, source })
    }
}
