//! The canonical catalog and its per-language translated projections.
//!
//! Both are loaded on first use and kept for the lifetime of the cache. Every
//! query runs against a translated projection; the canonical copy is only the
//! input they are built from.

use crate::data::{Collection, DataKey, DataSource};
use crate::error::{Error, Result};
use crate::i18n::{Language, TranslationOrigin, TranslationStore, Translator};
use crate::model::{Exercise, NamedRecord, TaxonomyKind};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
    pub body_parts: Vec<NamedRecord>,
    pub equipments: Vec<NamedRecord>,
    pub muscles: Vec<NamedRecord>,
}

impl Catalog {
    pub fn taxonomy(&self, kind: TaxonomyKind) -> &[NamedRecord] {
        match kind {
            TaxonomyKind::BodyPart => &self.body_parts,
            TaxonomyKind::Equipment => &self.equipments,
            TaxonomyKind::Muscle => &self.muscles,
        }
    }

    /// A copy with every record translated. Record order is preserved.
    pub fn translated(&self, translator: &Translator) -> Catalog {
        let records = |kind: TaxonomyKind| -> Vec<NamedRecord> {
            self.taxonomy(kind)
                .iter()
                .map(|record| translator.translate_record(record, kind))
                .collect()
        };

        Catalog {
            exercises: self
                .exercises
                .iter()
                .map(|exercise| translator.translate_exercise(exercise))
                .collect(),
            body_parts: records(TaxonomyKind::BodyPart),
            equipments: records(TaxonomyKind::Equipment),
            muscles: records(TaxonomyKind::Muscle),
        }
    }
}

/// A catalog projection together with the translator that produced it.
#[derive(Debug, Clone)]
pub struct LocalizedCatalog {
    pub catalog: Arc<Catalog>,
    pub translator: Translator,
}

pub struct CatalogCache {
    source: Arc<dyn DataSource>,
    translations: Arc<TranslationStore>,
    canonical: OnceCell<Arc<Catalog>>,
    localized: HashMap<Language, OnceCell<Arc<Catalog>>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn DataSource>, translations: Arc<TranslationStore>) -> Self {
        let localized = Language::all()
            .into_iter()
            .filter(|language| !language.is_canonical())
            .map(|language| (language, OnceCell::new()))
            .collect();

        Self {
            source,
            translations,
            canonical: OnceCell::new(),
            localized,
        }
    }

    /// The canonical catalog. Load failures are returned and not cached.
    pub async fn canonical(&self) -> Result<Arc<Catalog>> {
        let catalog = self
            .canonical
            .get_or_try_init(|| async {
                let catalog = self.read_catalog().await.inspect_err(|e| {
                    error!("Failed to load catalog: {}", e);
                })?;
                info!(
                    "Catalog loaded: {} exercises, {} body parts, {} equipments, {} muscles",
                    catalog.exercises.len(),
                    catalog.body_parts.len(),
                    catalog.equipments.len(),
                    catalog.muscles.len()
                );
                Ok::<_, Error>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// The catalog translated into `language`.
    ///
    /// A projection is cached only once its language's tables loaded
    /// successfully; while they are unavailable the canonical catalog is served.
    pub async fn localized(&self, language: Language) -> Result<LocalizedCatalog> {
        let canonical = self.canonical().await?;
        let translator = self.translations.translator(language).await;

        let catalog = match (self.localized.get(&language), translator.origin()) {
            (Some(cell), TranslationOrigin::Loaded) => {
                let projection = cell
                    .get_or_init(|| async { Arc::new(canonical.translated(&translator)) })
                    .await;
                Arc::clone(projection)
            }
            _ => canonical,
        };

        Ok(LocalizedCatalog {
            catalog,
            translator,
        })
    }

    /// Build every language's projection up front.
    pub async fn preload(&self) -> Result<()> {
        for language in Language::all() {
            self.localized(language).await?;
        }
        Ok(())
    }

    async fn read_catalog(&self) -> Result<Catalog> {
        let (exercises, body_parts, equipments, muscles) = futures::try_join!(
            self.read_collection::<Exercise>(Collection::Exercises),
            self.read_collection::<NamedRecord>(Collection::BodyParts),
            self.read_collection::<NamedRecord>(Collection::Equipments),
            self.read_collection::<NamedRecord>(Collection::Muscles),
        )?;

        Ok(Catalog {
            exercises,
            body_parts,
            equipments,
            muscles,
        })
    }

    async fn read_collection<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let unavailable = |reason: String| Error::DataSourceUnavailable { collection, reason };

        let bytes = self
            .source
            .load(DataKey::Collection(collection))
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| unavailable(e.to_string()))
    }
}
