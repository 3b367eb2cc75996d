//! Raw access to the JSON documents behind the catalog and its translations.
//!
//! The catalog never touches the filesystem directly. It asks a [`DataSource`]
//! for the bytes of a document identified by a [`DataKey`], which keeps the
//! core testable with in-memory fixtures.

use crate::i18n::Language;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Canonical catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Exercises,
    BodyParts,
    Equipments,
    Muscles,
}

impl Collection {
    pub fn file_stem(&self) -> &'static str {
        match self {
            Collection::Exercises => "exercises",
            Collection::BodyParts => "bodyparts",
            Collection::Equipments => "equipments",
            Collection::Muscles => "muscles",
        }
    }
}

/// Per-language translation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationTable {
    Exercises,
    BodyParts,
    Equipments,
    Muscles,
    Messages,
}

impl TranslationTable {
    pub const ALL: [TranslationTable; 5] = [
        TranslationTable::Exercises,
        TranslationTable::BodyParts,
        TranslationTable::Equipments,
        TranslationTable::Muscles,
        TranslationTable::Messages,
    ];

    pub fn file_stem(&self) -> &'static str {
        match self {
            TranslationTable::Exercises => "exercises",
            TranslationTable::BodyParts => "bodyparts",
            TranslationTable::Equipments => "equipments",
            TranslationTable::Muscles => "muscles",
            TranslationTable::Messages => "messages",
        }
    }
}

/// Identifies one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKey {
    Collection(Collection),
    Translation(Language, TranslationTable),
}

impl DataKey {
    /// Location of the document relative to the data root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            DataKey::Collection(collection) => {
                PathBuf::from(format!("{}.json", collection.file_stem()))
            }
            DataKey::Translation(language, table) => PathBuf::from("translations")
                .join(language.code())
                .join(format!("{}.json", table.file_stem())),
        }
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to read {key}: {source}")]
    Io {
        key: DataKey,
        #[source]
        source: std::io::Error,
    },

    #[error("no document registered for {key}")]
    Missing { key: DataKey },
}

/// Supplier of raw JSON documents.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self, key: DataKey) -> Result<Vec<u8>, DataSourceError>;
}

/// Reads documents from a directory laid out as
/// `<root>/<collection>.json` and `<root>/translations/<tag>/<table>.json`.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    root: PathBuf,
}

impl FsDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for FsDataSource {
    async fn load(&self, key: DataKey) -> Result<Vec<u8>, DataSourceError> {
        let path = self.root.join(key.relative_path());
        tokio::fs::read(&path)
            .await
            .map_err(|source| DataSourceError::Io { key, source })
    }
}

/// Serves documents from memory. Used by tests and embedders that ship the
/// dataset inside the binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    documents: HashMap<DataKey, Vec<u8>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, key: DataKey, body: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(key, body.into());
        self
    }

    pub fn with_collection(self, collection: Collection, json: &serde_json::Value) -> Self {
        self.with_document(DataKey::Collection(collection), json.to_string())
    }

    pub fn with_translation(
        self,
        language: Language,
        table: TranslationTable,
        json: &serde_json::Value,
    ) -> Self {
        self.with_document(DataKey::Translation(language, table), json.to_string())
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn load(&self, key: DataKey) -> Result<Vec<u8>, DataSourceError> {
        self.documents
            .get(&key)
            .cloned()
            .ok_or(DataSourceError::Missing { key })
    }
}
