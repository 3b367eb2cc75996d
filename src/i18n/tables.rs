//! In-memory translation tables for one language.

use crate::model::TaxonomyKind;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Canonical-name ↔ localized-name table for one taxonomy.
///
/// Keys are matched case-insensitively in both directions. The inverse map is
/// built once when the table is created.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    /// lower-cased canonical name -> localized name
    forward: HashMap<String, String>,
    /// lower-cased localized name -> canonical name as written in the table
    inverse: HashMap<String, String>,
}

impl LookupTable {
    /// Build a table from `canonical -> localized` entries.
    ///
    /// Entries are visited in key order; when two canonical names share a
    /// localized value the first one owns the inverse entry.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut inverse = HashMap::with_capacity(entries.len());

        for (canonical, localized) in entries {
            if localized.is_empty() {
                continue;
            }
            inverse
                .entry(localized.to_lowercase())
                .or_insert_with(|| canonical.clone());
            forward.entry(canonical.to_lowercase()).or_insert(localized);
        }

        Self { forward, inverse }
    }

    /// Localized form of a canonical name.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.forward
            .get(&canonical.to_lowercase())
            .map(String::as_str)
    }

    /// Canonical form of a localized name.
    pub fn canonical_for(&self, localized: &str) -> Option<&str> {
        self.inverse
            .get(&localized.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate `(lower-cased canonical, localized)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Localized text of one exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExerciseText {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
}

/// Where a [`TranslationData`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOrigin {
    /// The canonical language: intentionally empty, nothing is substituted.
    Canonical,
    /// Tables read successfully from the data source.
    Loaded,
    /// Reading the tables failed; empty so every lookup falls back.
    Unavailable,
}

/// All lookup tables for one language.
#[derive(Debug, Clone)]
pub struct TranslationData {
    origin: TranslationOrigin,
    exercises: HashMap<String, ExerciseText>,
    body_parts: LookupTable,
    equipments: LookupTable,
    muscles: LookupTable,
    messages: HashMap<String, String>,
}

impl TranslationData {
    pub fn canonical() -> Self {
        Self::empty(TranslationOrigin::Canonical)
    }

    pub fn unavailable() -> Self {
        Self::empty(TranslationOrigin::Unavailable)
    }

    fn empty(origin: TranslationOrigin) -> Self {
        Self {
            origin,
            exercises: HashMap::new(),
            body_parts: LookupTable::default(),
            equipments: LookupTable::default(),
            muscles: LookupTable::default(),
            messages: HashMap::new(),
        }
    }

    pub fn loaded(
        exercises: HashMap<String, ExerciseText>,
        body_parts: BTreeMap<String, String>,
        equipments: BTreeMap<String, String>,
        muscles: BTreeMap<String, String>,
        messages: HashMap<String, String>,
    ) -> Self {
        Self {
            origin: TranslationOrigin::Loaded,
            exercises,
            body_parts: LookupTable::from_entries(body_parts),
            equipments: LookupTable::from_entries(equipments),
            muscles: LookupTable::from_entries(muscles),
            messages,
        }
    }

    pub fn origin(&self) -> TranslationOrigin {
        self.origin
    }

    pub fn table(&self, kind: TaxonomyKind) -> &LookupTable {
        match kind {
            TaxonomyKind::BodyPart => &self.body_parts,
            TaxonomyKind::Equipment => &self.equipments,
            TaxonomyKind::Muscle => &self.muscles,
        }
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseText> {
        self.exercises.get(exercise_id)
    }

    pub fn exercises(&self) -> impl Iterator<Item = (&str, &ExerciseText)> {
        self.exercises.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
