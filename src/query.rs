//! Search, filter, sort and pagination over a localized catalog.
//!
//! The engine holds no state of its own; it borrows a [`LocalizedCatalog`] for
//! the duration of one request. Identical inputs always yield identical pages.

use crate::catalog::{Catalog, LocalizedCatalog};
use crate::error::{Error, Result};
use crate::i18n::Translator;
use crate::model::{Exercise, NamedRecord, TaxonomyKind};
use crate::pagination::{Page, PageRequest};
use crate::search::FuzzyQuery;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    ExerciseId,
    TargetMuscles,
    BodyParts,
    Equipments,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(SortField::Name),
            "exerciseId" => Some(SortField::ExerciseId),
            "targetMuscles" => Some(SortField::TargetMuscles),
            "bodyParts" => Some(SortField::BodyParts),
            "equipments" => Some(SortField::Equipments),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::ExerciseId => "exerciseId",
            SortField::TargetMuscles => "targetMuscles",
            SortField::BodyParts => "bodyParts",
            SortField::Equipments => "equipments",
        }
    }

    /// Strings compare as-is; list fields compare on their first element.
    fn key<'e>(&self, exercise: &'e Exercise) -> Option<&'e str> {
        match self {
            SortField::Name => Some(exercise.name.as_str()),
            SortField::ExerciseId => Some(exercise.exercise_id.as_str()),
            SortField::TargetMuscles => exercise.target_muscles.first().map(String::as_str),
            SortField::BodyParts => exercise.body_parts.first().map(String::as_str),
            SortField::Equipments => exercise.equipments.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Default ordering of the exercise listing.
    pub const LISTING: SortSpec = SortSpec {
        field: SortField::TargetMuscles,
        order: SortOrder::Desc,
    };

    /// Default ordering of the filter endpoint.
    pub const FILTER: SortSpec = SortSpec {
        field: SortField::Name,
        order: SortOrder::Desc,
    };

    /// Parse caller-supplied field and direction; anything missing or
    /// unrecognized falls back to the matching part of `default`.
    pub fn resolve(field: Option<&str>, order: Option<&str>, default: SortSpec) -> SortSpec {
        SortSpec {
            field: field.and_then(SortField::parse).unwrap_or(default.field),
            order: order.and_then(SortOrder::parse).unwrap_or(default.order),
        }
    }

    fn compare(&self, a: &Exercise, b: &Exercise) -> Ordering {
        let ordering = match (self.field.key(a), self.field.key(b)) {
            (Some(a), Some(b)) => compare_keys(a, b),
            (a, b) => a.cmp(&b),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Stable in both directions: equal keys keep their relative order.
    fn apply(&self, exercises: &mut [&Exercise]) {
        exercises.sort_by(|a, b| self.compare(a, b));
    }
}

/// Arguments of the combined filter operation.
///
/// Within one dimension any listed name matches; every non-empty dimension
/// must match, and so must `search` when present.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search: Option<String>,
    pub target_muscles: Vec<String>,
    pub equipments: Vec<String>,
    pub body_parts: Vec<String>,
    pub sort: SortSpec,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: None,
            target_muscles: Vec::new(),
            equipments: Vec::new(),
            body_parts: Vec::new(),
            sort: SortSpec::FILTER,
        }
    }
}

pub struct QueryEngine<'a> {
    catalog: &'a Catalog,
    translator: &'a Translator,
}

impl<'a> QueryEngine<'a> {
    pub fn new(localized: &'a LocalizedCatalog) -> Self {
        Self {
            catalog: &localized.catalog,
            translator: &localized.translator,
        }
    }

    /// Fuzzy search ranked by match quality. A blank query matches nothing.
    pub fn search(&self, query: &str, threshold: Option<f64>, page: PageRequest) -> Page<Exercise> {
        let matches = match FuzzyQuery::new(query, threshold) {
            Some(fuzzy) => fuzzy.rank(&self.catalog.exercises),
            None => Vec::new(),
        };
        paginate(&matches, page)
    }

    /// Every exercise, or the fuzzy matches of `search`, in `sort` order.
    /// Exercises with equal sort keys stay in relevance order.
    pub fn get_all_exercises(
        &self,
        search: Option<&str>,
        sort: SortSpec,
        page: PageRequest,
    ) -> Page<Exercise> {
        let mut matches = match search.and_then(|s| FuzzyQuery::new(s, None)) {
            Some(fuzzy) => fuzzy.rank(&self.catalog.exercises),
            None => self.catalog.exercises.iter().collect(),
        };
        sort.apply(&mut matches);
        paginate(&matches, page)
    }

    pub fn filter(&self, spec: &FilterSpec, page: PageRequest) -> Page<Exercise> {
        let target_muscles = self.resolve_all(&spec.target_muscles, TaxonomyKind::Muscle);
        let equipments = self.resolve_all(&spec.equipments, TaxonomyKind::Equipment);
        let body_parts = self.resolve_all(&spec.body_parts, TaxonomyKind::BodyPart);

        let candidates = match spec.search.as_deref().and_then(|s| FuzzyQuery::new(s, None)) {
            Some(fuzzy) => fuzzy.rank(&self.catalog.exercises),
            None => self.catalog.exercises.iter().collect(),
        };

        let mut matches: Vec<&Exercise> = candidates
            .into_iter()
            .filter(|exercise| {
                matches_any(&exercise.target_muscles, &target_muscles)
                    && matches_any(&exercise.equipments, &equipments)
                    && matches_any(&exercise.body_parts, &body_parts)
            })
            .collect();
        spec.sort.apply(&mut matches);
        paginate(&matches, page)
    }

    /// Exact, case-sensitive id lookup.
    pub fn get_exercise_by_id(&self, exercise_id: &str) -> Result<Exercise> {
        self.catalog
            .exercises
            .iter()
            .find(|exercise| exercise.exercise_id == exercise_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                exercise_id: exercise_id.to_string(),
            })
    }

    pub fn get_exercises_by_body_part(&self, body_part: &str, page: PageRequest) -> Page<Exercise> {
        let term = self.resolve(body_part, TaxonomyKind::BodyPart);
        self.select(page, |exercise| contains(&exercise.body_parts, &term))
    }

    pub fn get_exercises_by_equipment(&self, equipment: &str, page: PageRequest) -> Page<Exercise> {
        let term = self.resolve(equipment, TaxonomyKind::Equipment);
        self.select(page, |exercise| contains(&exercise.equipments, &term))
    }

    /// With `include_secondary`, secondary muscles count as well as target
    /// muscles.
    pub fn get_exercises_by_muscle(
        &self,
        muscle: &str,
        include_secondary: bool,
        page: PageRequest,
    ) -> Page<Exercise> {
        let term = self.resolve(muscle, TaxonomyKind::Muscle);
        self.select(page, |exercise| {
            contains(&exercise.target_muscles, &term)
                || (include_secondary && contains(&exercise.secondary_muscles, &term))
        })
    }

    /// Every record of a taxonomy, translated, in catalog order.
    pub fn taxonomy(&self, kind: TaxonomyKind) -> Vec<NamedRecord> {
        self.catalog.taxonomy(kind).to_vec()
    }

    fn select(&self, page: PageRequest, predicate: impl Fn(&Exercise) -> bool) -> Page<Exercise> {
        let matches: Vec<&Exercise> = self
            .catalog
            .exercises
            .iter()
            .filter(|exercise| predicate(exercise))
            .collect();
        paginate(&matches, page)
    }

    /// Lower-cased localized form of a caller-supplied name, which may be
    /// given in canonical or localized spelling.
    fn resolve(&self, name: &str, kind: TaxonomyKind) -> String {
        self.translator
            .bidirectional_translate(name.trim(), kind)
            .localized
            .to_lowercase()
    }

    fn resolve_all(&self, names: &[String], kind: TaxonomyKind) -> Vec<String> {
        names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.resolve(name, kind))
            .collect()
    }
}

fn contains(values: &[String], lowered: &str) -> bool {
    values.iter().any(|value| value.to_lowercase() == lowered)
}

/// Case-insensitive, with the raw text breaking ties so the order is total.
fn compare_keys(a: &str, b: &str) -> Ordering {
    let folded = |key: &str| key.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}

/// An empty set of wanted names places no constraint.
fn matches_any(values: &[String], wanted: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|name| contains(values, name))
}

fn paginate(matches: &[&Exercise], page: PageRequest) -> Page<Exercise> {
    page.apply(matches).map(Exercise::clone)
}
