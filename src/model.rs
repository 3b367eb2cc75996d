use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single exercise record as stored in `exercises.json`.
///
/// Attributes the catalog does not model (e.g. `gifUrl`) are kept in `extra`
/// and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub target_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub body_parts: Vec<String>,
    #[serde(default)]
    pub equipments: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single-name taxonomy record (body part, equipment or muscle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub name: String,
}

impl NamedRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The taxonomies that carry their own translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    BodyPart,
    Equipment,
    Muscle,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 3] = [
        TaxonomyKind::BodyPart,
        TaxonomyKind::Equipment,
        TaxonomyKind::Muscle,
    ];

    /// Collection / translation table file stem for this taxonomy.
    pub fn table_name(&self) -> &'static str {
        match self {
            TaxonomyKind::BodyPart => "bodyparts",
            TaxonomyKind::Equipment => "equipments",
            TaxonomyKind::Muscle => "muscles",
        }
    }
}
