use crate::data::Collection;
use thiserror::Error;

/// Outcomes that cross the catalog boundary. Everything else (unknown
/// language, unknown sort field, missing translation) is absorbed inside the
/// core by falling back to canonical values or defaults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("exercise {exercise_id} not found")]
    NotFound { exercise_id: String },

    #[error("{} data unavailable: {reason}", .collection.file_stem())]
    DataSourceUnavailable {
        collection: Collection,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
