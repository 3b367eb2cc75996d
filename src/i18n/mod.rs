//! Internationalization (i18n) module for localized catalog responses.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their aliases
//! - `language`: Type-safe `Language` with normalization of caller-supplied tags
//! - `tables`: Forward and inverse lookup tables for one language
//! - `store`: Fail-open, memoized loading of the tables per language
//! - `translator`: Forward, reverse and bidirectional translation plus messages
//! - `validator`: Sanity checks run on freshly loaded tables
//! - `messages`: Message keys and their canonical English templates
//!
//! # Example
//!
//! ```rust,ignore
//! use exercisedb_api::i18n::{Language, TranslationStore};
//! use exercisedb_api::model::TaxonomyKind;
//!
//! let store = TranslationStore::new(source);
//! let translator = store.translator(Language::normalize(Some("zh"))).await;
//! assert_eq!(translator.translate("chest", TaxonomyKind::BodyPart), "胸部");
//! assert_eq!(translator.reverse_translate("胸部", TaxonomyKind::BodyPart), "chest");
//! ```

mod language;
pub mod messages;
mod registry;
mod store;
mod tables;
mod translator;
mod validator;

pub use language::Language;
pub use messages::CanonicalMessage;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use store::TranslationStore;
pub use tables::{ExerciseText, LookupTable, TranslationData, TranslationOrigin};
pub use translator::{ResolvedTerm, Translator};
pub use validator::{TranslationValidator, ValidationReport};
