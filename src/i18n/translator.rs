//! Forward, reverse and message translation for one language.

use crate::i18n::{CanonicalMessage, Language, TranslationData, TranslationOrigin};
use crate::model::{Exercise, NamedRecord, TaxonomyKind};
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

/// Both forms of a taxonomy name after [`Translator::bidirectional_translate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTerm {
    pub canonical: String,
    pub localized: String,
}

/// Translation helpers bound to one language.
///
/// Lookups never fail: a missing entry, or tables that could not be loaded,
/// leave the input unchanged. This is the only place that fallback is applied.
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    data: Arc<TranslationData>,
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl Translator {
    pub fn new(language: Language, data: Arc<TranslationData>) -> Self {
        Self { language, data }
    }

    /// The identity translator for the canonical language.
    pub fn canonical() -> Self {
        Self::new(Language::canonical(), Arc::new(TranslationData::canonical()))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn origin(&self) -> TranslationOrigin {
        self.data.origin()
    }

    fn lookup(&self, text: &str, kind: TaxonomyKind) -> Option<&str> {
        if self.language.is_canonical() {
            return None;
        }
        self.data.table(kind).get(text)
    }

    /// Localized form of a canonical taxonomy name, or `text` unchanged.
    pub fn translate(&self, text: &str, kind: TaxonomyKind) -> String {
        self.lookup(text, kind).unwrap_or(text).to_string()
    }

    pub fn translate_many(&self, texts: &[String], kind: TaxonomyKind) -> Vec<String> {
        texts.iter().map(|text| self.translate(text, kind)).collect()
    }

    /// Localized copy of an exercise. The id and unmodeled attributes are
    /// never touched.
    pub fn translate_exercise(&self, exercise: &Exercise) -> Exercise {
        if self.language.is_canonical() {
            return exercise.clone();
        }

        let text = self.data.exercise(&exercise.exercise_id);
        let name = text
            .and_then(|t| t.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(&exercise.name)
            .to_string();
        let instructions = text
            .and_then(|t| t.instructions.clone())
            .unwrap_or_else(|| exercise.instructions.clone());

        Exercise {
            exercise_id: exercise.exercise_id.clone(),
            name,
            target_muscles: self.translate_many(&exercise.target_muscles, TaxonomyKind::Muscle),
            secondary_muscles: self
                .translate_many(&exercise.secondary_muscles, TaxonomyKind::Muscle),
            body_parts: self.translate_many(&exercise.body_parts, TaxonomyKind::BodyPart),
            equipments: self.translate_many(&exercise.equipments, TaxonomyKind::Equipment),
            instructions,
            extra: exercise.extra.clone(),
        }
    }

    pub fn translate_record(&self, record: &NamedRecord, kind: TaxonomyKind) -> NamedRecord {
        NamedRecord::new(self.translate(&record.name, kind))
    }

    /// Canonical form of a localized taxonomy name, or `text` unchanged.
    pub fn reverse_translate(&self, text: &str, kind: TaxonomyKind) -> String {
        if self.language.is_canonical() {
            return text.to_string();
        }
        self.data
            .table(kind)
            .canonical_for(text)
            .unwrap_or(text)
            .to_string()
    }

    /// Resolve a name of unknown direction to both its forms.
    ///
    /// Forward translation is tried first. When it leaves the input unchanged,
    /// the input is treated as possibly localized: it is reverse translated and
    /// the result translated forward again.
    ///
    /// A canonical name without a translation and a localized name missing
    /// from the table both take that second path and come back unchanged; the
    /// two cases cannot be told apart here. Callers that know their input is
    /// localized should use [`Translator::reverse_translate`].
    pub fn bidirectional_translate(&self, text: &str, kind: TaxonomyKind) -> ResolvedTerm {
        let localized = self.translate(text, kind);
        if localized != text {
            return ResolvedTerm {
                canonical: text.to_string(),
                localized,
            };
        }

        let canonical = self.reverse_translate(text, kind);
        let localized = self.translate(&canonical, kind);
        ResolvedTerm {
            canonical,
            localized,
        }
    }

    /// Message template for `key` (or `key` itself) with `{name}` placeholders
    /// filled from `params`.
    pub fn get_message(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.get_message_or(key, key, params)
    }

    /// Like [`Translator::get_message`], falling back to `fallback` instead of
    /// the key when the language has no template.
    pub fn get_message_or(&self, key: &str, fallback: &str, params: &[(&str, &str)]) -> String {
        let template = self.data.message(key).unwrap_or(fallback);
        fill_placeholders(template, params)
    }

    pub fn message(&self, message: &CanonicalMessage, params: &[(&str, &str)]) -> String {
        self.get_message_or(message.key, message.template, params)
    }
}

/// Single pass: substituted values are not scanned again, and placeholders
/// without a matching parameter are kept verbatim.
fn fill_placeholders(template: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap());
    regex
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
