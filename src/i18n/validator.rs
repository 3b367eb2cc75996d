//! Translation table validation.
//!
//! Runs once per language right after the tables are loaded. Findings are
//! logged by the store and never prevent the tables from being used.

use crate::i18n::TranslationData;
use crate::model::TaxonomyKind;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a table set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make some lookups wrong
    pub errors: Vec<String>,

    /// Problems that only degrade output quality
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Check a freshly loaded table set.
    ///
    /// Errors:
    /// - two canonical names translate to the same text, so reverse lookup can
    ///   only recover one of them
    ///
    /// Warnings:
    /// - exercise entries with a blank name or an empty instruction step
    /// - message templates with malformed placeholders
    pub fn validate(data: &TranslationData) -> ValidationReport {
        let mut report = ValidationReport::new();

        for kind in TaxonomyKind::ALL {
            for (localized, canonicals) in Self::shared_values(data, kind) {
                report.errors.push(format!(
                    "{}: '{}' is the translation of {:?}; reverse lookup resolves only the first",
                    kind.table_name(),
                    localized,
                    canonicals
                ));
            }
        }

        let mut blank_names: Vec<&str> = data
            .exercises()
            .filter(|(_, text)| text.name.as_deref().is_some_and(|n| n.trim().is_empty()))
            .map(|(id, _)| id)
            .collect();
        blank_names.sort_unstable();
        for id in blank_names {
            report
                .warnings
                .push(format!("exercises: blank name for '{}'", id));
        }

        let mut empty_steps: Vec<&str> = data
            .exercises()
            .filter(|(_, text)| {
                text.instructions
                    .as_ref()
                    .is_some_and(|steps| steps.iter().any(|s| s.trim().is_empty()))
            })
            .map(|(id, _)| id)
            .collect();
        empty_steps.sort_unstable();
        for id in empty_steps {
            report
                .warnings
                .push(format!("exercises: empty instruction step for '{}'", id));
        }

        let mut malformed: Vec<&str> = data
            .messages()
            .filter(|(_, template)| !Self::placeholders_balanced(template))
            .map(|(key, _)| key)
            .collect();
        malformed.sort_unstable();
        for key in malformed {
            report
                .warnings
                .push(format!("messages: malformed placeholder in '{}'", key));
        }

        report
    }

    /// Localized values claimed by more than one canonical name, sorted.
    fn shared_values(data: &TranslationData, kind: TaxonomyKind) -> Vec<(String, Vec<String>)> {
        let mut by_value: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (canonical, localized) in data.table(kind).iter() {
            by_value
                .entry(localized.to_lowercase())
                .or_default()
                .push(canonical.to_string());
        }

        by_value
            .into_iter()
            .filter(|(_, canonicals)| canonicals.len() > 1)
            .map(|(localized, mut canonicals)| {
                canonicals.sort_unstable();
                (localized, canonicals)
            })
            .collect()
    }

    /// Every `{` must open a `{name}` placeholder and every `}` must close one.
    fn placeholders_balanced(template: &str) -> bool {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\w+\}").unwrap());
        let stripped = regex.replace_all(template, "");
        !stripped.contains('{') && !stripped.contains('}')
    }
}
