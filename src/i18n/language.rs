//! Language type: a locale validated against the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use std::fmt;

/// A supported locale.
///
/// Only locales present and enabled in the registry can be constructed, so a
/// `Language` always has a configuration and a translation table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// Region-qualified locale tag (e.g., "en-US", "zh-CN")
    code: &'static str,
}

impl Language {
    pub const EN_US: Language = Language { code: "en-US" };
    pub const ZH_CN: Language = Language { code: "zh-CN" };

    /// Parse a caller-supplied tag, accepting short codes, region-qualified
    /// codes and registered aliases in any letter case.
    pub fn parse(raw: &str) -> Option<Language> {
        LanguageRegistry::get()
            .lookup(raw)
            .map(|config| Language { code: config.code })
    }

    /// Resolve a caller-supplied tag, falling back to the canonical language
    /// when the tag is missing or unsupported.
    pub fn normalize(raw: Option<&str>) -> Language {
        raw.and_then(Language::parse)
            .unwrap_or_else(Language::canonical)
    }

    /// The language the catalog data files are written in.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Every enabled language, in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not registered, which cannot happen for values
    /// built through the constructors above.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
