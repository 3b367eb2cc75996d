//! Language registry: Single source of truth for all supported locales.
//!
//! The registry is immutable configuration. It is built once on first access
//! with `OnceLock` and never changes afterwards.

use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Region-qualified locale tag (e.g., "en-US", "zh-CN")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Simplified Chinese")
    pub name: &'static str,

    /// Additional lower-case spellings accepted for this locale
    pub aliases: &'static [&'static str],

    /// Whether this is the canonical language of the catalog (only one should be true)
    pub is_canonical: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,
}

impl LanguageConfig {
    /// Check whether a trimmed, lower-cased tag names this locale.
    fn accepts(&self, lowered: &str) -> bool {
        self.code.eq_ignore_ascii_case(lowered) || self.aliases.contains(&lowered)
    }
}

pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its exact locale tag.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Resolve any accepted spelling (code or alias, any case, surrounding
    /// whitespace ignored) to an enabled locale.
    pub fn lookup(&self, raw: &str) -> Option<&LanguageConfig> {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return None;
        }
        self.languages
            .iter()
            .find(|lang| lang.enabled && lang.accepts(&lowered))
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// Locales served by the catalog. English is the language of the data files.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en-US",
            name: "English",
            aliases: &["en"],
            is_canonical: true,
            enabled: true,
        },
        LanguageConfig {
            code: "zh-CN",
            name: "Simplified Chinese",
            aliases: &["zh", "zh-hans"],
            is_canonical: false,
            enabled: true,
        },
    ]
}
