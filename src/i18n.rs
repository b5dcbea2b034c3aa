//! Locale tables and translation lookup.
//!
//! Translations live in flat dotted-key tables parsed from the JSON files under
//! `locales/`, which are embedded at compile time. Lookups fall back to the
//! base locale when a key or locale is missing, and to the key itself as a
//! last resort so a missing translation never turns into an error at runtime.

use crate::error::Result;
use std::collections::HashMap;

/// The locale every other table falls back to.
pub const BASE_LOCALE: &str = "en";

/// Embedded locale files, keyed by Discord locale code.
const LOCALE_SOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("es-ES", include_str!("../locales/es-ES.json")),
    ("fr", include_str!("../locales/fr.json")),
];

/// In-memory translation tables: locale -> dotted key -> text.
#[derive(Debug, Clone)]
pub struct I18n {
    tables: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Load the embedded locale tables.
    pub fn load() -> Result<Self> {
        Self::from_sources(LOCALE_SOURCES)
    }

    /// Build tables from `(locale, json)` pairs. Nested JSON objects are
    /// flattened into dotted keys (`cmd.play.description`).
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self> {
        let mut tables = HashMap::new();
        for (locale, raw) in sources {
            let value: serde_json::Value = serde_json::from_str(raw)?;
            let mut table = HashMap::new();
            flatten("", &value, &mut table);
            tables.insert((*locale).to_string(), table);
        }
        Ok(Self { tables })
    }

    /// Look up a key in a specific locale, without any fallback.
    pub fn lookup(&self, key: &str, locale: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Translate a key, falling back to the base locale and finally to the
    /// key itself.
    pub fn translate(&self, key: &str, locale: Option<&str>) -> String {
        locale
            .and_then(|l| self.lookup(key, l))
            .or_else(|| self.lookup(key, BASE_LOCALE))
            .unwrap_or(key)
            .to_string()
    }

    /// All per-locale translations of a key, excluding the base locale and
    /// any locale that does not carry the key. Sorted by locale code so the
    /// output is deterministic.
    pub fn localizations(&self, key: &str) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .tables
            .iter()
            .filter(|(locale, _)| locale.as_str() != BASE_LOCALE)
            .filter_map(|(locale, table)| {
                table.get(key).map(|text| (locale.clone(), text.clone()))
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Whether a locale table exists.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }

    /// Known locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten(&key, v, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> I18n {
        I18n::from_sources(&[
            ("en", r#"{"a": {"b": "base", "only": "base-only"}}"#),
            ("es-ES", r#"{"a": {"b": "es"}}"#),
        ])
        .unwrap()
    }

    #[test]
    fn test_translate_prefers_requested_locale() {
        let i18n = fixture();
        assert_eq!(i18n.translate("a.b", Some("es-ES")), "es");
        assert_eq!(i18n.translate("a.b", None), "base");
    }

    #[test]
    fn test_translate_falls_back_to_base() {
        let i18n = fixture();
        // Key missing from es-ES
        assert_eq!(i18n.translate("a.only", Some("es-ES")), "base-only");
        // Locale missing entirely
        assert_eq!(i18n.translate("a.b", Some("de")), "base");
        // Key missing everywhere: the key itself comes back
        assert_eq!(i18n.translate("a.missing", Some("es-ES")), "a.missing");
    }

    #[test]
    fn test_localizations_skip_base_and_missing() {
        let i18n = fixture();
        assert_eq!(
            i18n.localizations("a.b"),
            vec![("es-ES".to_string(), "es".to_string())]
        );
        assert!(i18n.localizations("a.only").is_empty());
    }

    #[test]
    fn test_embedded_tables_parse() {
        let i18n = I18n::load().unwrap();
        assert!(i18n.has_locale(BASE_LOCALE));
        assert!(i18n.lookup("cmd.play.description", "en").is_some());
        // fr is intentionally partial; its gaps fall back to English
        assert_eq!(
            i18n.translate("cmd.setup.description", Some("fr")),
            i18n.translate("cmd.setup.description", None)
        );
    }
}
