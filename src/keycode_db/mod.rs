//! ZMK symbol and modifier lookup tables.
//!
//! This module provides access to the embedded symbol database used to turn
//! keycode names into display text, markup and icon references. The tables
//! are loaded once and never mutated; user override files are merged on top
//! of the embedded defaults at load time.

pub mod display;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub use display::{escape_html, DisplayMode, IconRef, KeycodeRenderer, ResolvedDisplay};

/// Partial display information for one symbol or modifier.
///
/// Any subset of the fields may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Plain-text label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Markup label (trusted, emitted as-is)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Named icon reference (e.g. "mdi-keyboard-return")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl SymbolEntry {
    /// Creates an entry with only a text label.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
            icon: None,
        }
    }

    /// Sets the markup label.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Sets the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Database schema from symbols.json (also used by override files).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SymbolDatabase {
    #[serde(default)]
    symbols: HashMap<String, SymbolEntry>,
    #[serde(default)]
    modifiers: HashMap<String, SymbolEntry>,
}

/// Immutable symbol and modifier tables.
///
/// Keys are canonical uppercase names: `SPACE`, `N1`, `C_VOL_UP` for
/// symbols and the two-letter side+modifier codes (`LC`, `RS`, ...) for
/// modifiers.
#[derive(Debug, Clone, Default)]
pub struct KeycodeDb {
    /// Canonical key name to display entry
    symbols: HashMap<String, SymbolEntry>,
    /// Side+modifier code to display entry
    modifiers: HashMap<String, SymbolEntry>,
}

impl KeycodeDb {
    /// Loads the embedded symbol database.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("symbols.json");
        Self::from_json(json_data).context("Failed to parse embedded symbols.json")
    }

    /// Loads the embedded database and merges optional override files on top.
    ///
    /// Override files use the same schema as the embedded database; both
    /// sections are optional. Entries replace defaults with the same name.
    pub fn load_with_overrides(symbols: Option<&Path>, modifiers: Option<&Path>) -> Result<Self> {
        let mut db = Self::load()?;

        for path in [symbols, modifiers].into_iter().flatten() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read symbol table: {}", path.display()))?;
            let overrides = Self::from_json(&content)
                .with_context(|| format!("Failed to parse symbol table: {}", path.display()))?;

            debug!(
                "Merging {} symbols and {} modifiers from {}",
                overrides.symbols.len(),
                overrides.modifiers.len(),
                path.display()
            );
            db.symbols.extend(overrides.symbols);
            db.modifiers.extend(overrides.modifiers);
        }

        Ok(db)
    }

    /// Builds a database from JSON text. Names are uppercased.
    pub fn from_json(json: &str) -> Result<Self> {
        let db: SymbolDatabase = serde_json::from_str(json)?;
        Ok(Self::from_tables(db.symbols, db.modifiers))
    }

    /// Builds a database from in-memory tables. Names are uppercased.
    #[must_use]
    pub fn from_tables(
        symbols: HashMap<String, SymbolEntry>,
        modifiers: HashMap<String, SymbolEntry>,
    ) -> Self {
        let canonical = |table: HashMap<String, SymbolEntry>| -> HashMap<String, SymbolEntry> {
            table
                .into_iter()
                .map(|(name, entry)| (name.to_uppercase(), entry))
                .collect()
        };

        Self {
            symbols: canonical(symbols),
            modifiers: canonical(modifiers),
        }
    }

    /// Looks up a canonical (uppercase) symbol name.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&SymbolEntry> {
        self.symbols.get(name)
    }

    /// Looks up a two-letter side+modifier code.
    #[must_use]
    pub fn modifier(&self, code: &str) -> Option<&SymbolEntry> {
        self.modifiers.get(code)
    }

    /// Gets the total number of symbols.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Gets the total number of modifiers.
    #[must_use]
    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn get_test_db() -> KeycodeDb {
        KeycodeDb::load().expect("Failed to load symbol database")
    }

    #[test]
    fn test_load_database() {
        let db = get_test_db();
        assert!(db.symbol_count() > 100);
        assert_eq!(db.modifier_count(), 8);
    }

    #[test]
    fn test_symbol_lookup() {
        let db = get_test_db();
        assert_eq!(db.symbol("N1").unwrap().text.as_deref(), Some("1"));
        assert_eq!(
            db.symbol("RET").unwrap().icon.as_deref(),
            Some("mdi-keyboard-return")
        );
        assert!(db.symbol("MT").is_none());
        assert!(db.symbol("MAC_REDO").is_none());
    }

    #[test]
    fn test_all_modifier_codes_present() {
        let db = get_test_db();
        for code in ["LC", "LS", "LA", "LG", "RC", "RS", "RA", "RG"] {
            let entry = db.modifier(code).unwrap();
            assert!(entry.text.is_some(), "{code} has no text");
            assert!(entry.icon.is_some(), "{code} has no icon");
        }
    }

    #[test]
    fn test_from_json_uppercases_names() {
        let db = KeycodeDb::from_json(r#"{"symbols": {"foo": {"text": "Foo"}}}"#).unwrap();
        assert!(db.symbol("FOO").is_some());
        assert!(db.symbol("foo").is_none());
        assert_eq!(db.modifier_count(), 0);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"symbols": {{"A": {{"text": "Alpha"}}, "MEH": {{"text": "Meh"}}}},
                "modifiers": {{"LC": {{"text": "^"}}}}}}"#
        )
        .unwrap();

        let db = KeycodeDb::load_with_overrides(Some(file.path()), None).unwrap();
        assert_eq!(db.symbol("A").unwrap().text.as_deref(), Some("Alpha"));
        assert_eq!(db.symbol("MEH").unwrap().text.as_deref(), Some("Meh"));
        assert_eq!(db.modifier("LC").unwrap(), &SymbolEntry::text("^"));
        // Untouched defaults survive
        assert!(db.symbol("B").is_some());
    }

    #[test]
    fn test_override_missing_file() {
        let result = KeycodeDb::load_with_overrides(Some(Path::new("/nonexistent.json")), None);
        assert!(result.is_err());
    }
}
