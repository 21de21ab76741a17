//! Locale translation tables merged over the English fallback.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Flat or nested table of translation keys for one locale.
pub type TranslationTable = Map<String, Value>;

/// Load a translation table, treating a missing file as an empty table.
pub fn load_table(path: &Path) -> Result<TranslationTable> {
  if !path.exists() {
    return Ok(TranslationTable::new());
  }

  let content = fs::read_to_string(path)
    .with_context(|| format!("failed to read translation file {}", path.display()))?;
  let table = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse translation file {}", path.display()))?;
  Ok(table)
}

/// Overlay `locale` onto `english`: locale keys win on conflict, English
/// fills the gaps.
pub fn merge_tables(english: TranslationTable, locale: TranslationTable) -> TranslationTable {
  let mut merged = english;
  for (key, value) in locale {
    merged.insert(key, value);
  }
  merged
}
