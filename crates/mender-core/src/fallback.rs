use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Built-in last-resort selectors, most specific first
const BUILTIN: &[(&str, &[&str])] = &[
    ("username", &["input#username", "input:nth-of-type(1)"]),
    ("password", &["input#password", "input:nth-of-type(2)"]),
    ("login_button", &["button", "input[type=submit]"]),
];

/// Static, unscored selector lists tried once every learned selector has failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackTable {
    fields: BTreeMap<String, Vec<String>>,
}

impl FallbackTable {
    /// The compiled-in table
    pub fn builtin() -> Self {
        let fields = BUILTIN
            .iter()
            .map(|(field_type, selectors)| {
                (
                    field_type.to_string(),
                    selectors.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();

        Self { fields }
    }

    /// A table with no entries; every field-type has an empty fallback sequence
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Load a replacement table from a JSON file of `{ field_type: [selector, ...] }`
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading fallback table from: {}", path.display());

        let file = File::open(path).map_err(|source| Error::Persistence {
            path: path.to_path_buf(),
            source,
        })?;
        let table: FallbackTable =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        table.validate()?;

        tracing::info!(
            "Loaded fallback selectors for {} field type(s)",
            table.fields.len()
        );

        Ok(table)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let table: FallbackTable = serde_json::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        for (field_type, selectors) in &self.fields {
            if selectors.iter().any(|s| s.trim().is_empty()) {
                return Err(Error::InvalidFallback(format!(
                    "field type '{}' has an empty selector",
                    field_type
                )));
            }
        }
        Ok(())
    }

    /// Fallback selectors for `field_type` in try order; empty if none are configured
    pub fn candidates(&self, field_type: &str) -> &[String] {
        self.fields
            .get(field_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn field_types(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}
