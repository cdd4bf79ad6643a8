use super::types::WeightTable;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-backed persistence for a [`WeightTable`]
///
/// A missing file is a cold start, not an error. Saves go through a temporary
/// file in the same directory that is renamed over the target, so readers
/// never observe a half-written table.
#[derive(Debug, Clone)]
pub struct WeightStore {
    path: PathBuf,
}

impl WeightStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted table, or an empty one if nothing has been saved yet
    pub fn load(&self) -> Result<WeightTable> {
        tracing::debug!("Loading selector weights from: {}", self.path.display());

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No weight store at {}, starting with an empty table",
                    self.path.display()
                );
                return Ok(WeightTable::new());
            }
            Err(source) => {
                return Err(Error::Persistence {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let table: WeightTable =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            "Loaded {} selector(s) across {} field type(s)",
            table.selector_count(),
            table.len()
        );

        Ok(table)
    }

    /// Overwrite the persisted table with `table`
    pub fn save(&self, table: &WeightTable) -> Result<()> {
        tracing::debug!("Saving selector weights to: {}", self.path.display());

        let json = Self::to_string(table)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let persistence = |source| Error::Persistence {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(persistence)?;
        tmp.write_all(json.as_bytes()).map_err(persistence)?;
        tmp.write_all(b"\n").map_err(persistence)?;
        tmp.as_file().sync_all().map_err(persistence)?;
        tmp.persist(&self.path).map_err(|e| persistence(e.error))?;

        tracing::info!(
            "Saved {} selector(s) across {} field type(s) to {}",
            table.selector_count(),
            table.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Parse a weight table from its JSON text
    pub fn from_str(content: &str) -> Result<WeightTable> {
        Ok(serde_json::from_str(content)?)
    }

    /// Render a weight table the way it is persisted: pretty JSON, four-space indent
    pub fn to_string(table: &WeightTable) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        table.serialize(&mut serializer)?;

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
