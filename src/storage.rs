use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tracing::info;

use crate::error::{Result, ScrubError};
use crate::pipeline::coerce::Record;

/// On-disk dataset access. The whole collection is read before a pass and
/// written back in full afterwards; there are no partial writes, so a run
/// that aborts mid-pass leaves the file exactly as it was.
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full collection. Malformed JSON or a non-array top level is
    /// fatal before any record is touched.
    pub fn load(&self) -> Result<Vec<Record>> {
        let raw = fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&raw)?;
        let Value::Array(items) = value else {
            return Err(ScrubError::Data(format!(
                "expected a top-level JSON array in {}",
                self.path.display()
            )));
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(ScrubError::Data(format!(
                        "record {index} is not an object: {other}"
                    )))
                }
            }
        }

        info!(count = records.len(), path = %self.path.display(), "dataset loaded");
        Ok(records)
    }

    /// Overwrites the dataset wholesale. The output is serialized in memory
    /// first, then written in one shot: 4-space indent, field order as read.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;
        buffer.push(b'\n');

        fs::write(&self.path, buffer)?;
        info!(count = records.len(), path = %self.path.display(), "dataset written");
        Ok(())
    }
}
