use std::fmt;

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::constants::{BOOLEAN_FIELDS, COORDINATE_FIELDS, DEPRECATED_FIELDS};

/// One library entry: a JSON object of loosely-typed fields.
pub type Record = Map<String, Value>;

/// Target schema for a scrub pass. Earlier dataset revisions keep coordinates
/// as strings; later revisions drop them along with other editorial metadata.
/// The caller picks one explicitly, it is never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaVersion {
    /// Coerce `lat`/`lng` to strings, keep `is_disabled` as a boolean.
    V1,
    /// Strip the deprecated fields (coordinates, `is_disabled`, editorial metadata).
    V2,
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::V1 => write!(f, "v1"),
            SchemaVersion::V2 => write!(f, "v2"),
        }
    }
}

/// Canonical holdings-size buckets for the `quantity` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Few,
    Dozens,
    Hundreds,
    Thousands,
    Unknown,
}

impl Quantity {
    /// Buckets a free-text descriptor. Keywords are tested in a fixed
    /// priority order against the lower-cased input, first match wins:
    /// "a few hundred" buckets as `Few`, not `Hundreds`.
    pub fn from_descriptor(raw: Option<&str>) -> Self {
        let text = match raw {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Quantity::Unknown,
        };

        // Already-canonical values are fixed points. "Dozens" matches no
        // keyword below and must not degrade to Unknown on a second pass.
        if let Some(bucket) = Self::from_canonical(text) {
            return bucket;
        }

        let text = text.to_lowercase();
        if text.contains("few") {
            Quantity::Few
        } else if text.contains("many") {
            Quantity::Dozens
        } else if text.contains("huge") {
            Quantity::Thousands
        } else if text.contains("hundreds") {
            Quantity::Hundreds
        } else if text.contains("thousands") {
            Quantity::Thousands
        } else {
            Quantity::Unknown
        }
    }

    fn from_canonical(text: &str) -> Option<Self> {
        match text {
            "Few" => Some(Quantity::Few),
            "Dozens" => Some(Quantity::Dozens),
            "Hundreds" => Some(Quantity::Hundreds),
            "Thousands" => Some(Quantity::Thousands),
            "Unknown" => Some(Quantity::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantity::Few => "Few",
            Quantity::Dozens => "Dozens",
            Quantity::Hundreds => "Hundreds",
            Quantity::Thousands => "Thousands",
            Quantity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric truthiness matching the dataset's 0/1 convention: anything that
/// coerces to a non-zero number is true, everything else is false.
fn truthiness(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Stringifies a coordinate value. Null and missing values are left alone by
/// the caller; anything else gets its plain text rendering.
fn coordinate_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Applies the type-normalization rules to one record in place. Fields absent
/// from the record are left untouched, with one exception: `quantity` is
/// required by the canonical schema, so an absent or empty descriptor is
/// written out as `Unknown`.
///
/// Returns whether anything in the record changed.
pub fn coerce_record(record: &mut Record, schema: SchemaVersion) -> bool {
    let mut changed = false;

    // Deletions run first so coercion never resurrects a dropped field.
    if schema == SchemaVersion::V2 {
        for field in DEPRECATED_FIELDS {
            // shift_remove keeps the remaining fields in their input order
            if record.shift_remove(field).is_some() {
                changed = true;
            }
        }
    }

    for field in BOOLEAN_FIELDS {
        if let Some(value) = record.get(field) {
            let coerced = Value::Bool(truthiness(value));
            if *value != coerced {
                record.insert(field.to_string(), coerced);
                changed = true;
            }
        }
    }

    if schema == SchemaVersion::V1 {
        for field in COORDINATE_FIELDS {
            let Some(value) = record.get(field) else {
                continue;
            };
            if value.is_null() || value.is_string() {
                continue;
            }
            if let Some(text) = coordinate_string(value) {
                record.insert(field.to_string(), Value::String(text));
                changed = true;
            }
        }
    }

    let bucket = Quantity::from_descriptor(record.get("quantity").and_then(|v| v.as_str()));
    let canonical = Value::String(bucket.as_str().to_string());
    if record.get("quantity") != Some(&canonical) {
        record.insert("quantity".to_string(), canonical);
        changed = true;
    }

    changed
}
