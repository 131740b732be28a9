pub mod coerce;
pub mod url;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::pipeline::coerce::{coerce_record, Record, SchemaVersion};
use crate::pipeline::url::normalize_url;

/// Dataset-wide counters from one batch pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScrubSummary {
    pub total_records: usize,
    pub records_changed: usize,
    pub urls_changed: usize,
    pub urls_query_encoded: usize,
    pub urls_replaced: usize,
}

/// Runs the field-coercion and URL-normalization stages over a record
/// collection, one record at a time, in collection order.
pub struct Scrubber {
    schema: SchemaVersion,
}

#[derive(Debug, Default)]
struct RecordReport {
    changed: bool,
    url_changed: bool,
    url_query_encoded: bool,
    url_replaced: bool,
}

impl Scrubber {
    pub fn new(schema: SchemaVersion) -> Self {
        Self { schema }
    }

    /// Mutates every record in place and returns the accumulated counters.
    /// Records are never created, deleted, or reordered.
    pub fn run(&self, records: &mut [Record]) -> ScrubSummary {
        let mut summary = ScrubSummary::default();
        for (index, record) in records.iter_mut().enumerate() {
            let report = self.scrub_record(index, record);
            summary.total_records += 1;
            if report.changed {
                summary.records_changed += 1;
            }
            if report.url_changed {
                summary.urls_changed += 1;
            }
            if report.url_query_encoded {
                summary.urls_query_encoded += 1;
            }
            if report.url_replaced {
                summary.urls_replaced += 1;
            }
        }
        summary
    }

    fn scrub_record(&self, index: usize, record: &mut Record) -> RecordReport {
        let mut report = RecordReport {
            changed: coerce_record(record, self.schema),
            ..RecordReport::default()
        };
        if report.changed {
            debug!(index, "record fields coerced");
        }

        // Absent or empty website: the normalizer is a no-op.
        let raw = match record.get("website").and_then(|v| v.as_str()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return report,
        };

        let outcome = normalize_url(&raw);
        report.url_query_encoded = outcome.query_encoded;
        report.url_replaced = outcome.replaced_as_broken;
        if outcome.changed {
            debug!(index, before = %raw, after = %outcome.value, "website normalized");
            record.insert("website".to_string(), Value::String(outcome.value));
            report.url_changed = true;
            report.changed = true;
        }
        report
    }
}
