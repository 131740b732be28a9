use std::collections::BTreeSet;

use serde::Serialize;

use crate::pipeline::coerce::Record;

/// Read-only report over an already-normalized collection, mirroring what
/// the dashboard surfaces: totals, the sorted unique-nation list, and the
/// feature counts.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub nations: Vec<String>,
    pub iiif_count: usize,
    pub free_license_count: usize,
    pub with_website: usize,
}

pub fn dataset_stats(records: &[Record]) -> DatasetStats {
    let mut nations = BTreeSet::new();
    let mut iiif_count = 0;
    let mut free_license_count = 0;
    let mut with_website = 0;

    for record in records {
        if let Some(nation) = record.get("nation").and_then(|v| v.as_str()) {
            if !nation.is_empty() {
                nations.insert(nation.to_string());
            }
        }
        if record.get("iiif").and_then(|v| v.as_bool()) == Some(true) {
            iiif_count += 1;
        }
        if record
            .get("is_free_cultural_works_license")
            .and_then(|v| v.as_bool())
            == Some(true)
        {
            free_license_count += 1;
        }
        if record
            .get("website")
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty())
        {
            with_website += 1;
        }
    }

    DatasetStats {
        total_records: records.len(),
        nations: nations.into_iter().collect(),
        iiif_count,
        free_license_count,
        with_website,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_stats_counts_and_sorted_nations() {
        let data = records(json!([
            { "library": "A", "nation": "Norway", "iiif": true, "website": "https://a.example.org" },
            { "library": "B", "nation": "France", "iiif": false, "is_free_cultural_works_license": true },
            { "library": "C", "nation": "France", "website": "" }
        ]));

        let stats = dataset_stats(&data);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.nations, vec!["France", "Norway"]);
        assert_eq!(stats.iiif_count, 1);
        assert_eq!(stats.free_license_count, 1);
        assert_eq!(stats.with_website, 1);
    }

    #[test]
    fn test_stats_ignores_unnormalized_booleans() {
        // the dashboard contract is booleans; a stray "1" does not count
        let data = records(json!([{ "library": "A", "iiif": "1" }]));
        assert_eq!(dataset_stats(&data).iiif_count, 0);
    }
}
