/// Field-name constants shared across the scrub pass so the dataset schema
/// lives in one place.

/// Dataset file read and rewritten by a scrub run.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Substituted for any website that fails the validity gate.
pub const PLACEHOLDER_URL: &str = "https://example.com/broken-link";

/// Fields stored as 0/1 (or "0"/"1") upstream; canonical form is boolean.
pub const BOOLEAN_FIELDS: [&str; 4] = [
    "iiif",
    "is_free_cultural_works_license",
    "is_disabled",
    "is_part_of",
];

/// Coordinate fields; canonical form under schema v1 is string.
pub const COORDINATE_FIELDS: [&str; 2] = ["lat", "lng"];

/// Fields removed outright under schema v2. This is an explicit deletion
/// list, distinct from coercion.
pub const DEPRECATED_FIELDS: [&str; 10] = [
    "has_post",
    "post_url",
    "library_name_slug",
    "last_edited",
    "notes",
    "created_at",
    "updated_at",
    "lat",
    "lng",
    "is_disabled",
];
