//! Constants used throughout the tracker core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "tracker.sqlite3";

/// Default number of rows on a listing page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Maximum length of short free-text fields (names, places).
pub const SHORT_TEXT_MAX_LEN: usize = 100;

/// Maximum length of the `source` field.
pub const SOURCE_MAX_LEN: usize = 500;

/// Maximum length of notes and correction text.
pub const LONG_TEXT_MAX_LEN: usize = 2000;

/// Oldest accepted patient age.
pub const MAX_AGE: u8 = 130;

/// Separator used when persisting the flagged field names of an error report.
pub const ERROR_FIELDS_SEPARATOR: &str = ",";

/// Base name of exported table files (`table.csv`, `table.json`, ...).
pub const EXPORT_FILE_STEM: &str = "table";

/// Field names shared by reports and patients, in form order.
///
/// These are also the only values accepted as flagged fields on an error report.
pub const PATIENT_FIELD_NAMES: &[&str] = &[
    "name",
    "age",
    "gender",
    "detected_city",
    "detected_district",
    "detected_state",
    "nationality",
    "current_status",
    "diagnosed_date",
    "notes",
    "source",
];
