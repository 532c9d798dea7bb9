use crate::models::{PatientId, ReportId};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] tracker_types::TextError),

    #[error("failed to create database directory: {0}")]
    DatabaseDirCreation(std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("migration to schema version {version} failed: {reason}")]
    MigrationFailed { version: i32, reason: String },
    #[error(
        "database schema version {found} is newer than supported version {supported}; upgrade the application"
    )]
    SchemaTooNew { found: i32, supported: i32 },
    #[error("database connection lock poisoned")]
    LockPoisoned,
    #[error("invalid stored value for {field}: {value}")]
    InvalidStoredValue { field: &'static str, value: String },

    #[error("report {0} not found")]
    ReportNotFound(ReportId),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),

    #[error("failed to serialize export: {0}")]
    Serialization(serde_json::Error),
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
