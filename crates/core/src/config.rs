//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services. Services
//! never read process-wide environment variables while handling a request.

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::{TrackerError, TrackerResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    page_size: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidInput` if the database path is empty or the page size is
    /// outside `1..=MAX_PAGE_SIZE`.
    pub fn new(database_path: PathBuf, page_size: usize) -> TrackerResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(TrackerError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        validate_page_size(page_size)?;

        Ok(Self {
            database_path,
            page_size,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Default number of rows per listing page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn validate_page_size(page_size: usize) -> TrackerResult<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(TrackerError::InvalidInput(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(())
}

/// Parse the listing page size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PAGE_SIZE`].
pub fn page_size_from_env_value(value: Option<String>) -> TrackerResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(raw) = value else {
        return Ok(DEFAULT_PAGE_SIZE);
    };

    let parsed = raw.parse::<usize>().map_err(|_| {
        TrackerError::InvalidInput(format!("page size must be a positive integer, got '{raw}'"))
    })?;
    validate_page_size(parsed)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_database_path() {
        let err = CoreConfig::new(PathBuf::new(), 25).expect_err("empty path should fail");
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_out_of_range_page_size() {
        assert!(CoreConfig::new(PathBuf::from("db.sqlite3"), 0).is_err());
        assert!(CoreConfig::new(PathBuf::from("db.sqlite3"), MAX_PAGE_SIZE + 1).is_err());
        assert!(CoreConfig::new(PathBuf::from("db.sqlite3"), MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_page_size_from_env_value_defaults_when_missing_or_blank() {
        assert_eq!(page_size_from_env_value(None).unwrap(), DEFAULT_PAGE_SIZE);
        assert_eq!(
            page_size_from_env_value(Some("   ".into())).unwrap(),
            DEFAULT_PAGE_SIZE
        );
    }

    #[test]
    fn test_page_size_from_env_value_parses_and_validates() {
        assert_eq!(page_size_from_env_value(Some(" 50 ".into())).unwrap(), 50);
        assert!(page_size_from_env_value(Some("lots".into())).is_err());
        assert!(page_size_from_env_value(Some("0".into())).is_err());
    }
}
