//! Error report (correction request) storage.

use crate::db::Database;
use crate::models::{ErrorReport, NewErrorReport, PatientId};
use crate::TrackerResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// Service for correction requests filed against patients.
#[derive(Clone, Debug)]
pub struct ErrorReportService {
    db: Database,
}

impl ErrorReportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a correction request.
    ///
    /// The patient id is stored as given and is not checked against the patients table.
    ///
    /// # Arguments
    ///
    /// * `report` - The patient id, the set of fields in error and the free-text correction.
    ///
    /// # Returns
    ///
    /// The stored correction with its id and creation time.
    pub fn file(&self, report: &NewErrorReport) -> TrackerResult<ErrorReport> {
        let now = Utc::now();
        let stored = self.db.with_conn(|conn| insert(conn, report, now))?;
        tracing::info!(
            error_report_id = stored.id,
            patient_id = stored.patient_id,
            error_fields = %stored.error_fields,
            "error report filed"
        );
        Ok(stored)
    }

    /// Correction requests, newest first, optionally for a single patient.
    pub fn list(&self, patient_id: Option<PatientId>) -> TrackerResult<Vec<ErrorReport>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, patient_id, error_fields, corrections, created_at FROM error_reports \
                 WHERE (?1 IS NULL OR patient_id = ?1) ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map(params![patient_id], |row| {
                    Ok(ErrorReport {
                        id: row.get("id")?,
                        patient_id: row.get("patient_id")?,
                        error_fields: row.get("error_fields")?,
                        corrections: row.get("corrections")?,
                        created_at: row.get("created_at")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn insert(
    conn: &Connection,
    report: &NewErrorReport,
    now: DateTime<Utc>,
) -> TrackerResult<ErrorReport> {
    let error_fields = report.joined_error_fields();
    conn.execute(
        "INSERT INTO error_reports (patient_id, error_fields, corrections, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            report.patient_id,
            error_fields,
            report.corrections.as_str(),
            now
        ],
    )?;

    Ok(ErrorReport {
        id: conn.last_insert_rowid(),
        patient_id: report.patient_id,
        error_fields,
        corrections: report.corrections.as_str().to_string(),
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_types::NonEmptyText;

    fn new_report(patient_id: PatientId, fields: &[&str]) -> NewErrorReport {
        NewErrorReport {
            patient_id,
            error_fields: fields.iter().map(|f| f.to_string()).collect(),
            corrections: NonEmptyText::new("Age should be 43").unwrap(),
        }
    }

    #[test]
    fn test_file_joins_fields_in_submission_order() {
        let service = ErrorReportService::new(Database::open_in_memory().unwrap());
        let stored = service
            .file(&new_report(3, &["age", "name"]))
            .expect("file should succeed");
        assert_eq!(stored.error_fields, "age,name");

        let listed = service.list(Some(3)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].error_fields, "age,name");
        assert_eq!(listed[0].corrections, "Age should be 43");
    }

    #[test]
    fn test_file_accepts_unknown_patient_ids() {
        let service = ErrorReportService::new(Database::open_in_memory().unwrap());
        let stored = service
            .file(&new_report(999, &["gender"]))
            .expect("no existence check on patient id");
        assert_eq!(stored.patient_id, 999);
    }

    #[test]
    fn test_list_is_newest_first_and_filters_by_patient() {
        let service = ErrorReportService::new(Database::open_in_memory().unwrap());
        let a = service.file(&new_report(1, &["age"])).unwrap();
        let b = service.file(&new_report(2, &["name"])).unwrap();
        let c = service.file(&new_report(1, &["notes"])).unwrap();

        let all: Vec<_> = service.list(None).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let for_one: Vec<_> = service.list(Some(1)).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(for_one, vec![c.id, a.id]);
    }
}
