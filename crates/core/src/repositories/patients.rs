//! Patient storage.

use crate::db::Database;
use crate::models::{Patient, PatientDraft, PatientId};
use crate::repositories::listing::{where_clause, ListFilter, ListQuery, Page, SortOrder};
use crate::repositories::rows::{field_values, FieldsRow, FIELD_COLUMNS, FIELD_PLACEHOLDERS};
use crate::{TrackerError, TrackerResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

/// Service for confirmed patient records.
#[derive(Clone, Debug)]
pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save a draft as a new patient.
    ///
    /// Does not touch the originating report. Converting a report goes through
    /// `ReviewService`, which inserts the patient and moves the report in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Database` if the insert fails.
    pub fn create(&self, draft: &PatientDraft) -> TrackerResult<Patient> {
        let now = Utc::now();
        self.db.with_conn(|conn| insert(conn, draft, now))
    }

    /// Load a patient.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::PatientNotFound` if no patient has this id.
    pub fn get(&self, id: PatientId) -> TrackerResult<Patient> {
        self.db
            .with_conn(|conn| find_in(conn, id))?
            .ok_or(TrackerError::PatientNotFound(id))
    }

    /// One page of patients matching the query.
    pub fn list(&self, query: &ListQuery) -> TrackerResult<Page<Patient>> {
        self.db.with_conn(|conn| {
            let (clause, values) = where_clause(&query.filter, vec![], vec![]);
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM patients {clause}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )?;

            let (limit, offset) = query.limit_offset();
            let mut page_values = values;
            page_values.push(Value::Integer(limit));
            page_values.push(Value::Integer(offset));

            let items = select(
                conn,
                &format!("{clause} ORDER BY {} LIMIT ? OFFSET ?", query.sort.order_by()),
                &page_values,
            )?;

            Ok(Page {
                items,
                total: u64::try_from(total).unwrap_or_default(),
                page: query.page.max(1),
                per_page: query.per_page,
            })
        })
    }

    /// Every patient matching `filter`, unpaginated (used by exports).
    ///
    /// # Arguments
    ///
    /// * `filter` - The same filters the paginated listing accepts.
    /// * `sort` - Row order for the whole table.
    pub fn list_all(&self, filter: &ListFilter, sort: SortOrder) -> TrackerResult<Vec<Patient>> {
        self.db.with_conn(|conn| {
            let (clause, values) = where_clause(filter, vec![], vec![]);
            select(
                conn,
                &format!("{clause} ORDER BY {}", sort.order_by()),
                &values,
            )
        })
    }

    /// Number of stored patients.
    pub fn count(&self) -> TrackerResult<u64> {
        self.db.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |r| r.get(0))?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
    }
}

fn select(conn: &Connection, tail: &str, values: &[Value]) -> TrackerResult<Vec<Patient>> {
    let sql = format!(
        "SELECT id, {FIELD_COLUMNS}, derived_from_report, created_at FROM patients {tail}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw = stmt
        .query_map(params_from_iter(values.iter()), RawPatient::read)?
        .collect::<Result<Vec<_>, _>>()?;
    raw.into_iter().map(RawPatient::into_patient).collect()
}

pub(crate) fn insert(
    conn: &Connection,
    draft: &PatientDraft,
    now: DateTime<Utc>,
) -> TrackerResult<Patient> {
    let values = field_values(&draft.fields);
    conn.execute(
        &format!(
            "INSERT INTO patients ({FIELD_COLUMNS}, derived_from_report, created_at) \
             VALUES ({FIELD_PLACEHOLDERS}, ?, ?)"
        ),
        params_from_iter(
            values
                .iter()
                .map(|v| v as &dyn ToSql)
                .chain([&draft.derived_from_report as &dyn ToSql, &now as &dyn ToSql]),
        ),
    )?;

    let patient = Patient {
        id: conn.last_insert_rowid(),
        fields: draft.fields.clone(),
        derived_from_report: draft.derived_from_report,
        created_at: now,
    };
    tracing::info!(
        patient_id = patient.id,
        derived_from_report = ?patient.derived_from_report,
        "patient created"
    );
    Ok(patient)
}

pub(crate) fn find_in(conn: &Connection, id: PatientId) -> TrackerResult<Option<Patient>> {
    conn.query_row(
        &format!(
            "SELECT id, {FIELD_COLUMNS}, derived_from_report, created_at FROM patients WHERE id = ?1"
        ),
        params![id],
        RawPatient::read,
    )
    .optional()?
    .map(RawPatient::into_patient)
    .transpose()
}

struct RawPatient {
    id: PatientId,
    fields: FieldsRow,
    derived_from_report: Option<i64>,
    created_at: DateTime<Utc>,
}

impl RawPatient {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            fields: FieldsRow::read(row)?,
            derived_from_report: row.get("derived_from_report")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_patient(self) -> TrackerResult<Patient> {
        Ok(Patient {
            id: self.id,
            fields: self.fields.into_fields()?,
            derived_from_report: self.derived_from_report,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PatientFields};
    use crate::repositories::listing::SortColumn;
    use tracker_types::NonEmptyText;

    fn draft(name: &str, state: &str, gender: Gender) -> PatientDraft {
        let mut fields = PatientFields::new(
            NonEmptyText::new("Central").unwrap(),
            NonEmptyText::new(state).unwrap(),
        );
        fields.name = Some(name.into());
        fields.gender = gender;
        PatientDraft {
            fields,
            derived_from_report: None,
        }
    }

    fn service() -> PatientService {
        PatientService::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_and_get_round_trip_keeps_derivation_marker() {
        let service = service();
        let mut new_patient = draft("Meera", "Delhi", Gender::Female);
        new_patient.derived_from_report = Some(12);

        let created = service.create(&new_patient).expect("create should succeed");
        let stored = service.get(created.id).expect("patient should exist");

        assert_eq!(stored.fields, new_patient.fields);
        assert_eq!(stored.derived_from_report, Some(12));
    }

    #[test]
    fn test_get_missing_patient_is_not_found() {
        let err = service().get(1).expect_err("should be missing");
        assert!(matches!(err, TrackerError::PatientNotFound(1)));
    }

    #[test]
    fn test_list_filters_by_gender_and_name() {
        let service = service();
        service.create(&draft("Meera", "Delhi", Gender::Female)).unwrap();
        service.create(&draft("Mohan", "Delhi", Gender::Male)).unwrap();
        service.create(&draft("Asha", "Kerala", Gender::Female)).unwrap();

        let query = ListQuery::default().with_filter(ListFilter {
            name: Some("m".into()),
            gender: Some(Gender::Female),
            ..ListFilter::default()
        });
        let page = service.list(&query).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].fields.name.as_deref(), Some("Meera"));
    }

    #[test]
    fn test_list_all_ignores_pagination() {
        let service = service();
        for i in 0..30 {
            service
                .create(&draft(&format!("P{i:02}"), "Delhi", Gender::Unknown))
                .unwrap();
        }

        let all = service
            .list_all(
                &ListFilter::default(),
                SortOrder {
                    column: SortColumn::Name,
                    descending: true,
                },
            )
            .unwrap();
        assert_eq!(all.len(), 30);
        assert_eq!(all[0].fields.name.as_deref(), Some("P29"));
        assert_eq!(service.count().unwrap(), 30);
    }
}
