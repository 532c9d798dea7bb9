//! Report storage and the guarded state transition.

use crate::db::Database;
use crate::models::{PatientFields, Report, ReportId, ReportState};
use crate::repositories::listing::{where_clause, ListFilter, ListQuery, Page};
use crate::repositories::rows::{field_values, FieldsRow, FIELD_COLUMNS, FIELD_PLACEHOLDERS};
use crate::{TrackerError, TrackerResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// Result of applying a state transition to a stored report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The report moved from `from` to the requested state.
    Applied { from: ReportState },
    /// The report's current state does not allow the requested transition.
    Rejected { current: ReportState },
}

/// Service for report storage.
#[derive(Clone, Debug)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a public submission.
    ///
    /// # Arguments
    ///
    /// * `fields` - The validated fields from the public report form.
    ///
    /// # Returns
    ///
    /// The stored report with its new id. New reports always start in
    /// [`ReportState::Reported`].
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Database` if the insert fails.
    pub fn submit(&self, fields: PatientFields) -> TrackerResult<Report> {
        let now = Utc::now();
        let report = self.db.with_conn(|conn| insert(conn, &fields, now))?;
        tracing::info!(report_id = report.id, "report submitted");
        Ok(report)
    }

    /// Load a report.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ReportNotFound` if no report has this id.
    pub fn get(&self, id: ReportId) -> TrackerResult<Report> {
        self.find(id)?.ok_or(TrackerError::ReportNotFound(id))
    }

    pub fn find(&self, id: ReportId) -> TrackerResult<Option<Report>> {
        self.db.with_conn(|conn| find_in(conn, id))
    }

    /// The review queue: reports still in [`ReportState::Reported`].
    pub fn queue(&self, query: &ListQuery) -> TrackerResult<Page<Report>> {
        self.list_in_state(Some(ReportState::Reported), query)
    }

    /// List reports in `state` (or all states when `None`).
    ///
    /// # Arguments
    ///
    /// * `state` - Restricts the listing to one lifecycle state.
    /// * `query` - Filters, sort order and the page to return.
    ///
    /// # Returns
    ///
    /// One page of reports together with the total number of matches.
    pub fn list_in_state(
        &self,
        state: Option<ReportState>,
        query: &ListQuery,
    ) -> TrackerResult<Page<Report>> {
        let (conditions, values) = match state {
            Some(state) => (
                vec!["report_state = ?".to_string()],
                vec![Value::Text(state.as_str().to_string())],
            ),
            None => (vec![], vec![]),
        };
        self.db
            .with_conn(|conn| list_in(conn, &query.filter, conditions, values, query))
    }
}

fn list_in(
    conn: &Connection,
    filter: &ListFilter,
    conditions: Vec<String>,
    values: Vec<Value>,
    query: &ListQuery,
) -> TrackerResult<Page<Report>> {
    let (clause, values) = where_clause(filter, conditions, values);

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM reports {clause}"),
        params_from_iter(values.iter()),
        |row| row.get(0),
    )?;

    let (limit, offset) = query.limit_offset();
    let mut page_values = values;
    page_values.push(Value::Integer(limit));
    page_values.push(Value::Integer(offset));

    let sql = format!(
        "SELECT id, {FIELD_COLUMNS}, report_state, created_at, updated_at FROM reports {clause} \
         ORDER BY {} LIMIT ? OFFSET ?",
        query.sort.order_by()
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw = stmt
        .query_map(params_from_iter(page_values.iter()), RawReport::read)?
        .collect::<Result<Vec<_>, _>>()?;

    let items = raw
        .into_iter()
        .map(RawReport::into_report)
        .collect::<TrackerResult<Vec<_>>>()?;

    Ok(Page {
        items,
        total: u64::try_from(total).unwrap_or_default(),
        page: query.page.max(1),
        per_page: query.per_page,
    })
}

pub(crate) fn insert(
    conn: &Connection,
    fields: &PatientFields,
    now: DateTime<Utc>,
) -> TrackerResult<Report> {
    let mut values = field_values(fields);
    values.push(Value::Text(ReportState::Reported.as_str().to_string()));

    conn.execute(
        &format!(
            "INSERT INTO reports ({FIELD_COLUMNS}, report_state, created_at, updated_at) \
             VALUES ({FIELD_PLACEHOLDERS}, ?, ?, ?)"
        ),
        params_from_iter(
            values
                .iter()
                .map(|v| v as &dyn rusqlite::ToSql)
                .chain([&now as &dyn rusqlite::ToSql, &now as &dyn rusqlite::ToSql]),
        ),
    )?;

    Ok(Report {
        id: conn.last_insert_rowid(),
        fields: fields.clone(),
        report_state: ReportState::Reported,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) fn find_in(conn: &Connection, id: ReportId) -> TrackerResult<Option<Report>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT id, {FIELD_COLUMNS}, report_state, created_at, updated_at \
                 FROM reports WHERE id = ?1"
            ),
            params![id],
            RawReport::read,
        )
        .optional()?;

    raw.map(RawReport::into_report).transpose()
}

/// Move a report to `to` if its current state allows it.
///
/// The state check and the write happen on the same connection, and the `UPDATE` is
/// conditioned on the state that was checked, so a concurrent resolution cannot be overwritten.
pub(crate) fn transition_in(
    conn: &Connection,
    id: ReportId,
    to: ReportState,
    now: DateTime<Utc>,
) -> TrackerResult<Transition> {
    let current: Option<String> = conn
        .query_row(
            "SELECT report_state FROM reports WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    let current = current.ok_or(TrackerError::ReportNotFound(id))?;
    let current = crate::models::parse_stored("report_state", current, ReportState::parse)?;

    if !current.can_transition_to(to) {
        return Ok(Transition::Rejected { current });
    }

    let changed = conn.execute(
        "UPDATE reports SET report_state = ?1, updated_at = ?2 WHERE id = ?3 AND report_state = ?4",
        params![to.as_str(), now, id, current.as_str()],
    )?;

    if changed == 0 {
        // Lost a race with a writer outside this connection.
        let latest = find_in(conn, id)?.ok_or(TrackerError::ReportNotFound(id))?;
        return Ok(Transition::Rejected {
            current: latest.report_state,
        });
    }

    Ok(Transition::Applied { from: current })
}

struct RawReport {
    id: ReportId,
    fields: FieldsRow,
    report_state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawReport {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            fields: FieldsRow::read(row)?,
            report_state: row.get("report_state")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_report(self) -> TrackerResult<Report> {
        Ok(Report {
            id: self.id,
            fields: self.fields.into_fields()?,
            report_state: crate::models::parse_stored(
                "report_state",
                self.report_state,
                ReportState::parse,
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
