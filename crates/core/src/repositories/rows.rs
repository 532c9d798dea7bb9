//! Row mapping for the patient field columns shared by `reports` and `patients`.

use crate::models::{parse_stored, CurrentStatus, Gender, PatientFields};
use crate::{TrackerError, TrackerResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;
use tracker_types::NonEmptyText;

/// Column list, in the order [`FieldsRow::read`] and [`field_values`] use.
pub(crate) const FIELD_COLUMNS: &str = "name, age, gender, detected_city, detected_district, \
     detected_state, nationality, current_status, diagnosed_date, notes, source";

/// Placeholders matching [`FIELD_COLUMNS`].
pub(crate) const FIELD_PLACEHOLDERS: &str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

/// Raw column values, read before domain validation.
pub(crate) struct FieldsRow {
    name: Option<String>,
    age: Option<i64>,
    gender: String,
    detected_city: Option<String>,
    detected_district: String,
    detected_state: String,
    nationality: Option<String>,
    current_status: String,
    diagnosed_date: Option<NaiveDate>,
    notes: Option<String>,
    source: Option<String>,
}

impl FieldsRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            gender: row.get("gender")?,
            detected_city: row.get("detected_city")?,
            detected_district: row.get("detected_district")?,
            detected_state: row.get("detected_state")?,
            nationality: row.get("nationality")?,
            current_status: row.get("current_status")?,
            diagnosed_date: row.get("diagnosed_date")?,
            notes: row.get("notes")?,
            source: row.get("source")?,
        })
    }

    pub(crate) fn into_fields(self) -> TrackerResult<PatientFields> {
        let age = self
            .age
            .map(|age| {
                u8::try_from(age).map_err(|_| TrackerError::InvalidStoredValue {
                    field: "age",
                    value: age.to_string(),
                })
            })
            .transpose()?;

        Ok(PatientFields {
            name: self.name,
            age,
            gender: parse_stored("gender", self.gender, Gender::parse)?,
            detected_city: self.detected_city,
            detected_district: stored_text("detected_district", self.detected_district)?,
            detected_state: stored_text("detected_state", self.detected_state)?,
            nationality: self.nationality,
            current_status: parse_stored(
                "current_status",
                self.current_status,
                CurrentStatus::parse,
            )?,
            diagnosed_date: self.diagnosed_date,
            notes: self.notes,
            source: self.source,
        })
    }
}

fn stored_text(field: &'static str, value: String) -> TrackerResult<NonEmptyText> {
    NonEmptyText::new(&value).map_err(|_| TrackerError::InvalidStoredValue { field, value })
}

/// Bind values for [`FIELD_COLUMNS`].
pub(crate) fn field_values(fields: &PatientFields) -> Vec<Value> {
    fn text(value: &Option<String>) -> Value {
        value.clone().map(Value::Text).unwrap_or(Value::Null)
    }

    vec![
        text(&fields.name),
        fields
            .age
            .map(|age| Value::Integer(i64::from(age)))
            .unwrap_or(Value::Null),
        Value::Text(fields.gender.as_str().to_string()),
        text(&fields.detected_city),
        Value::Text(fields.detected_district.as_str().to_string()),
        Value::Text(fields.detected_state.as_str().to_string()),
        text(&fields.nationality),
        Value::Text(fields.current_status.as_str().to_string()),
        fields
            .diagnosed_date
            .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        text(&fields.notes),
        text(&fields.source),
    ]
}
