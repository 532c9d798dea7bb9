//! Domain records: reports, patients, error reports and staff accounts.
//!
//! Reports and patients share one set of demographic fields ([`PatientFields`]). A report is the
//! public, unverified submission; a patient is the confirmed record staff create from it.

use crate::{TrackerError, TrackerResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracker_types::NonEmptyText;

pub type ReportId = i64;
pub type PatientId = i64;
pub type ErrorReportId = i64;
pub type StaffId = i64;

// ============================================================================
// REPORT STATE MACHINE
// ============================================================================

/// Lifecycle state of a [`Report`].
///
/// ```text
/// REPORTED ──┬──> VERIFIED
///            ├──> CONVERTED
///            └──> INVALID
/// ```
///
/// Transitions are one-directional; nothing moves back to `Reported`, and the three resolved
/// states have no outgoing transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    #[default]
    Reported,
    Verified,
    Converted,
    Invalid,
}

impl ReportState {
    pub const ALL: [ReportState; 4] = [
        ReportState::Reported,
        ReportState::Verified,
        ReportState::Converted,
        ReportState::Invalid,
    ];

    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportState::Reported => "reported",
            ReportState::Verified => "verified",
            ReportState::Converted => "converted",
            ReportState::Invalid => "invalid",
        }
    }

    /// Parse the storage representation (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Whether the report has left the review queue.
    pub fn is_resolved(self) -> bool {
        !matches!(self, ReportState::Reported)
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: ReportState) -> bool {
        matches!(
            (self, next),
            (
                ReportState::Reported,
                ReportState::Verified | ReportState::Converted | ReportState::Invalid
            )
        )
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CHOICE FIELDS
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Other, Gender::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentStatus {
    #[default]
    Hospitalized,
    Recovered,
    Deceased,
    Migrated,
}

impl CurrentStatus {
    pub const ALL: [CurrentStatus; 4] = [
        CurrentStatus::Hospitalized,
        CurrentStatus::Recovered,
        CurrentStatus::Deceased,
        CurrentStatus::Migrated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrentStatus::Hospitalized => "hospitalized",
            CurrentStatus::Recovered => "recovered",
            CurrentStatus::Deceased => "deceased",
            CurrentStatus::Migrated => "migrated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CurrentStatus::Hospitalized => "Hospitalized",
            CurrentStatus::Recovered => "Recovered",
            CurrentStatus::Deceased => "Deceased",
            CurrentStatus::Migrated => "Migrated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// Demographic and location fields shared by reports and patients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: Gender,
    pub detected_city: Option<String>,
    pub detected_district: NonEmptyText,
    pub detected_state: NonEmptyText,
    pub nationality: Option<String>,
    pub current_status: CurrentStatus,
    pub diagnosed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl PatientFields {
    /// Minimal field set with only the required location filled in.
    pub fn new(detected_district: NonEmptyText, detected_state: NonEmptyText) -> Self {
        Self {
            name: None,
            age: None,
            gender: Gender::default(),
            detected_city: None,
            detected_district,
            detected_state,
            nationality: None,
            current_status: CurrentStatus::default(),
            diagnosed_date: None,
            notes: None,
            source: None,
        }
    }
}

/// A candidate patient sighting submitted by the public.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub fields: PatientFields,
    pub report_state: ReportState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A confirmed patient record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub fields: PatientFields,
    /// The report this patient was converted from. A copied marker, not a foreign key.
    pub derived_from_report: Option<ReportId>,
    pub created_at: DateTime<Utc>,
}

/// An unsaved patient, prepared while staff is still editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientDraft {
    pub fields: PatientFields,
    pub derived_from_report: Option<ReportId>,
}

impl Patient {
    /// Builds an unsaved draft pre-populated from a report.
    pub fn from_report(report: &Report) -> PatientDraft {
        PatientDraft {
            fields: report.fields.clone(),
            derived_from_report: Some(report.id),
        }
    }
}

/// A correction request filed against a patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
    pub id: ErrorReportId,
    /// Referenced patient. Not enforced as a foreign key.
    pub patient_id: PatientId,
    /// Flagged field names joined with [`crate::constants::ERROR_FIELDS_SEPARATOR`].
    pub error_fields: String,
    pub corrections: String,
    pub created_at: DateTime<Utc>,
}

impl ErrorReport {
    /// The flagged field names, in the order they were submitted.
    pub fn flagged_fields(&self) -> Vec<&str> {
        self.error_fields
            .split(crate::constants::ERROR_FIELDS_SEPARATOR)
            .filter(|f| !f.is_empty())
            .collect()
    }
}

/// A validated, not yet persisted error report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewErrorReport {
    pub patient_id: PatientId,
    pub error_fields: Vec<String>,
    pub corrections: NonEmptyText,
}

impl NewErrorReport {
    /// The persisted form of the flagged fields.
    pub fn joined_error_fields(&self) -> String {
        self.error_fields
            .join(crate::constants::ERROR_FIELDS_SEPARATOR)
    }
}

/// A user account able to sign in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Staff {
    pub id: StaffId,
    pub username: NonEmptyText,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn parse_stored<T>(
    field: &'static str,
    value: String,
    parse: impl FnOnce(&str) -> Option<T>,
) -> TrackerResult<T> {
    parse(&value).ok_or(TrackerError::InvalidStoredValue { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PatientFields {
        PatientFields::new(
            NonEmptyText::new("Pune").unwrap(),
            NonEmptyText::new("Maharashtra").unwrap(),
        )
    }

    #[test]
    fn test_reported_can_move_to_every_resolved_state() {
        for next in [
            ReportState::Verified,
            ReportState::Converted,
            ReportState::Invalid,
        ] {
            assert!(ReportState::Reported.can_transition_to(next), "{next}");
        }
    }

    #[test]
    fn test_no_transition_leaves_a_resolved_state() {
        for from in [
            ReportState::Verified,
            ReportState::Converted,
            ReportState::Invalid,
        ] {
            assert!(from.is_resolved());
            for next in ReportState::ALL {
                assert!(
                    !from.can_transition_to(next),
                    "{from} -> {next} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_nothing_transitions_back_to_reported() {
        for from in ReportState::ALL {
            assert!(!from.can_transition_to(ReportState::Reported));
        }
    }

    #[test]
    fn test_choice_parsing_is_case_insensitive() {
        assert_eq!(ReportState::parse("CONVERTED"), Some(ReportState::Converted));
        assert_eq!(Gender::parse(" Female "), Some(Gender::Female));
        assert_eq!(CurrentStatus::parse("Recovered"), Some(CurrentStatus::Recovered));
        assert_eq!(CurrentStatus::parse("cured"), None);
    }

    #[test]
    fn test_from_report_copies_fields_and_marks_origin() {
        let now = Utc::now();
        let mut report_fields = fields();
        report_fields.name = Some("A. Kumar".into());
        report_fields.age = Some(42);
        let report = Report {
            id: 7,
            fields: report_fields.clone(),
            report_state: ReportState::Reported,
            created_at: now,
            updated_at: now,
        };

        let draft = Patient::from_report(&report);
        assert_eq!(draft.fields, report_fields);
        assert_eq!(draft.derived_from_report, Some(7));
    }

    #[test]
    fn test_flagged_fields_splits_joined_names() {
        let report = ErrorReport {
            id: 1,
            patient_id: 3,
            error_fields: "age,name".into(),
            corrections: "Age is 43".into(),
            created_at: Utc::now(),
        };
        assert_eq!(report.flagged_fields(), vec!["age", "name"]);
    }
}
