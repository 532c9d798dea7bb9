//! The staff review workflow: open a report, then resolve it exactly once.
//!
//! The per-session "currently reviewing" slot lives with the HTTP session; callers pass its
//! value in as `slot` and clear it when [`ReviewOutcome::clears_slot`] says so. A resolution only
//! applies while the report is still [`ReportState::Reported`]. Converting inserts the patient
//! and moves the report in one transaction.

use crate::db::Database;
use crate::forms::FormData;
use crate::models::{Patient, PatientDraft, PatientFields, PatientId, Report, ReportId, ReportState};
use crate::notice::{self, Notice};
use crate::repositories::reports::{self, Transition};
use crate::repositories::patients;
use crate::{TrackerError, TrackerResult};
use chrono::Utc;

/// Which button was pressed on the add-patient form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewIntent {
    Submit,
    MarkVerified,
}

impl ReviewIntent {
    /// `submit` wins when both keys are present.
    pub fn from_form(data: &FormData) -> Option<Self> {
        if data.contains("submit") {
            Some(ReviewIntent::Submit)
        } else if data.contains("mark_verified") {
            Some(ReviewIntent::MarkVerified)
        } else {
            None
        }
    }
}

/// How staff resolve the report in the review slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Save a patient with these fields and mark the report converted.
    Convert(PatientFields),
    MarkVerified,
    MarkInvalid,
}

impl Resolution {
    /// Resolution for an add-patient POST whose form validated to `fields`.
    pub fn from_intent(intent: ReviewIntent, fields: PatientFields) -> Self {
        match intent {
            ReviewIntent::Submit => Resolution::Convert(fields),
            ReviewIntent::MarkVerified => Resolution::MarkVerified,
        }
    }

    pub fn target_state(&self) -> ReportState {
        match self {
            Resolution::Convert(_) => ReportState::Converted,
            Resolution::MarkVerified => ReportState::Verified,
            Resolution::MarkInvalid => ReportState::Invalid,
        }
    }

    fn notice(&self) -> Notice {
        match self {
            Resolution::Convert(_) => Notice::success(notice::PATIENT_ADDED),
            Resolution::MarkVerified => Notice::info(notice::REPORT_VERIFIED),
            Resolution::MarkInvalid => Notice::success(notice::REPORT_INVALID),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The session had no report under review. Nothing changed.
    NoActiveReview,
    /// The report moved to `new_state`; `patient_id` is set for conversions.
    Resolved {
        report_id: ReportId,
        new_state: ReportState,
        patient_id: Option<PatientId>,
        notice: Notice,
    },
    /// Someone else resolved the report first. Nothing changed.
    AlreadyResolved {
        report_id: ReportId,
        state: ReportState,
        notice: Notice,
    },
}

impl ReviewOutcome {
    /// Whether the caller must empty the review slot.
    pub fn clears_slot(&self) -> bool {
        !matches!(self, ReviewOutcome::NoActiveReview)
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ReviewOutcome::NoActiveReview => None,
            ReviewOutcome::Resolved { notice, .. } | ReviewOutcome::AlreadyResolved { notice, .. } => {
                Some(notice)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load the report staff want to review. The caller stores its id in the review slot.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ReportNotFound` if the report does not exist.
    pub fn open(&self, report_id: ReportId) -> TrackerResult<Report> {
        let report = self
            .db
            .with_conn(|conn| reports::find_in(conn, report_id))?
            .ok_or(TrackerError::ReportNotFound(report_id))?;
        tracing::debug!(report_id, state = %report.report_state, "report opened for review");
        Ok(report)
    }

    /// The report in the slot and an unsaved patient drafted from it.
    ///
    /// Returns `Ok(None)` when the slot is empty.
    pub fn draft(&self, slot: Option<ReportId>) -> TrackerResult<Option<(Report, PatientDraft)>> {
        let Some(report_id) = slot else {
            return Ok(None);
        };
        let report = self.open(report_id)?;
        let draft = Patient::from_report(&report);
        Ok(Some((report, draft)))
    }

    /// Apply `resolution` to the report in the slot.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ReportNotFound` if the slot points at a missing report, or a
    /// database error. On error nothing is written.
    pub fn resolve(
        &self,
        slot: Option<ReportId>,
        resolution: Resolution,
    ) -> TrackerResult<ReviewOutcome> {
        let Some(report_id) = slot else {
            return Ok(ReviewOutcome::NoActiveReview);
        };

        let now = Utc::now();
        let target = resolution.target_state();
        let notice = resolution.notice();

        let outcome = self.db.with_transaction(|tx| {
            match reports::transition_in(tx, report_id, target, now)? {
                Transition::Rejected { current } => Ok(ReviewOutcome::AlreadyResolved {
                    report_id,
                    state: current,
                    notice: Notice::warning(format!(
                        "Report {report_id} has already been marked as {current}."
                    )),
                }),
                Transition::Applied { .. } => {
                    let patient_id = match resolution {
                        Resolution::Convert(fields) => {
                            let draft = PatientDraft {
                                fields,
                                derived_from_report: Some(report_id),
                            };
                            Some(patients::insert(tx, &draft, now)?.id)
                        }
                        Resolution::MarkVerified | Resolution::MarkInvalid => None,
                    };
                    Ok(ReviewOutcome::Resolved {
                        report_id,
                        new_state: target,
                        patient_id,
                        notice,
                    })
                }
            }
        })?;

        match &outcome {
            ReviewOutcome::Resolved {
                new_state,
                patient_id,
                ..
            } => tracing::info!(report_id, %new_state, ?patient_id, "report resolved"),
            ReviewOutcome::AlreadyResolved { state, .. } => tracing::warn!(
                report_id,
                %state,
                requested = %target,
                "stale resolution ignored"
            ),
            ReviewOutcome::NoActiveReview => {}
        }

        Ok(outcome)
    }
}
