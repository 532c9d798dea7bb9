//! JSON request and response bodies.
//!
//! Timestamps are RFC 3339 strings and dates are `YYYY-MM-DD`. Enumerations travel as their
//! lowercase storage names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A flash notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    /// `success`, `info`, `warning` or `error`.
    pub level: String,
    pub message: String,
}

/// Demographic and location fields shared by reports and patients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientFieldsRes {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: String,
    pub detected_city: Option<String>,
    pub detected_district: String,
    pub detected_state: String,
    pub nationality: Option<String>,
    pub current_status: String,
    pub diagnosed_date: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub id: i64,
    pub fields: PatientFieldsRes,
    pub report_state: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: i64,
    pub fields: PatientFieldsRes,
    pub derived_from_report: Option<i64>,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorReportRes {
    pub id: i64,
    pub patient_id: i64,
    pub error_fields: Vec<String>,
    pub corrections: String,
    pub created_at: String,
}

/// Pagination details of a listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageRes {
    pub page: usize,
    pub per_page: usize,
    pub total: u64,
    pub num_pages: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportQueueRes {
    pub reports: Vec<ReportRes>,
    pub pagination: PageRes,
    pub messages: Vec<MessageRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientListRes {
    pub patients: Vec<PatientRes>,
    pub pagination: PageRes,
    /// Values accepted by the `_export` query parameter.
    pub export_formats: Vec<String>,
    pub messages: Vec<MessageRes>,
}

/// Seed for the correction form on a patient's page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorReportFormRes {
    pub patient_id: i64,
    /// Field names that may be flagged.
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDetailRes {
    pub patient: PatientRes,
    pub error_form: ErrorReportFormRes,
    pub messages: Vec<MessageRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewReportRes {
    pub report: ReportRes,
    pub messages: Vec<MessageRes>,
}

/// The add-patient form, pre-populated from the report under review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddPatientRes {
    pub report_id: i64,
    pub draft: PatientFieldsRes,
    pub derived_from_report: Option<i64>,
    /// Initial form values keyed by field name.
    pub initial: BTreeMap<String, String>,
    pub messages: Vec<MessageRes>,
}

/// A rejected form submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormErrorsRes {
    pub form: String,
    /// Messages keyed by field name; `__all__` holds errors not tied to a field.
    pub errors: BTreeMap<String, Vec<String>>,
    /// The submitted values, echoed back.
    pub values: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistrictsReq {
    pub state: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistrictsRes {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub districts: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorReportListRes {
    pub error_reports: Vec<ErrorReportRes>,
    pub messages: Vec<MessageRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldSpecRes {
    pub name: String,
    pub label: String,
    /// `text`, `integer`, `choice` or `date`.
    pub kind: String,
    pub required: bool,
    pub max_length: Option<usize>,
    pub choices: Vec<String>,
}

/// The public report form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportFormRes {
    pub fields: Vec<FieldSpecRes>,
    /// States with a known district list (see `POST /districts`).
    pub states: Vec<String>,
    pub messages: Vec<MessageRes>,
}

/// Pages with no content of their own (thank-you, login).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageInfoRes {
    pub page: String,
    /// Signed-in username, if any.
    pub user: Option<String>,
    /// Where a successful login will redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub messages: Vec<MessageRes>,
}
