//! Conversions from core records to wire types.

use api_shared::{
    ErrorReportRes, FieldSpecRes, FormErrorsRes, MessageRes, PageRes, PatientFieldsRes,
    PatientRes, ReportRes,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use tracker_core::forms::{FieldSpec, FormData, FormErrors};
use tracker_core::{ErrorReport, Notice, Page, Patient, PatientFields, Report};

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn fields_res(fields: &PatientFields) -> PatientFieldsRes {
    PatientFieldsRes {
        name: fields.name.clone(),
        age: fields.age,
        gender: fields.gender.as_str().to_string(),
        detected_city: fields.detected_city.clone(),
        detected_district: fields.detected_district.as_str().to_string(),
        detected_state: fields.detected_state.as_str().to_string(),
        nationality: fields.nationality.clone(),
        current_status: fields.current_status.as_str().to_string(),
        diagnosed_date: fields
            .diagnosed_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
        notes: fields.notes.clone(),
        source: fields.source.clone(),
    }
}

pub fn report_res(report: &Report) -> ReportRes {
    ReportRes {
        id: report.id,
        fields: fields_res(&report.fields),
        report_state: report.report_state.as_str().to_string(),
        created_at: timestamp(&report.created_at),
        updated_at: timestamp(&report.updated_at),
    }
}

pub fn patient_res(patient: &Patient) -> PatientRes {
    PatientRes {
        id: patient.id,
        fields: fields_res(&patient.fields),
        derived_from_report: patient.derived_from_report,
        created_at: timestamp(&patient.created_at),
    }
}

pub fn error_report_res(report: &ErrorReport) -> ErrorReportRes {
    ErrorReportRes {
        id: report.id,
        patient_id: report.patient_id,
        error_fields: report
            .flagged_fields()
            .into_iter()
            .map(str::to_string)
            .collect(),
        corrections: report.corrections.clone(),
        created_at: timestamp(&report.created_at),
    }
}

pub fn page_res<T>(page: &Page<T>) -> PageRes {
    PageRes {
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        num_pages: page.num_pages(),
    }
}

pub fn messages_res(notices: Vec<Notice>) -> Vec<MessageRes> {
    notices
        .into_iter()
        .map(|n| MessageRes {
            level: n.level.as_str().to_string(),
            message: n.message,
        })
        .collect()
}

pub fn field_spec_res(spec: FieldSpec) -> FieldSpecRes {
    FieldSpecRes {
        name: spec.name.to_string(),
        label: spec.label.to_string(),
        kind: spec.kind.to_string(),
        required: spec.required,
        max_length: spec.max_length,
        choices: spec.choices.into_iter().map(str::to_string).collect(),
    }
}

/// 422 response re-rendering a rejected form.
pub fn invalid_form(form: &str, errors: FormErrors, data: &FormData) -> Response {
    tracing::debug!(form, fields = ?errors.as_map().keys().collect::<Vec<_>>(), "form rejected");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(FormErrorsRes {
            form: form.to_string(),
            errors: errors.into_map(),
            values: data.to_map(),
        }),
    )
        .into_response()
}
