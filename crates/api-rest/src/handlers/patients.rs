//! Patient listing, export and detail, plus the staff list of filed corrections.

use crate::error::ApiError;
use crate::extract::StaffUser;
use crate::handlers::ListParams;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{error_report_res, messages_res, page_res, patient_res};
use api_shared::{ErrorReportFormRes, ErrorReportListRes, PatientDetailRes, PatientListRes};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracker_core::constants::PATIENT_FIELD_NAMES;
use tracker_core::{export, ExportFormat, PatientId};
use utoipa::IntoParams;

#[utoipa::path(
    get,
    path = "/patients",
    params(ListParams),
    responses(
        (status = 200, description = "One page of patients, or a file download with _export", body = PatientListRes),
        (status = 400, description = "Unknown filter value or export format"),
        (status = 500, description = "Internal server error")
    )
)]
/// List patients with filters, sorting and pagination. Also served at `/`.
///
/// With `_export`, the whole filtered and sorted table is returned as an attachment.
#[axum::debug_handler]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let export_format = params
        .export
        .as_deref()
        .map(|name| {
            ExportFormat::parse(name)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown export format '{name}'")))
        })
        .transpose()?;
    let query = params.into_query(state.cfg.page_size())?;

    if let Some(format) = export_format {
        let patients = state.patients.list_all(&query.filter, query.sort)?;
        let body = export::render(&patients, format)?;
        tracing::info!(format = format.name(), rows = patients.len(), "patient table exported");
        return Ok((
            [
                (CONTENT_TYPE, format.content_type().to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", format.file_name()),
                ),
            ],
            body,
        )
            .into_response());
    }

    let page = state.patients.list(&query)?;
    Ok(Json(PatientListRes {
        patients: page.items.iter().map(patient_res).collect(),
        pagination: page_res(&page),
        export_formats: ExportFormat::ALL
            .iter()
            .map(|f| f.name().to_string())
            .collect(),
        messages: messages_res(session.take_messages().await),
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient with the correction form seed", body = PatientDetailRes),
        (status = 404, description = "No such patient"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PatientId>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let patient = state.patients.get(id)?;
    Ok(Json(PatientDetailRes {
        patient: patient_res(&patient),
        error_form: ErrorReportFormRes {
            patient_id: patient.id,
            fields: PATIENT_FIELD_NAMES.iter().map(|f| f.to_string()).collect(),
        },
        messages: messages_res(session.take_messages().await),
    }))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ErrorReportParams {
    pub patient_id: Option<PatientId>,
}

#[utoipa::path(
    get,
    path = "/error-reports",
    params(ErrorReportParams),
    responses(
        (status = 200, description = "Filed corrections, newest first", body = ErrorReportListRes),
        (status = 303, description = "Not signed in as staff; redirect to /login"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn error_reports(
    State(state): State<AppState>,
    staff: StaffUser,
    Query(params): Query<ErrorReportParams>,
) -> Result<Json<ErrorReportListRes>, ApiError> {
    let reports = state.error_reports.list(params.patient_id)?;
    Ok(Json(ErrorReportListRes {
        error_reports: reports.iter().map(error_report_res).collect(),
        messages: messages_res(staff.session.take_messages().await),
    }))
}
