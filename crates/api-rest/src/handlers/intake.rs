//! Public pages: report submission, the thank-you page, district lookup and corrections.

use crate::session::Session;
use crate::state::AppState;
use crate::views::{field_spec_res, invalid_form, messages_res};
use crate::error::ApiError;
use api_shared::{DistrictsReq, DistrictsRes, FieldSpecRes, FormErrorsRes, PageInfoRes, ReportFormRes};
use axum::extract::State;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use tracker_core::districts::{districts_for_state, known_states};
use tracker_core::forms::{patient_field_specs, ErrorReportForm, FormData, ReportForm};
use tracker_core::notice::{self, Notice};

#[utoipa::path(
    get,
    path = "/report",
    responses(
        (status = 200, description = "Report form description", body = ReportFormRes)
    )
)]
/// Describe the public report form: its fields and the states with known districts.
#[axum::debug_handler]
pub async fn report_form(session: Session) -> Json<ReportFormRes> {
    Json(ReportFormRes {
        fields: patient_field_specs()
            .into_iter()
            .map(field_spec_res)
            .collect::<Vec<FieldSpecRes>>(),
        states: known_states().map(str::to_string).collect(),
        messages: messages_res(session.take_messages().await),
    })
}

#[utoipa::path(
    post,
    path = "/report",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Patient fields"),
    responses(
        (status = 303, description = "Report stored; redirect to /thank-you"),
        (status = 422, description = "Validation failed", body = FormErrorsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Submit a report.
///
/// The district is accepted as submitted. A stored report always starts in the `reported`
/// state.
#[axum::debug_handler]
pub async fn submit_report(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let data = FormData::new(pairs);
    match ReportForm::validate(&data) {
        Ok(fields) => {
            state.reports.submit(fields)?;
            Ok(Redirect::to("/thank-you").into_response())
        }
        Err(errors) => Ok(invalid_form(ReportForm::NAME, errors, &data)),
    }
}

#[utoipa::path(
    get,
    path = "/thank-you",
    responses(
        (status = 200, description = "Thank-you page", body = PageInfoRes)
    )
)]
#[axum::debug_handler]
pub async fn thank_you(session: Session) -> Json<PageInfoRes> {
    Json(PageInfoRes {
        page: "thank_you".into(),
        user: session.user().await.map(|u| u.username),
        next: None,
        messages: messages_res(session.take_messages().await),
    })
}

#[utoipa::path(
    post,
    path = "/districts",
    request_body(content = DistrictsReq, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Districts of the state, or success=false", body = DistrictsRes)
    )
)]
/// Look up the districts of a state (case-insensitive).
#[axum::debug_handler]
pub async fn districts(Form(req): Form<DistrictsReq>) -> Json<DistrictsRes> {
    let found = req.state.as_deref().and_then(districts_for_state);
    Json(DistrictsRes {
        success: found.is_some(),
        districts: found.map(|d| d.iter().map(|s| s.to_string()).collect()),
    })
}

#[utoipa::path(
    post,
    path = "/report-error",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "patient_id, repeated errors, correction"),
    responses(
        (status = 303, description = "Redirect to the patient page, or to / if the form was invalid"),
        (status = 500, description = "Internal server error")
    )
)]
/// File a correction against a patient.
///
/// The patient id is only checked to be a positive integer.
#[axum::debug_handler]
pub async fn report_error(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError> {
    let data = FormData::new(pairs);
    match ErrorReportForm::validate(&data) {
        Ok(report) => {
            let stored = state.error_reports.file(&report)?;
            session
                .notify(Notice::success(notice::CORRECTION_RECEIVED))
                .await;
            Ok(Redirect::to(&format!("/patients/{}", stored.patient_id)))
        }
        Err(errors) => {
            tracing::debug!(errors = ?errors.as_map(), "correction rejected");
            session
                .notify(Notice::error(notice::CORRECTION_REJECTED))
                .await;
            Ok(Redirect::to("/"))
        }
    }
}
