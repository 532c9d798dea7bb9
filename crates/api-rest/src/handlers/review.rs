//! Staff review: the report queue, opening a report, and resolving it.

use crate::error::ApiError;
use crate::extract::StaffUser;
use crate::handlers::ListParams;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{fields_res, invalid_form, messages_res, page_res, report_res};
use api_shared::{AddPatientRes, FormErrorsRes, ReportQueueRes, ReviewReportRes};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use tracker_core::forms::{FormData, PatientForm};
use tracker_core::{ReportId, Resolution, ReviewIntent, ReviewOutcome};

const QUEUE: &str = "/report-queue";

#[utoipa::path(
    get,
    path = "/report-queue",
    params(ListParams),
    responses(
        (status = 200, description = "Reports awaiting review", body = ReportQueueRes),
        (status = 303, description = "Not signed in as staff; redirect to /login"),
        (status = 400, description = "Unknown filter value"),
        (status = 500, description = "Internal server error")
    )
)]
/// List reports still awaiting review, with the same filters and sorting as the patient list.
#[axum::debug_handler]
pub async fn report_queue(
    State(state): State<AppState>,
    staff: StaffUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ReportQueueRes>, ApiError> {
    let query = params.into_query(state.cfg.page_size())?;
    let page = state.reports.queue(&query)?;
    Ok(Json(ReportQueueRes {
        reports: page.items.iter().map(report_res).collect(),
        pagination: page_res(&page),
        messages: messages_res(staff.session.take_messages().await),
    }))
}

#[utoipa::path(
    get,
    path = "/review/{report_id}",
    params(("report_id" = i64, Path, description = "Report id")),
    responses(
        (status = 200, description = "The report, now held in this session's review slot", body = ReviewReportRes),
        (status = 303, description = "Not signed in as staff; redirect to /login"),
        (status = 404, description = "No such report"),
        (status = 500, description = "Internal server error")
    )
)]
/// Open a report for review.
///
/// Replaces whatever report this session was reviewing before. Other sessions are not affected.
#[axum::debug_handler]
pub async fn review_report(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(report_id): Path<ReportId>,
) -> Result<Json<ReviewReportRes>, ApiError> {
    let report = state.review.open(report_id)?;
    staff.session.start_review(report.id).await;
    Ok(Json(ReviewReportRes {
        report: report_res(&report),
        messages: messages_res(staff.session.take_messages().await),
    }))
}

#[utoipa::path(
    get,
    path = "/add-patient",
    responses(
        (status = 200, description = "Patient form pre-populated from the report under review", body = AddPatientRes),
        (status = 303, description = "No report under review; redirect to the queue"),
        (status = 404, description = "The report under review no longer exists"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn add_patient_form(
    State(state): State<AppState>,
    staff: StaffUser,
) -> Result<Response, ApiError> {
    let slot = staff.session.reviewing_report().await;
    let Some((report, draft)) = state.review.draft(slot)? else {
        return Ok(Redirect::to(QUEUE).into_response());
    };
    Ok(Json(AddPatientRes {
        report_id: report.id,
        draft: fields_res(&draft.fields),
        derived_from_report: draft.derived_from_report,
        initial: PatientForm::initial(&draft.fields),
        messages: messages_res(staff.session.take_messages().await),
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/add-patient",
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "Patient fields plus either `submit` or `mark_verified`"),
    responses(
        (status = 303, description = "Resolved, closed without a resolution, or no report under review; redirect to the queue"),
        (status = 404, description = "The report under review no longer exists"),
        (status = 422, description = "Validation failed", body = FormErrorsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Resolve the report under review as a new patient (`submit`) or as verified (`mark_verified`).
///
/// Both buttons submit the whole patient form and both require it to validate. A valid form
/// carrying neither button closes the review and leaves the report as it was.
#[axum::debug_handler]
pub async fn add_patient(
    State(state): State<AppState>,
    staff: StaffUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let slot = staff.session.reviewing_report().await;
    if state.review.draft(slot)?.is_none() {
        return Ok(Redirect::to(QUEUE).into_response());
    }

    let data = FormData::new(pairs);
    let fields = match PatientForm::validate(&data) {
        Ok(fields) => fields,
        Err(errors) => return Ok(invalid_form(PatientForm::NAME, errors, &data)),
    };
    let Some(intent) = ReviewIntent::from_form(&data) else {
        // Neither button: the review ends without touching the report.
        let released = staff.session.finish_review().await;
        tracing::info!(report_id = ?released, "review closed without a resolution");
        return Ok(Redirect::to(QUEUE).into_response());
    };

    let outcome = state
        .review
        .resolve(slot, Resolution::from_intent(intent, fields))?;
    Ok(finish(&staff.session, outcome).await)
}

#[utoipa::path(
    post,
    path = "/mark-invalid",
    responses(
        (status = 303, description = "Redirect to the queue"),
        (status = 404, description = "The report under review no longer exists"),
        (status = 500, description = "Internal server error")
    )
)]
/// Mark the report under review as invalid. Does nothing without a report under review.
#[axum::debug_handler]
pub async fn mark_report_invalid(
    State(state): State<AppState>,
    staff: StaffUser,
) -> Result<Response, ApiError> {
    let slot = staff.session.reviewing_report().await;
    let outcome = state.review.resolve(slot, Resolution::MarkInvalid)?;
    Ok(finish(&staff.session, outcome).await)
}

async fn finish(session: &Session, outcome: ReviewOutcome) -> Response {
    if outcome.clears_slot() {
        session.finish_review().await;
    }
    if let Some(notice) = outcome.notice() {
        session.notify(notice.clone()).await;
    }
    Redirect::to(QUEUE).into_response()
}
