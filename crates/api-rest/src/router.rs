use crate::handlers::{auth, health, intake, patients, review};
use crate::middleware::access_log;
use crate::openapi::ApiDoc;
use crate::session::load_session;
use crate::state::AppState;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the full site: public pages, staff review, login and the OpenAPI docs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(patients::index))
        .route("/patients", get(patients::index))
        .route("/patients/:id", get(patients::detail))
        .route("/report", get(intake::report_form).post(intake::submit_report))
        .route("/thank-you", get(intake::thank_you))
        .route("/districts", post(intake::districts))
        .route("/report-error", post(intake::report_error))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/report-queue", get(review::report_queue))
        .route("/review/:report_id", get(review::review_report))
        .route(
            "/add-patient",
            get(review::add_patient_form).post(review::add_patient),
        )
        .route("/mark-invalid", post(review::mark_report_invalid))
        .route("/error-reports", get(patients::error_reports))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.sessions.clone(), load_session))
        .layer(from_fn(access_log))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
