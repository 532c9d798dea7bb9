use crate::config::RestConfig;
use crate::router::router;
use crate::state::AppState;
use api_shared::auth::hash_password_with_iterations;
use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tracker_core::{
    CoreConfig, Database, ListQuery, PatientDraft, PatientFields, Report, ReportState,
};
use tracker_types::NonEmptyText;

const REPORT_FORM: &str = "name=Asha&age=34&gender=female&detected_city=Pune\
    &detected_district=Pune&detected_state=Maharashtra&current_status=hospitalized";

struct TestApp {
    app: Router,
    state: AppState,
    cookie: Option<String>,
}

impl TestApp {
    fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        let cfg = Arc::new(CoreConfig::new("unused.sqlite3".into(), 25).unwrap());
        let rest = RestConfig::new(
            "127.0.0.1:0".parse().unwrap(),
            Duration::from_secs(3600),
            false,
        );
        let state = AppState::new(cfg, &rest, db);
        Self {
            app: router(state.clone()),
            state,
            cookie: None,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        if let Some(set) = response.headers().get(SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = if pair.ends_with('=') { None } else { Some(pair) };
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        self.send(Method::POST, uri, Some(form)).await
    }

    async fn log_in_as_staff(&mut self) {
        self.state
            .staff
            .create(
                NonEmptyText::new("reviewer").unwrap(),
                staff_password_hash(),
                true,
            )
            .unwrap();
        let response = self
            .post("/login", "username=reviewer&password=s3cret")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/report-queue");
        assert!(self.cookie.is_some());
    }

    fn seed_report(&self) -> Report {
        let fields = PatientFields::new(
            NonEmptyText::new("Pune").unwrap(),
            NonEmptyText::new("Maharashtra").unwrap(),
        );
        self.state.reports.submit(fields).unwrap()
    }

    fn report_state(&self, report: &Report) -> ReportState {
        self.state.reports.get(report.id).unwrap().report_state
    }

    fn patient_count(&self) -> u64 {
        self.state.patients.count().unwrap()
    }
}

fn staff_password_hash() -> String {
    hash_password_with_iterations("s3cret", 1_000)
}

async fn json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], to);
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["ok"], true);
}

#[tokio::test]
async fn test_submitted_report_is_queued_as_reported() {
    let mut app = TestApp::new();
    let response = app.post("/report", REPORT_FORM).await;
    assert_redirect(&response, "/thank-you");

    let queue = app.state.reports.queue(&ListQuery::first_page(25)).unwrap();
    assert_eq!(queue.total, 1);
    assert_eq!(queue.items[0].report_state, ReportState::Reported);
    assert_eq!(queue.items[0].fields.detected_district.as_str(), "Pune");
}

#[tokio::test]
async fn test_invalid_report_is_rejected_with_field_errors() {
    let mut app = TestApp::new();
    let response = app.post("/report", "name=Asha&age=200").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json(response).await;
    assert_eq!(body["form"], "report");
    assert!(body["errors"]["age"].is_array());
    assert!(body["errors"]["detected_state"].is_array());
    assert_eq!(body["values"]["name"][0], "Asha");
    assert_eq!(
        app.state.reports.queue(&ListQuery::first_page(25)).unwrap().total,
        0
    );
}

#[tokio::test]
async fn test_staff_pages_redirect_anonymous_visitors_to_login() {
    let mut app = TestApp::new();
    let response = app.get("/report-queue?page=2").await;
    assert_redirect(&response, "/login?next=/report-queue%3Fpage%3D2");

    let response = app.post("/mark-invalid", "").await;
    assert_redirect(&response, "/login?next=/mark-invalid");
}

#[tokio::test]
async fn test_wrong_password_is_rejected_without_echoing_it() {
    let mut app = TestApp::new();
    app.state
        .staff
        .create(NonEmptyText::new("reviewer").unwrap(), staff_password_hash(), true)
        .unwrap();

    let response = app.post("/login", "username=reviewer&password=guess").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert!(body["errors"]["__all__"].is_array());
    assert!(body["values"].get("password").is_none());
    assert!(app.cookie.is_none());
}

#[tokio::test]
async fn test_login_issues_a_new_session_id() {
    let mut app = TestApp::new();
    app.state
        .staff
        .create(NonEmptyText::new("reviewer").unwrap(), staff_password_hash(), true)
        .unwrap();

    // A rejected correction stores a flash message, so the anonymous session gets a cookie.
    app.post("/report-error", "patient_id=0").await;
    let before = app.cookie.clone().expect("anonymous session cookie");

    app.post("/login", "username=reviewer&password=s3cret").await;
    let after = app.cookie.clone().expect("signed-in session cookie");
    assert_ne!(before, after);

    // The flash message moved with the session.
    let body = json(app.get("/report-queue").await).await;
    assert_eq!(body["messages"][0]["level"], "error");

    let mut replay = TestApp {
        app: app.app.clone(),
        state: app.state.clone(),
        cookie: Some(before),
    };
    assert_redirect(&replay.get("/report-queue").await, "/login?next=/report-queue");
}

#[tokio::test]
async fn test_login_follows_safe_next() {
    let mut app = TestApp::new();
    app.state
        .staff
        .create(NonEmptyText::new("reviewer").unwrap(), staff_password_hash(), true)
        .unwrap();
    let response = app
        .post(
            "/login",
            "username=reviewer&password=s3cret&next=%2Ferror-reports",
        )
        .await;
    assert_redirect(&response, "/error-reports");
}

#[tokio::test]
async fn test_opening_a_second_report_replaces_the_first() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let first = app.seed_report();
    let second = app.seed_report();

    assert_eq!(app.get(&format!("/review/{}", first.id)).await.status(), StatusCode::OK);
    assert_eq!(app.get(&format!("/review/{}", second.id)).await.status(), StatusCode::OK);

    let response = app.get("/add-patient").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["report_id"], second.id);
    assert_eq!(body["derived_from_report"], second.id);
    assert_eq!(body["initial"]["detected_state"], "Maharashtra");
}

#[tokio::test]
async fn test_reviewing_a_missing_report_is_not_found() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let response = app.get("/review/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_add_patient_submit_converts_the_report() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app
        .post("/add-patient", &format!("{REPORT_FORM}&submit=Save"))
        .await;
    assert_redirect(&response, "/report-queue");

    assert_eq!(app.patient_count(), 1);
    assert_eq!(app.report_state(&report), ReportState::Converted);
    let patients = app
        .state
        .patients
        .list(&ListQuery::first_page(25))
        .unwrap();
    assert_eq!(patients.items[0].derived_from_report, Some(report.id));
    assert_eq!(patients.items[0].fields.name.as_deref(), Some("Asha"));

    // Slot cleared.
    assert_redirect(&app.get("/add-patient").await, "/report-queue");

    let queue = json(app.get("/report-queue").await).await;
    assert_eq!(queue["messages"][0]["level"], "success");
    assert_eq!(queue["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_add_patient_mark_verified_creates_no_patient() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app
        .post("/add-patient", &format!("{REPORT_FORM}&mark_verified=1"))
        .await;
    assert_redirect(&response, "/report-queue");

    assert_eq!(app.patient_count(), 0);
    assert_eq!(app.report_state(&report), ReportState::Verified);
    assert_redirect(&app.get("/add-patient").await, "/report-queue");
}

#[tokio::test]
async fn test_add_patient_submit_wins_over_mark_verified() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    app.post(
        "/add-patient",
        &format!("{REPORT_FORM}&mark_verified=1&submit=Save"),
    )
    .await;
    assert_eq!(app.patient_count(), 1);
    assert_eq!(app.report_state(&report), ReportState::Converted);
}

#[tokio::test]
async fn test_add_patient_keeps_the_slot_when_the_form_is_invalid() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app.post("/add-patient", "name=Asha&submit=Save").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.patient_count(), 0);
    assert_eq!(app.report_state(&report), ReportState::Reported);
    assert_eq!(app.get("/add-patient").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_patient_without_a_button_closes_the_review() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app.post("/add-patient", REPORT_FORM).await;
    assert_redirect(&response, "/report-queue");

    assert_eq!(app.patient_count(), 0);
    assert_eq!(app.report_state(&report), ReportState::Reported);
    assert_redirect(&app.get("/add-patient").await, "/report-queue");
}

#[tokio::test]
async fn test_mark_invalid_without_open_review_changes_nothing() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();

    let response = app.post("/mark-invalid", "").await;
    assert_redirect(&response, "/report-queue");
    assert_eq!(app.report_state(&report), ReportState::Reported);
    assert_eq!(app.patient_count(), 0);
}

#[tokio::test]
async fn test_mark_invalid_with_open_review() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app.post("/mark-invalid", "").await;
    assert_redirect(&response, "/report-queue");
    assert_eq!(app.report_state(&report), ReportState::Invalid);
    assert_eq!(app.patient_count(), 0);
    assert_redirect(&app.get("/add-patient").await, "/report-queue");
}

#[tokio::test]
async fn test_stale_resolution_warns_and_clears_the_slot() {
    let mut first = TestApp::new();
    first.log_in_as_staff().await;
    let report = first.seed_report();
    first.get(&format!("/review/{}", report.id)).await;

    // A second reviewer on the same server resolves it first.
    let mut second = TestApp {
        app: first.app.clone(),
        state: first.state.clone(),
        cookie: None,
    };
    second
        .post("/login", "username=reviewer&password=s3cret")
        .await;
    second.get(&format!("/review/{}", report.id)).await;
    second.post("/mark-invalid", "").await;

    let response = first
        .post("/add-patient", &format!("{REPORT_FORM}&submit=Save"))
        .await;
    assert_redirect(&response, "/report-queue");
    assert_eq!(first.patient_count(), 0);
    assert_eq!(first.report_state(&report), ReportState::Invalid);

    let queue = json(first.get("/report-queue").await).await;
    assert_eq!(queue["messages"][0]["level"], "warning");
    assert_redirect(&first.get("/add-patient").await, "/report-queue");
}

#[tokio::test]
async fn test_district_lookup() {
    let mut app = TestApp::new();
    for state in ["Maharashtra", "maharashtra", "MAHARASHTRA"] {
        let body = json(app.post("/districts", &format!("state={state}")).await).await;
        assert_eq!(body["success"], true);
        let districts = body["districts"].as_array().unwrap();
        assert!(districts.iter().any(|d| d == "Pune"));
    }

    let body = json(app.post("/districts", "state=Atlantis").await).await;
    assert_eq!(body["success"], false);
    assert!(body.get("districts").is_none());

    let body = json(app.post("/districts", "").await).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_report_error_joins_flagged_fields_in_order() {
    let mut app = TestApp::new();
    let response = app
        .post(
            "/report-error",
            "patient_id=7&errors=age&errors=name&correction=Age+is+43",
        )
        .await;
    assert_redirect(&response, "/patients/7");

    let stored = app.state.error_reports.list(Some(7)).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].error_fields, "age,name");
    assert_eq!(stored[0].corrections, "Age is 43");
}

#[tokio::test]
async fn test_invalid_report_error_redirects_home_with_error_notice() {
    let mut app = TestApp::new();
    let response = app.post("/report-error", "patient_id=0&correction=x").await;
    assert_redirect(&response, "/");
    assert!(app.state.error_reports.list(None).unwrap().is_empty());

    let body = json(app.get("/").await).await;
    assert_eq!(body["messages"][0]["level"], "error");
}

#[tokio::test]
async fn test_patient_detail_and_listing() {
    let mut app = TestApp::new();
    let patient = app
        .state
        .patients
        .create(&PatientDraft {
            fields: PatientFields::new(
                NonEmptyText::new("Pune").unwrap(),
                NonEmptyText::new("Maharashtra").unwrap(),
            ),
            derived_from_report: None,
        })
        .unwrap();

    let body = json(app.get(&format!("/patients/{}", patient.id)).await).await;
    assert_eq!(body["patient"]["id"], patient.id);
    assert_eq!(body["error_form"]["patient_id"], patient.id);

    assert_eq!(app.get("/patients/999").await.status(), StatusCode::NOT_FOUND);

    let body = json(app.get("/patients?detected_state=Maharashtra").await).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(
        app.get("/patients?gender=robot").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_export_downloads_the_table() {
    let mut app = TestApp::new();
    app.state
        .patients
        .create(&PatientDraft {
            fields: PatientFields::new(
                NonEmptyText::new("Pune").unwrap(),
                NonEmptyText::new("Maharashtra").unwrap(),
            ),
            derived_from_report: None,
        })
        .unwrap();

    let response = app.get("/?_export=csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"table.csv\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("ID,Name,Age"));
    assert!(text.contains("Maharashtra"));

    assert_eq!(
        app.get("/?_export=xlsx").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let mut app = TestApp::new();
    app.log_in_as_staff().await;
    let report = app.seed_report();
    app.get(&format!("/review/{}", report.id)).await;

    let response = app.get("/logout").await;
    assert_redirect(&response, "/");
    assert!(app.cookie.is_none());
    assert_redirect(&app.get("/report-queue").await, "/login?next=/report-queue");
}
