use crate::handlers::{auth, health, intake, patients, review};
use api_shared::{
    AddPatientRes, DistrictsReq, DistrictsRes, ErrorReportFormRes, ErrorReportListRes,
    ErrorReportRes, FieldSpecRes, FormErrorsRes, HealthRes, MessageRes, PageInfoRes, PageRes,
    PatientDetailRes, PatientFieldsRes, PatientListRes, PatientRes, ReportFormRes,
    ReportQueueRes, ReportRes, ReviewReportRes,
};
use utoipa::OpenApi;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        patients::index,
        patients::detail,
        patients::error_reports,
        intake::report_form,
        intake::submit_report,
        intake::thank_you,
        intake::districts,
        intake::report_error,
        auth::login_page,
        auth::login,
        auth::logout,
        review::report_queue,
        review::review_report,
        review::add_patient_form,
        review::add_patient,
        review::mark_report_invalid,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        PatientFieldsRes,
        ReportRes,
        PatientRes,
        ErrorReportRes,
        PageRes,
        ReportQueueRes,
        PatientListRes,
        ErrorReportFormRes,
        PatientDetailRes,
        ReviewReportRes,
        AddPatientRes,
        FormErrorsRes,
        DistrictsReq,
        DistrictsRes,
        ErrorReportListRes,
        FieldSpecRes,
        ReportFormRes,
        PageInfoRes,
    )),
    tags((name = "tracker", description = "Patient tracker"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/patients",
            "/patients/{id}",
            "/report",
            "/districts",
            "/report-error",
            "/login",
            "/logout",
            "/report-queue",
            "/review/{report_id}",
            "/add-patient",
            "/mark-invalid",
            "/error-reports",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
