use crate::config::RestConfig;
use crate::session::SessionStore;
use std::sync::Arc;
use tracker_core::{
    CoreConfig, Database, ErrorReportService, PatientService, ReportService, ReviewService,
    StaffService,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub reports: ReportService,
    pub patients: PatientService,
    pub error_reports: ErrorReportService,
    pub staff: StaffService,
    pub review: ReviewService,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, rest: &RestConfig, db: Database) -> Self {
        Self {
            cfg,
            reports: ReportService::new(db.clone()),
            patients: PatientService::new(db.clone()),
            error_reports: ErrorReportService::new(db.clone()),
            staff: StaffService::new(db.clone()),
            review: ReviewService::new(db),
            sessions: SessionStore::new(rest.session_ttl(), rest.secure_cookies()),
        }
    }
}
