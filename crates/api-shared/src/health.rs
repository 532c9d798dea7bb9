use crate::wire::HealthRes;

/// Health service shared by the REST API and the CLI.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static health check; no instance required.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Tracker is alive".into(),
        }
    }
}
