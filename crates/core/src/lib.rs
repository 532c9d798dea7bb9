//! # Tracker Core
//!
//! Core business logic for the patient report tracker.
//!
//! This crate contains pure data operations backed by SQLite:
//! - Report intake and the report queue
//! - The staff review workflow that converts reports into patients
//! - Patient listing, filtering and export
//! - Error reports filed against patients
//! - The state to district lookup
//!
//! **No API concerns**: HTTP routing, sessions, cookies and authentication belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod districts;
pub mod error;
pub mod export;
pub mod forms;
pub mod models;
pub mod notice;
pub mod repositories;
pub mod review;

pub use config::{page_size_from_env_value, CoreConfig};
pub use db::Database;
pub use error::{TrackerError, TrackerResult};
pub use export::ExportFormat;
pub use forms::{FormData, FormErrors};
pub use models::{
    CurrentStatus, ErrorReport, Gender, NewErrorReport, Patient, PatientDraft, PatientFields,
    PatientId, Report, ReportId, ReportState, Staff, StaffId,
};
pub use notice::{Notice, NoticeLevel};
pub use repositories::error_reports::ErrorReportService;
pub use repositories::listing::{ListFilter, ListQuery, Page, SortColumn, SortOrder};
pub use repositories::patients::PatientService;
pub use repositories::reports::ReportService;
pub use repositories::staff::StaffService;
pub use review::{Resolution, ReviewIntent, ReviewOutcome, ReviewService};
