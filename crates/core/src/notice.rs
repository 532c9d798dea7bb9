//! One-shot notifications produced by workflow steps and shown on the next page.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub const PATIENT_ADDED: &str = "A new patient has been added. Thank you for the contribution.";

pub const REPORT_VERIFIED: &str = "The report has been marked as verified. One of the admins \
     will review it shortly. Thank you for verifying the report.";

pub const REPORT_INVALID: &str =
    "The report has been marked as Invalid. Thank you for flagging it.";

pub const CORRECTION_RECEIVED: &str = "Thank you for your correction. A volunteer from the team \
     will review the information and make necessary changes.";

pub const CORRECTION_REJECTED: &str =
    "Your correction could not be recorded. Please check the form and try again.";
