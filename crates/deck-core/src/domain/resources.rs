//! Sub-resources and response wrappers returned by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::JobId;
use super::status::{BadgeStatus, map_status};

/// A training pipeline (graph) that belongs to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub name: String,
}

impl PipelineSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One job run, as shown in the "recent runs" popover.
///
/// `status` is kept as the raw gateway string; see [`JobSummary::badge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl JobSummary {
    pub fn badge(&self) -> Option<BadgeStatus> {
        map_status(&self.status)
    }
}

/// Page request for paginated gateway listings (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        Self { page: 1, size }
    }
}

/// Page wrapper; only `data` is consumed by the view-model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }
}

/// Result envelope of mutating calls: `code == 0` means success,
/// otherwise `msg` is a user-facing error string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub code: i32,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ApiStatus {
    pub const OK: i32 = 0;

    pub fn ok() -> Self {
        Self {
            code: Self::OK,
            msg: None,
        }
    }

    pub fn failed(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: Some(msg.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::OK
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}
