//! Wire shapes shared by the fax and SMS services.

use serde::{Deserialize, Serialize};

/// Maximum number of job ids accepted by one bulk request.
pub const MAX_BULK_JOB_IDS: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BulkAction {
    Get,
    Delete,
}

/// Body of a bulk report operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub action: BulkAction,
    pub job_ids: Vec<String>,
}

/// `{"reports": [...]}` as returned by list and bulk endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportList<T> {
    #[serde(default = "Vec::new")]
    pub reports: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteFailureReason {
    /// No report exists for the given job id.
    NotFound,
    /// Unspecified server-side error.
    InternalError,
    #[serde(other)]
    Unknown,
}

/// Result of deleting a single job report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub job_id: String,
    /// An absent flag means the report was deleted.
    #[serde(default = "deleted_by_default")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DeleteFailureReason>,
}

fn deleted_by_default() -> bool {
    true
}

/// Response to a job submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
}
