use crate::job::Reference;
use serde::{Deserialize, Serialize};

/// Status report of a fax job
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub job_id: String,
    #[serde(default)]
    pub recipient_status: Vec<RecipientStatus>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

/// Delivery status for one recipient of a fax job
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientStatus {
    /// Primary number of the recipient, international format.
    pub number: String,
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub sent_ts: String,
    /// Transmission time until the recipient received the fax.
    #[serde(default)]
    pub duration_in_secs: u32,
    /// The number that actually received the fax, possibly an alternative.
    #[serde(default)]
    pub sent_to_number: String,
    #[serde(default)]
    pub remote_csid: String,
}
