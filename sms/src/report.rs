use serde::{Deserialize, Serialize};

/// Job-level report: the job settings and the ids of its SMS
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub job_id: String,
    pub src: String,
    pub encoding: String,
    pub billcode: String,
    pub status_requested: bool,
    pub flash: bool,
    pub validity_min: u32,
    pub customer_ref: String,
    pub qos: String,
    pub receipt_ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_ts: Option<String>,
    pub recipient_ids: Vec<String>,
}

/// Delivery status of a single SMS within a job
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsStatus {
    pub sms_id: String,
    pub dst: String,
    pub process_status: String,
    pub status: String,
    pub customer_ref: String,
    pub reason: String,
    pub sent_ts: String,
    pub finished_ts: String,
}
