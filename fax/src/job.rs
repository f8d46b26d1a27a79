//! Fax job schema.
//!
//! Optional fields are omitted from the JSON body when unset. Timestamps are
//! passed through as ISO 8601 strings, e.g. `2018-11-03T20:14:37.098+02:00`.

use serde::{Deserialize, Serialize};

/// A fax job
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_options: Option<TransportOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendering_options: Option<RenderingOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_report_options: Option<StatusReportOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub recipients: Vec<Recipient>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_recipient(&mut self, recipient: Recipient) {
        self.recipients.push(recipient);
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Free-form id, at most 256 characters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_defined_id: String,
    /// Cost center, at most 80 characters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub billing_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub billing_info: String,
}

/// Personalized cover page value for one recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientProperty {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Dialed number in international format, e.g. `+12015551000`.
    pub number: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<RecipientProperty>,
}

impl Recipient {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..Self::default()
        }
    }
}

/// Character encoding of plain text documents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    #[serde(rename = "US-ASCII")]
    UsAscii,
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "UTF-16")]
    Utf16,
    #[serde(rename = "UTF-16BE")]
    Utf16Be,
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    #[serde(rename = "ISO-8859-1")]
    Iso88591,
    #[serde(rename = "Windows-1252")]
    Windows1252,
}

/// A document to fax, given either inline as base64 `data` or by `reference`
/// URL. The reference wins when both are set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// File name; the extension selects the file type. At most 32 characters
    /// from `a-zA-Z0-9-_.`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<Charset>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
}

impl Document {
    pub fn inline(name: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: base64_data.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    /// Sender id, at most 20 characters.
    #[serde(default, rename = "csid", skip_serializing_if = "String::is_empty")]
    pub cs_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_express: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_blacklist_enabled: bool,
}

/// Pages an overlay applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayMode {
    AllPages,
    NoOverlay,
    FirstPage,
    LastPage,
    AllButFirstPage,
    AllButLastPage,
    AllButFirstAndLastPage,
    FirstFile,
}

/// Stationery template installed on the service side
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub name: String,
    pub mode: OverlayMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Resolution {
    High,
    Low,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingOptions {
    pub paper_format: PaperFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coverpage_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
    /// Header line including control sequences such as `%C` or `%d.%m.%Y`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachedFaxImageFormat {
    Tiff,
    Pdf,
    PdfWithOcr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachedFaxImageMode {
    Never,
    SuccessOnly,
    FailureOnly,
    Always,
}

/// Email notification once a job completes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMail {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub success_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub failure_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_fax_image_format: Option<AttachedFaxImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_fax_image_mode: Option<AttachedFaxImageMode>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    #[default]
    None,
    HttpBasic,
    HttpDigest,
    Oauth2,
}

/// HTTP push notification once a job completes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpStatusPush {
    pub target_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub principal: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credentials: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<AuthMethod>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReportOptions {
    pub report_purge_ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_mail: Option<ReportMail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_push: Option<HttpStatusPush>,
}

/// Validity window of a job. `end` also accepts durations such as `PT80M`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobValid {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub customer_reference: String,
    #[serde(default)]
    pub job_valid: JobValid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_job_omits_unset_fields() {
        let mut job = Job::new();
        job.add_recipient(Recipient::new("+4989000000000"));
        job.add_document(Document {
            charset: Some(Charset::Utf8),
            ..Document::inline("test.txt", "dGVzdGZheAo=")
        });

        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({
                "documents": [{"name": "test.txt", "charset": "UTF-8", "data": "dGVzdGZheAo="}],
                "recipients": [{"number": "+4989000000000"}]
            })
        );
    }

    #[test]
    fn test_options_wire_names() {
        let job = Job {
            transport_options: Some(TransportOptions {
                cs_id: "Retarus".into(),
                is_express: true,
                is_blacklist_enabled: false,
            }),
            rendering_options: Some(RenderingOptions {
                paper_format: PaperFormat::Letter,
                resolution: Some(Resolution::High),
                overlay: Some(Overlay {
                    name: "letterhead".into(),
                    mode: OverlayMode::AllButFirstAndLastPage,
                }),
                ..RenderingOptions::default()
            }),
            status_report_options: Some(StatusReportOptions {
                report_purge_ts: "2018-11-03T20:14:37.098+02:00".into(),
                report_mail: Some(ReportMail {
                    attached_fax_image_format: Some(AttachedFaxImageFormat::PdfWithOcr),
                    attached_fax_image_mode: Some(AttachedFaxImageMode::FailureOnly),
                    ..ReportMail::default()
                }),
                http_status_push: Some(HttpStatusPush {
                    target_url: "https://example.com/push".into(),
                    principal: String::new(),
                    credentials: String::new(),
                    auth_method: Some(AuthMethod::HttpBasic),
                }),
            }),
            ..Job::default()
        };

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["transportOptions"], json!({"csid": "Retarus", "isExpress": true}));
        assert_eq!(value["renderingOptions"]["paperFormat"], "Letter");
        assert_eq!(value["renderingOptions"]["resolution"], "HIGH");
        assert_eq!(
            value["renderingOptions"]["overlay"]["mode"],
            "ALL_BUT_FIRST_AND_LAST_PAGE"
        );
        let status = &value["statusReportOptions"];
        assert_eq!(status["reportMail"]["attachedFaxImageFormat"], "PDF_WITH_OCR");
        assert_eq!(status["reportMail"]["attachedFaxImageMode"], "FAILURE_ONLY");
        assert_eq!(status["httpStatusPush"]["authMethod"], "HTTP_BASIC");
        assert_eq!(value["recipients"], json!([]));
    }
}
