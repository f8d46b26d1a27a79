use crate::config::Config;
use crate::errors::{Result, SmsError};
use crate::job::Job;
use crate::report::{Report, SmsStatus};
use fanout::protocol::JobCreated;
use fanout::{Dispatcher, OutboundRequest, SingleLookup};

/// SMS service client
#[derive(Clone)]
pub struct Client {
    config: Config,
    dispatcher: Dispatcher,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_dispatcher(config, Dispatcher::new()?))
    }

    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Submit an SMS job through the HA address and return its job id.
    pub async fn send(&self, job: &Job) -> Result<String> {
        if job.messages.is_empty() {
            return Err(SmsError::NoMessages);
        }

        let request = self.authorized(OutboundRequest::post("/jobs")).json(job)?;
        let created: JobCreated = self
            .dispatcher
            .submit(&self.config.endpoints, &request)
            .await?;

        tracing::info!(job_id = %created.job_id, "SMS job accepted");
        Ok(created.job_id)
    }

    pub async fn get_report(&self, job_id: &str) -> Result<Report> {
        let request = self.authorized(OutboundRequest::get(format!("/jobs/{job_id}")));
        Ok(self
            .dispatcher
            .execute(&self.config.endpoints, &request, &SingleLookup::new())
            .await?)
    }

    /// Fetch the status of every SMS in a job.
    pub async fn get_sms_status(&self, job_id: &str) -> Result<Vec<SmsStatus>> {
        let request = self
            .authorized(OutboundRequest::get("/sms"))
            .query("jobId", job_id);
        let statuses: Vec<SmsStatus> = self
            .dispatcher
            .execute(&self.config.endpoints, &request, &SingleLookup::new())
            .await?;

        if statuses.is_empty() {
            return Err(SmsError::NoStatus(job_id.to_string()));
        }
        Ok(statuses)
    }

    fn authorized(&self, request: OutboundRequest) -> OutboundRequest {
        request.with_credentials(&self.config.credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{Message, Recipient};
    use fanout::{Credentials, DomainErrorKind, EndpointSet};
    use http::{Method, StatusCode};
    use shared::testutils::{MockMirror, MockReply, refused_url, start_static_mirror};
    use url::Url;

    fn test_client(ha: Url, mirrors: Vec<Url>) -> Client {
        let config = Config {
            credentials: Credentials::new("user", "secret"),
            endpoints: EndpointSet::new(ha, mirrors).unwrap(),
        };
        Client::new(config).unwrap()
    }

    fn urls(mirrors: &[&MockMirror]) -> Vec<Url> {
        mirrors.iter().map(|m| m.url()).collect()
    }

    #[tokio::test]
    async fn test_send() {
        let ha = start_static_mirror(MockReply::new(StatusCode::CREATED, r#"{"jobId":"SJ1"}"#)).await;
        let client = test_client(ha.url(), urls(&[&ha]));

        let mut job = Job::default();
        job.add_message(Message::new("Hello", vec![Recipient::new("+491700000000")]));

        assert_eq!(client.send(&job).await.unwrap(), "SJ1");

        let request = &ha.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/rest/v1/jobs");
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["messages"][0]["text"], "Hello");
    }

    #[tokio::test]
    async fn test_send_rejects_empty_job() {
        let ha = start_static_mirror(MockReply::ok("{}")).await;
        let client = test_client(ha.url(), urls(&[&ha]));

        let err = client.send(&Job::default()).await.unwrap_err();
        assert!(matches!(err, SmsError::NoMessages));
        assert!(ha.requests().is_empty());
    }

    #[tokio::test]
    async fn test_send_surfaces_service_message() {
        let ha = start_static_mirror(MockReply::new(
            StatusCode::BAD_REQUEST,
            r#"{"message":"invalid destination"}"#,
        ))
        .await;
        let client = test_client(ha.url(), urls(&[&ha]));

        let mut job = Job::default();
        job.add_message(Message::new("Hello", vec![Recipient::new("nope")]));

        let SmsError::Fanout(err) = client.send(&job).await.unwrap_err() else {
            panic!("expected fan-out error");
        };
        assert_eq!(err.kind(), Some(DomainErrorKind::BadRequest));
        assert!(err.to_string().contains("invalid destination"));
    }

    #[tokio::test]
    async fn test_get_report_skips_unreachable_mirror() {
        let m1 = start_static_mirror(MockReply::ok(
            r#"{"jobId":"SJ1","src":"Retarus","recipientIds":["s1","s2"]}"#,
        ))
        .await;
        let client = test_client(m1.url(), vec![refused_url(), m1.url()]);

        let report = client.get_report("SJ1").await.unwrap();
        assert_eq!(report.job_id, "SJ1");
        assert_eq!(report.recipient_ids, vec!["s1", "s2"]);
        assert_eq!(m1.requests()[0].path, "/rest/v1/jobs/SJ1");
    }

    #[tokio::test]
    async fn test_get_sms_status() {
        let m1 = start_static_mirror(MockReply::not_found()).await;
        let m2 = start_static_mirror(MockReply::ok(
            r#"[{"smsId":"s1","dst":"+491700000000","processStatus":"F","status":"OK"}]"#,
        ))
        .await;
        let client = test_client(m1.url(), urls(&[&m1, &m2]));

        let statuses = client.get_sms_status("SJ1").await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].sms_id, "s1");
        assert_eq!(statuses[0].status, "OK");

        let request = &m2.requests()[0];
        assert_eq!(request.path, "/rest/v1/sms");
        assert_eq!(request.query.as_deref(), Some("jobId=SJ1"));
    }

    #[tokio::test]
    async fn test_get_sms_status_empty() {
        let m1 = start_static_mirror(MockReply::ok("[]")).await;
        let client = test_client(m1.url(), urls(&[&m1]));

        let err = client.get_sms_status("SJ1").await.unwrap_err();
        assert!(matches!(err, SmsError::NoStatus(id) if id == "SJ1"));
    }

    #[tokio::test]
    async fn test_get_sms_status_not_found() {
        let m1 = start_static_mirror(MockReply::not_found()).await;
        let client = test_client(m1.url(), urls(&[&m1]));

        let err = client.get_sms_status("SJ1").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
