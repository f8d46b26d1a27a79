use crate::config::Config;
use crate::errors::{FaxError, Result};
use crate::job::Job;
use crate::report::Report;
use fanout::protocol::{BulkAction, BulkRequest, DeleteReport, JobCreated, MAX_BULK_JOB_IDS};
use fanout::{
    BulkDelete, BulkLookup, Dispatcher, OutboundRequest, Policy, SingleDelete, SingleLookup,
};

/// Fax service client
///
/// Cloning is cheap; clones share the underlying connection pool.
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

    /// Submit a fax job through the HA address and return its job id.
    pub async fn send(&self, job: &Job) -> Result<String> {
        if job.recipients.is_empty() {
            return Err(FaxError::NoRecipients);
        }

        let path = format!("/{}/fax", self.config.customer_number);
        let request = self.authorized(OutboundRequest::post(path)).json(job)?;
        let created: JobCreated = self
            .dispatcher
            .submit(&self.config.endpoints, &request)
            .await?;

        tracing::info!(job_id = %created.job_id, "Fax job accepted");
        Ok(created.job_id)
    }

    /// Fetch the report for one job. The report is left on the service; use
    /// [`Client::delete_report`] once it has been processed.
    pub async fn get_report(&self, job_id: &str) -> Result<Report> {
        let request = self.authorized(OutboundRequest::get(self.report_path(job_id)));
        self.run(&request, &SingleLookup::new()).await
    }

    /// Fetch the available reports for this account.
    ///
    /// Reports are kept for up to 30 days or until deleted, and only the
    /// oldest 1000 are returned. Delete fetched reports to reach newer ones.
    pub async fn get_reports(&self) -> Result<Vec<Report>> {
        let request = self.authorized(OutboundRequest::get(self.reports_path()));
        self.run(&request, &BulkLookup::new()).await
    }

    /// Fetch the reports for up to 1000 jobs in one request.
    pub async fn get_bulk_reports(&self, job_ids: &[String]) -> Result<Vec<Report>> {
        let request = self.bulk_request(BulkAction::Get, job_ids)?;
        self.run(&request, &BulkLookup::new()).await
    }

    /// Delete the reports for up to 1000 jobs in one request.
    ///
    /// Jobs the service has no report for are left out of the result.
    pub async fn delete_bulk_reports(&self, job_ids: &[String]) -> Result<Vec<DeleteReport>> {
        let request = self.bulk_request(BulkAction::Delete, job_ids)?;
        self.run(&request, &BulkDelete).await
    }

    /// Delete up to 1000 reports of completed jobs, oldest first.
    pub async fn delete_reports(&self) -> Result<Vec<DeleteReport>> {
        let request = self.authorized(OutboundRequest::delete(self.reports_path()));
        self.run(&request, &BulkDelete).await
    }

    /// Delete the report for one job. Returns `None` if no report existed.
    pub async fn delete_report(&self, job_id: &str) -> Result<Option<DeleteReport>> {
        let request = self.authorized(OutboundRequest::delete(self.report_path(job_id)));
        self.run(&request, &SingleDelete::new()).await
    }

    async fn run<P: Policy>(&self, request: &OutboundRequest, policy: &P) -> Result<P::Output> {
        Ok(self
            .dispatcher
            .execute(&self.config.endpoints, request, policy)
            .await?)
    }

    fn bulk_request(&self, action: BulkAction, job_ids: &[String]) -> Result<OutboundRequest> {
        if job_ids.is_empty() || job_ids.len() > MAX_BULK_JOB_IDS {
            return Err(FaxError::InvalidBulkSize {
                count: job_ids.len(),
                max: MAX_BULK_JOB_IDS,
            });
        }

        let body = BulkRequest {
            action,
            job_ids: job_ids.to_vec(),
        };
        Ok(self
            .authorized(OutboundRequest::post(self.reports_path()))
            .json(&body)?)
    }

    fn authorized(&self, request: OutboundRequest) -> OutboundRequest {
        request.with_credentials(&self.config.credentials)
    }

    fn reports_path(&self) -> String {
        format!("/{}/fax/reports", self.config.customer_number)
    }

    fn report_path(&self, job_id: &str) -> String {
        format!("{}/{}", self.reports_path(), job_id)
    }
}
