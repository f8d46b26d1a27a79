//! Fan-out dispatch to every mirror of an endpoint set.

use crate::endpoints::EndpointSet;
use crate::errors::{FanoutError, Result, TransportFailure};
use crate::metrics_defs::{FANOUT_DURATION, MIRROR_OUTCOME, RECONCILE_RESULT};
use crate::outcome::{MirrorResponse, Outcome};
use crate::reconcile::{Policy, decode};
use crate::request::OutboundRequest;
use crate::status::classify;
use http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::timeout;
use url::Url;

/// Per-request timeout: covers connecting, sending and draining the body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends requests to mirrors and collects what they answer.
///
/// Fan-out has no concurrency cap and no early exit. [`Dispatcher::fetch_all`]
/// returns only after every mirror has answered, failed or timed out, so a
/// call takes as long as its slowest mirror. There is no retry and no
/// backoff: a mirror that fails contributes a transport-failure outcome and
/// nothing else.
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            timeout: REQUEST_TIMEOUT,
        })
    }

    #[cfg(test)]
    fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Send `request` to every mirror concurrently and wait for all of them.
    ///
    /// The result holds exactly one outcome per mirror, in completion order.
    pub async fn fetch_all(&self, endpoints: &EndpointSet, request: &OutboundRequest) -> Vec<Outcome> {
        let started = Instant::now();
        let mut join_set = JoinSet::new();
        let mut task_mirrors = HashMap::new();

        for mirror in endpoints.mirrors() {
            let client = self.client.clone();
            let request = request.clone();
            let origin = mirror.clone();
            let request_timeout = self.timeout;

            let abort_handle = join_set.spawn(async move {
                let result = send_to_mirror(&client, &origin, &request, request_timeout).await;
                Outcome { origin, result }
            });

            task_mirrors.insert(abort_handle.id(), mirror.clone());
        }

        let mut outcomes = Vec::with_capacity(task_mirrors.len());

        while let Some(join_result) = join_set.join_next_with_id().await {
            let outcome = match join_result {
                Ok((task_id, outcome)) => {
                    task_mirrors.remove(&task_id);
                    outcome
                }
                Err(e) => {
                    tracing::error!("Task failed: {e}");
                    let Some(mirror) = task_mirrors.remove(&e.id()) else {
                        continue;
                    };
                    Outcome::failed(TransportFailure::TaskFailed(mirror, e.to_string()))
                }
            };

            tracing::debug!(
                mirror = %outcome.origin,
                result = outcome.label(),
                status = ?outcome.status(),
                "Mirror finished"
            );
            shared::counter!(MIRROR_OUTCOME, "result" => outcome.label()).increment(1);
            outcomes.push(outcome);
        }

        shared::histogram!(FANOUT_DURATION).record(started.elapsed().as_secs_f64());

        outcomes
    }

    /// Fan out `request` and reconcile the outcomes with `policy`.
    pub async fn execute<P: Policy>(
        &self,
        endpoints: &EndpointSet,
        request: &OutboundRequest,
        policy: &P,
    ) -> Result<P::Output> {
        let outcomes = self.fetch_all(endpoints, request).await;
        let result = policy.reconcile(outcomes);

        if let Err(e) = &result {
            tracing::debug!(policy = policy.name(), error = %e, "Reconciliation failed");
        }
        shared::counter!(
            RECONCILE_RESULT,
            "policy" => policy.name(),
            "result" => result_label(&result)
        )
        .increment(1);

        result
    }

    /// Send `request` to a single target.
    pub async fn send(
        &self,
        target: &Url,
        request: &OutboundRequest,
    ) -> Result<MirrorResponse, TransportFailure> {
        send_to_mirror(&self.client, target, request, self.timeout).await
    }

    /// Send `request` to the HA address and decode a successful answer.
    pub async fn submit<T: DeserializeOwned>(
        &self,
        endpoints: &EndpointSet,
        request: &OutboundRequest,
    ) -> Result<T> {
        let target = endpoints.ha_address();
        let response = self.send(target, request).await?;

        if let Some(error) = classify(response.status, &response.body) {
            return Err(FanoutError::Domain {
                mirror: target.clone(),
                error,
            });
        }

        decode(target.clone(), &response.body)
    }
}

fn result_label<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(FanoutError::Domain { .. }) => "domain_error",
        Err(FanoutError::Decode { .. }) => "decode_error",
        Err(FanoutError::NoResponse(_)) => "no_response",
        Err(_) => "error",
    }
}

/// Send one request to one base URL.
///
/// The timeout covers the whole exchange, including draining the response
/// body, so the connection is released before this returns.
async fn send_to_mirror(
    client: &reqwest::Client,
    base: &Url,
    request: &OutboundRequest,
    request_timeout: Duration,
) -> Result<MirrorResponse, TransportFailure> {
    let mut builder = client
        .request(request.method().clone(), request.target_url(base))
        .header(CONTENT_TYPE, "application/json")
        .body(request.body().clone());

    if let Some(credentials) = request.credentials() {
        builder = builder.basic_auth(&credentials.user, Some(&credentials.password));
    }

    let exchange = async {
        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::RequestFailed(base.clone(), e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportFailure::ResponseBody(base.clone(), e.to_string()))?;

        Ok(MirrorResponse { status, body })
    };

    timeout(request_timeout, exchange)
        .await
        .map_err(|_| TransportFailure::Timeout(base.clone()))?
}
