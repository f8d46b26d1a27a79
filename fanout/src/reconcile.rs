//! Reconciliation policies.
//!
//! Each policy folds the outcomes of one fan-out into a single authoritative
//! result. Outcomes are taken by value and dropped as the scan passes them,
//! so nothing a mirror returned outlives the policy, including outcomes left
//! unread after an early return.
//!
//! Policies must give the same answer for any arrival order, except that a
//! classified error observed before a success wins over that success.

use crate::errors::{FanoutError, Result, TransportFailure};
use crate::outcome::{MirrorResponse, Outcome};
use crate::protocol::{DeleteFailureReason, DeleteReport, ReportList};
use crate::status::{DomainError, classify};
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use url::Url;

/// Folds per-mirror outcomes into one result
pub trait Policy {
    type Output;

    fn name(&self) -> &'static str;

    fn reconcile(&self, outcomes: Vec<Outcome>) -> Result<Self::Output>;
}

/// Fetch one record from whichever mirror holds it.
///
/// The first success in arrival order is authoritative. 404s and transport
/// failures are skipped. Any other status aborts the scan with its
/// classified error. If only 404s were seen the result is a NotFound
/// error, and if no mirror answered at all it is `NoResponse`.
pub struct SingleLookup<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SingleLookup<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SingleLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Policy for SingleLookup<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        "single_lookup"
    }

    fn reconcile(&self, outcomes: Vec<Outcome>) -> Result<T> {
        match scan_first_success(self.name(), outcomes)? {
            SingleScan::Found { mirror, body } => decode(mirror, &body),
            SingleScan::NotFound { mirror, body } => Err(FanoutError::Domain {
                mirror,
                error: DomainError::new(StatusCode::NOT_FOUND, &body),
            }),
            SingleScan::NoResponse(failures) => Err(FanoutError::NoResponse(failures)),
        }
    }
}

/// Delete one record on whichever mirror holds it.
///
/// Same scan as [`SingleLookup`], but a record that no mirror knows about
/// is `Ok(None)`: deleting something that does not exist is not an error.
pub struct SingleDelete<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SingleDelete<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SingleDelete<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Policy for SingleDelete<T> {
    type Output = Option<T>;

    fn name(&self) -> &'static str {
        "single_delete"
    }

    fn reconcile(&self, outcomes: Vec<Outcome>) -> Result<Option<T>> {
        match scan_first_success(self.name(), outcomes)? {
            SingleScan::Found { mirror, body } => decode(mirror, &body).map(Some),
            SingleScan::NotFound { .. } => Ok(None),
            SingleScan::NoResponse(failures) => Err(FanoutError::NoResponse(failures)),
        }
    }
}

/// Aggregate `{"reports": [...]}` lists from every answering mirror.
///
/// 200, 201 and 404 bodies are decoded and appended. A blank 404 body counts
/// as an empty list. Any other status fails the whole call without a
/// partial result.
pub struct BulkLookup<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BulkLookup<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BulkLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Policy for BulkLookup<T> {
    type Output = Vec<T>;

    fn name(&self) -> &'static str {
        "bulk_lookup"
    }

    fn reconcile(&self, outcomes: Vec<Outcome>) -> Result<Vec<T>> {
        collect_lists(self.name(), outcomes)
    }
}

/// [`BulkLookup`] over deletion results, without the items the service
/// reports as `NOT_FOUND`.
#[derive(Default)]
pub struct BulkDelete;

impl Policy for BulkDelete {
    type Output = Vec<DeleteReport>;

    fn name(&self) -> &'static str {
        "bulk_delete"
    }

    fn reconcile(&self, outcomes: Vec<Outcome>) -> Result<Vec<DeleteReport>> {
        let mut reports: Vec<DeleteReport> = collect_lists(self.name(), outcomes)?;
        reports.retain(|report| report.reason != Some(DeleteFailureReason::NotFound));
        Ok(reports)
    }
}

enum SingleScan {
    Found { mirror: Url, body: Bytes },
    NotFound { mirror: Url, body: Bytes },
    NoResponse(Vec<TransportFailure>),
}

fn scan_first_success(policy: &'static str, outcomes: Vec<Outcome>) -> Result<SingleScan> {
    let mut failures = Vec::new();
    let mut not_found = None;

    for Outcome { origin, result } in outcomes {
        let MirrorResponse { status, body } = match result {
            Ok(response) => response,
            Err(failure) => {
                skip_failure(policy, failure, &mut failures);
                continue;
            }
        };

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(policy, mirror = %origin, "Mirror has no record");
            if not_found.is_none() {
                not_found = Some((origin, body));
            }
            continue;
        }

        if let Some(error) = classify(status, &body) {
            return Err(FanoutError::Domain {
                mirror: origin,
                error,
            });
        }

        return Ok(SingleScan::Found {
            mirror: origin,
            body,
        });
    }

    Ok(match not_found {
        Some((mirror, body)) => SingleScan::NotFound { mirror, body },
        None => SingleScan::NoResponse(failures),
    })
}

fn collect_lists<T: DeserializeOwned>(
    policy: &'static str,
    outcomes: Vec<Outcome>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut failures = Vec::new();
    let mut responded = false;

    for Outcome { origin, result } in outcomes {
        let MirrorResponse { status, body } = match result {
            Ok(response) => response,
            Err(failure) => {
                skip_failure(policy, failure, &mut failures);
                continue;
            }
        };
        responded = true;

        match status {
            StatusCode::OK | StatusCode::CREATED => {}
            StatusCode::NOT_FOUND if is_blank(&body) => continue,
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(FanoutError::Domain {
                    mirror: origin,
                    error: DomainError::new(status, &body),
                });
            }
        }

        let list: ReportList<T> = decode(origin, &body)?;
        items.extend(list.reports);
    }

    if !responded {
        return Err(FanoutError::NoResponse(failures));
    }

    Ok(items)
}

fn skip_failure(policy: &'static str, failure: TransportFailure, failures: &mut Vec<TransportFailure>) {
    tracing::warn!(policy, error = %failure, "Skipping mirror without a response");
    failures.push(failure);
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

pub(crate) fn decode<T: DeserializeOwned>(mirror: Url, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| FanoutError::Decode { mirror, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::JobCreated;
    use crate::status::DomainErrorKind;

    fn mirror(n: u8) -> Url {
        Url::parse(&format!("https://faxws.de{n}.example.com/rest/v1/")).unwrap()
    }

    fn response(n: u8, status: u16, body: &str) -> Outcome {
        Outcome::response(
            mirror(n),
            StatusCode::from_u16(status).unwrap(),
            Bytes::copy_from_slice(body.as_bytes()),
        )
    }

    fn unreachable(n: u8) -> Outcome {
        Outcome::failed(TransportFailure::RequestFailed(
            mirror(n),
            "connection refused".to_string(),
        ))
    }

    fn timed_out(n: u8) -> Outcome {
        Outcome::failed(TransportFailure::Timeout(mirror(n)))
    }

    /// Every ordering of `0..len` (Heap's algorithm).
    fn permutations(len: usize) -> Vec<Vec<usize>> {
        fn heap(k: usize, order: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            if k <= 1 {
                out.push(order.clone());
                return;
            }
            heap(k - 1, order, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    order.swap(i, k - 1);
                } else {
                    order.swap(0, k - 1);
                }
                heap(k - 1, order, out);
            }
        }

        let mut order: Vec<usize> = (0..len).collect();
        let mut out = Vec::new();
        heap(len, &mut order, &mut out);
        out
    }

    #[test]
    fn test_single_lookup_skips_not_found() {
        let outcomes = vec![response(1, 404, ""), response(2, 200, r#"{"jobId":"abc123"}"#)];
        let job: JobCreated = SingleLookup::new().reconcile(outcomes).unwrap();
        assert_eq!(job.job_id, "abc123");
    }

    #[test]
    fn test_single_lookup_is_order_independent() {
        let make = |i: usize| match i {
            0 => response(1, 404, ""),
            1 => response(2, 200, r#"{"jobId":"abc123"}"#),
            2 => unreachable(3),
            _ => timed_out(4),
        };

        let orders = permutations(4);
        assert_eq!(orders.len(), 24);

        for order in orders {
            let outcomes = order.iter().map(|&i| make(i)).collect();
            let job: JobCreated = SingleLookup::new().reconcile(outcomes).unwrap();
            assert_eq!(job.job_id, "abc123", "order {order:?}");
        }
    }

    #[test]
    fn test_single_lookup_all_not_found() {
        let outcomes = vec![
            response(1, 404, "no such job"),
            response(2, 404, "no such job"),
        ];
        let err = SingleLookup::<JobCreated>::new()
            .reconcile(outcomes)
            .unwrap_err();

        assert!(err.is_not_found());
        let FanoutError::Domain { error, .. } = err else {
            panic!("expected domain error");
        };
        assert_eq!(error.body, "no such job");
    }

    #[test]
    fn test_single_lookup_not_found_beats_transport_failure() {
        for outcomes in [
            vec![unreachable(1), response(2, 404, "")],
            vec![response(2, 404, ""), unreachable(1)],
        ] {
            let err = SingleLookup::<JobCreated>::new()
                .reconcile(outcomes)
                .unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn test_single_lookup_empty_is_no_response() {
        let err = SingleLookup::<JobCreated>::new()
            .reconcile(Vec::new())
            .unwrap_err();
        assert!(matches!(err, FanoutError::NoResponse(ref failures) if failures.is_empty()));
    }

    #[test]
    fn test_single_lookup_only_transport_failures_is_no_response() {
        let err = SingleLookup::<JobCreated>::new()
            .reconcile(vec![unreachable(1), timed_out(2)])
            .unwrap_err();

        let FanoutError::NoResponse(failures) = err else {
            panic!("expected NoResponse");
        };
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].mirror(), &mirror(1));
        assert!(matches!(failures[1], TransportFailure::Timeout(_)));
    }

    #[test]
    fn test_single_lookup_first_error_wins() {
        let outcomes = vec![
            response(1, 500, "boom"),
            response(2, 200, r#"{"jobId":"abc123"}"#),
        ];
        let err = SingleLookup::<JobCreated>::new()
            .reconcile(outcomes)
            .unwrap_err();

        assert_eq!(err.kind(), Some(DomainErrorKind::InternalServerError));
        let FanoutError::Domain { mirror: origin, error } = err else {
            panic!("expected domain error");
        };
        assert_eq!(origin, mirror(1));
        assert_eq!(error.body, "boom");
    }

    #[test]
    fn test_single_lookup_decode_error_surfaces() {
        let err = SingleLookup::<JobCreated>::new()
            .reconcile(vec![response(1, 200, "not json")])
            .unwrap_err();
        assert!(matches!(err, FanoutError::Decode { .. }));
    }

    #[test]
    fn test_single_delete() {
        let deleted: Option<DeleteReport> = SingleDelete::new()
            .reconcile(vec![
                response(1, 404, ""),
                response(2, 200, r#"{"jobId":"a","deleted":true}"#),
            ])
            .unwrap();
        assert_eq!(deleted.unwrap().job_id, "a");

        let missing: Option<DeleteReport> = SingleDelete::new()
            .reconcile(vec![response(1, 404, ""), response(2, 404, "")])
            .unwrap();
        assert!(missing.is_none());

        let err = SingleDelete::<DeleteReport>::new()
            .reconcile(vec![response(1, 409, "conflict")])
            .unwrap_err();
        assert_eq!(err.kind(), Some(DomainErrorKind::Conflict));

        let err = SingleDelete::<DeleteReport>::new()
            .reconcile(vec![unreachable(1)])
            .unwrap_err();
        assert!(matches!(err, FanoutError::NoResponse(_)));
    }

    #[test]
    fn test_bulk_lookup_aggregates() {
        let outcomes = vec![
            response(1, 200, r#"{"reports":[{"jobId":"a"},{"jobId":"b"}]}"#),
            response(2, 404, r#"{"reports":[]}"#),
            response(3, 404, ""),
            unreachable(4),
            response(5, 200, r#"{"reports":[{"jobId":"c"}]}"#),
        ];
        let jobs: Vec<JobCreated> = BulkLookup::new().reconcile(outcomes).unwrap();
        let ids: Vec<_> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bulk_lookup_error_discards_partial_result() {
        let outcomes = vec![
            response(1, 200, r#"{"reports":[{"jobId":"a"}]}"#),
            response(2, 503, "maintenance"),
        ];
        let err = BulkLookup::<JobCreated>::new()
            .reconcile(outcomes)
            .unwrap_err();
        assert_eq!(err.kind(), Some(DomainErrorKind::ServiceUnavailable));
    }

    #[test]
    fn test_bulk_lookup_without_responses() {
        let err = BulkLookup::<JobCreated>::new()
            .reconcile(vec![])
            .unwrap_err();
        assert!(matches!(err, FanoutError::NoResponse(_)));

        let err = BulkLookup::<JobCreated>::new()
            .reconcile(vec![timed_out(1)])
            .unwrap_err();
        assert!(matches!(err, FanoutError::NoResponse(ref f) if f.len() == 1));
    }

    #[test]
    fn test_bulk_lookup_decode_error_surfaces() {
        let err = BulkLookup::<JobCreated>::new()
            .reconcile(vec![response(1, 404, "<html>")])
            .unwrap_err();
        assert!(matches!(err, FanoutError::Decode { .. }));
    }

    #[test]
    fn test_bulk_delete_drops_not_found_items() {
        let reports = BulkDelete
            .reconcile(vec![response(
                1,
                200,
                r#"{"reports":[{"jobId":"a","deleted":false,"reason":"NOT_FOUND"}]}"#,
            )])
            .unwrap();
        assert!(reports.is_empty());

        let reports = BulkDelete
            .reconcile(vec![response(
                1,
                200,
                r#"{"reports":[
                    {"jobId":"a","deleted":true},
                    {"jobId":"b","deleted":false,"reason":"NOT_FOUND"},
                    {"jobId":"c","deleted":false,"reason":"INTERNAL_ERROR"},
                    {"jobId":"d","deleted":false,"reason":"NOT_FOUND"}
                ]}"#,
            )])
            .unwrap();
        let ids: Vec<_> = reports.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(reports[1].reason, Some(DeleteFailureReason::InternalError));

        let reports = BulkDelete
            .reconcile(vec![response(1, 200, r#"{"reports":[{"jobId":"e"}]}"#)])
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].deleted);

        let reports = BulkDelete
            .reconcile(vec![response(1, 200, r#"{"reports":[]}"#)])
            .unwrap();
        assert!(reports.is_empty());
    }
}
