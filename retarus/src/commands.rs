use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fanout::EndpointCatalog;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Fax(#[from] fax::FaxError),
    #[error(transparent)]
    Sms(#[from] sms::SmsError),
    #[error("could not read {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write report: {0}")]
    WriteReport(#[from] std::io::Error),
    #[error("could not encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn print_endpoints(catalog: &EndpointCatalog) {
    for (region, service, endpoints) in catalog.entries() {
        println!("{region} {service} {}", endpoints.ha_address());
        for mirror in endpoints.mirrors() {
            println!("    {mirror}");
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn send_fax(
    client: &fax::Client,
    number: &str,
    document: &Path,
) -> Result<String, CommandError> {
    let data = tokio::fs::read(document)
        .await
        .map_err(|source| CommandError::ReadDocument {
            path: document.to_path_buf(),
            source,
        })?;
    let name = document
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let mut job = fax::Job::new();
    job.add_recipient(fax::Recipient::new(number));
    job.add_document(fax::Document::inline(name, STANDARD.encode(data)));

    Ok(client.send(&job).await?)
}

/// Poll until the service has a report for `job_id`, then store it as
/// `{job_id}.json` in `out_dir`.
pub async fn wait_for_report(
    client: &fax::Client,
    job_id: &str,
    out_dir: &Path,
    interval: Duration,
) -> Result<PathBuf, CommandError> {
    let report = loop {
        match client.get_report(job_id).await {
            Ok(report) => break report,
            Err(e) if e.is_not_found() => {
                tracing::debug!(job_id, "Report not available yet");
                tokio::time::sleep(interval).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(format!("{}.json", report.job_id));
    tokio::fs::write(&path, serde_json::to_vec_pretty(&report)?).await?;

    tracing::info!(job_id, path = %path.display(), "Report written");
    Ok(path)
}

pub async fn send_sms(client: &sms::Client, to: &str, text: &str) -> Result<String, CommandError> {
    let mut job = sms::Job::default();
    job.add_message(sms::Message::new(text, vec![sms::Recipient::new(to)]));

    Ok(client.send(&job).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout::{Credentials, EndpointSet};
    use http::StatusCode;
    use shared::testutils::{MockReply, start_mock_mirror, start_static_mirror};
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fax_client(endpoints: EndpointSet) -> fax::Client {
        fax::Client::new(fax::Config {
            credentials: Credentials::new("user", "secret"),
            customer_number: "4711".to_string(),
            endpoints,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_fax_encodes_document() {
        let ha = start_static_mirror(MockReply::new(StatusCode::CREATED, r#"{"jobId":"FJ1"}"#)).await;
        let client = fax_client(EndpointSet::new(ha.url(), vec![ha.url()]).unwrap());

        let mut document = tempfile::NamedTempFile::new().unwrap();
        document.write_all(b"testfax\n").unwrap();

        let job_id = send_fax(&client, "+4989000000000", document.path()).await.unwrap();
        assert_eq!(job_id, "FJ1");

        let body: serde_json::Value = serde_json::from_slice(&ha.requests()[0].body).unwrap();
        assert_eq!(body["documents"][0]["data"], "dGVzdGZheAo=");
    }

    #[tokio::test]
    async fn test_send_fax_missing_document() {
        let ha = start_static_mirror(MockReply::ok("{}")).await;
        let client = fax_client(EndpointSet::new(ha.url(), vec![ha.url()]).unwrap());

        let err = send_fax(&client, "+4989000000000", Path::new("/nonexistent/doc.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::ReadDocument { .. }));
        assert!(ha.requests().is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_report_polls_until_available() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mirror = start_mock_mirror(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                MockReply::not_found()
            } else {
                MockReply::ok(r#"{"jobId":"FJ1","recipientStatus":[],"pages":2}"#)
            }
        })
        .await;
        let client = fax_client(EndpointSet::new(mirror.url(), vec![mirror.url()]).unwrap());
        let out = tempfile::tempdir().unwrap();

        let path = wait_for_report(&client, "FJ1", out.path(), Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(path, out.path().join("FJ1.json"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let written: fax::Report = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written.pages, 2);
    }

    #[tokio::test]
    async fn test_wait_for_report_stops_on_other_errors() {
        let mirror = start_static_mirror(MockReply::new(StatusCode::UNAUTHORIZED, "denied")).await;
        let client = fax_client(EndpointSet::new(mirror.url(), vec![mirror.url()]).unwrap());
        let out = tempfile::tempdir().unwrap();

        let err = wait_for_report(&client, "FJ1", out.path(), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Fax(_)));
        assert_eq!(mirror.requests().len(), 1);
    }
}
