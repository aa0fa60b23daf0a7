//! Dataset acquisition: HTTP download, archive extraction and local reads.

pub mod archive;
mod basic;
mod dataset;

pub use basic::BasicClient;
pub use dataset::download_dataset;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Request, Response};
use tracing::debug;

/// Minimal HTTP seam so downloads can be driven by any client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Performs a GET and returns the body.
///
/// # Errors
///
/// Fails on transport errors and on any non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = Request::new(
        reqwest::Method::GET,
        url.parse::<reqwest::Url>()
            .with_context(|| format!("invalid URL '{url}'"))?,
    );

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned HTTP {status}");
    }

    let body = resp.bytes().await?;
    debug!(bytes = body.len(), "Response body received");
    Ok(body)
}

/// True for `http://` and `https://` sources; everything else is a path.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads CSV bytes from a local path or an `http(s)` URL.
///
/// Zip and gzip payloads are unpacked, so an archive can be passed directly.
#[tracing::instrument]
pub async fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let client = BasicClient::new()?;
        fetch_bytes(&client, source).await?.to_vec()
    } else {
        std::fs::read(source).with_context(|| format!("reading '{source}'"))?
    };

    archive::extract_csv(&bytes, archive::DEFAULT_ENTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[tokio::test]
    async fn test_read_source_plain_file() {
        let path = format!(
            "{}/activity_report_test_read_source.csv",
            env::temp_dir().display()
        );
        fs::write(&path, "steps,date,interval\n1,2012-10-01,0\n").unwrap();

        let bytes = read_source(&path).await.unwrap();
        assert!(bytes.starts_with(b"steps,date,interval"));

        fs::remove_file(&path).unwrap();
    }

    /// Answers every request with a fixed status and body.
    struct StubClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body)
                .expect("valid stub response");
            Ok(Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let client = StubClient {
            status: 200,
            body: "steps,date,interval\n",
        };
        let body = fetch_bytes(&client, "https://example.invalid/activity.zip")
            .await
            .unwrap();
        assert_eq!(&body[..], b"steps,date,interval\n");
    }

    #[tokio::test]
    async fn test_fetch_bytes_fails_on_http_error_status() {
        let client = StubClient {
            status: 404,
            body: "not found",
        };
        let err = fetch_bytes(&client, "https://example.invalid/activity.zip")
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("404"), "{msg}");
        assert!(msg.contains("https://example.invalid/activity.zip"), "{msg}");
    }

    #[test]
    fn test_is_remote_requires_scheme() {
        assert!(is_remote("http://example.com/activity.zip"));
        assert!(is_remote("https://example.com/activity.zip"));
        assert!(!is_remote("httpdata.csv"));
        assert!(!is_remote("data/activity.csv"));
    }

    #[tokio::test]
    async fn test_read_source_relative_file_starting_with_http() {
        // cargo runs tests from the package root
        let path = "httpdata_activity_report_test.csv";
        fs::write(path, "steps,date,interval\n").unwrap();

        let result = read_source(path).await;
        fs::remove_file(path).unwrap();

        assert!(result.unwrap().starts_with(b"steps"));
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let err = read_source("/definitely/not/here.csv").await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
