//! Remote (`http://`/`https://`) import transport.
//!
//! The base parser this analyzer was adapted from has no HTTP client in its
//! own dependency stack — it only ever resolves local files. Fetching a
//! remote module's source is new surface this analyzer needs, so the
//! transport is abstracted behind a trait the same way file I/O is
//! abstracted elsewhere: a host can substitute a fake fetcher in tests
//! without a live network call, and a production embedder gets a real
//! `reqwest`-backed implementation for free.

use async_trait::async_trait;

/// Fetches the raw source text of a remote module.
///
/// Implementations report failure as a plain `String` reason; the resolver
/// is responsible for wrapping it into [`crate::AnalysisError::UrlImport`]
/// together with the offending URL.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, String>;
}

/// The production [`RemoteFetcher`]: issues a plain GET and returns the
/// response body as text, treated as source to be parsed directly (this
/// analyzer has no embedded JavaScript runtime to "evaluate" the remote
/// module, so the fetched bytes are its only observable form).
#[derive(Debug, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status()));
        }

        response.text().await.map_err(|err| err.to_string())
    }
}
