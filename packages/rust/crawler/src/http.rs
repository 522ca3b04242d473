//! HTTP client construction and page retrieval.

use reqwest::Client;
use tracing::debug;
use url::Url;

use fomc_shared::{FomcError, PipelineConfig, Result};

/// User-Agent string for all requests.
const USER_AGENT: &str = concat!("fomc-corpus/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Build a reqwest client for the pipeline.
///
/// No timeout is set unless the config asks for one.
pub fn build_client(config: &PipelineConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| FomcError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return the response body as text.
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    let response = send(client, url).await?;
    response
        .text()
        .await
        .map_err(|e| FomcError::Network(format!("{url}: body read failed: {e}")))
}

/// GET a URL and return the raw response body.
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let response = send(client, url).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| FomcError::Network(format!("{url}: body read failed: {e}")))?;
    Ok(bytes.to_vec())
}

async fn send(client: &Client, url: &Url) -> Result<reqwest::Response> {
    debug!(%url, "GET");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| FomcError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FomcError::Network(format!("{url}: HTTP {status}")));
    }

    Ok(response)
}
