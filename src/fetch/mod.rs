//! HTTP plumbing for the event feed.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

#[cfg(test)]
pub(crate) use tests::StatusClient;

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::debug;

/// Issues a single GET for `url` and returns the body.
///
/// # Errors
///
/// Returns an error on transport failure or a non-success status.
#[tracing::instrument(skip(client, url), fields(url = %url))]
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client
        .execute(req)
        .await
        .context("Feed request failed")?;

    let status = resp.status();
    debug!(%status, "Feed responded");
    let resp = resp
        .error_for_status()
        .with_context(|| format!("Feed returned status {status}"))?;

    Ok(resp.bytes().await?.to_vec())
}
