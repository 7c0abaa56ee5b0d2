//! HTTP client for fetching JSON feeds.
//!
//! Requests are issued exactly once. A non-success status is turned into an
//! error so callers can decide how to degrade.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

/// Media type requested from the GitHub REST API.
pub const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse_json(response).await
    }

    /// Performs a GET request with an explicit `Accept` header and
    /// deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json_accept<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        debug!("GET JSON from {} (Accept: {})...", url, accept);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse_json(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = response
            .error_for_status()
            .context("Server returned an error status")?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}
