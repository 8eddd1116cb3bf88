use crate::config::TransportSettings;
use crate::errors::{decode_context, fetch_context};
use crate::rate_limiter::RateLimiter;
use crate::transport::{QueryParams, Transport};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// [`Transport`] over HTTP with built-in request spacing
pub struct HttpTransport {
    client: Client,
    base_url: Option<String>,
    rate_limiter: RateLimiter,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let client = Self::build_client(&settings.user_agent, settings.timeout_secs)?;
        let rate_limiter = RateLimiter::new(settings.min_interval_ms);

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            rate_limiter,
        })
    }

    /// Resolve `url` against the base URL unless it is already absolute.
    pub fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => join_url(base, url),
            _ => url.to_string(),
        }
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str, params: &QueryParams) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .query(&params.to_pairs())
            .send()
            .await
            .with_context(|| fetch_context(url))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get<P>(&self, url: &str, params: &QueryParams) -> Result<P>
    where
        P: DeserializeOwned + Send + 'static,
    {
        let url = self.resolve(url);
        self.rate_limiter.wait().await;

        let response = self.send_get_request(&url, params).await?;
        let status = response.status();
        debug!("{} answered {}", url, status);

        if !status.is_success() {
            bail!("{} returned status: {}", url, status);
        }

        response.json::<P>().await.with_context(|| decode_context(&url))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
