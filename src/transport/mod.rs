//! The seam between a [`Paginator`](crate::pagination::Paginator) and whatever
//! actually serves the listing.

mod params;

pub use params::{ParamValue, QueryParams};

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Issues GET-style requests and decodes the response body into a payload.
///
/// Implementations are shared between controllers and may be called concurrently.
/// Base URLs, headers, authentication and status interpretation are the
/// transport's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get<P>(&self, url: &str, params: &QueryParams) -> Result<P>
    where
        P: DeserializeOwned + Send + 'static;
}

#[async_trait]
impl<X: Transport> Transport for Arc<X> {
    async fn get<P>(&self, url: &str, params: &QueryParams) -> Result<P>
    where
        P: DeserializeOwned + Send + 'static,
    {
        (**self).get(url, params).await
    }
}
