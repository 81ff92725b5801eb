// HTTP collaborator used to fetch objects through their public URL
use crate::error::Result;
use std::future::Future;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub data: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET interface so downloads can run against any HTTP stack.
pub trait HttpFetcher: Send + Sync {
    /// Fetch `url`. Non-2xx statuses are returned as responses, not errors.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Default fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let data = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, data })
    }
}
