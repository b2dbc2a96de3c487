use reqwest::{Client, Url};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Where the controller gets listing fragments from. `path` is a
/// path-and-query such as `/load-more-products?offset=10&query=&category=`.
pub trait FragmentSource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Fetches fragments from a running storefront over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: Client,
    base_url: Url,
}

impl HttpFragmentSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }
}

impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
