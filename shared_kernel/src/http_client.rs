use lazy_static::lazy_static;
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;
use thiserror::Error as ThisError;
use url::Url;

lazy_static! {
    static ref CLIENT: ClientWithMiddleware = {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        ClientBuilder::new(client)
            // Retry failed requests.
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(TracingMiddleware::default())
            .build()
    };
}

pub struct HttpClient;

#[derive(ThisError, Debug)]
pub enum HttpClientError {
    #[error("Failed to fetch request from {url}")]
    Request {
        url: Url,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("{url} responded with {status}")]
    UnexpectedStatus { url: Url, status: StatusCode },
    #[error("Failed to read the response body from {url}")]
    Body {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl HttpClient {
    async fn get(url: Url) -> Result<Response, HttpClientError> {
        let response = CLIENT
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HttpClientError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpClientError::UnexpectedStatus { url, status });
        }
        Ok(response)
    }

    pub async fn get_text(url: Url) -> Result<String, HttpClientError> {
        Self::get(url.clone())
            .await?
            .text()
            .await
            .map_err(|source| HttpClientError::Body { url, source })
    }
}
