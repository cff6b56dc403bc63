use std::time::Duration;

use log::warn;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use crate::errors::{AttemptFailure, ClientError, FetchError};

pub struct RequestClient {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl RequestClient {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Result<Self, ClientError> {
        Self::with_headers(user_agent, HeaderMap::new(), timeout, max_retries, retry_backoff)
    }

    /// Like [`RequestClient::new`], attaching `headers` to every request as well.
    pub fn with_headers(
        user_agent: &str,
        mut headers: HeaderMap,
        timeout: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Result<Self, ClientError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| ClientError::UserAgent(user_agent.to_string()))?;
        headers.insert(USER_AGENT, user_agent);
        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_retries: max_retries.max(1),
            retry_backoff,
        })
    }

    async fn fetch_url_response(&self, url: &str) -> Result<Response, AttemptFailure> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn try_fetch_body(&self, url: &str) -> Result<String, AttemptFailure> {
        let response = self.fetch_url_response(url).await?;
        let body = response.text().await?;
        Ok(body)
    }

    /// GETs `url`, retrying with a fixed pause between attempts.
    pub async fn fetch_url_body(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 1;
        loop {
            match self.try_fetch_body(url).await {
                Ok(body) => return Ok(body),
                Err(last) if attempt >= self.max_retries => {
                    return Err(FetchError {
                        url: url.to_string(),
                        attempts: attempt,
                        last,
                    });
                }
                Err(err) => {
                    warn!(
                        "attempt {attempt}/{} for {url} failed: {err}",
                        self.max_retries
                    );
                    // Fixed, not exponential.
                    tokio::time::sleep(self.retry_backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
