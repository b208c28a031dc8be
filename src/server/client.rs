//! ServerClient - reads and updates channel configuration over HTTP.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use super::channel::Channel;
use super::retry::{is_transient_network_error, is_transient_status, RetryPolicy};
use crate::config::{Config, Credential};

/// Endpoint listing and updating every channel.
const CHANNELS_PATH: &str = "configure/channels";

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the server's configuration API.
pub struct ServerClient {
    base_url: String,
    login: String,
    credential: Credential,
    retry: RetryPolicy,
    http_client: reqwest::Client,
}

impl ServerClient {
    /// Create a client for the server named in `config`.
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        Self::with_base_url(config, config.base_url())
    }

    /// Create a client with an explicit base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self, ServerError> {
        let mut builder = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT);

        if config.use_ssl {
            // Servers usually run with a self-signed certificate.
            builder = builder
                .danger_accept_invalid_certs(true)
                .min_tls_version(reqwest::tls::Version::TLS_1_2);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            login: config.login.clone(),
            credential: config.password.clone(),
            retry: RetryPolicy::default(),
            http_client: builder.build()?,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Fetch every channel.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Status` for a non-success response,
    /// `ServerError::Network` once retries are exhausted,
    /// or `ServerError::Decode` if the body is not a channel list.
    pub async fn get_channels(&self) -> Result<Vec<Channel>, ServerError> {
        let body = self.send(Method::GET, CHANNELS_PATH, None).await?;
        let channels: Vec<Channel> = serde_json::from_str(&body)?;
        log::info!("Fetched {} channels from {}", channels.len(), self.base_url);
        Ok(channels)
    }

    /// Fetch a single channel with its full settings.
    pub async fn get_channel(&self, id: &str) -> Result<Channel, ServerError> {
        let path = format!("{}/{}", CHANNELS_PATH, id);
        let body = self.send(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Upload changed channels in one request.
    pub async fn put_channels(&self, channels: &[Channel]) -> Result<(), ServerError> {
        let body = serde_json::to_vec(channels)?;
        self.send(Method::PUT, CHANNELS_PATH, Some(body)).await?;
        log::info!("Updated {} channels on {}", channels.len(), self.base_url);
        Ok(())
    }

    /// Fill in the model id when the list response left it out.
    pub async fn ensure_model_id(&self, channel: &mut Channel) -> Result<(), ServerError> {
        if channel.model_id().is_some() {
            return Ok(());
        }
        log::debug!("Fetching model id for channel {}", channel.id);
        let full = self.get_channel(&channel.id).await?;
        channel.connection_settings.model_id = full.connection_settings.model_id;
        Ok(())
    }

    /// Send a request, retrying transient failures, and return the body text.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<String, ServerError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut attempt = 0u32;

        loop {
            log::debug!("{} {}", method, url);

            let mut request = self
                .http_client
                .request(method.clone(), &url)
                .basic_auth(&self.login, Some(self.credential.as_str()));
            if let Some(bytes) = &body {
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }

            attempt += 1;
            let failure = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }
                    let failure = ServerError::Status {
                        status: status.as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    };
                    if !is_transient_status(status) {
                        return Err(failure);
                    }
                    failure
                }
                Err(e) if is_transient_network_error(&e) => ServerError::Network {
                    message: e.to_string(),
                    attempts: attempt,
                },
                Err(e) => return Err(e.into()),
            };

            if attempt > self.retry.retries {
                log::error!("{} {} failed after {} attempts: {}", method, url, attempt, failure);
                return Err(failure);
            }

            let delay = self.retry.delay(attempt - 1);
            log::warn!(
                "{} {} failed (attempt {}/{}): {}. Retrying in {:?}...",
                method,
                url,
                attempt,
                self.retry.retries + 1,
                failure,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Errors that can occur when talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error: {status}\n{body}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    #[error("Network error: {message} (after {attempts} attempts)")]
    Network {
        message: String,
        /// Attempts made before giving up
        attempts: u32,
    },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}
