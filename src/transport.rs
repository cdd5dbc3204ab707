//! HTTP transport to the provider.
//!
//! The service only sees the [`Transport`] trait, so tests can swap in a
//! canned implementation and never touch the network.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::query::QueryParams;
use crate::types::Method;

const USER_AGENT: &str = concat!("amap-tools/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends one request and decodes the JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        query: &QueryParams,
        method: Method,
    ) -> Result<Value, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout.as_secs())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        query: &QueryParams,
        method: Method,
    ) -> Result<Value, TransportError> {
        // POST endpoints still take their parameters in the query string
        let request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        let response = request
            .header("Content-Type", "application/json")
            .query(query.pairs())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_error(e))?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex;

    /// One recorded outbound request.
    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub url: String,
        pub query: QueryParams,
        pub method: Method,
    }

    /// Returns the same canned reply for every request and records what
    /// was sent.
    pub struct StubTransport {
        reply: Result<Value, TransportError>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl StubTransport {
        pub fn replying(value: Value) -> Self {
            Self {
                reply: Ok(value),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(err: TransportError) -> Self {
            Self {
                reply: Err(err),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(
            &self,
            url: &str,
            query: &QueryParams,
            method: Method,
        ) -> Result<Value, TransportError> {
            self.requests.lock().unwrap().push(Recorded {
                url: url.to_string(),
                query: query.clone(),
                method,
            });
            self.reply.clone()
        }
    }
}
