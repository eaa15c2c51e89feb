//! Signed Request Client
//!
//! One generic HTTP request path shared by every service client. Per call:
//! read the injected clock, finalize the body once, sign those exact bytes,
//! send, drain the response and decode either the success type or the
//! service's error envelope. No retries happen here.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::adapters::clock::Clock;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::signing::{RequestBody, RequestSigner, SigningPayload};
use crate::adapters::types::create_http_client;
use crate::config::constants;

/// Authenticated HTTP client bound to one service
pub struct SignedClient<S> {
    http: reqwest::Client,
    base_url: Url,
    signer: S,
    clock: Arc<dyn Clock>,
    /// Whole-request timeout `http` was built with
    timeout: Duration,
}

impl<S: RequestSigner> SignedClient<S> {
    /// Create a client with the shared pooled HTTP client and the
    /// `HTTP_TIMEOUT_SECS` timeout
    pub fn new(base_url: Url, signer: S, clock: Arc<dyn Clock>) -> Self {
        let timeout = constants::http_timeout();
        let http = create_http_client(signer.name(), timeout);
        Self::with_http_client(base_url, signer, clock, http, timeout)
    }

    /// Create a client reusing an existing `reqwest::Client`
    ///
    /// `timeout` must be the timeout `http` was built with; it is what a
    /// timed-out call reports.
    pub fn with_http_client(
        base_url: Url,
        signer: S,
        clock: Arc<dyn Clock>,
        http: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            signer,
            clock,
            timeout,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Append `path` to the base URL, keeping the base URL's own path prefix
    pub fn resolve(&self, path: &str) -> ExchangeResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| ExchangeError::InvalidRequest(format!("Invalid path '{}': {}", path, e)))
    }

    /// Send one signed request and decode the 2xx body as `T`
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> ExchangeResult<T> {
        let url = self.resolve(path)?;
        let canonical_path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let timestamp = self.clock.now();
        let content_type = self.signer.content_type(&body);
        let bytes = self.signer.encode_body(timestamp, body);

        let mut headers = self.signer.sign(&SigningPayload {
            timestamp,
            method: &method,
            path: &canonical_path,
            body: &bytes,
        })?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

        tracing::debug!(
            service = self.signer.name(),
            method = %method,
            path = %canonical_path,
            body_len = bytes.len(),
            "Sending signed request"
        );

        let mut request = self.http.request(method.clone(), url).headers(headers);
        if !bytes.is_empty() {
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|e| transport_error(&e, self.timeout))?;

        let status = response.status();
        // Always drain the body so the pooled connection can be reused
        let body = response.bytes().await.map_err(|e| {
            ExchangeError::InvalidResponse(format!("Failed to read response: {}", e))
        })?;

        tracing::debug!(
            service = self.signer.name(),
            method = %method,
            path = %canonical_path,
            status = status.as_u16(),
            body_len = body.len(),
            "Response received"
        );

        if !status.is_success() {
            let err = self.status_error(status.as_u16(), &body);
            tracing::warn!(
                service = self.signer.name(),
                method = %method,
                path = %canonical_path,
                error = %err,
                "Request rejected"
            );
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| {
            ExchangeError::InvalidResponse(format!(
                "Failed to decode {} {} response: {} - body: {}",
                method,
                canonical_path,
                e,
                String::from_utf8_lossy(&body)
            ))
        })
    }

    fn status_error(&self, status: u16, body: &[u8]) -> ExchangeError {
        let message = self.signer.decode_error(body).filter(|m| !m.is_empty());
        match (status, message) {
            (401 | 403, Some(message)) => ExchangeError::AuthenticationFailed(message),
            (401 | 403, None) => {
                ExchangeError::AuthenticationFailed(format!("Rejected with status {}", status))
            }
            (_, Some(message)) => ExchangeError::Api { status, message },
            (_, None) => ExchangeError::BadStatus(status),
        }
    }
}

fn transport_error(err: &reqwest::Error, timeout: Duration) -> ExchangeError {
    if err.is_timeout() {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        ExchangeError::NetworkTimeout(timeout_ms)
    } else {
        ExchangeError::ConnectionFailed(err.to_string())
    }
}
