//! Request signing capability
//!
//! Each service authenticates differently: Coinbase signs with HMAC-SHA-256,
//! Kraken with HMAC-SHA-512 over a SHA-256 prehash, SideShift with a plain
//! secret header. `RequestSigner` captures that variation (plus the shape of
//! the service's error envelope) so `SignedClient` is written only once.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Body of an outgoing request before the signer finalizes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// Already-serialized JSON bytes
    Json(Vec<u8>),
    /// Form fields, url-encoded in order
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize a value to JSON exactly once
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ExchangeResult<Self> {
        serde_json::to_vec(value)
            .map(RequestBody::Json)
            .map_err(|e| ExchangeError::InvalidRequest(format!("Failed to serialize body: {}", e)))
    }

    /// Build a form body from key/value pairs
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Content-Type header value for this body as given
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => FORM_CONTENT_TYPE,
            RequestBody::Empty | RequestBody::Json(_) => "application/json",
        }
    }
}

/// Url-encode form pairs in the given order
pub fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

/// Everything a signature may cover. `body` holds the exact bytes sent.
#[derive(Debug, Clone, Copy)]
pub struct SigningPayload<'a> {
    pub timestamp: DateTime<Utc>,
    pub method: &'a Method,
    pub path: &'a str,
    pub body: &'a [u8],
}

/// Per-service authentication and error-envelope handling
pub trait RequestSigner: Send + Sync {
    /// Service name used in logs
    fn name(&self) -> &'static str;

    /// Turn the logical body into the bytes that are both signed and sent.
    ///
    /// Called once per request with the same timestamp later passed to `sign`.
    fn encode_body(&self, _timestamp: DateTime<Utc>, body: RequestBody) -> Vec<u8> {
        match body {
            RequestBody::Empty => Vec::new(),
            RequestBody::Json(bytes) => bytes,
            RequestBody::Form(pairs) => encode_form(&pairs).into_bytes(),
        }
    }

    /// Content-Type of the bytes `encode_body` produces for `body`
    fn content_type(&self, body: &RequestBody) -> &'static str {
        body.content_type()
    }

    /// Authentication headers for one request
    fn sign(&self, payload: &SigningPayload<'_>) -> ExchangeResult<HeaderMap>;

    /// Extract the human-readable message from a non-2xx response body
    fn decode_error(&self, body: &[u8]) -> Option<String>;
}

/// Insert a header, rejecting values that cannot appear on the wire
pub(crate) fn insert_header(
    headers: &mut HeaderMap,
    name: &'static str,
    value: &str,
) -> ExchangeResult<()> {
    let value = HeaderValue::from_str(value).map_err(|e| {
        ExchangeError::InvalidRequest(format!("Invalid value for header {}: {}", name, e))
    })?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
