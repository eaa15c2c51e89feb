//! Kraken request signing
//!
//! `API-Sign` = base64(HMAC-SHA512(base64decode(secret), path + SHA256(nonce + postdata))).
//! The nonce is the first field of the form body. It starts from the request
//! timestamp in milliseconds and is bumped past the last issued value, so
//! requests within the same millisecond still get increasing nonces. `sign`
//! reads it back from the finalized body.

use std::sync::atomic::{AtomicI64, Ordering};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretBox, SecretString};
use sha2::{Digest, Sha256, Sha512};

use super::types::KrakenEnvelope;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::signing::{
    encode_form, insert_header, RequestBody, RequestSigner, SigningPayload, FORM_CONTENT_TYPE,
};

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 signer for Kraken private endpoints
pub struct KrakenSigner {
    api_key: String,
    private_key: SecretBox<Vec<u8>>,
    last_nonce: AtomicI64,
}

impl KrakenSigner {
    /// Decode the base64 private key once at construction
    pub fn new(api_key: impl Into<String>, api_secret: &SecretString) -> ExchangeResult<Self> {
        let decoded = STANDARD
            .decode(api_secret.expose_secret().trim())
            .map_err(|e| ExchangeError::AuthenticationFailed(format!("KRAKEN_API_SECRET is not base64: {}", e)))?;
        Ok(Self {
            api_key: api_key.into(),
            private_key: SecretBox::new(Box::new(decoded)),
            last_nonce: AtomicI64::new(0),
        })
    }

    /// Next nonce: the timestamp in milliseconds, or one past the last
    /// issued nonce if that is not greater
    pub fn next_nonce(&self, timestamp: DateTime<Utc>) -> i64 {
        let millis = timestamp.timestamp_millis();
        let bump = |last: i64| millis.max(last.saturating_add(1));
        match self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
        {
            Ok(previous) | Err(previous) => bump(previous),
        }
    }

    /// Base64 signature for `path` and the finalized post data
    pub fn signature(&self, path: &str, nonce: &str, post_data: &[u8]) -> ExchangeResult<String> {
        let mut sha = Sha256::new();
        sha.update(nonce.as_bytes());
        sha.update(post_data);
        let digest = sha.finalize();

        let mut mac = HmacSha512::new_from_slice(self.private_key.expose_secret())
            .map_err(|e| ExchangeError::AuthenticationFailed(format!("Invalid private key: {}", e)))?;
        mac.update(path.as_bytes());
        mac.update(&digest);
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl RequestSigner for KrakenSigner {
    fn name(&self) -> &'static str {
        "kraken"
    }

    fn encode_body(&self, timestamp: DateTime<Utc>, body: RequestBody) -> Vec<u8> {
        let mut pairs = vec![("nonce".to_string(), self.next_nonce(timestamp).to_string())];
        match body {
            RequestBody::Empty => {}
            RequestBody::Form(fields) => pairs.extend(fields),
            RequestBody::Json(bytes) => return bytes,
        }
        encode_form(&pairs).into_bytes()
    }

    fn content_type(&self, body: &RequestBody) -> &'static str {
        match body {
            RequestBody::Json(_) => body.content_type(),
            RequestBody::Empty | RequestBody::Form(_) => FORM_CONTENT_TYPE,
        }
    }

    fn sign(&self, payload: &SigningPayload<'_>) -> ExchangeResult<HeaderMap> {
        let nonce = body_nonce(payload.body).ok_or_else(|| {
            ExchangeError::InvalidRequest("Kraken request body has no leading nonce".to_string())
        })?;
        let signature = self.signature(payload.path, nonce, payload.body)?;

        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "api-key", &self.api_key)?;
        insert_header(&mut headers, "api-sign", &signature)?;
        Ok(headers)
    }

    fn decode_error(&self, body: &[u8]) -> Option<String> {
        let envelope: KrakenEnvelope<serde_json::Value> = serde_json::from_slice(body).ok()?;
        if envelope.error.is_empty() {
            None
        } else {
            Some(envelope.error.join("; "))
        }
    }
}

/// The `nonce` value of a body produced by `encode_body`
fn body_nonce(body: &[u8]) -> Option<&str> {
    let body = std::str::from_utf8(body).ok()?;
    let first = body.split('&').next()?;
    first.strip_prefix("nonce=").filter(|n| !n.is_empty())
}
