//! Coinbase request signing
//!
//! `CB-ACCESS-SIGN` is the hex HMAC-SHA256 of
//! `timestamp + METHOD + path + body`, keyed by the raw API secret.

use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::config::COINBASE_API_VERSION;
use super::types::CoinbaseErrorBody;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::signing::{insert_header, RequestSigner, SigningPayload};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer for Coinbase API keys
pub struct CoinbaseSigner {
    api_key: String,
    api_secret: SecretString,
}

impl CoinbaseSigner {
    pub fn new(api_key: impl Into<String>, api_secret: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
        }
    }

    /// Hex signature over one request
    pub fn signature(
        &self,
        timestamp: &str,
        method: &Method,
        path: &str,
        body: &[u8],
    ) -> ExchangeResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::AuthenticationFailed(format!("Invalid API secret: {}", e)))?;
        mac.update(timestamp.as_bytes());
        mac.update(method.as_str().as_bytes());
        mac.update(path.as_bytes());
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl RequestSigner for CoinbaseSigner {
    fn name(&self) -> &'static str {
        "coinbase"
    }

    fn sign(&self, payload: &SigningPayload<'_>) -> ExchangeResult<HeaderMap> {
        let timestamp = payload.timestamp.timestamp().to_string();
        let signature = self.signature(&timestamp, payload.method, payload.path, payload.body)?;

        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "cb-access-key", &self.api_key)?;
        insert_header(&mut headers, "cb-access-sign", &signature)?;
        insert_header(&mut headers, "cb-access-timestamp", &timestamp)?;
        insert_header(&mut headers, "cb-version", COINBASE_API_VERSION)?;
        Ok(headers)
    }

    fn decode_error(&self, body: &[u8]) -> Option<String> {
        serde_json::from_slice::<CoinbaseErrorBody>(body)
            .ok()?
            .into_message()
    }
}
