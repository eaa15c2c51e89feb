//! SideShift authentication
//!
//! No signature: the account secret travels in `x-sideshift-secret`.

use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

use super::types::SideShiftErrorBody;
use crate::adapters::errors::ExchangeResult;
use crate::adapters::signing::{insert_header, RequestSigner, SigningPayload};

pub struct SideShiftSigner {
    secret: SecretString,
}

impl SideShiftSigner {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }
}

impl RequestSigner for SideShiftSigner {
    fn name(&self) -> &'static str {
        "sideshift"
    }

    fn sign(&self, _payload: &SigningPayload<'_>) -> ExchangeResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "x-sideshift-secret", self.secret.expose_secret())?;
        Ok(headers)
    }

    fn decode_error(&self, body: &[u8]) -> Option<String> {
        serde_json::from_slice::<SideShiftErrorBody>(body)
            .ok()?
            .error
            .message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reqwest::Method;

    #[test]
    fn test_secret_header() {
        let signer = SideShiftSigner::new(SecretString::from("shh".to_string()));
        let headers = signer
            .sign(&SigningPayload {
                timestamp: Utc::now(),
                method: &Method::GET,
                path: "/api/v2/permissions",
                body: b"",
            })
            .unwrap();
        assert_eq!(headers.get("x-sideshift-secret").unwrap(), "shh");
    }

    #[test]
    fn test_decode_error() {
        let signer = SideShiftSigner::new(SecretString::from("shh".to_string()));
        assert_eq!(
            signer.decode_error(br#"{"error":{"message":"Amount too low"}}"#),
            Some("Amount too low".to_string())
        );
        assert_eq!(signer.decode_error(br#"{"error":{}}"#), None);
        assert_eq!(signer.decode_error(b"Bad Gateway"), None);
    }
}
