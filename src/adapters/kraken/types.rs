//! Kraken API wire types

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::OrderSide;

/// `{"error": [...], "result": ...}` wrapper around every response
#[derive(Debug, Deserialize)]
pub struct KrakenEnvelope<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

impl<T> KrakenEnvelope<T> {
    /// Errors reported inside a 2xx response still fail the call
    pub fn into_result(self) -> ExchangeResult<T> {
        if !self.error.is_empty() {
            let message = self.error.join("; ");
            if self.error.iter().any(|e| e.starts_with("EAPI:Invalid")) {
                return Err(ExchangeError::AuthenticationFailed(message));
            }
            return Err(ExchangeError::Api {
                status: 200,
                message,
            });
        }
        self.result
            .ok_or_else(|| ExchangeError::InvalidResponse("Kraken response missing result".into()))
    }
}

/// Market order request for `/0/private/AddOrder`
#[derive(Debug, Clone, PartialEq)]
pub struct KrakenMarketOrder {
    /// Asset pair, e.g. "LTCGBP"
    pub pair: String,
    pub side: OrderSide,
    pub volume: Decimal,
    /// Interpret `volume` in quote currency (`oflags=viqc`)
    pub volume_in_quote: bool,
    /// Validate only; nothing is submitted
    pub validate: bool,
    /// Caller reference used to find the order again after a retry
    pub userref: Option<i32>,
}

impl KrakenMarketOrder {
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let side = match self.side {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        };
        let mut fields = vec![
            ("ordertype".to_string(), "market".to_string()),
            ("type".to_string(), side.to_string()),
            ("volume".to_string(), self.volume.normalize().to_string()),
            ("pair".to_string(), self.pair.clone()),
        ];
        if self.volume_in_quote {
            fields.push(("oflags".to_string(), "viqc".to_string()));
        }
        if let Some(userref) = self.userref {
            fields.push(("userref".to_string(), userref.to_string()));
        }
        if self.validate {
            fields.push(("validate".to_string(), "true".to_string()));
        }
        fields
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KrakenOrderDescription {
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub close: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KrakenAddOrderResult {
    #[serde(default)]
    pub descr: KrakenOrderDescription,
    /// Empty when `validate` was set
    #[serde(default)]
    pub txid: Vec<String>,
}
