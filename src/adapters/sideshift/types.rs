//! SideShift request bodies and error envelope
//!
//! Responses (`PairLimits`, `Quote`, `Shift`) deserialize directly into the
//! shared types in `adapters::types`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SideShiftErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct SideShiftErrorBody {
    #[serde(default)]
    pub error: SideShiftErrorDetail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest<'a> {
    pub deposit_coin: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_network: Option<&'a str>,
    pub settle_coin: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_network: Option<&'a str>,
    pub deposit_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedShiftRequest<'a> {
    pub settle_address: &'a str,
    pub refund_address: &'a str,
    pub quote_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableShiftRequest<'a> {
    pub settle_address: &'a str,
    pub refund_address: &'a str,
    pub deposit_coin: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_network: Option<&'a str>,
    pub settle_coin: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_network: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<&'a str>,
}
