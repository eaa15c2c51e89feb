//! End-to-End Conversion Tests
//!
//! Drives the real Coinbase and SideShift clients against two mock HTTP
//! servers through a complete conversion:
//! 1. Permissions and limits lookups
//! 2. Market buy clamped to the product maximum
//! 3. Refund address, quote and fixed shift
//! 4. Withdrawal to the shift deposit address
//! 5. Polling until settled
//!
//! # Running the tests
//! ```bash
//! cargo test --test full_cycle
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Mock, Server};
use rust_decimal_macros::dec;
use secrecy::SecretString;
use url::Url;

use fiat_bridge::adapters::{
    Clock, CoinbaseClient, CoinbaseConfig, ManualClock, SideShiftClient, SideShiftConfig,
};
use fiat_bridge::config::load_config_from_str;
use fiat_bridge::core::{ConversionRequest, Converter};
use fiat_bridge::error::{ConvertError, ConvertStep};

const CONFIG_YAML: &str = r#"
conversion:
  fiat_currency: gbp
  deposit_coin: LTC
  settle_coin: xmr
  settle_address: " 4AdUndXHHZ "
"#;

const SHIFT_JSON: &str = r#"{"id":"s-1","depositCoin":"LTC","settleCoin":"XMR","depositAddress":"ltc1qshiftdeposit","settleAddress":"4AdUndXHHZ","refundAddress":"ltc1qrefund","type":"fixed","quoteId":"q-1","expiresAt":"2024-01-01T00:15:00.000Z","status":"STATUS"}"#;

// =============================================================================
// Helpers
// =============================================================================

fn request() -> ConversionRequest {
    load_config_from_str(CONFIG_YAML).unwrap().conversion.to_request()
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
}

fn converter(coinbase: &Server, sideshift: &Server) -> Converter<CoinbaseClient, SideShiftClient> {
    let clock = clock();
    let exchange = CoinbaseClient::new(
        CoinbaseConfig::new(
            "key",
            SecretString::from("123".to_string()),
            Url::parse(&coinbase.url()).unwrap(),
        ),
        clock.clone(),
    );
    let swap = SideShiftClient::new(
        SideShiftConfig::new(
            SecretString::from("shh".to_string()),
            Url::parse(&format!("{}/api/v2", sideshift.url())).unwrap(),
        )
        .with_poll_interval(Duration::from_millis(5)),
        clock.clone(),
    );
    Converter::new(exchange, swap, clock)
}

fn account_body(currency: &str, amount: &str) -> String {
    format!(
        r#"{{"data":{{"id":"acc-{}","currency":{{"code":"{}"}},"balance":{{"amount":"{}","currency":"{}"}}}}}}"#,
        currency.to_lowercase(),
        currency,
        amount,
        currency
    )
}

fn shift_body(status: &str) -> String {
    SHIFT_JSON.replace("STATUS", status)
}

async fn mock_account(server: &mut Server, currency: &str, amount: &str, hits: usize) -> Mock {
    server
        .mock("GET", format!("/v2/accounts/{}", currency).as_str())
        .match_header("cb-access-key", "key")
        .with_body(account_body(currency, amount))
        .expect(hits)
        .create_async()
        .await
}

/// Permissions, pair limits, quote and fixed shift
async fn mock_swap_setup(server: &mut Server, pair_hits: usize) -> Vec<Mock> {
    let permissions = server
        .mock("GET", "/api/v2/permissions")
        .match_header("x-sideshift-secret", "shh")
        .with_body(r#"{"createShift":true}"#)
        .create_async()
        .await;
    let pair = server
        .mock("GET", "/api/v2/pair/ltc/xmr")
        .with_body(r#"{"min":"0.01","max":"100","rate":"0.4","depositCoin":"LTC","settleCoin":"XMR"}"#)
        .expect(pair_hits)
        .create_async()
        .await;
    let quote = server
        .mock("POST", "/api/v2/quotes")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "depositCoin": "ltc",
            "settleCoin": "xmr",
            "depositAmount": "2"
        })))
        .with_status(201)
        .with_body(r#"{"id":"q-1","depositCoin":"LTC","settleCoin":"XMR","expiresAt":"2024-01-01T00:15:00.000Z","depositAmount":"2","settleAmount":"0.8","rate":"0.4"}"#)
        .expect(1)
        .create_async()
        .await;
    let shift = server
        .mock("POST", "/api/v2/shifts/fixed")
        .match_body(Matcher::Json(serde_json::json!({
            "settleAddress": "4AdUndXHHZ",
            "refundAddress": "ltc1qrefund",
            "quoteId": "q-1"
        })))
        .with_status(201)
        .with_body(shift_body("waiting"))
        .expect(1)
        .create_async()
        .await;
    vec![permissions, pair, quote, shift]
}

async fn mock_refund_address(server: &mut Server) -> Mock {
    server
        .mock("GET", "/v2/accounts/LTC/addresses")
        .with_body(r#"{"data":[{"id":"ad1","address":"ltc1qrefund","network":"litecoin"}]}"#)
        .expect(1)
        .create_async()
        .await
}

async fn mock_send(server: &mut Server) -> Mock {
    server
        .mock("POST", "/v2/accounts/acc-ltc/transactions")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "type": "send",
            "to": "ltc1qshiftdeposit",
            "amount": "2",
            "currency": "LTC"
        })))
        .with_status(201)
        .with_body(r#"{"data":{"id":"tx-1","type":"send","status":"pending","amount":{"amount":"-2","currency":"LTC"},"network":{"hash":"0xabc"}}}"#)
        .expect(1)
        .create_async()
        .await
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_full_cycle_buys_shifts_and_settles() {
    let mut coinbase = Server::new_async().await;
    let mut sideshift = Server::new_async().await;

    let fiat = mock_account(&mut coinbase, "GBP", "500", 1).await;
    let product = coinbase
        .mock("GET", "/api/v3/brokerage/products/LTC-GBP")
        .with_body(r#"{"product_id":"LTC-GBP","price":"50","quote_min_size":"1","quote_max_size":"100","trading_disabled":false}"#)
        .expect(1)
        .create_async()
        .await;
    // Preflight read before the order, fresh read after it
    let ltc_before = mock_account(&mut coinbase, "LTC", "0", 1).await;
    let ltc_after = mock_account(&mut coinbase, "LTC", "2", 1).await;
    let order = coinbase
        .mock("POST", "/api/v3/brokerage/orders")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "product_id": "LTC-GBP",
            "side": "BUY",
            "order_configuration": {"market_market_ioc": {"quote_size": "100"}}
        })))
        .with_body(r#"{"success":true,"success_response":{"order_id":"o-1"}}"#)
        .expect(1)
        .create_async()
        .await;
    let refund = mock_refund_address(&mut coinbase).await;
    let send = mock_send(&mut coinbase).await;

    let setup = mock_swap_setup(&mut sideshift, 2).await;
    let processing = sideshift
        .mock("GET", "/api/v2/shifts/s-1")
        .with_body(shift_body("processing"))
        .expect(2)
        .create_async()
        .await;
    let settled = sideshift
        .mock("GET", "/api/v2/shifts/s-1")
        .with_body(shift_body("settled"))
        .expect(1)
        .create_async()
        .await;

    let outcome = converter(&coinbase, &sideshift)
        .convert(&request())
        .await
        .unwrap();

    assert!(outcome.is_settled());
    assert_eq!(outcome.order.unwrap().order_id.as_deref(), Some("o-1"));
    assert_eq!(outcome.quote.settle_amount, dec!(0.8));
    assert_eq!(outcome.transaction.network_hash.as_deref(), Some("0xabc"));

    for mock in [fiat, product, ltc_before, ltc_after, order, refund, send, processing, settled] {
        mock.assert_async().await;
    }
    for mock in setup {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_zero_fiat_skips_order_and_shifts_existing_balance() {
    let mut coinbase = Server::new_async().await;
    let mut sideshift = Server::new_async().await;

    let fiat = mock_account(&mut coinbase, "GBP", "0", 1).await;
    let product = coinbase
        .mock("GET", "/api/v3/brokerage/products/LTC-GBP")
        .expect(0)
        .create_async()
        .await;
    let order = coinbase
        .mock("POST", "/api/v3/brokerage/orders")
        .expect(0)
        .create_async()
        .await;
    let ltc = mock_account(&mut coinbase, "LTC", "2.0", 1).await;
    let refund = mock_refund_address(&mut coinbase).await;
    let send = mock_send(&mut coinbase).await;

    let setup = mock_swap_setup(&mut sideshift, 1).await;
    let settled = sideshift
        .mock("GET", "/api/v2/shifts/s-1")
        .with_body(shift_body("settled"))
        .expect(1)
        .create_async()
        .await;

    let outcome = converter(&coinbase, &sideshift)
        .convert(&request())
        .await
        .unwrap();

    assert!(outcome.order.is_none());
    assert!(outcome.is_settled());
    for mock in [fiat, product, order, ltc, refund, send, settled] {
        mock.assert_async().await;
    }
    for mock in setup {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_withdrawal_failure_stops_before_polling() {
    let mut coinbase = Server::new_async().await;
    let mut sideshift = Server::new_async().await;

    let _fiat = mock_account(&mut coinbase, "GBP", "0", 1).await;
    let _ltc = mock_account(&mut coinbase, "LTC", "2", 1).await;
    let _refund = mock_refund_address(&mut coinbase).await;
    let _send = coinbase
        .mock("POST", "/v2/accounts/acc-ltc/transactions")
        .with_status(400)
        .with_body(r#"{"errors":[{"id":"validation_error","message":"Invalid address"}]}"#)
        .create_async()
        .await;

    let _setup = mock_swap_setup(&mut sideshift, 1).await;
    let poll = sideshift
        .mock("GET", "/api/v2/shifts/s-1")
        .expect(0)
        .create_async()
        .await;

    let err = converter(&coinbase, &sideshift)
        .convert(&request())
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(ConvertStep::SendFunds));
    assert!(err.to_string().contains("Invalid address"), "Got: {}", err);
    assert!(matches!(err, ConvertError::Step { .. }));
    poll.assert_async().await;
}
