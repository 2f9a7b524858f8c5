//! Jupiter HTTP client against wiremock.

use std::str::FromStr;
use std::time::Duration;

use base64::Engine;
use reqwest::Url;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jupiter_swap_executor::{
    jupiter::JupiterClient,
    models::{QuoteRequest, TokenInfo, USDC_MINT},
    quote::QuoteSource,
    swap::SwapTransactionSource,
    SwapErrorKind,
};

const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

fn client(server: &MockServer, timeout: Duration) -> JupiterClient {
    let base = Url::parse(&format!("{}/v6", server.uri())).unwrap();
    JupiterClient::new(base, timeout).unwrap()
}

fn request() -> QuoteRequest {
    QuoteRequest {
        input_mint: TokenInfo::sol().mint,
        output_mint: Pubkey::from_str(USDC_MINT).unwrap(),
        amount: 10_000_000,
        slippage_bps: 50,
    }
}

fn quote_body() -> serde_json::Value {
    json!({
        "inputMint": SOL_MINT,
        "inAmount": "10000000",
        "outputMint": USDC_MINT,
        "outAmount": "1432100",
        "otherAmountThreshold": "1424939",
        "swapMode": "ExactIn",
        "slippageBps": 50,
        "priceImpactPct": "0",
        "routePlan": [{"swapInfo": {"ammKey": "abc", "label": "Whirlpool"}, "percent": 100}]
    })
}

#[tokio::test]
async fn test_quote_sends_expected_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .and(query_param("inputMint", SOL_MINT))
        .and(query_param("outputMint", USDC_MINT))
        .and(query_param("amount", "10000000"))
        .and(query_param("slippageBps", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body()))
        .expect(1)
        .mount(&server)
        .await;

    let quote = client(&server, Duration::from_secs(5))
        .get_quote(&request())
        .await
        .unwrap();

    assert_eq!(quote.in_amount, 10_000_000);
    assert_eq!(quote.out_amount, 1_432_100);
    assert_eq!(quote.raw, quote_body());
}

#[tokio::test]
async fn test_quote_error_status_carries_upstream_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"Could not find any route"}"#),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .get_quote(&request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SwapErrorKind::QuoteUnavailable);
    assert!(err.diagnostic().contains("400"));
    assert!(err.diagnostic().contains("Could not find any route"));
}

#[tokio::test]
async fn test_quote_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .get_quote(&request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SwapErrorKind::QuoteUnavailable);
}

#[tokio::test]
async fn test_quote_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(quote_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_millis(200))
        .get_quote(&request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SwapErrorKind::QuoteUnavailable);
}

#[tokio::test]
async fn test_swap_build_forwards_quote_and_decodes_transaction() {
    let server = MockServer::start().await;
    let user = Pubkey::new_unique();
    let payload = vec![1u8, 0, 42, 7, 9];

    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v6/swap"))
        .and(body_partial_json(json!({
            "quoteResponse": quote_body(),
            "userPublicKey": user.to_string(),
            "wrapAndUnwrapSol": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "swapTransaction": base64::engine::general_purpose::STANDARD.encode(&payload),
            "lastValidBlockHeight": 279_000_123u64,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let jupiter = client(&server, Duration::from_secs(5));
    let quote = jupiter.get_quote(&request()).await.unwrap();
    let unsigned = jupiter
        .build_swap_transaction(quote, &user, true)
        .await
        .unwrap();

    assert_eq!(unsigned.bytes, payload);
    assert_eq!(unsigned.last_valid_block_height, Some(279_000_123));
}

#[tokio::test]
async fn test_swap_build_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v6/swap"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let jupiter = client(&server, Duration::from_secs(5));
    let quote = jupiter.get_quote(&request()).await.unwrap();
    let err = jupiter
        .build_swap_transaction(quote, &Pubkey::new_unique(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SwapErrorKind::SwapBuildFailed);
    assert!(err.diagnostic().contains("500"));
}

#[tokio::test]
async fn test_swap_build_missing_transaction_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v6/swap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "stale quote"})))
        .mount(&server)
        .await;

    let jupiter = client(&server, Duration::from_secs(5));
    let quote = jupiter.get_quote(&request()).await.unwrap();
    let err = jupiter
        .build_swap_transaction(quote, &Pubkey::new_unique(), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SwapErrorKind::SwapBuildFailed);
}
