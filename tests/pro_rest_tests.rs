mod common;

use chrono::{TimeZone, Utc};
use common::{client, client_at, wire_path, RecordingTransport, SECRET, TIMESTAMP};
use prorest::core::kernel::sign;
use prorest::exchanges::pro::{
    Granularity, OrderParams, ReportParams, ReportType, Side, TransferParams,
};
use prorest::{ExchangeError, Param, QueryParams};
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_list_accounts_is_signed() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/accounts",
        r#"[{
            "id": "71452118-efc7-4cc4-8780-a5e22d4baa53",
            "currency": "BTC",
            "balance": "0.0000000000000000",
            "available": "0.0000000000000000",
            "hold": "0.0000000000000000"
        }]"#,
    );
    let client = client(transport.clone());

    let accounts = client.list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].currency, "BTC");

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, "https://api.test/accounts");
    assert_eq!(request.header("X-ACCESS-KEY"), Some("key"));
    assert_eq!(request.header("X-ACCESS-PASSPHRASE"), Some("pass"));
    assert_eq!(request.header("X-ACCESS-TIMESTAMP"), Some("1600000000"));
    assert_eq!(
        request.header("X-ACCESS-SIGN"),
        Some("8tpaAw2Kc+cywcOaKjqRsBX2YK6TEXBlNIeLNO77rpI=")
    );
}

#[tokio::test]
async fn test_list_fills_requires_order_or_product() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone());

    let err = client.list_fills(&QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidParameters(_)));

    // empty values count as unset
    let blank = QueryParams::new().with(Param::OrderId, "");
    assert!(client.list_fills(&blank).await.is_err());

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_list_fills_signs_sorted_query() {
    let transport = RecordingTransport::new();
    transport.ok("/fills", "[]");
    let client = client(transport.clone());

    let params = QueryParams::new()
        .with(Param::ProductId, "BTC-USD")
        .with(Param::OrderId, "abc");
    let fills = client.list_fills(&params).await.unwrap();
    assert!(fills.is_empty());

    let request = transport.last_request();
    assert_eq!(request.request_path, "/fills?order_id=abc&product_id=BTC-USD");
    assert_eq!(
        request.header("X-ACCESS-SIGN"),
        Some("UMODcHsY1bvx0uGvalEQTh3JBNIlqUGZ3F8ls6jNDbE=")
    );
}

#[tokio::test]
async fn test_order_book_level_param() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/products/BTC-USD/book",
        r#"{"sequence": 3, "bids": [["295.96","4.39088265",2]], "asks": [["295.97","25.23542881",12]]}"#,
    );
    let client = client(transport.clone());

    let params = QueryParams::new().with(Param::Level, "2");
    let book = client
        .get_product_order_book("BTC-USD", Some(&params))
        .await
        .unwrap();

    assert_eq!(book.bids[0].price, "295.96");
    assert_eq!(book.asks[0].num_orders, 12);
    assert_eq!(
        transport.last_request().request_path,
        "/products/BTC-USD/book?level=2"
    );
}

#[tokio::test]
async fn test_order_book_with_bad_level_is_decode_error() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/products/BTC-USD/book",
        r#"{"sequence": 3, "bids": [["295.96","4.39088265"]], "asks": []}"#,
    );
    let client = client(transport);

    let err = client
        .get_product_order_book("BTC-USD", None)
        .await
        .unwrap_err();
    assert!(err.is_decode_error());
}

#[tokio::test]
async fn test_full_order_book() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/products/ETH-USD/book",
        r#"{"sequence": 9, "bids": [["295.96","0.05","3b0f1225-7f84-490b-a29f-0faef9de823a"]], "asks": []}"#,
    );
    let client = client(transport.clone());

    let book = client.get_full_order_book("ETH-USD").await.unwrap();
    assert_eq!(
        book.best_bid().unwrap().order_id,
        "3b0f1225-7f84-490b-a29f-0faef9de823a"
    );
    assert_eq!(
        transport.last_request().request_path,
        "/products/ETH-USD/book?level=3"
    );
}

#[tokio::test]
async fn test_historic_rates() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/products/BTC-USD/candles",
        "[[1415398768, 0.32, 4.2, 0.35, 4.2, 12.3], [1415398708, 0.30, 0.40, 0.31, 0.32, 5.0]]",
    );
    let client = client(transport.clone());

    let start = Utc.with_ymd_and_hms(2014, 11, 7, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2014, 11, 8, 0, 0, 0).unwrap();
    let rates = client
        .get_candles("BTC-USD", start, end, Granularity::OneMinute)
        .await
        .unwrap();

    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].time, 1_415_398_768.0);
    assert_eq!(rates[0].volume, 12.3);
    assert_eq!(
        transport.last_request().request_path,
        "/products/BTC-USD/candles?end=2014-11-08T00%3A00%3A00Z&granularity=60&start=2014-11-07T00%3A00%3A00Z"
    );
}

#[tokio::test]
async fn test_place_order_signs_exact_body() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/orders",
        r#"{
            "id": "d0c5340b-6d6c-49d9-b567-48c4bfca13d2",
            "price": "0.10000000",
            "size": "0.01000000",
            "product_id": "BTC-USD",
            "side": "buy",
            "type": "limit",
            "post_only": false,
            "created_at": "2016-12-08T20:02:28.53864Z",
            "fill_fees": "0.0000000000000000",
            "filled_size": "0.00000000",
            "executed_value": "0.0000000000000000",
            "status": "pending",
            "settled": false
        }"#,
    );
    let client = client(transport.clone());

    let order = OrderParams::limit(Side::Buy, "BTC-USD", "0.10000000", "0.01000000");
    let placed = client.place_order(&order).await.unwrap();
    assert_eq!(placed.id, "d0c5340b-6d6c-49d9-b567-48c4bfca13d2");
    assert_eq!(placed.params.product_id, "BTC-USD");

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.body,
        serde_json::to_vec(&order).unwrap(),
        "the sent body is the serialized order"
    );
    let expected = sign(
        SECRET,
        &TIMESTAMP.to_string(),
        "POST",
        "/orders",
        &request.body,
    )
    .unwrap();
    assert_eq!(request.header("X-ACCESS-SIGN"), Some(expected.as_str()));
}

#[tokio::test]
async fn test_invalid_order_is_not_sent() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone());

    let mut order = OrderParams::market_size(Side::Sell, "BTC-USD", "1");
    order.size = None;
    assert!(client.place_order(&order).await.is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_order_not_found_is_api_error() {
    let transport = RecordingTransport::new();
    let client = client(transport);

    let err = client.get_order_by_id("missing").await.unwrap_err();
    assert_eq!(err.api_status(), Some(404));
    assert_eq!(err.to_string(), "API error: 404 - NotFound");
}

#[tokio::test]
async fn test_cancel_orders() {
    let transport = RecordingTransport::new();
    transport.ok("/orders/client:", r#""d0c5340b-6d6c-49d9-b567-48c4bfca13d2""#);
    transport.ok("/orders/abc", r#""abc""#);
    transport.ok("/orders", r#"["144c6f8e-713f-4682-8435-5280fbe8b2b4"]"#);
    let client = client(transport.clone());

    let id = client.cancel_order_by_id("abc", None).await.unwrap();
    assert_eq!(id, "abc");
    assert_eq!(transport.last_request().method, Method::DELETE);

    let server_id = client
        .cancel_order_by_client_oid("my-oid", None)
        .await
        .unwrap();
    assert_eq!(server_id, "d0c5340b-6d6c-49d9-b567-48c4bfca13d2");
    assert_eq!(transport.last_request().request_path, "/orders/client:my-oid");

    let params = QueryParams::new().with(Param::ProductId, "BTC-USD");
    let cancelled = client.cancel_all_orders(Some(&params)).await.unwrap();
    assert_eq!(cancelled, vec!["144c6f8e-713f-4682-8435-5280fbe8b2b4"]);
    assert_eq!(transport.last_request().request_path, "/orders?product_id=BTC-USD");
}

#[tokio::test]
async fn test_empty_id_is_rejected_locally() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone());

    assert!(client.get_account("").await.is_err());
    assert!(client.cancel_order_by_id("", None).await.is_err());
    assert!(client.get_product_ticker("").await.is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_stablecoin_conversion() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/conversions",
        r#"{
            "id": "8942caee-f9d5-4600-a894-4811268545db",
            "amount": "10000.00",
            "from_account_id": "7849cc79-8b01-4793-9345-bc6b5f08acce",
            "to_account_id": "105c3e58-0898-4106-8283-dc5781cda07b",
            "from": "USD",
            "to": "USDC"
        }"#,
    );
    let client = client(transport.clone());

    assert!(client.stablecoin_conversion("USD", "", "10").await.is_err());
    assert!(client.stablecoin_conversion("", "USDC", "10").await.is_err());
    assert!(client.stablecoin_conversion("USD", "USDC", "").await.is_err());
    assert_eq!(transport.request_count(), 0);

    let conversion = client
        .stablecoin_conversion("USD", "USDC", "10000.00")
        .await
        .unwrap();
    assert_eq!(conversion.to, "USDC");

    let request = transport.last_request();
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"from": "USD", "to": "USDC", "amount": "10000.00"})
    );
}

#[tokio::test]
async fn test_profile_transfer_ignores_body() {
    let transport = RecordingTransport::new();
    transport.ok("/profiles/transfer", "OK");
    let client = client(transport.clone());

    let transfer = TransferParams {
        from: "86602c68-306a-4500-ac73-4ce56a91d83c".to_string(),
        to: "e87429d3-f0a7-4f28-8dff-8dd93d383de1".to_string(),
        currency: "BTC".to_string(),
        amount: "1000.00".to_string(),
    };
    client.profile_transfer(&transfer).await.unwrap();
    assert_eq!(transport.last_request().method, Method::POST);
}

#[tokio::test]
async fn test_create_report_validation() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/reports",
        r#"{"id": "0428b97b-bec1-429e-a94c-59232926778d", "type": "account", "status": "pending"}"#,
    );
    let client = client(transport.clone());

    let mut report = ReportParams {
        kind: ReportType::Account,
        start_date: "2014-11-01T00:00:00.000Z".to_string(),
        end_date: "2014-11-30T23:59:59.000Z".to_string(),
        product_id: None,
        account_id: None,
        format: None,
        email: None,
    };
    assert!(client.create_report(&report).await.is_err());
    assert_eq!(transport.request_count(), 0);

    report.account_id = Some("ef7bc0da-7a7e-4ed8-9ea5-1a3b0d1e4b9c".to_string());
    let status = client.create_report(&report).await.unwrap();
    assert_eq!(status.status, "pending");
    assert!(status.file_url.is_none());
}

#[tokio::test]
async fn test_margin_endpoints_carry_query() {
    let transport = RecordingTransport::new();
    transport.ok(
        "/margin/withdrawal_power_all",
        r#"{"profile_id": "8058d771-2d88-4f0f-ab6e-299c153d4308", "marginable_withdrawal_powers": [{"currency": "ETH", "withdrawal_power": "0.0000000000000000"}]}"#,
    );
    transport.ok(
        "/margin/withdrawal_power",
        r#"{"profile_id": "8058d771-2d88-4f0f-ab6e-299c153d4308", "withdrawal_power": "7.77569088"}"#,
    );
    transport.ok(
        "/margin/buying_power",
        r#"{"buying_power": 23.53, "selling_power": 0.00237475, "buying_power_explanation": "This is the line of credit available to you on the BTC-USD market"}"#,
    );
    let client = client(transport.clone());

    let power = client.get_withdrawal_power("BTC").await.unwrap();
    assert_eq!(power.withdrawal_power, "7.77569088");
    assert_eq!(
        transport.last_request().request_path,
        "/margin/withdrawal_power?currency=BTC"
    );

    let all = client.get_all_withdrawal_power().await.unwrap();
    assert_eq!(all.marginable_withdrawal_powers[0].currency, "ETH");

    let buying = client.get_buying_power("BTC-USD").await.unwrap();
    assert_eq!(buying.buying_power, 23.53);
    assert_eq!(
        transport.last_request().request_path,
        "/margin/buying_power?product_id=BTC-USD"
    );
}

#[tokio::test]
async fn test_server_error_body_is_kept() {
    let transport = RecordingTransport::new();
    transport.route("/time", StatusCode::SERVICE_UNAVAILABLE, "upstream timeout");
    let client = client(transport);

    let err = client.get_server_time().await.unwrap_err();
    match err {
        ExchangeError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream timeout");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let transport = RecordingTransport::new();
    transport.ok("/time", r#"{"iso": "2015-01-07T23:47:25.201Z", "epoch": 1420674445.201}"#);
    let client = client(transport.clone());

    let calls = (0..8).map(|_| client.get_server_time());
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(transport.request_count(), 8);
    for request in transport.requests() {
        assert_eq!(request.header("X-ACCESS-TIMESTAMP"), Some("1600000000"));
        assert_eq!(request.request_path, "/time");
    }
}

#[tokio::test]
async fn test_signature_matches_sent_url_for_escaped_ids() {
    let transport = RecordingTransport::new();
    transport.ok("/orders/client:", r#""d0c5340b-6d6c-49d9-b567-48c4bfca13d2""#);
    let client = client(transport.clone());

    client
        .cancel_order_by_client_oid("my oid", None)
        .await
        .unwrap();

    let request = transport.last_request();
    let wire = wire_path(&request);
    assert_eq!(wire, "/orders/client:my%20oid");
    assert_eq!(request.request_path, wire);

    let expected = sign(SECRET, &TIMESTAMP.to_string(), "DELETE", &wire, b"").unwrap();
    assert_eq!(request.header("X-ACCESS-SIGN"), Some(expected.as_str()));
}

#[tokio::test]
async fn test_signature_matches_sent_url_under_base_path() {
    let transport = RecordingTransport::new();
    transport.ok("/api/fills", "[]");
    let client = client_at("https://api.test/api", transport.clone());

    let params = QueryParams::new().with(Param::ProductId, "BTC-USD");
    client.list_fills(&params).await.unwrap();

    let request = transport.last_request();
    let wire = wire_path(&request);
    assert_eq!(wire, "/api/fills?product_id=BTC-USD");
    assert_eq!(request.request_path, wire);

    let expected = sign(SECRET, &TIMESTAMP.to_string(), "GET", &wire, b"").unwrap();
    assert_eq!(request.header("X-ACCESS-SIGN"), Some(expected.as_str()));
}

#[tokio::test]
async fn test_ids_that_change_the_route_are_rejected() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone());

    for id in ["abc/def", "abc?status=open", "abc#frag"] {
        let err = client.get_order_by_id(id).await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(_)), "{}", id);
    }
    assert!(client.cancel_order_by_client_oid("a/b", None).await.is_err());
    assert_eq!(transport.request_count(), 0);
}
