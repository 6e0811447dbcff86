mod common;

use jobhunter_payments::config::MomoConfig;
use jobhunter_payments::gateways::momo::MomoGateway;
use jobhunter_payments::gateways::signature::sign_create_request;
use jobhunter_payments::gateways::{GatewayAck, GatewayError, PaymentOrder, WalletGateway};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> (MomoGateway, MomoConfig) {
    let cfg = MomoConfig {
        endpoint: format!("{}/v2/gateway/api/create", server.uri()),
        ..common::momo_config()
    };
    (MomoGateway::new(cfg.clone(), reqwest::Client::new()), cfg)
}

fn order() -> PaymentOrder {
    PaymentOrder::new(100000, "Thanh toan goi Premium".to_string())
}

#[tokio::test]
async fn posts_signed_capture_wallet_request() {
    let server = MockServer::start().await;
    let (gateway, cfg) = gateway_for(&server);
    let order = order();

    Mock::given(method("POST"))
        .and(path("/v2/gateway/api/create"))
        .and(body_partial_json(json!({
            "partnerCode": "MOMOJOBHUNTER",
            "orderId": order.order_id,
            "requestId": order.request_id,
            "amount": 100000,
            "requestType": "captureWallet",
            "lang": "vi",
            "extraData": "",
            "signature": sign_create_request(&cfg, &order),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "partnerCode": "MOMOJOBHUNTER",
            "orderId": order.order_id,
            "resultCode": 0,
            "message": "Thành công.",
            "payUrl": "https://test-payment.momo.vn/v2/gateway/pay?t=abc",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = gateway.create_payment(&order).await.unwrap();
    assert_eq!(
        ack,
        GatewayAck::Accepted {
            pay_url: "https://test-payment.momo.vn/v2/gateway/pay?t=abc".to_string()
        }
    );

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["ipnUrl"], cfg.ipn_url);
    assert_eq!(body["redirectUrl"], cfg.redirect_url);
    assert!(body.get("secretKey").is_none());
    assert!(body.get("accessKey").is_none());
}

#[tokio::test]
async fn decline_body_on_client_error_is_a_decline() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "resultCode": 22,
            "message": "Số tiền giao dịch không hợp lệ.",
        })))
        .mount(&server)
        .await;

    let ack = gateway.create_payment(&order()).await.unwrap();
    assert_eq!(
        ack,
        GatewayAck::Declined {
            result_code: 22,
            message: "Số tiền giao dịch không hợp lệ.".to_string()
        }
    );
}

#[tokio::test]
async fn string_result_code_and_local_message_are_accepted() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": "41",
            "localMessage": "Trùng orderId",
        })))
        .mount(&server)
        .await;

    let ack = gateway.create_payment(&order()).await.unwrap();
    assert_eq!(
        ack,
        GatewayAck::Declined {
            result_code: 41,
            message: "Trùng orderId".to_string()
        }
    );
}

#[tokio::test]
async fn server_error_is_retryable_http_error() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = gateway.create_payment(&order()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Http { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway.create_payment(&order()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn accepted_without_pay_url_is_malformed() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultCode": 0 })))
        .mount(&server)
        .await;

    let err = gateway.create_payment(&order()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let server = MockServer::start().await;
    let cfg = MomoConfig {
        endpoint: server.uri(),
        timeout_ms: 50,
        ..common::momo_config()
    };
    let gateway = MomoGateway::new(cfg, reqwest::Client::new());

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "resultCode": 0, "payUrl": "https://x" })),
        )
        .mount(&server)
        .await;

    let err = gateway.create_payment(&order()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Timeout));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let gateway = MomoGateway::new(common::momo_config(), reqwest::Client::new());
    let err = gateway.create_payment(&order()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
