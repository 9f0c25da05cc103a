use anyhow::Result;
use billing_gateway::{
    CompletePayPalPurchaseRequest, FetchSubscriptionInvoiceRequest, Gateway, GatewayError,
    HttpTransport, InvoiceState, PayPalPurchaseRequest, RefundRequest,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn gateway(server: &MockServer) -> Result<Gateway<HttpTransport>> {
    let transport = HttpTransport::new(
        &server.base_url(),
        "merchant",
        "secret",
        Duration::from_secs(5),
    )?;
    Ok(Gateway::new(transport))
}

#[tokio::test]
async fn test_invoice_numbers_round_trip() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/AutoBill").json_body(json!({
                "action": "fetchInvoiceNumbers",
                "autobill": {"merchantAutoBillId": "sub-1", "VID": null},
                "invoicestate": "Overdue"
            }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "return": {"returnCode": "200", "returnString": "OK", "soapId": "abc"},
                    "invoicenum": ["inv-1", "inv-2"]
                }));
        })
        .await;

    let mut request = FetchSubscriptionInvoiceRequest::new();
    request
        .set_subscription_id("sub-1")
        .set_invoice_state(InvoiceState::Overdue);

    let response = assert_ok!(gateway(&server)?.send(request).await);

    mock.assert_async().await;
    assert!(response.is_successful());
    assert_eq!(response.soap_id(), Some("abc"));
    assert_eq!(response.invoice_numbers(), vec!["inv-1", "inv-2"]);
    Ok(())
}

#[tokio::test]
async fn test_paypal_purchase_returns_redirect() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/Transaction")
                .json_body_partial(r#"{"action": "authCapture"}"#);
            then.status(200).json_body(json!({
                "return": {"returnCode": 200, "returnString": "OK"},
                "transaction": {
                    "merchantTransactionId": "order-42",
                    "VID": "VID-t-42",
                    "sourcePaymentMethod": {
                        "paypal": {"redirectUrl": "https://paypal.example/approve?token=1"}
                    }
                }
            }));
        })
        .await;

    let mut request = PayPalPurchaseRequest::new();
    request
        .purchase_mut()
        .set_amount("12.50")
        .set_currency("EUR")
        .set_transaction_id("order-42")
        .set_customer_reference("VID-c-1");
    request
        .set_return_url("https://shop.example/done")
        .set_cancel_url("https://shop.example/cart");

    let response = gateway(&server)?.send(request).await?;

    mock.assert_async().await;
    assert!(response.is_redirect());
    assert_eq!(
        response.redirect_url(),
        Some("https://paypal.example/approve?token=1")
    );
    assert_eq!(response.transaction_reference(), Some("VID-t-42"));
    Ok(())
}

#[tokio::test]
async fn test_complete_paypal_purchase() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/Transaction").json_body(json!({
                "action": "finalizePayPalAuth",
                "payPalTransactionId": "VID-t-42",
                "success": true
            }));
            then.status(200).json_body(json!({
                "return": {"returnCode": "200", "returnString": "OK"},
                "transaction": {"merchantTransactionId": "order-42", "VID": "VID-t-42"}
            }));
        })
        .await;

    let mut request = CompletePayPalPurchaseRequest::new();
    request
        .set_pay_pal_transaction_reference("VID-t-42")
        .set_success(true);

    let response = gateway(&server)?.send(request).await?;

    mock.assert_async().await;
    assert!(response.is_successful());
    assert_eq!(response.transaction_id(), Some("order-42"));
    assert_eq!(response.transaction_reference(), Some("VID-t-42"));
    Ok(())
}

#[tokio::test]
async fn test_validation_failure_makes_no_call() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({"return": {"returnCode": "200"}}));
        })
        .await;

    let mut request = RefundRequest::new();
    request.set_amount("5.00");

    let err = assert_err!(gateway(&server)?.send(request).await);
    assert!(err.is_validation());
    assert_eq!(
        err.message(),
        "Either the transactionId or transactionReference parameter is required."
    );
    mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_provider_fault_surfaces_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/Refund");
            then.status(500).body("internal fault");
        })
        .await;

    let mut request = RefundRequest::new();
    request.set_transaction_reference("VID-t-1");

    let err = assert_err!(gateway(&server)?.send(request).await);
    assert!(matches!(err, GatewayError::ProviderFault { code: 500, .. }));
    assert!(!err.is_validation());
    Ok(())
}

#[tokio::test]
async fn test_declined_refund_is_unsuccessful_response() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/Refund");
            then.status(200).json_body(json!({
                "return": {"returnCode": "400", "returnString": "Refund exceeds captured amount"}
            }));
        })
        .await;

    let mut request = RefundRequest::new();
    request.set_transaction_id("t-1").set_amount("999.00");

    let response = gateway(&server)?.send(request).await?;
    assert!(!response.is_successful());
    assert_eq!(response.code(), Some(400));
    assert_eq!(response.message(), Some("Refund exceeds captured amount"));
    assert!(response.refund_references().is_empty());
    Ok(())
}
