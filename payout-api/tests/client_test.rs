//! HTTP-level tests for CopperxClient against a mockito server: bearer
//! header attachment, pagination query params, and status classification.

use mockito::Matcher;
use payout_api::{ApiError, BatchTransferRequest, CopperxClient, TransferRequest};

fn transfer_json(id: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "type": "send",
            "status": "pending",
            "amount": 500000000.0,
            "currency": "USDC",
            "totalFee": 0.1,
            "feeCurrency": "USDC",
            "createdAt": "2025-03-01T10:00:00Z",
            "sourceAccount": {{"walletAddress": "0xSRC"}},
            "destinationAccount": {{"walletAddress": "0xDST"}}
        }}"#
    )
}

#[tokio::test]
async fn profile_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer T")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "role": "owner",
                "status": "active",
                "type": "individual"
            }"#,
        )
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let profile = client.profile("T").await.unwrap();

    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.account_type, "individual");
    mock.assert_async().await;
}

#[tokio::test]
async fn transfers_passes_page_limit_and_sync() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/transfers")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("sync".into(), "true".into()),
        ]))
        .match_header("authorization", "Bearer T")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"data": [{}], "count": 25, "hasMore": true}}"#,
            transfer_json("t-1")
        ))
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let page = client.transfers("T", 2, 10).await.unwrap();

    assert_eq!(page.count, 25);
    assert!(page.has_more);
    assert_eq!(page.data[0].id, "t-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn validation_failure_yields_itemized_messages() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/transfers/send")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": ["amount must be positive", "walletAddress invalid"]}"#)
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let req = TransferRequest {
        wallet_address: "0xAA".into(),
        amount: "100000000".into(),
        purpose_code: "self".into(),
        currency: "USDC".into(),
    };
    let err = client.send_transfer("T", &req).await.unwrap_err();

    match err {
        ApiError::Validation(msgs) => {
            assert_eq!(msgs.len(), 2);
            assert_eq!(msgs[0], "amount must be positive");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_token_classified_as_auth_expired() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/wallets/balances")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Unauthorized"}"#)
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let err = client.balances("stale").await.unwrap_err();

    assert!(matches!(err, ApiError::AuthExpired));
}

#[tokio::test]
async fn server_error_carries_status_and_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/kycs")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "maintenance"}"#)
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let err = client.kyc_status("T").await.unwrap_err();

    match err {
        ApiError::Remote { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn otp_request_returns_sid() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/email-otp/request")
        .match_body(Matcher::PartialJsonString(
            r#"{"email": "ada@example.com"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"email": "ada@example.com", "sid": "sid-123"}"#)
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let otp = client.request_otp("ada@example.com").await.unwrap();

    assert_eq!(otp.sid, "sid-123");
    mock.assert_async().await;
}

#[tokio::test]
async fn batch_send_posts_all_requests() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/transfers/send-batch")
        .match_body(Matcher::PartialJsonString(
            r#"{"requests": [{"requestId": "r-1"}]}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"responses": [{{"requestId": "r-1", "response": {}}}]}}"#,
            transfer_json("t-9")
        ))
        .create_async()
        .await;

    let client = CopperxClient::new(server.url()).unwrap();
    let req: BatchTransferRequest = serde_json::from_str(
        r#"{
            "requests": [{
                "requestId": "r-1",
                "request": {
                    "walletAddress": "0xAA",
                    "email": "a@b.com",
                    "payeeId": "P1",
                    "amount": "500000000",
                    "purposeCode": "self",
                    "currency": "USDC"
                }
            }]
        }"#,
    )
    .unwrap();
    let resp = client.send_batch("T", &req).await.unwrap();

    assert_eq!(resp.responses.len(), 1);
    assert_eq!(resp.responses[0].request_id, "r-1");
    assert_eq!(resp.responses[0].response.as_ref().unwrap().id, "t-9");
    mock.assert_async().await;
}
