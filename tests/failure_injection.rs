//! Failure injection tests: gateway rejections, HTTP faults, and bad input.

use std::time::{Duration, Instant};

use circular_enterprise_apis::{CepError, NetworkError, DEFAULT_NAG};

mod common;
use common::{start_mock_gateway, MockGateway, TEST_ADDRESS, TEST_PRIVATE_KEY};

async fn ready_account(gateway: &MockGateway) -> circular_enterprise_apis::CepAccount {
    let account = gateway.account();
    account.open(TEST_ADDRESS).await.unwrap();
    account.set_network("testnet").await.unwrap();
    account
}

#[tokio::test]
async fn test_unknown_network_rejected() {
    let gateway = start_mock_gateway().await;
    let account = gateway.account();

    let err = account.set_network("mainnet-x").await.unwrap_err();
    assert_eq!(err, CepError::DiscoveryRejected("Unsupported network".into()));
    assert_eq!(account.snapshot().await.gateway_url, DEFAULT_NAG);
    assert_eq!(
        account.last_error().await.as_deref(),
        Some("failed to get valid NAG URL from response: Unsupported network")
    );
}

#[tokio::test]
async fn test_discovery_unreachable() {
    let gateway = start_mock_gateway().await;
    let mut config = gateway.config();
    // Nothing listens on the discard port.
    config.network.discovery_url = "http://127.0.0.1:9/network/getNAG".into();

    let account = circular_enterprise_apis::CepAccount::from_config(&config).unwrap();
    assert!(matches!(
        account.set_network("testnet").await,
        Err(CepError::DiscoveryUnreachable(_))
    ));
}

#[tokio::test]
async fn test_nonce_rejections() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;

    gateway.behave(|b| b.nonce_result = 114);
    assert_eq!(account.update_account().await, Err(CepError::InvalidBlockchain));
    assert_eq!(account.last_error().await.as_deref(), Some("Rejected: Invalid Blockchain"));

    gateway.behave(|b| b.nonce_result = 115);
    assert_eq!(account.update_account().await, Err(CepError::InsufficientBalance));
    assert_eq!(account.last_error().await.as_deref(), Some("Rejected: Insufficient balance"));

    gateway.behave(|b| b.nonce_result = 500);
    assert_eq!(
        account.update_account().await,
        Err(CepError::UnknownRejection("failed to update account: Rejected".into()))
    );

    assert_eq!(account.snapshot().await.nonce, 0);
}

#[tokio::test]
async fn test_http_500_is_network_error() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    account.update_account().await.unwrap();

    gateway.behave(|b| b.http_status = Some(500));

    let err = account.update_account().await.unwrap_err();
    assert!(matches!(err, CepError::Network(NetworkError::Status { status: 500, .. })));

    let err = account.submit_certificate("x", TEST_PRIVATE_KEY).await.unwrap_err();
    assert!(matches!(err, CepError::Network(NetworkError::Status { status: 500, .. })));
    assert_eq!(
        account.last_error().await.as_deref(),
        Some("network request failed with status: 500")
    );

    let state = account.snapshot().await;
    assert_eq!(state.nonce, 1);
    assert_eq!(state.latest_tx_id, "");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    gateway.behave(|b| b.raw_body = Some("<html>maintenance</html>".into()));

    let err = account.update_account().await.unwrap_err();
    assert!(matches!(err, CepError::Network(NetworkError::Decode(_))));
    assert_eq!(account.snapshot().await.nonce, 0);
}

#[tokio::test]
async fn test_submission_rejected_leaves_nonce() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    account.update_account().await.unwrap();

    gateway.behave(|b| b.submit_result = 102);
    let err = account.submit_certificate("x", TEST_PRIVATE_KEY).await.unwrap_err();
    assert_eq!(
        err,
        CepError::UnknownRejection("certificate submission failed: Transaction Rejected".into())
    );

    let state = account.snapshot().await;
    assert_eq!(state.nonce, 1);
    assert_eq!(state.latest_tx_id, "");
    assert!(gateway.transactions().is_empty());
}

#[tokio::test]
async fn test_stale_nonce_rejected_by_gateway() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    // Never synced: local nonce 0 while the gateway expects 6.
    gateway.behave(|b| b.wallet_nonce = 5);

    let err = account.submit_certificate("x", TEST_PRIVATE_KEY).await.unwrap_err();
    assert_eq!(err, CepError::UnknownRejection("certificate submission failed: Invalid Nonce".into()));

    account.update_account().await.unwrap();
    account.submit_certificate("x", TEST_PRIVATE_KEY).await.unwrap();
    assert_eq!(account.snapshot().await.nonce, 7);
}

#[tokio::test]
async fn test_bad_private_key_keeps_nonce() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    account.update_account().await.unwrap();

    let short_key = "00112233445566778899aabbccddeeff";
    let err = account.submit_certificate("x", short_key).await.unwrap_err();
    assert!(matches!(err, CepError::SigningFailed(_)));
    assert!(account.last_error().await.unwrap().contains("32 bytes"));

    assert_eq!(account.snapshot().await.nonce, 1);
    assert!(!gateway.calls().iter().any(|c| c.starts_with("Circular_AddTransaction_")));
}

#[tokio::test]
async fn test_outcome_times_out_when_always_pending() {
    let gateway = start_mock_gateway().await;
    gateway.behave(|b| b.pending_polls = u32::MAX);
    let account = ready_account(&gateway).await;
    account.update_account().await.unwrap();
    let tx_id = account.submit_certificate("slow", TEST_PRIVATE_KEY).await.unwrap();

    let started = Instant::now();
    let err = account.get_transaction_outcome(&tx_id, 2, 1).await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err, CepError::PollTimeout(2));
    assert!(elapsed >= Duration::from_secs(2), "gave up early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "overran budget: {:?}", elapsed);
}

#[tokio::test]
async fn test_outcome_retries_through_http_errors() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;
    account.update_account().await.unwrap();
    let tx_id = account.submit_certificate("flaky", TEST_PRIVATE_KEY).await.unwrap();

    gateway.behave(|b| b.http_status = Some(503));
    let healer = {
        let state = gateway.state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            state.behaviour.lock().unwrap().http_status = None;
        })
    };

    let outcome = account.get_transaction_outcome(&tx_id, 6, 1).await.unwrap();
    assert_eq!(outcome["Status"], "Executed");
    healer.await.unwrap();
}

#[tokio::test]
async fn test_invalid_block_id() {
    let gateway = start_mock_gateway().await;
    let account = ready_account(&gateway).await;

    assert!(matches!(account.get_transaction("", "ab").await, Err(CepError::InvalidBlockId(_))));
    assert!(matches!(account.get_transaction("seven", "ab").await, Err(CepError::InvalidBlockId(_))));
    assert!(gateway.calls().is_empty());
}
