/*
[INPUT]:  Scripted gateway responses and persisted tokens
[OUTPUT]: Test results for session reconciliation
[POS]:    Integration tests - reconciliation engine
[UPDATE]: When step routing or reconciliation error handling changes
*/

mod common;

use common::{
    FakeGateway, GatewayCall, OTHER_WALLET, WALLET, profile, progress, store_with, token_for,
    token_with_claims,
};
use helios_onboard::{
    InMemorySessionRepository, OnboardError, RepositoryOp, SessionState, Step, User,
};
use tokio_test::assert_ok;

#[tokio::test]
async fn test_absent_token_shows_connect_wallet_without_network() {
    let gateway = FakeGateway::new();
    let repo = InMemorySessionRepository::new();
    let store = store_with(&gateway, &repo);
    store.set_step(Step::MINT_NFT);

    assert_ok!(store.initialize(None).await);

    assert_eq!(store.step(), Step::CONNECT_WALLET);
    assert!(gateway.calls().is_empty());
    assert_eq!(repo.ops(), vec![RepositoryOp::Read]);
}

#[tokio::test]
async fn test_unavailable_storage_is_a_noop() {
    let gateway = FakeGateway::new();
    let repo = InMemorySessionRepository::unavailable();
    let store = store_with(&gateway, &repo);
    store.set_step(Step::CLAIM_FAUCET);

    assert_ok!(store.initialize(None).await);

    assert_eq!(store.step(), Step::CLAIM_FAUCET);
    assert!(gateway.calls().is_empty());
    assert!(repo.ops().is_empty());
}

#[tokio::test]
async fn test_token_scenario_fetches_user_then_progress() {
    let gateway = FakeGateway::new();
    gateway.push_progress(progress(&["add_helios_network", "claim_from_faucet"]));
    let repo = InMemorySessionRepository::with_token(token_for("0x00000000000000000000000000000000000000AA"));
    let store = store_with(&gateway, &repo);

    assert_ok!(store.initialize(None).await);

    assert_eq!(
        gateway.calls(),
        vec![
            GatewayCall::UserProfile(WALLET.to_string()),
            GatewayCall::OnboardingProgress,
        ]
    );
    let state = store.snapshot();
    assert_eq!(state.step, Step::MINT_NFT);
    assert_eq!(state.user, Some(profile(WALLET)));
    assert!(!state.is_user_loading);
    assert_eq!(
        state.onboarding_progress.unwrap().completed_steps,
        vec!["add_helios_network", "claim_from_faucet"]
    );
}

#[tokio::test]
async fn test_step_routing_from_progress() {
    let cases: [(&[&str], Step); 5] = [
        (&[], Step::ONBOARDING_START),
        (&["add_helios_network"], Step::CLAIM_FAUCET),
        (&["add_helios_network", "claim_from_faucet"], Step::MINT_NFT),
        (&["claim_from_faucet", "mint_early_bird_nft"], Step::FINAL_TASK),
        (&["a", "b", "c"], Step::DASHBOARD),
    ];

    for (steps, expected) in cases {
        let gateway = FakeGateway::new();
        gateway.push_progress(progress(steps));
        let repo = InMemorySessionRepository::with_token(token_for(WALLET));
        let store = store_with(&gateway, &repo);

        assert_ok!(store.initialize(None).await);
        assert_eq!(store.step(), expected, "completed steps {steps:?}");
    }
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let gateway = FakeGateway::new();
    gateway.push_progress(progress(&["add_helios_network"]));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);

    assert_ok!(store.initialize(None).await);
    let first = store.snapshot();
    assert_ok!(store.initialize(None).await);

    assert_eq!(store.snapshot(), first);
    assert_eq!(first.step, Step::CLAIM_FAUCET);
}

#[tokio::test]
async fn test_not_confirmed_clears_token_and_surfaces_error() {
    let gateway = FakeGateway::new();
    gateway.push_progress(Err(OnboardError::NotConfirmed));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);
    store.set_step(Step::MINT_NFT);

    let err = store.initialize(None).await.unwrap_err();

    assert_eq!(err, OnboardError::NotConfirmed);
    assert!(err.requires_invite_code());
    assert_eq!(repo.peek(), None);
    assert_eq!(store.step(), Step::CONNECT_WALLET);
    assert!(!store.is_user_loading());
}

#[tokio::test]
async fn test_bot_verification_keeps_token_and_step() {
    let gateway = FakeGateway::new();
    gateway.push_progress(Err(OnboardError::RequiresBotVerification));
    let token = token_for(WALLET);
    let repo = InMemorySessionRepository::with_token(token.clone());
    let store = store_with(&gateway, &repo);
    store.set_step(Step::ONBOARDING_START);

    assert_ok!(store.initialize(None).await);

    assert!(store.requires_bot_verification());
    assert_eq!(repo.peek(), Some(token));
    assert!(!repo.ops().contains(&RepositoryOp::Clear));
    assert_eq!(store.step(), Step::ONBOARDING_START);
    assert!(!store.is_user_loading());
}

#[tokio::test]
async fn test_other_failures_clear_session_and_propagate() {
    let gateway = FakeGateway::new();
    gateway.push_progress(Err(OnboardError::Network("connection refused".into())));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);
    store.set_step(Step::DASHBOARD);

    let err = store.initialize(None).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(repo.peek(), None);
    assert_eq!(store.step(), Step::CONNECT_WALLET);
}

#[tokio::test]
async fn test_profile_failure_keeps_stub_and_continues() {
    let gateway = FakeGateway::new();
    gateway.push_profile(Err(OnboardError::Network("timeout".into())));
    gateway.push_progress(progress(&[]));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);

    assert_ok!(store.initialize(None).await);

    assert_eq!(store.user(), Some(User::stub(WALLET)));
    assert_eq!(store.step(), Step::ONBOARDING_START);
}

#[tokio::test]
async fn test_explicit_user_takes_precedence() {
    let gateway = FakeGateway::new();
    gateway.push_progress(progress(&[]));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);

    assert_ok!(store.initialize(Some(User::stub(OTHER_WALLET))).await);

    assert_eq!(
        gateway.calls()[0],
        GatewayCall::UserProfile(OTHER_WALLET.to_string())
    );
}

#[tokio::test]
async fn test_undecodable_token_still_reconciles() {
    let gateway = FakeGateway::new();
    gateway.push_progress(progress(&["add_helios_network"]));
    let repo = InMemorySessionRepository::with_token("opaque-token");
    let store = store_with(&gateway, &repo);

    assert_ok!(store.initialize(None).await);

    assert_eq!(gateway.calls(), vec![GatewayCall::OnboardingProgress]);
    assert_eq!(store.user(), None);
    assert_eq!(store.step(), Step::CLAIM_FAUCET);
}

#[tokio::test]
async fn test_expired_token_is_treated_as_absent() {
    let gateway = FakeGateway::new();
    let repo = InMemorySessionRepository::with_token(token_with_claims(serde_json::json!({
        "wallet": WALLET,
        "exp": 1_000,
    })));
    let store = store_with(&gateway, &repo);
    store.set_step(Step::DASHBOARD);

    assert_ok!(store.initialize(None).await);

    assert!(gateway.calls().is_empty());
    assert_eq!(repo.peek(), None);
    assert_eq!(store.snapshot(), SessionState::default());
}

#[tokio::test]
async fn test_token_for_other_connected_wallet_logs_out() {
    let gateway = FakeGateway::new();
    gateway.push_progress(progress(&["a", "b", "c"]));
    let repo = InMemorySessionRepository::with_token(token_for(WALLET));
    let store = store_with(&gateway, &repo);
    store.set_connected_wallet(Some(OTHER_WALLET));

    assert_ok!(store.initialize(None).await);

    // token belongs to WALLET while OTHER_WALLET is connected
    assert_eq!(store.step(), Step::CONNECT_WALLET);
    assert!(store.user().is_none());
    assert_eq!(store.snapshot().onboarding_progress, None);
    assert_eq!(repo.peek(), None);
    assert!(gateway.calls().is_empty());
    assert_eq!(store.connected_wallet().as_deref(), Some(OTHER_WALLET));
}

#[tokio::test]
async fn test_explicit_user_for_other_connected_wallet_logs_out() {
    let gateway = FakeGateway::new();
    let repo = InMemorySessionRepository::with_token(token_for(OTHER_WALLET));
    let store = store_with(&gateway, &repo);
    store.set_connected_wallet(Some(OTHER_WALLET));

    assert_ok!(store.initialize(Some(profile(WALLET))).await);

    assert!(store.user().is_none());
    assert_eq!(repo.peek(), None);
    assert!(gateway.calls().is_empty());
}
