/*
[INPUT]:  Test configuration and scripted API responses
[OUTPUT]: Shared test utilities, fixtures and a recording fake gateway
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for helios-onboard tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use helios_onboard::{
    ApiGateway, ConfirmAccountResponse, EntryParams, InMemorySessionRepository, InviteStatus,
    LoginResponse, MockWalletProvider, OnboardError, OnboardingProgress, ReferralSummary, Result,
    SessionStore, User, VerifyBotResponse, WalletAuthController,
};
use wiremock::MockServer;

pub const WALLET: &str = "0x00000000000000000000000000000000000000aa";
pub const OTHER_WALLET: &str = "0x00000000000000000000000000000000000000bb";
pub const SIGNATURE: &str = "0xsigned";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Unsigned JWT whose payload carries the given wallet
pub fn token_for(wallet: &str) -> String {
    token_with_claims(serde_json::json!({ "wallet": wallet }))
}

pub fn token_with_claims(claims: serde_json::Value) -> String {
    let header = serde_json::json!({"alg": "HS256", "typ": "JWT"});
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
    let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("{header_b64}.{payload_b64}.signature")
}

pub fn profile(wallet: &str) -> User {
    User {
        username: Some("helios-user".to_string()),
        referral_code: Some("HELIOS1".to_string()),
        xp: 120,
        ..User::stub(wallet)
    }
}

pub fn login_ok(wallet: &str) -> Result<LoginResponse> {
    Ok(LoginResponse {
        token: token_for(wallet),
        user: profile(wallet),
        requires_bot_verification: false,
    })
}

pub fn confirm_ok(wallet: &str) -> Result<ConfirmAccountResponse> {
    Ok(ConfirmAccountResponse {
        token: token_for(wallet),
        user: profile(wallet),
    })
}

pub fn progress(steps: &[&str]) -> Result<OnboardingProgress> {
    Ok(OnboardingProgress::new(steps.iter().copied()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Login {
        wallet: String,
        signature: String,
    },
    ConfirmAccount {
        wallet: String,
        signature: String,
        invite_code: String,
        captcha_token: String,
    },
    VerifyBot {
        wallet: String,
        signature: String,
        captcha_token: String,
    },
    OnboardingProgress,
    UserProfile(String),
    InviteStatus(String),
    Referrals(u32, u32),
}

/// Scripted responses; the last entry of each queue repeats
#[derive(Default)]
struct Script {
    login: Vec<Result<LoginResponse>>,
    confirm: Vec<Result<ConfirmAccountResponse>>,
    verify: Vec<Result<VerifyBotResponse>>,
    progress: Vec<Result<OnboardingProgress>>,
    profile: Vec<Result<User>>,
}

fn next<T: Clone>(queue: &mut Vec<Result<T>>) -> Result<T> {
    match queue.len() {
        0 => Err(OnboardError::Unknown("unscripted call".to_string())),
        1 => queue[0].clone(),
        _ => queue.remove(0),
    }
}

/// In-memory API gateway recording every call
#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<GatewayCall>>,
    script: Mutex<Script>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_login(&self, response: Result<LoginResponse>) {
        self.script.lock().unwrap().login.push(response);
    }

    pub fn push_confirm(&self, response: Result<ConfirmAccountResponse>) {
        self.script.lock().unwrap().confirm.push(response);
    }

    pub fn push_verify(&self, response: Result<VerifyBotResponse>) {
        self.script.lock().unwrap().verify.push(response);
    }

    pub fn push_progress(&self, response: Result<OnboardingProgress>) {
        self.script.lock().unwrap().progress.push(response);
    }

    pub fn push_profile(&self, response: Result<User>) {
        self.script.lock().unwrap().profile.push(response);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn login(
        &self,
        wallet: &str,
        signature: &str,
        _invite_code: Option<&str>,
    ) -> Result<LoginResponse> {
        self.record(GatewayCall::Login {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
        });
        next(&mut self.script.lock().unwrap().login)
    }

    async fn confirm_account(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: &str,
        captcha_token: &str,
    ) -> Result<ConfirmAccountResponse> {
        self.record(GatewayCall::ConfirmAccount {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
            invite_code: invite_code.to_string(),
            captcha_token: captcha_token.to_string(),
        });
        next(&mut self.script.lock().unwrap().confirm)
    }

    async fn verify_bot(
        &self,
        wallet: &str,
        signature: &str,
        captcha_token: &str,
    ) -> Result<VerifyBotResponse> {
        self.record(GatewayCall::VerifyBot {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
            captcha_token: captcha_token.to_string(),
        });
        next(&mut self.script.lock().unwrap().verify)
    }

    async fn get_onboarding_progress(&self) -> Result<OnboardingProgress> {
        self.record(GatewayCall::OnboardingProgress);
        next(&mut self.script.lock().unwrap().progress)
    }

    async fn get_user_profile(&self, wallet: &str) -> Result<User> {
        self.record(GatewayCall::UserProfile(wallet.to_string()));
        let mut script = self.script.lock().unwrap();
        if script.profile.is_empty() {
            return Ok(profile(wallet));
        }
        next(&mut script.profile)
    }

    async fn get_user_invite_status(&self, wallet: &str) -> Result<InviteStatus> {
        self.record(GatewayCall::InviteStatus(wallet.to_string()));
        Ok(InviteStatus {
            can_invite: true,
            current_quota: 5,
            used_today: 1,
            remaining_invites: 4,
        })
    }

    async fn get_user_referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary> {
        self.record(GatewayCall::Referrals(page, page_size));
        Ok(ReferralSummary {
            referral_code: Some("HELIOS1".to_string()),
            referral_count: 3,
            referral_xp: 75,
        })
    }
}

/// Store wired to a fake gateway and an in-memory token slot
pub fn store_with(
    gateway: &Arc<FakeGateway>,
    repo: &InMemorySessionRepository,
) -> SessionStore {
    SessionStore::new(gateway.clone(), Arc::new(repo.clone()))
}

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub repo: InMemorySessionRepository,
    pub wallet: MockWalletProvider,
    pub controller: WalletAuthController,
}

pub fn harness(repo: InMemorySessionRepository, wallet: MockWalletProvider, entry: EntryParams) -> Harness {
    let gateway = FakeGateway::new();
    let store = store_with(&gateway, &repo);
    let controller = WalletAuthController::new(store, Arc::new(wallet.clone()), entry);
    Harness {
        gateway,
        repo,
        wallet,
        controller,
    }
}
