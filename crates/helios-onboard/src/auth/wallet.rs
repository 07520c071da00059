/*
[INPUT]:  Challenge messages to sign and wallet connection state
[OUTPUT]: Signature strings and connection status from the wallet provider
[POS]:    Auth layer - wallet provider abstraction
[UPDATE]: When adding new wallet types or changing challenge wording
*/

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::http::{OnboardError, Result};

/// Message signed by the bot-verification step; distinct from the login challenge
pub const BOT_VERIFICATION_CHALLENGE: &str =
    "Helios human verification\n\nI confirm that I am a human and not an automated agent.";

/// Message signed to prove wallet ownership when logging in
pub fn login_challenge(address: &str) -> String {
    format!(
        "Welcome to Helios!\n\nSign this message to prove you own this wallet.\nThis request will not trigger a transaction or cost any gas.\n\nWallet: {address}"
    )
}

/// External wallet provider capability.
///
/// Signing may suspend indefinitely on user interaction; a user rejection
/// must surface as [`OnboardError::SignatureDeclined`].
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Connected wallet address, if any
    fn address(&self) -> Option<String>;

    /// Open the provider's connect surface; completion is reported through
    /// the provider's own state, not through this call
    fn open_connect(&self);

    /// Sign a human-readable message and return the signature
    async fn sign_message(&self, message: &str) -> Result<String>;
}

#[derive(Debug, Default)]
struct MockWalletState {
    connected: bool,
    address: Option<String>,
    decline: bool,
    connect_requests: usize,
    signed: Vec<String>,
}

/// Mock wallet provider for testing
#[derive(Debug, Clone)]
pub struct MockWalletProvider {
    state: Arc<Mutex<MockWalletState>>,
    signature: String,
}

impl MockWalletProvider {
    /// Connected wallet that returns a predetermined signature
    pub fn connected(address: &str, signature: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockWalletState {
                connected: true,
                address: Some(address.to_string()),
                ..MockWalletState::default()
            })),
            signature: signature.to_string(),
        }
    }

    pub fn disconnected(signature: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockWalletState::default())),
            signature: signature.to_string(),
        }
    }

    pub fn set_connected(&self, address: Option<&str>) {
        let mut state = self.lock();
        state.connected = address.is_some();
        state.address = address.map(str::to_string);
    }

    /// Make subsequent signature requests fail as if the user rejected them
    pub fn set_decline(&self, decline: bool) {
        self.lock().decline = decline;
    }

    pub fn signed_messages(&self) -> Vec<String> {
        self.lock().signed.clone()
    }

    pub fn connect_requests(&self) -> usize {
        self.lock().connect_requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockWalletState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn address(&self) -> Option<String> {
        self.lock().address.clone()
    }

    fn open_connect(&self) {
        self.lock().connect_requests += 1;
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let mut state = self.lock();
        if state.decline {
            return Err(OnboardError::SignatureDeclined);
        }
        state.signed.push(message.to_string());
        Ok(self.signature.clone())
    }
}
