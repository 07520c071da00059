/*
[INPUT]:  Wallet provider state, user-entered invite codes and CAPTCHA tokens
[OUTPUT]: Auth phase transitions; writes token and state into the session store
[POS]:    Flow layer - wallet authentication controller driven by the UI
[UPDATE]: When the connect/sign/login/confirm/verify flow changes
*/

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{BOT_VERIFICATION_CHALLENGE, WalletProvider, decode_wallet, login_challenge};
use crate::flow::EntryParams;
use crate::http::{OnboardError, Result, ValidationError};
use crate::session::SessionStore;
use crate::types::{
    InviteStatus, LoginResponse, ReferralSummary, User, normalize_address, same_address,
};

/// Why the invite-code prompt is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteReason {
    NotRegistered,
    NotConfirmed,
    /// Arrived from an external account-linking step
    ExternalLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Disconnected,
    /// Connect surface open, or connected and waiting on a signature/login
    Connecting,
    NeedsInviteCode(InviteReason),
    NeedsBotVerification,
    /// Session token held; the concrete step lives in the session store
    Authenticated,
}

/// Wallet and signature captured during the current attempt
#[derive(Debug, Clone, Default)]
struct PendingAuth {
    wallet: Option<String>,
    signature: Option<String>,
}

/// Drives connect -> sign -> login/confirm -> verify for one UI surface
pub struct WalletAuthController {
    store: SessionStore,
    wallet: Arc<dyn WalletProvider>,
    entry: EntryParams,
    pending: PendingAuth,
    phase: AuthPhase,
}

impl WalletAuthController {
    pub fn new(store: SessionStore, wallet: Arc<dyn WalletProvider>, entry: EntryParams) -> Self {
        Self {
            store,
            wallet,
            entry,
            pending: PendingAuth::default(),
            phase: AuthPhase::Disconnected,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn entry(&self) -> &EntryParams {
        &self.entry
    }

    pub fn pending_wallet(&self) -> Option<&str> {
        self.pending.wallet.as_deref()
    }

    pub fn has_pending_signature(&self) -> bool {
        self.pending.signature.is_some()
    }

    /// Page-load entry point
    pub async fn start(&mut self) -> Result<AuthPhase> {
        let has_token = self.store.repository().read().is_some();
        if self.entry.invite_required || (self.entry.account_linked && !has_token) {
            if let Some(address) = self.wallet.address() {
                let address = normalize_address(&address);
                self.store.set_connected_wallet(Some(&address));
                self.pending.wallet = Some(address);
            }
            info!(
                linked = self.entry.account_linked,
                "entry requires an invite code"
            );
            return Ok(self.transition(AuthPhase::NeedsInviteCode(InviteReason::ExternalLink)));
        }

        let connected = self.wallet.is_connected();
        let address = self.wallet.address();
        self.handle_wallet_state(connected, address.as_deref()).await
    }

    /// Connect action. Opens the provider's connect surface when needed;
    /// completion arrives later through [`Self::handle_wallet_state`].
    pub async fn connect(&mut self) -> Result<AuthPhase> {
        if !self.wallet.is_connected() {
            self.wallet.open_connect();
            return Ok(self.transition(AuthPhase::Connecting));
        }
        let address = self.wallet.address();
        self.handle_wallet_state(true, address.as_deref()).await
    }

    /// React to the provider's connection state.
    ///
    /// A not-connected report always clears the token and all derived state.
    pub async fn handle_wallet_state(
        &mut self,
        connected: bool,
        address: Option<&str>,
    ) -> Result<AuthPhase> {
        let address = match address {
            Some(address) if connected && !address.trim().is_empty() => normalize_address(address),
            _ => {
                self.disconnect();
                return Ok(self.phase);
            }
        };

        let changed = self
            .store
            .connected_wallet()
            .is_none_or(|current| !same_address(&current, &address));
        if !changed && self.is_gated() {
            return Ok(self.phase);
        }

        self.store.set_connected_wallet(Some(&address));
        if self.pending.wallet.as_deref() != Some(address.as_str()) {
            self.pending = PendingAuth {
                wallet: Some(address.clone()),
                signature: None,
            };
        }

        if let Some(token) = self.store.repository().read() {
            match decode_wallet(&token) {
                Some(token_wallet) if !same_address(&token_wallet, &address) => {
                    info!(wallet = %address, "session token belongs to another wallet, logging out");
                    self.store.logout();
                }
                _ => {
                    let phase = self.reconcile().await?;
                    if phase != AuthPhase::Connecting {
                        return Ok(phase);
                    }
                }
            }
        }

        self.sign_and_authenticate().await
    }

    /// Sign the login challenge and log in with it
    pub async fn sign_and_authenticate(&mut self) -> Result<AuthPhase> {
        let address = self.active_wallet()?;
        self.transition(AuthPhase::Connecting);

        let signature = self.sign(&login_challenge(&address)).await?;
        self.pending.signature = Some(signature.clone());
        self.authenticate(&address, &signature).await
    }

    /// Register or confirm the account with an invite code.
    ///
    /// An empty `invite_code` falls back to the referral code from the entry URL.
    pub async fn submit_invite_code(
        &mut self,
        invite_code: &str,
        captcha_token: Option<&str>,
    ) -> Result<AuthPhase> {
        let invite_code = non_empty(Some(invite_code))
            .or_else(|| self.entry.referral_code.clone())
            .ok_or(ValidationError::MissingInviteCode)?;
        let captcha_token =
            non_empty(captcha_token).ok_or(ValidationError::MissingCaptchaToken)?;
        let address = self.active_wallet()?;

        let ticket = self.store.ticket(Some(&address));
        let signature = match self.pending.signature.clone() {
            Some(signature) => signature,
            None => {
                let signature = self.sign(&login_challenge(&address)).await?;
                self.pending.signature = Some(signature.clone());
                signature
            }
        };

        let gateway = self.store.gateway().clone();
        match gateway
            .confirm_account(&address, &signature, &invite_code, &captcha_token)
            .await
        {
            Ok(response) => {
                if !self.store.is_current(&ticket) {
                    debug!(wallet = %address, "wallet changed during confirmation, discarding session");
                    return Ok(self.phase);
                }
                info!(wallet = %address, "account confirmed");
                self.store.repository().write(&response.token);
                self.store.set_user(Some(response.user.clone()));
                self.reconcile_with(Some(response.user)).await
            }
            Err(OnboardError::RequiresBotVerification) => Ok(self.enter_bot_gate()),
            Err(err) => {
                warn!(wallet = %address, error = %err, "account confirmation failed");
                Err(err)
            }
        }
    }

    /// Pass bot verification; on failure the gate stays up for a retry
    pub async fn verify_bot(&mut self, captcha_token: Option<&str>) -> Result<AuthPhase> {
        let captcha_token =
            non_empty(captcha_token).ok_or(ValidationError::MissingCaptchaToken)?;
        let address = match self.active_wallet() {
            Ok(address) => address,
            Err(err) => self.store.user_wallet().ok_or(err)?,
        };

        let signature = self.sign(BOT_VERIFICATION_CHALLENGE).await?;
        let gateway = self.store.gateway().clone();
        let response = gateway
            .verify_bot(&address, &signature, &captcha_token)
            .await
            .inspect_err(|err| warn!(wallet = %address, error = %err, "bot verification failed"))?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Bot verification failed".to_string());
            warn!(wallet = %address, message = %message, "bot verification rejected");
            return Err(OnboardError::Unknown(message));
        }

        info!(wallet = %address, "bot verification passed");
        self.store.set_requires_bot_verification(false);

        if self.store.repository().read().is_none() {
            // gate was raised by login itself; log in again with the captured signature
            return match self.pending.signature.clone() {
                Some(login_signature) => self.authenticate(&address, &login_signature).await,
                None => self.sign_and_authenticate().await,
            };
        }
        self.reconcile().await
    }

    /// Re-run reconciliation and map the result onto a phase
    pub async fn reconcile(&mut self) -> Result<AuthPhase> {
        self.reconcile_with(None).await
    }

    /// Hard reset to the disconnected default
    pub fn disconnect(&mut self) {
        self.store.logout();
        self.store.set_connected_wallet(None);
        self.pending = PendingAuth::default();
        if self.phase != AuthPhase::Disconnected {
            info!("wallet disconnected, session cleared");
        }
        self.transition(AuthPhase::Disconnected);
    }

    pub async fn invite_status(&self) -> Result<InviteStatus> {
        self.store.fetch_invite_status().await
    }

    pub async fn referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary> {
        self.store.fetch_referrals(page, page_size).await
    }

    async fn authenticate(&mut self, address: &str, signature: &str) -> Result<AuthPhase> {
        let ticket = self.store.ticket(Some(address));
        let gateway = self.store.gateway().clone();
        match gateway.login(address, signature, None).await {
            Ok(response) => {
                if !self.store.is_current(&ticket) {
                    debug!(wallet = %address, "wallet changed during login, discarding session");
                    return Ok(self.phase);
                }
                self.complete_login(response).await
            }
            Err(OnboardError::NotRegistered) => {
                info!(wallet = %address, "wallet not registered, invite code required");
                Ok(self.transition(AuthPhase::NeedsInviteCode(InviteReason::NotRegistered)))
            }
            Err(OnboardError::NotConfirmed) => {
                info!(wallet = %address, "account not confirmed, invite code required");
                Ok(self.transition(AuthPhase::NeedsInviteCode(InviteReason::NotConfirmed)))
            }
            Err(OnboardError::RequiresBotVerification) => Ok(self.enter_bot_gate()),
            Err(err) => {
                warn!(wallet = %address, error = %err, "login failed");
                Err(err)
            }
        }
    }

    async fn complete_login(&mut self, response: LoginResponse) -> Result<AuthPhase> {
        info!(wallet = %response.user.wallet, "logged in");
        self.store.repository().write(&response.token);
        self.store.set_user(Some(response.user.clone()));
        if response.requires_bot_verification {
            return Ok(self.enter_bot_gate());
        }
        self.reconcile_with(Some(response.user)).await
    }

    async fn reconcile_with(&mut self, user: Option<User>) -> Result<AuthPhase> {
        match self.store.initialize(user).await {
            Ok(()) => {
                let phase = self.settled_phase();
                Ok(self.transition(phase))
            }
            Err(err) if err.requires_invite_code() => {
                let reason = match err {
                    OnboardError::NotRegistered => InviteReason::NotRegistered,
                    _ => InviteReason::NotConfirmed,
                };
                Ok(self.transition(AuthPhase::NeedsInviteCode(reason)))
            }
            Err(err) => {
                let phase = self.settled_phase();
                self.transition(phase);
                Err(err)
            }
        }
    }

    fn enter_bot_gate(&mut self) -> AuthPhase {
        info!("bot verification required");
        self.store.set_requires_bot_verification(true);
        self.transition(AuthPhase::NeedsBotVerification)
    }

    fn settled_phase(&self) -> AuthPhase {
        if self.store.requires_bot_verification() {
            AuthPhase::NeedsBotVerification
        } else if self.store.repository().read().is_some() {
            AuthPhase::Authenticated
        } else if self.wallet.is_connected() {
            AuthPhase::Connecting
        } else {
            AuthPhase::Disconnected
        }
    }

    fn is_gated(&self) -> bool {
        matches!(
            self.phase,
            AuthPhase::NeedsInviteCode(_) | AuthPhase::NeedsBotVerification
        )
    }

    fn active_wallet(&mut self) -> Result<String> {
        if let Some(wallet) = &self.pending.wallet {
            return Ok(wallet.clone());
        }
        let wallet = self
            .wallet
            .address()
            .filter(|address| !address.trim().is_empty())
            .map(|address| normalize_address(&address))
            .ok_or(ValidationError::MissingWalletAddress)?;
        self.pending.wallet = Some(wallet.clone());
        Ok(wallet)
    }

    async fn sign(&self, message: &str) -> Result<String> {
        self.wallet.sign_message(message).await.inspect_err(|err| {
            if matches!(err, OnboardError::SignatureDeclined) {
                info!("signature request declined");
            } else {
                warn!(error = %err, "signature request failed");
            }
        })
    }

    fn transition(&mut self, phase: AuthPhase) -> AuthPhase {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "auth phase changed");
            self.phase = phase;
        }
        phase
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
