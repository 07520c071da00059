/*
[INPUT]:  UI mutations, API gateway responses, persisted token slot
[OUTPUT]: Single source of truth for step, xp, user, progress and gate flags
[POS]:    Session layer - state container shared by reconciliation and controller
[UPDATE]: When session state fields or fetch semantics change
*/

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::auth::SessionRepository;
use crate::http::{ApiGateway, Result, ValidationError};
use crate::types::{
    InviteStatus, OnboardingProgress, ReferralSummary, Step, User, normalize_address,
    same_address,
};

/// Snapshot of everything the UI renders from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub step: Step,
    pub xp: u64,
    pub user: Option<User>,
    pub is_user_loading: bool,
    pub onboarding_progress: Option<OnboardingProgress>,
    pub requires_bot_verification: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    /// Wallet the provider currently reports, when known
    connected_wallet: Option<String>,
    /// Bumped whenever the session identity changes
    epoch: u64,
}

/// Identity a fetch was issued under; responses for an outdated ticket are dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    epoch: u64,
    wallet: Option<String>,
}

/// Shared session store.
///
/// Cloning is cheap and every clone observes the same state. Locks are never
/// held across an await point, so overlapping async actions interleave with
/// last-write-wins semantics.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
    gateway: Arc<dyn ApiGateway>,
    repository: Arc<dyn SessionRepository>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn ApiGateway>, repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            gateway,
            repository,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().state.clone()
    }

    pub fn step(&self) -> Step {
        self.read().state.step
    }

    pub fn user(&self) -> Option<User> {
        self.read().state.user.clone()
    }

    pub fn is_user_loading(&self) -> bool {
        self.read().state.is_user_loading
    }

    pub fn requires_bot_verification(&self) -> bool {
        self.read().state.requires_bot_verification
    }

    pub fn connected_wallet(&self) -> Option<String> {
        self.read().connected_wallet.clone()
    }

    pub fn set_step(&self, step: Step) {
        self.write().state.step = step;
    }

    pub fn add_xp(&self, delta: u64) {
        let mut inner = self.write();
        inner.state.xp = inner.state.xp.saturating_add(delta);
    }

    pub fn set_user(&self, user: Option<User>) {
        self.write().state.user = user.map(User::normalized);
    }

    pub fn set_onboarding_progress(&self, progress: Option<OnboardingProgress>) {
        self.write().state.onboarding_progress = progress;
    }

    pub fn set_requires_bot_verification(&self, required: bool) {
        self.write().state.requires_bot_verification = required;
    }

    fn set_user_loading(&self, loading: bool) {
        self.write().state.is_user_loading = loading;
    }

    /// Mark the user as loading until the returned guard is dropped
    pub(crate) fn loading_guard(&self) -> LoadingGuard<'_> {
        self.set_user_loading(true);
        LoadingGuard { store: self }
    }

    /// Record the wallet the provider reports. A different wallet starts a new
    /// session epoch so in-flight responses for the old one are discarded.
    pub fn set_connected_wallet(&self, wallet: Option<&str>) {
        let wallet = wallet.map(normalize_address);
        let mut inner = self.write();
        if inner.connected_wallet != wallet {
            debug!(wallet = ?wallet, "connected wallet changed");
            inner.connected_wallet = wallet;
            inner.epoch += 1;
        }
    }

    /// Clear all session state; the persisted token is left untouched
    pub fn reset_store(&self) {
        let mut inner = self.write();
        inner.state = SessionState::default();
        inner.epoch += 1;
    }

    /// Clear the persisted token and every piece of derived state
    pub fn logout(&self) {
        self.repository.clear();
        self.reset_store();
        debug!("session logged out");
    }

    /// Refresh the user profile for the current identity.
    ///
    /// A failed fetch keeps the cached user; the loading flag is always reset.
    pub async fn fetch_user(&self) {
        let _loading = self.loading_guard();
        self.refresh_user().await;
    }

    /// Profile refresh without touching the loading flag; the caller owns it
    pub(crate) async fn refresh_user(&self) {
        let Some(wallet) = self.user_wallet() else {
            debug!("no user identity, skipping profile fetch");
            return;
        };

        let ticket = self.ticket(Some(&wallet));
        match self.gateway.get_user_profile(&wallet).await {
            Ok(user) => {
                let applied = self.apply_if_current(&ticket, |state| {
                    state.user = Some(user.normalized());
                });
                if !applied {
                    debug!(wallet = %wallet, "dropping stale profile response");
                }
            }
            Err(err) => {
                warn!(wallet = %wallet, error = %err, "failed to fetch user profile, keeping cached user");
            }
        }
    }

    /// Refresh onboarding progress; failures are logged and absorbed
    pub async fn fetch_onboarding_progress(&self) {
        let ticket = self.ticket(self.user_wallet().as_deref());
        match self.gateway.get_onboarding_progress().await {
            Ok(progress) => {
                let applied = self.apply_if_current(&ticket, |state| {
                    state.onboarding_progress = Some(progress);
                });
                if !applied {
                    debug!("dropping stale onboarding progress response");
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch onboarding progress");
            }
        }
    }

    pub async fn fetch_invite_status(&self) -> Result<InviteStatus> {
        let wallet = self
            .user_wallet()
            .ok_or(ValidationError::MissingWalletAddress)?;
        self.gateway.get_user_invite_status(&wallet).await
    }

    pub async fn fetch_referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary> {
        if self.user_wallet().is_none() {
            return Err(ValidationError::MissingWalletAddress.into());
        }
        self.gateway.get_user_referrals(page, page_size).await
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn ApiGateway> {
        &self.gateway
    }

    pub(crate) fn repository(&self) -> &Arc<dyn SessionRepository> {
        &self.repository
    }

    /// Wallet of the current user, if one with an address is set
    pub(crate) fn user_wallet(&self) -> Option<String> {
        self.read()
            .state
            .user
            .as_ref()
            .filter(|user| user.has_wallet())
            .map(|user| user.wallet.clone())
    }

    pub(crate) fn ticket(&self, wallet: Option<&str>) -> FetchTicket {
        FetchTicket {
            epoch: self.read().epoch,
            wallet: wallet.map(normalize_address),
        }
    }

    pub(crate) fn is_current(&self, ticket: &FetchTicket) -> bool {
        let inner = self.read();
        is_current(&inner, ticket)
    }

    /// Apply a mutation only if the ticket still matches the active session
    pub(crate) fn apply_if_current(
        &self,
        ticket: &FetchTicket,
        apply: impl FnOnce(&mut SessionState),
    ) -> bool {
        let mut inner = self.write();
        if !is_current(&inner, ticket) {
            return false;
        }
        apply(&mut inner.state);
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_current(inner: &Inner, ticket: &FetchTicket) -> bool {
    if inner.epoch != ticket.epoch {
        return false;
    }
    match (&inner.connected_wallet, &ticket.wallet) {
        (Some(connected), Some(wallet)) => same_address(connected, wallet),
        _ => true,
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Resets `is_user_loading` when the fetch finishes or its future is dropped
pub(crate) struct LoadingGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.set_user_loading(false);
    }
}
