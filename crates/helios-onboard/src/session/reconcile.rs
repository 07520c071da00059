/*
[INPUT]:  Persisted token, decoded wallet, remote profile and onboarding progress
[OUTPUT]: A consistent session state and the derived onboarding step
[POS]:    Session layer - reconciliation engine (`initialize`)
[UPDATE]: When step routing or reconciliation error handling changes
*/

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::auth::{TokenClaims, decode_claims};
use crate::http::{OnboardError, Result};
use crate::session::SessionStore;
use crate::types::{
    OnboardingProgress, OnboardingTask, Step, User, normalize_address, same_address,
};

/// Completed tasks after which the dashboard is shown
pub const TASKS_FOR_DASHBOARD: usize = 3;

/// Derive the UI step from server-side progress.
///
/// An unrecognized last task routes back to the start of onboarding.
pub fn derive_step(progress: &OnboardingProgress) -> Step {
    if progress.completed_steps.len() >= TASKS_FOR_DASHBOARD {
        return Step::DASHBOARD;
    }

    match progress.last_completed() {
        None => Step::ONBOARDING_START,
        Some(id) => match OnboardingTask::from_id(id) {
            Some(task) => task.next_step(),
            None => {
                warn!(task = id, "unknown onboarding task, restarting onboarding");
                Step::ONBOARDING_START
            }
        },
    }
}

impl SessionStore {
    /// Recompute the session from authoritative remote state.
    ///
    /// Safe to call repeatedly: on load and after login, confirmation or bot
    /// verification. `NotConfirmed` and other failures clear the persisted
    /// token, reset the step and propagate; a bot-verification gate sets the
    /// flag, keeps the token and returns `Ok`. A session whose wallet differs
    /// from the connected one is logged out before anything is fetched.
    pub async fn initialize(&self, user: Option<User>) -> Result<()> {
        let repository = self.repository().clone();
        if !repository.is_available() {
            debug!("no persistent storage, skipping reconciliation");
            return Ok(());
        }

        let Some(token) = repository.read() else {
            debug!("no session token, showing connect wallet");
            self.set_step(Step::CONNECT_WALLET);
            return Ok(());
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                warn!(error = %err, "could not decode session token payload");
                None
            }
        };

        if claims
            .as_ref()
            .is_some_and(|claims| claims.is_expired_at(Utc::now()))
        {
            info!("session token expired, logging out");
            self.logout();
            return Ok(());
        }

        let identity = user
            .as_ref()
            .filter(|user| user.has_wallet())
            .map(|user| normalize_address(&user.wallet))
            .or_else(|| claims.as_ref().and_then(TokenClaims::wallet_address));
        if let (Some(identity), Some(connected)) = (identity, self.connected_wallet()) {
            if !same_address(&identity, &connected) {
                info!(
                    wallet = %connected,
                    session_wallet = %identity,
                    "session belongs to another wallet, logging out"
                );
                self.logout();
                return Ok(());
            }
        }

        let _loading = self.loading_guard();
        self.reconcile_session(user, claims).await
    }

    async fn reconcile_session(&self, user: Option<User>, claims: Option<TokenClaims>) -> Result<()> {
        match user {
            Some(user) => self.set_user(Some(user)),
            None => {
                if let Some(wallet) = claims.and_then(|claims| claims.wallet_address()) {
                    let known = self
                        .user_wallet()
                        .is_some_and(|current| same_address(&current, &wallet));
                    if !known {
                        self.set_user(Some(User::stub(&wallet)));
                    }
                }
            }
        }

        self.refresh_user().await;

        let ticket = self.ticket(self.user_wallet().as_deref());
        match self.gateway().get_onboarding_progress().await {
            Ok(progress) => {
                let step = derive_step(&progress);
                let completed = progress.completed_steps.len();
                let applied = self.apply_if_current(&ticket, |state| {
                    state.onboarding_progress = Some(progress);
                    state.step = step;
                });
                if applied {
                    info!(step = %step, completed, "session reconciled");
                } else {
                    debug!("dropping stale onboarding progress response");
                }
                Ok(())
            }
            Err(OnboardError::RequiresBotVerification) => {
                info!("bot verification required before onboarding");
                self.apply_if_current(&ticket, |state| {
                    state.requires_bot_verification = true;
                });
                Ok(())
            }
            Err(err) => {
                if self.is_current(&ticket) {
                    self.repository().clear();
                    self.set_step(Step::CONNECT_WALLET);
                }
                if err.requires_invite_code() {
                    info!("account not confirmed, invite code required");
                } else {
                    warn!(error = %err, "reconciliation failed, session token cleared");
                }
                Err(err)
            }
        }
    }
}
