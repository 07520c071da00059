/*
[INPUT]:  Driver configuration and the wallet private key
[OUTPUT]: Session store and auth controller wired to the HTTP gateway and token file
[POS]:    CLI wiring - shared by every subcommand
[UPDATE]: When the library's construction surface changes
*/

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use helios_onboard::{
    AuthPhase, EntryParams, FileSessionRepository, HeliosClient, LocalEvmWallet,
    SessionRepository, SessionStore, WalletAuthController,
};
use tracing::{debug, info};

use crate::config::OnboardConfig;
use crate::prompt;

/// Store and token slot built from configuration
pub struct Runtime {
    config: OnboardConfig,
    store: SessionStore,
}

impl Runtime {
    pub fn new(config: OnboardConfig) -> Result<Self> {
        let session_dir = config.session_dir()?;
        debug!(dir = %session_dir.display(), "using session directory");

        let repository: Arc<dyn SessionRepository> =
            Arc::new(FileSessionRepository::new(session_dir));
        let client = HeliosClient::with_config_and_base_url(
            config.client_config(),
            &config.api_base_url,
            repository.clone(),
        )
        .context("build api client")?;

        let store = SessionStore::new(Arc::new(client), repository);
        Ok(Self { config, store })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Controller over a local key wallet; reads the key only when called
    pub fn controller(&self, entry: EntryParams) -> Result<WalletAuthController> {
        let key = self.config.private_key()?;
        let wallet = LocalEvmWallet::new(&key).context("load wallet key")?;
        Ok(WalletAuthController::new(
            self.store.clone(),
            Arc::new(wallet),
            entry,
        ))
    }

    /// Connect, sign and walk through the invite and bot gates until authenticated
    pub async fn login(&self, entry: EntryParams) -> Result<()> {
        let mut controller = self.controller(entry)?;
        let mut phase = controller.start().await.context("start session")?;

        loop {
            debug!(?phase, "auth phase");
            phase = match phase {
                AuthPhase::Authenticated => break,
                AuthPhase::NeedsInviteCode(reason) => {
                    let referral = controller.entry().referral_code.clone();
                    let invite = prompt::invite_code(reason, referral.as_deref())?;
                    let captcha = prompt::captcha_token()?;
                    controller
                        .submit_invite_code(&invite, Some(&captcha))
                        .await
                        .context("confirm account")?
                }
                AuthPhase::NeedsBotVerification => {
                    let captcha = prompt::captcha_token()?;
                    controller
                        .verify_bot(Some(&captcha))
                        .await
                        .context("verify bot")?
                }
                AuthPhase::Disconnected | AuthPhase::Connecting => {
                    return Err(anyhow!("wallet did not complete authentication"));
                }
            };
        }

        info!(step = %self.store.step(), "authenticated");
        prompt::print_session(&self.store.snapshot());
        Ok(())
    }

    /// Reconcile against the server and print the session
    pub async fn status(&self) -> Result<()> {
        self.store
            .initialize(None)
            .await
            .context("reconcile session")?;
        prompt::print_session(&self.store.snapshot());
        Ok(())
    }

    pub async fn referrals(&self, page: u32, page_size: u32) -> Result<()> {
        self.store
            .initialize(None)
            .await
            .context("reconcile session")?;
        let status = self
            .store
            .fetch_invite_status()
            .await
            .context("fetch invite status")?;
        let summary = self
            .store
            .fetch_referrals(page, page_size)
            .await
            .context("fetch referrals")?;
        prompt::print_referrals(&status, &summary);
        Ok(())
    }

    pub fn logout(&self) {
        self.store.logout();
        info!("session token cleared");
    }
}
