/*
[INPUT]:  Onboarding API operations consumed by the session layer
[OUTPUT]: ApiGateway trait and its HTTP implementation
[POS]:    HTTP layer - seam between the session layer and the remote API
[UPDATE]: When the consumed API contract changes
*/

use async_trait::async_trait;

use crate::http::{HeliosClient, Result};
use crate::types::{
    ConfirmAccountResponse, InviteStatus, LoginResponse, OnboardingProgress, ReferralSummary,
    User, VerifyBotResponse,
};

/// Remote operations the session store and controller depend on.
///
/// Implementations return errors already classified into
/// [`OnboardError`](crate::http::OnboardError) variants.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn login(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: Option<&str>,
    ) -> Result<LoginResponse>;

    async fn confirm_account(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: &str,
        captcha_token: &str,
    ) -> Result<ConfirmAccountResponse>;

    async fn verify_bot(
        &self,
        wallet: &str,
        signature: &str,
        captcha_token: &str,
    ) -> Result<VerifyBotResponse>;

    async fn get_onboarding_progress(&self) -> Result<OnboardingProgress>;

    async fn get_user_profile(&self, wallet: &str) -> Result<User>;

    async fn get_user_invite_status(&self, wallet: &str) -> Result<InviteStatus>;

    async fn get_user_referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary>;
}

#[async_trait]
impl ApiGateway for HeliosClient {
    async fn login(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: Option<&str>,
    ) -> Result<LoginResponse> {
        HeliosClient::login(self, wallet, signature, invite_code).await
    }

    async fn confirm_account(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: &str,
        captcha_token: &str,
    ) -> Result<ConfirmAccountResponse> {
        HeliosClient::confirm_account(self, wallet, signature, invite_code, captcha_token).await
    }

    async fn verify_bot(
        &self,
        wallet: &str,
        signature: &str,
        captcha_token: &str,
    ) -> Result<VerifyBotResponse> {
        HeliosClient::verify_bot(self, wallet, signature, captcha_token).await
    }

    async fn get_onboarding_progress(&self) -> Result<OnboardingProgress> {
        HeliosClient::get_onboarding_progress(self).await
    }

    async fn get_user_profile(&self, wallet: &str) -> Result<User> {
        HeliosClient::get_user_profile(self, wallet).await
    }

    async fn get_user_invite_status(&self, wallet: &str) -> Result<InviteStatus> {
        HeliosClient::get_user_invite_status(self, wallet).await
    }

    async fn get_user_referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary> {
        HeliosClient::get_user_referrals(self, page, page_size).await
    }
}
