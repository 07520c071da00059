/*
[INPUT]:  Wallet address, paging parameters and the bearer token
[OUTPUT]: Profile, onboarding progress, invite quota and referral data
[POS]:    HTTP layer - user data endpoints (require JWT auth)
[UPDATE]: When adding new user endpoints or changing query parameters
*/

use reqwest::Method;

use crate::http::{HeliosClient, Result};
use crate::types::{InviteStatus, OnboardingProgress, ReferralSummary, User};

impl HeliosClient {
    /// GET /api/users/onboarding/progress
    pub async fn get_onboarding_progress(&self) -> Result<OnboardingProgress> {
        let builder = self.request(Method::GET, "/api/users/onboarding/progress")?;
        self.send_json(builder).await
    }

    /// GET /api/users/{wallet}/profile
    pub async fn get_user_profile(&self, wallet: &str) -> Result<User> {
        let endpoint = format!("/api/users/{wallet}/profile");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// GET /api/users/{wallet}/invite-status
    pub async fn get_user_invite_status(&self, wallet: &str) -> Result<InviteStatus> {
        let endpoint = format!("/api/users/{wallet}/invite-status");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// GET /api/users/referrals?page={page}&pageSize={page_size}
    pub async fn get_user_referrals(&self, page: u32, page_size: u32) -> Result<ReferralSummary> {
        let endpoint = format!("/api/users/referrals?page={page}&pageSize={page_size}");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }
}
