/*
[INPUT]:  Wallet address, challenge signatures, invite codes, CAPTCHA tokens
[OUTPUT]: Bearer tokens, user records and bot-verification results
[POS]:    HTTP layer - authentication endpoints
[UPDATE]: When adding new auth endpoints or changing request bodies
*/

use reqwest::Method;

use crate::http::{HeliosClient, Result};
use crate::types::{
    ConfirmAccountRequest, ConfirmAccountResponse, LoginRequest, LoginResponse, VerifyBotRequest,
    VerifyBotResponse,
};

impl HeliosClient {
    /// Log in with a signed login challenge
    ///
    /// POST /api/auth/login
    pub async fn login(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: Option<&str>,
    ) -> Result<LoginResponse> {
        let body = LoginRequest {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
            invite_code: invite_code.map(str::to_string),
        };
        let builder = self.request(Method::POST, "/api/auth/login")?.json(&body);
        self.send_json(builder).await
    }

    /// Register or confirm an account with an invite code
    ///
    /// POST /api/auth/confirm
    pub async fn confirm_account(
        &self,
        wallet: &str,
        signature: &str,
        invite_code: &str,
        captcha_token: &str,
    ) -> Result<ConfirmAccountResponse> {
        let body = ConfirmAccountRequest {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
            invite_code: invite_code.to_string(),
            captcha_token: captcha_token.to_string(),
        };
        let builder = self.request(Method::POST, "/api/auth/confirm")?.json(&body);
        self.send_json(builder).await
    }

    /// Submit the bot-verification challenge signature
    ///
    /// POST /api/auth/verify-bot
    pub async fn verify_bot(
        &self,
        wallet: &str,
        signature: &str,
        captcha_token: &str,
    ) -> Result<VerifyBotResponse> {
        let body = VerifyBotRequest {
            wallet: wallet.to_string(),
            signature: signature.to_string(),
            captcha_token: captcha_token.to_string(),
        };
        let builder = self.request(Method::POST, "/api/auth/verify-bot")?.json(&body);
        self.send_json(builder).await
    }
}
