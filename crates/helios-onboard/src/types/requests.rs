/*
[INPUT]:  Wallet address, signatures, invite codes and CAPTCHA tokens
[OUTPUT]: Typed request bodies for the auth endpoints
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub wallet: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAccountRequest {
    pub wallet: String,
    pub signature: String,
    pub invite_code: String,
    pub captcha_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBotRequest {
    pub wallet: String,
    pub signature: String,
    pub captcha_token: String,
}
