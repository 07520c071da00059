/*
[INPUT]:  Bearer token (JWT) strings
[OUTPUT]: Unverified payload claims (wallet address, expiry)
[POS]:    Auth layer - token codec; signature checks happen server-side
[UPDATE]: When the token claim names change
*/

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::http::{OnboardError, Result};
use crate::types::normalize_address;

/// Claims read from a bearer token payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default, alias = "walletAddress", alias = "address")]
    pub wallet: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Wallet the token was issued for, lower-cased
    pub fn wallet_address(&self) -> Option<String> {
        self.wallet
            .as_deref()
            .filter(|wallet| !wallet.trim().is_empty())
            .map(normalize_address)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Tokens without an `exp` claim never expire locally
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }
}

/// Decode the payload of a JWT without verifying its signature
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let token = token.trim();
    let mut parts = token.split('.');
    let payload_b64 = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => {
            return Err(OnboardError::Unknown(
                "Bearer token is not a valid JWT".to_string(),
            ));
        }
    };

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| URL_SAFE.decode(payload_b64))
        .map_err(|e| OnboardError::Unknown(format!("Invalid token payload base64: {e}")))?;

    let claims: TokenClaims = serde_json::from_slice(&payload_bytes)?;
    Ok(claims)
}

/// Extract the wallet address a token was issued for, if any
pub fn decode_wallet(token: &str) -> Option<String> {
    decode_claims(token)
        .ok()
        .and_then(|claims| claims.wallet_address())
}

#[cfg(test)]
pub(crate) fn make_test_token(payload: serde_json::Value) -> String {
    let header = serde_json::json!({"alg": "HS256", "typ": "JWT"});
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
    let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
    format!("{header_b64}.{payload_b64}.signature")
}
