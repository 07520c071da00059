/*
[INPUT]:  Error sources (transport, API responses, wallet provider, local validation)
[OUTPUT]: Closed onboarding error taxonomy and the single response classifier
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When the server adds new error codes or the taxonomy changes
*/

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Local input problems detected before anything is sent over the wire
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("an invite code is required")]
    MissingInviteCode,

    #[error("a CAPTCHA token is required")]
    MissingCaptchaToken,

    #[error("no wallet address is known for this session")]
    MissingWalletAddress,
}

/// Main error type for the onboarding flow
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OnboardError {
    /// The user declined the signature request in their wallet
    #[error("Signature request was declined")]
    SignatureDeclined,

    /// Wallet has no account on the server yet
    #[error("Wallet is not registered")]
    NotRegistered,

    /// Account exists but still needs an invite code
    #[error("Account is not confirmed, an invite code is required")]
    NotConfirmed,

    /// Account must pass bot verification before continuing
    #[error("Bot verification required")]
    RequiresBotVerification,

    /// Server could not be reached
    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Local configuration problem (base URL, private key)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Unknown(String),
}

/// Error payload shape returned by the API on non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "error")]
    message: Option<String>,
    #[serde(default)]
    requires_bot_verification: bool,
}

const CODE_BOT_VERIFICATION: &str = "BOT_VERIFICATION_REQUIRED";
const CODE_NOT_CONFIRMED: &str = "ACCOUNT_NOT_CONFIRMED";
const CODE_NOT_REGISTERED: &str = "USER_NOT_REGISTERED";

impl OnboardError {
    /// Classify a non-success API response.
    ///
    /// This is the only place application errors are produced from wire
    /// data; downstream code matches on the variants and never builds
    /// gate errors itself.
    pub fn classify(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.code.as_deref().unwrap_or_default();

        if parsed.requires_bot_verification || code == CODE_BOT_VERIFICATION {
            return OnboardError::RequiresBotVerification;
        }
        if code == CODE_NOT_CONFIRMED || status == StatusCode::FORBIDDEN {
            return OnboardError::NotConfirmed;
        }
        if code == CODE_NOT_REGISTERED || status == StatusCode::NOT_FOUND {
            return OnboardError::NotRegistered;
        }

        let message = parsed
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        OnboardError::Unknown(message)
    }

    /// Intermediate states that pause the flow without being failures
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            OnboardError::RequiresBotVerification
                | OnboardError::NotConfirmed
                | OnboardError::NotRegistered
        )
    }

    /// Check if the UI should show the "can't reach server" message
    pub fn is_network(&self) -> bool {
        matches!(self, OnboardError::Network(_))
    }

    /// Check if the error routes the user to the invite-code prompt
    pub fn requires_invite_code(&self) -> bool {
        matches!(self, OnboardError::NotConfirmed | OnboardError::NotRegistered)
    }
}

impl From<reqwest::Error> for OnboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OnboardError::Unknown(format!("Invalid response body: {err}"))
        } else if err.is_builder() {
            OnboardError::Config(err.to_string())
        } else {
            OnboardError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OnboardError {
    fn from(err: serde_json::Error) -> Self {
        OnboardError::Unknown(format!("Invalid response body: {err}"))
    }
}

impl From<url::ParseError> for OnboardError {
    fn from(err: url::ParseError) -> Self {
        OnboardError::Config(format!("Invalid URL: {err}"))
    }
}

/// Result type alias for onboarding operations
pub type Result<T> = std::result::Result<T, OnboardError>;
