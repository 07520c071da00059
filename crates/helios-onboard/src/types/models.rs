/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: User, onboarding progress, referral models and the UI step type
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in the onboarding UI.
///
/// Always derived from [`OnboardingProgress`]; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Step(u8);

impl Step {
    pub const CONNECT_WALLET: Step = Step(0);
    pub const ONBOARDING_START: Step = Step(2);
    pub const ADD_NETWORK: Step = Step(3);
    pub const CLAIM_FAUCET: Step = Step(4);
    pub const MINT_NFT: Step = Step(5);
    pub const FINAL_TASK: Step = Step(6);
    pub const DASHBOARD: Step = Step(7);

    pub const MAX: u8 = 7;

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_terminal(self) -> bool {
        self == Self::DASHBOARD
    }
}

impl TryFrom<u8> for Step {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= Self::MAX {
            Ok(Step(value))
        } else {
            Err(value)
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "walletAddress", alias = "address")]
    pub wallet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub xp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// Identity-only placeholder used until the profile arrives
    pub fn stub(wallet: &str) -> Self {
        Self {
            wallet: normalize_address(wallet),
            referral_code: None,
            username: None,
            avatar_url: None,
            xp: 0,
            created_at: None,
        }
    }

    pub fn normalized(mut self) -> Self {
        self.wallet = normalize_address(&self.wallet);
        self
    }

    pub fn has_wallet(&self) -> bool {
        !self.wallet.trim().is_empty()
    }
}

/// Server-side record of completed onboarding tasks.
///
/// `completed_steps` keeps the server's completion order; the client never
/// sorts or deduplicates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub completed_steps: Vec<String>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl OnboardingProgress {
    pub fn new<I, S>(completed_steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completed_steps: completed_steps.into_iter().map(Into::into).collect(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn last_completed(&self) -> Option<&str> {
        self.completed_steps.last().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteStatus {
    pub can_invite: bool,
    pub current_quota: u32,
    pub used_today: u32,
    pub remaining_invites: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSummary {
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referral_count: u64,
    #[serde(rename = "referralXP", alias = "referralXp", default)]
    pub referral_xp: u64,
}

/// Lower-case an EVM address, keeping the `0x` prefix.
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    format!("0x{}", body.to_ascii_lowercase())
}

/// Compare two addresses ignoring case and surrounding whitespace
pub fn same_address(a: &str, b: &str) -> bool {
    normalize_address(a) == normalize_address(b)
}
