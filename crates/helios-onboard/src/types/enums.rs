/*
[INPUT]:  Onboarding task identifiers used by the progress API
[OUTPUT]: Typed task enum with wire names and next-step mapping
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the server adds or renames onboarding tasks
*/

use serde::{Deserialize, Serialize};

use super::models::Step;

/// Onboarding tasks the client knows how to route after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingTask {
    AddHeliosNetwork,
    ClaimFromFaucet,
    MintEarlyBirdNft,
}

impl OnboardingTask {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "add_helios_network" => Some(Self::AddHeliosNetwork),
            "claim_from_faucet" => Some(Self::ClaimFromFaucet),
            "mint_early_bird_nft" => Some(Self::MintEarlyBirdNft),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::AddHeliosNetwork => "add_helios_network",
            Self::ClaimFromFaucet => "claim_from_faucet",
            Self::MintEarlyBirdNft => "mint_early_bird_nft",
        }
    }

    /// Step shown once this task is the most recently completed one
    pub fn next_step(self) -> Step {
        match self {
            Self::AddHeliosNetwork => Step::CLAIM_FAUCET,
            Self::ClaimFromFaucet => Step::MINT_NFT,
            Self::MintEarlyBirdNft => Step::FINAL_TASK,
        }
    }
}
