/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: Signed challenge messages and wallet address
[POS]:    Auth layer - local EVM wallet provider (CLI and automation)
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::str::FromStr;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::WalletProvider;
use crate::http::{OnboardError, Result};
use crate::types::normalize_address;

/// Wallet provider backed by a local private key; always connected
pub struct LocalEvmWallet {
    signer: PrivateKeySigner,
    address: String,
}

impl LocalEvmWallet {
    /// Create a new EVM wallet from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.trim();
        let private_key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| OnboardError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = normalize_address(&signer.address().to_string());

        Ok(Self { signer, address })
    }
}

#[async_trait]
impl WalletProvider for LocalEvmWallet {
    fn is_connected(&self) -> bool {
        true
    }

    fn address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    fn open_connect(&self) {}

    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| OnboardError::Unknown(format!("Failed to sign message: {e}")))?;

        // r, s, v
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
