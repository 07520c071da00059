/*
[INPUT]:  Wallet provider, persisted bearer token
[OUTPUT]: Token claims, token slot, challenge signatures
[POS]:    Auth layer - identity and credential primitives
[UPDATE]: When auth flow or signature methods change
*/

pub mod evm_wallet;
pub mod repository;
pub mod token;
pub mod wallet;

pub use evm_wallet::LocalEvmWallet;
pub use repository::{
    FileSessionRepository, InMemorySessionRepository, RepositoryOp, SessionRepository,
    TOKEN_STORAGE_KEY,
};
pub use token::{TokenClaims, decode_claims, decode_wallet};
pub use wallet::{BOT_VERIFICATION_CHALLENGE, MockWalletProvider, WalletProvider, login_challenge};
