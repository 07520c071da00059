/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Helios onboarding crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod flow;
pub mod http;
pub mod session;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    FileSessionRepository,
    InMemorySessionRepository,
    LocalEvmWallet,
    MockWalletProvider,
    RepositoryOp,
    SessionRepository,
    TokenClaims,
    WalletProvider,
};

// Re-export commonly used types from http
pub use http::{
    ApiGateway,
    ClientConfig,
    HeliosClient,
    OnboardError,
    Result,
    ValidationError,
};

// Re-export session and flow entry points
pub use flow::{AuthPhase, EntryParams, InviteReason, WalletAuthController};
pub use session::{SessionState, SessionStore, derive_step};

// Re-export all types
pub use types::*;
