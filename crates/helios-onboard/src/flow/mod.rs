/*
[INPUT]:  Wallet provider events, entry URL, user input from the UI
[OUTPUT]: Auth phase transitions backed by the session store
[POS]:    Flow layer - the wallet authentication state machine
[UPDATE]: When the onboarding auth flow changes
*/

pub mod controller;
pub mod entry;

pub use controller::{AuthPhase, InviteReason, WalletAuthController};
pub use entry::EntryParams;
