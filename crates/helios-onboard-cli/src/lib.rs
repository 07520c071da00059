/*
[INPUT]:  Public API exports for helios-onboard-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod prompt;
pub mod runtime;

pub use config::OnboardConfig;
pub use runtime::Runtime;
