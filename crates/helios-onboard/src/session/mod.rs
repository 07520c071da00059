/*
[INPUT]:  API gateway, persisted token slot
[OUTPUT]: Session store and the reconciliation engine
[POS]:    Session layer - UI state derived from authoritative remote state
[UPDATE]: When session state or reconciliation rules change
*/

pub mod reconcile;
pub mod store;

pub use reconcile::{TASKS_FOR_DASHBOARD, derive_step};
pub use store::{SessionState, SessionStore};
