//! Session lifecycle, ledger updates and balance reconciliation
//!
//! A [`SessionManager`] owns one [`SessionContext`]; independent managers
//! share nothing, so several sessions can live in one process.

mod store;
mod context;
mod reconcile;
mod manager;

pub use store::SessionStore;
pub use context::SessionContext;
pub use reconcile::{ReconcileOutcome, ReconcileState};
pub use manager::{SessionManager, SessionResult};
