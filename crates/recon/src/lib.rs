//! `enrollcheck-recon`: applicant reconciliation and account ID assignment.
//!
//! Pure engine crate: receives pre-loaded tables, returns match records, the
//! assigned-ID map and the target set. No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod matcher;
pub mod model;
pub mod render;
pub mod table;

pub use config::ReconConfig;
pub use engine::reconcile;
pub use error::ReconError;
pub use export::filter_upload;
pub use model::{MatchRecord, ReconInput, ReconciliationResult};
pub use table::{canonical_key, Cell, Table};
