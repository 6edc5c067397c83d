//! `roleaudit-analysis` — role/directory outlier analysis engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns classified
//! results. No CLI or file I/O dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod table;

pub use config::AuditConfig;
pub use engine::run;
pub use error::AuditError;
pub use model::{AuditInput, AuditResult, CanonicalRecord, Diagnostic};
