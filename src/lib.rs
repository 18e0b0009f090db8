//! Core engine for a personal task-list manager.
//!
//! Datasets of tasks are imported from CSV files or linked spreadsheets,
//! reconciled against their remote source, filtered through composable
//! predicates, and ordered by a seeded shuffle. Filter selections travel in
//! shareable links via a compact base64 codec.

pub mod config;
pub mod debounce;
pub mod duration;
pub mod filter;
pub mod import;
pub mod models;
pub mod reconcile;
pub mod share;
pub mod sheets;
pub mod shuffle;
pub mod store;

pub use config::Config;
pub use filter::TaskFilter;
pub use models::{
    Dataset, FilterEphemeral, FilterProfile, ReconciliationResult, RemoteStatus, Task,
};
pub use store::Store;
