//! Batch execution: resumable stores and the run coordinator

pub mod coordinator;
pub mod store;

pub use coordinator::{RunCoordinator, RunStats};
pub use store::{ResultStore, StoreError};
