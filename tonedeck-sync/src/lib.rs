//! tonedeck-sync library interface
//!
//! Download pipeline, deck export and the fetch seam, exposed for the
//! `tonedeck` binary and for integration testing.

pub mod app;
pub mod error;
pub mod export;
pub mod inventory;
pub mod source;
pub mod sync;
pub mod validate;

pub use crate::app::{RunPlan, RunSummary};
pub use crate::error::{SyncError, SyncResult};
pub use crate::export::{export_deck, ExportReport, ToneGroups};
pub use crate::inventory::{AudioDir, LocalInventory};
pub use crate::source::{AudioSource, FetchOutcome, HttpAudioSource};
pub use crate::sync::{download_files, SyncOptions, SyncReport};
