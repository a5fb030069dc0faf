#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Variable-store reconciliation for generated palettes.
//!
//! Layout: `model.rs` (collections, variables, values), `store.rs` (the
//! `VariableStore` seam), `memory.rs` / `file.rs` (backends), `patterns.rs`
//! (role search table), `reconciler.rs` (`upsert`, `find_by_pattern`,
//! palette apply and seed import).

pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod patterns;
pub mod reconciler;
mod state;
pub mod store;

pub use error::{ReconcileError, ReconcileResult, StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use model::{Mode, Rgba, Variable, VariableCollection, VariableType, VariableValue};
pub use patterns::SearchPatterns;
pub use reconciler::{
    ApplyReport, ExistingColorVariable, ExistingColors, FallbackReason, SeedImport, SeedSource,
    UpsertOutcome, VariableReconciler,
};
pub use store::VariableStore;
