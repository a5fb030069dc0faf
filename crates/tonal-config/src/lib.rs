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

//! Layered configuration: built-in defaults, an optional JSON file, then
//! `TONAL_*` environment variables.
//!
//! Layout: `model.rs` (typed settings), `defaults.rs` (built-in values),
//! `validate.rs` (field parsing), `loader.rs` (`ConfigLoader`).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use model::{LoggingSettings, TonalConfig};
