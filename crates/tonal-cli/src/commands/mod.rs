//! Command handlers. Each returns the rendered output for `run()` to print.

mod apply;
mod defaults;
mod generate;
mod import;
mod init_store;

pub(crate) use apply::handle_apply;
pub(crate) use defaults::handle_defaults;
pub(crate) use generate::handle_generate;
pub(crate) use import::handle_import;
pub(crate) use init_store::handle_init_store;
