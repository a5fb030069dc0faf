//! Binary entrypoint for the `tonal` command.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = tonal_cli::run().await;
    process::exit(exit_code);
}
