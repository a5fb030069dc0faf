//! Spans that tag every log line of a command run.

use tracing::Span;

use crate::init::build_sha;

/// Root span for one command invocation, carrying the command name and build.
///
/// Attach it with `tracing::Instrument::instrument` so it is held across
/// await points.
#[must_use]
pub fn command_span(command: &str) -> Span {
    tracing::info_span!("tonal", command = %command, build_sha = %build_sha())
}
