//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. Configuration errors are raised
//! before any remote call; transport and pipeline errors carry enough
//! context to be printed as the run's failure message.

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Invalid or contradictory run configuration. Fatal, raised before any
/// remote call is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Exactly one target must be given: -i <address> or -p <pod>, not both.")]
    BothTargets,

    #[error("No target given. Select one with -i <address> or -p <pod>.")]
    NoTarget,

    #[error("Module filtering (-m) cannot be combined with Angela dispatch (-a).")]
    ModulesWithDispatch,

    #[error("Empty module name in '-m {0}'.")]
    EmptyModuleName(String),

    #[error("Invalid timestamp '{0}': expected HH:MM:SS.")]
    InvalidTimestamp(String),
}

// ── Transport errors ──────────────────────────────────────────────────────────

/// A remote listing, fetch, or command failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to copy '{remote}' from the target: {detail}")]
    CopyFailed { remote: String, detail: String },

    #[error("Remote file '{0}' does not exist on the target.")]
    MissingRemote(String),
}

// ── Pipeline errors ───────────────────────────────────────────────────────────

/// The presentation transform failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Presenter '{program}' exited with {status}.")]
    PresenterFailed { program: String, status: String },
}
