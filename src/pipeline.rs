//! Pipeline selection and invocation of the presentation transform.
//!
//! The presenters are external programs consumed as black boxes: bundle
//! path in, text out. Selection follows a small decision table over "was
//! module filtering used" and "was a timestamp filter supplied"; output is
//! captured and persisted when `-s <file>` was requested, otherwise it
//! streams to the caller's stdout.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::command_runner::CommandRunner;
use crate::config::TimeFilter;
use crate::error::PipelineError;
use crate::output::OutputContext;

/// Generic presentation transform.
pub const PRESENTER: &str = "present_shipit_json";

/// Module-scoped presentation transform.
pub const PRESENTER_ORC: &str = "present_shipit_json_orc";

/// Extra flags the module-scoped presenter is always invoked with.
const PRESENTER_ORC_FLAGS: &[&str] = &["-i", "-g", "-n"];

/// A selected presenter invocation, ready to run.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Select the presentation transform for the staged bundle.
#[must_use]
pub fn select(
    bundle_json: &Path,
    mailbox: &Path,
    module_scoped: bool,
    timestamp: Option<&TimeFilter>,
) -> Invocation {
    let program = if module_scoped { PRESENTER_ORC } else { PRESENTER };
    let mut args = vec![
        bundle_json.to_string_lossy().to_string(),
        mailbox.to_string_lossy().to_string(),
    ];
    if module_scoped {
        args.extend(PRESENTER_ORC_FLAGS.iter().map(ToString::to_string));
    }
    if let Some(filter) = timestamp {
        args.push("-t".to_string());
        args.push(filter.as_str().to_string());
    }
    Invocation { program, args }
}

/// Run the selected presenter.
///
/// With `save` set, stdout is captured in memory, normalized, and written
/// to that file; nothing of the intermediate buffer survives on disk.
/// Without it, the presenter streams directly to the caller's stdout.
///
/// # Errors
///
/// Returns [`PipelineError::PresenterFailed`] when the presenter exits
/// non-zero, or an error if the output file cannot be written.
pub async fn invoke<R: CommandRunner>(
    runner: &R,
    invocation: &Invocation,
    save: Option<&Path>,
    ctx: &OutputContext,
) -> Result<()> {
    let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();

    match save {
        Some(path) => {
            let output = runner.run(invocation.program, &args).await?;
            if !output.status.success() {
                return Err(PipelineError::PresenterFailed {
                    program: invocation.program.to_string(),
                    status: output.status.to_string(),
                }
                .into());
            }
            let cleaned = normalize(&String::from_utf8_lossy(&output.stdout));
            std::fs::write(path, cleaned)
                .with_context(|| format!("writing {}", path.display()))?;
            ctx.success(&format!("Output saved to {}", path.display()));
        }
        None => {
            let status = runner.run_status(invocation.program, &args).await?;
            if !status.success() {
                return Err(PipelineError::PresenterFailed {
                    program: invocation.program.to_string(),
                    status: status.to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    let re = Regex::new(r"\x1B[@-_][0-?]*[ -/]*[@-~]").expect("valid regex");
    re
});

/// Strip ANSI escape sequences and remaining control characters from the
/// presenter's raw output, keeping newlines and tabs.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let stripped = ANSI_ESCAPE.replace_all(raw, "");
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
