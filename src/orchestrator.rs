//! Top-level run controller.
//!
//! One run walks resolve target → discover/retrieve → optional Angela
//! dispatch → select and invoke the presentation pipeline → optional
//! persisted output. The staging area is owned by this scope, so its
//! removal is guaranteed on completion, on any propagated error, and when
//! the run future is dropped on cancellation.

use anyhow::{Context, Result};

use crate::bundle::Bundle;
use crate::collect;
use crate::command_runner::CommandRunner;
use crate::config::RunConfig;
use crate::dispatch::{self, LoginArtifact};
use crate::output::{OutputContext, progress};
use crate::pipeline;
use crate::staging::StagingArea;
use crate::transport::Backend;

/// Execute one collection run.
///
/// `login` overrides the Angela session location; with `None` the default
/// `~/.angela/session` is resolved, and only when dispatch is enabled.
///
/// # Errors
///
/// Returns an error on transport, dispatch, or pipeline failures. The
/// staging area is removed regardless of the outcome.
pub async fn run<R: CommandRunner + Clone>(
    cfg: &RunConfig,
    runner: R,
    login: Option<&LoginArtifact>,
    ctx: &OutputContext,
) -> Result<()> {
    let backend = Backend::bind(&cfg.target, runner.clone());
    let staging = StagingArea::create()?;

    let spinner = ctx
        .show_progress()
        .then(|| progress::spinner("Retrieving bundle files"));
    let files = collect::collect(&backend, &cfg.modules, &staging, ctx).await?;
    let mailbox = collect::snapshot_mailboxes(&backend, &staging).await?;
    if let Some(pb) = &spinner {
        progress::finish_ok(pb, &format!("Retrieved {} bundle file(s)", files.len()));
    }

    let bundle = Bundle::finalize(
        files,
        mailbox,
        cfg.timestamp.as_ref().map(|t| t.as_str().to_string()),
    )?;
    let bundle_json = bundle.write_json(&staging)?;

    if let Some(dest) = &cfg.json_copy {
        std::fs::copy(&bundle_json, dest)
            .with_context(|| format!("copying bundle JSON to {}", dest.display()))?;
        ctx.kv("Bundle JSON", &dest.display().to_string());
    }

    if cfg.dispatch {
        // the session artifact is only resolved when dispatching, so runs
        // without -a never need a home directory
        let resolved;
        let login = match login {
            Some(artifact) => artifact,
            None => {
                resolved = LoginArtifact::new()?;
                &resolved
            }
        };
        dispatch::publish(&runner, login, &bundle, ctx).await?;
    }

    let invocation = pipeline::select(
        &bundle_json,
        bundle.mailbox_path(),
        !cfg.modules.is_empty(),
        cfg.timestamp.as_ref(),
    );
    pipeline::invoke(&runner, &invocation, cfg.save_output.as_deref(), ctx).await?;

    Ok(())
    // staging dropped here — removed on every exit path above as well
}
