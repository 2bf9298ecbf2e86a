//! Discovery and retrieval — module-scoped or default-location collection
//! plus the mailbox snapshot.
//!
//! Partial-failure policy: a module name with no matching bundle directory,
//! or a discovered directory without bundle files, is reported as a warning
//! and skipped; the run continues with the remaining modules. A fetch
//! failure for a discovered file aborts the run, since that file was
//! expected to exist.

use anyhow::{Context, Result};

use crate::bundle::{MailboxSnapshot, RetrievedFile};
use crate::config::ModuleSpec;
use crate::output::OutputContext;
use crate::staging::StagingArea;
use crate::transport::{APPLICATIONS_ROOT, Transport};

/// Suffix of module-scoped bundle files.
pub const SHIP_SUFFIX: &str = ".ship";

/// Suffix of top-level bundle files at the default location.
pub const WHIP_SUFFIX: &str = ".whip";

/// Mailbox-listing command executed on the target.
pub const MAILBOX_COMMAND: &[&str] = &["um", "list"];

/// Staged file name of the mailbox snapshot.
pub const MAILBOX_FILE: &str = "um_list.txt";

/// Retrieve bundle files into the staging area.
///
/// With an empty [`ModuleSpec`], all `*.whip` files are taken from the
/// transport's default location. Otherwise each module name is resolved to
/// bundle directories under the applications root and every `*.ship` file
/// within them is fetched, strictly in order.
///
/// # Errors
///
/// Returns an error on transport failures other than per-module discovery
/// emptiness, which is reported via `ctx.warn` and skipped.
pub async fn collect<T: Transport>(
    transport: &T,
    modules: &ModuleSpec,
    staging: &StagingArea,
    ctx: &OutputContext,
) -> Result<Vec<RetrievedFile>> {
    if modules.is_empty() {
        return transport.fetch_default(WHIP_SUFFIX, staging).await;
    }

    let mut files = Vec::new();
    for name in modules.names() {
        let dirs = transport
            .find_directories(APPLICATIONS_ROOT, name)
            .await
            .with_context(|| format!("discovering bundle directories for module {name}"))?;
        if dirs.is_empty() {
            ctx.warn(&format!(
                "no bundle directory for module {name} under {APPLICATIONS_ROOT}, skipping"
            ));
            continue;
        }
        for dir in &dirs {
            let remote_files = transport.list_files(dir, SHIP_SUFFIX).await?;
            if remote_files.is_empty() {
                ctx.warn(&format!(
                    "no {SHIP_SUFFIX} files in {dir} for module {name}, skipping"
                ));
                continue;
            }
            for remote in &remote_files {
                files.push(transport.fetch(remote, staging).await?);
            }
        }
    }
    Ok(files)
}

/// Capture the target's mailbox listing into the staging area.
///
/// # Errors
///
/// Returns an error if the remote command fails or the snapshot cannot be
/// written.
pub async fn snapshot_mailboxes<T: Transport>(
    transport: &T,
    staging: &StagingArea,
) -> Result<MailboxSnapshot> {
    let listing = transport
        .run_command(MAILBOX_COMMAND)
        .await
        .context("capturing mailbox listing")?;
    let local_path = staging.write(MAILBOX_FILE, &listing)?;
    Ok(MailboxSnapshot { local_path })
}
