//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{ArgGroup, Parser};

use crate::command_runner::TokioCommandRunner;
use crate::config::{ModuleSpec, RunConfig, TimeFilter};
use crate::orchestrator;
use crate::output::OutputContext;

/// Collect ship trace bundles from a target board or pod and present them
#[derive(Parser)]
#[command(
    name = "shipit",
    version,
    group(ArgGroup::new("target").required(true).args(["host", "pod"]))
)]
pub struct Cli {
    /// Board address to collect from over ssh
    #[arg(short = 'i', long, value_name = "ADDRESS")]
    pub host: Option<String>,

    /// Pod name to collect from through kubectl
    #[arg(short = 'p', long, value_name = "NAME")]
    pub pod: Option<String>,

    /// Dispatch the bundle to Angela after retrieval
    #[arg(short = 'a', long, conflicts_with = "modules")]
    pub angela: bool,

    /// Timestamp filter passed to the presenter (HH:MM:SS)
    #[arg(short = 't', long, value_name = "HH:MM:SS", value_parser = parse_time)]
    pub time: Option<TimeFilter>,

    /// Copy the bundle JSON to this file
    #[arg(short = 'j', long, value_name = "FILE")]
    pub json_copy: Option<std::path::PathBuf>,

    /// Save normalized presenter output to this file instead of stdout
    #[arg(short = 's', long, value_name = "FILE")]
    pub save: Option<std::path::PathBuf>,

    /// Comma-separated module names to scope retrieval
    #[arg(short = 'm', long, value_name = "LIST", value_parser = parse_modules)]
    pub modules: Option<ModuleSpec>,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

fn parse_time(value: &str) -> Result<TimeFilter, String> {
    TimeFilter::parse(value).map_err(|e| e.to_string())
}

fn parse_modules(list: &str) -> Result<ModuleSpec, String> {
    ModuleSpec::parse(list).map_err(|e| e.to_string())
}

impl Cli {
    /// Execute one collection run.
    ///
    /// The run future is raced against Ctrl-C; dropping it on interruption
    /// releases the staging area before the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error on configuration, transport, dispatch, or pipeline
    /// failures.
    pub async fn run(self) -> Result<()> {
        let ctx = OutputContext::new(self.no_color, self.quiet);
        let cfg = RunConfig::new(
            self.host.as_deref(),
            self.pod.as_deref(),
            self.modules.unwrap_or_default(),
            self.time,
            self.json_copy,
            self.save,
            self.angela,
        )?;

        tokio::select! {
            result = orchestrator::run(&cfg, TokioCommandRunner, None, &ctx) => result,
            _ = tokio::signal::ctrl_c() => {
                ctx.error("Interrupted.");
                anyhow::bail!("interrupted")
            }
        }
    }
}
