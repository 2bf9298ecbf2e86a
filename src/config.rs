//! Run configuration — immutable value types built once from parsed flags.
//!
//! The whole run is driven by a single [`RunConfig`] constructed before any
//! remote call. Validation failures are [`ConfigError`]s and terminate the
//! run with usage-style messages.

use std::path::PathBuf;

use chrono::NaiveTime;

use crate::error::ConfigError;

/// The selected retrieval destination. Exactly one kind is ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Bare network host, reached over ssh as a fixed user.
    Host(String),
    /// Cluster-managed pod, reached through `kubectl exec` / `kubectl cp`.
    Pod(String),
}

impl Target {
    /// Resolve the mutually exclusive `-i` / `-p` inputs into one target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BothTargets`] when both are given and
    /// [`ConfigError::NoTarget`] when neither is.
    pub fn resolve(host: Option<&str>, pod: Option<&str>) -> Result<Self, ConfigError> {
        let host = host.map(str::trim).filter(|s| !s.is_empty());
        let pod = pod.map(str::trim).filter(|s| !s.is_empty());
        match (host, pod) {
            (Some(_), Some(_)) => Err(ConfigError::BothTargets),
            (None, None) => Err(ConfigError::NoTarget),
            (Some(h), None) => Ok(Self::Host(h.to_string())),
            (None, Some(p)) => Ok(Self::Pod(p.to_string())),
        }
    }
}

/// Ordered set of module names scoping retrieval. Empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpec(Vec<String>);

impl ModuleSpec {
    /// Parse a comma-separated module list, e.g. `"ORC,OFHCC"`.
    ///
    /// Order is preserved. Entries are trimmed; an empty entry (`"ORC,,X"`
    /// or a trailing comma) is rejected rather than silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyModuleName`] on an empty entry.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        let mut names = Vec::new();
        for entry in list.split(',') {
            let name = entry.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyModuleName(list.to_string()));
            }
            names.push(name.to_string());
        }
        Ok(Self(names))
    }

    /// The empty spec — no module filtering.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Module names in the order they were given.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Validated `HH:MM:SS` timestamp filter. The original string is preserved
/// and handed to the presenter verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFilter(String);

impl TimeFilter {
    /// Validate `value` as `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimestamp`] when the value does not
    /// parse as a wall-clock time.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        NaiveTime::parse_from_str(value, "%H:%M:%S")
            .map_err(|_| ConfigError::InvalidTimestamp(value.to_string()))?;
        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Immutable configuration for one run, constructed once from parsed flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The resolved retrieval target.
    pub target: Target,
    /// Module filter; empty means retrieve from the default location.
    pub modules: ModuleSpec,
    /// Optional timestamp filter forwarded to the presenter.
    pub timestamp: Option<TimeFilter>,
    /// Copy the staged bundle JSON to this path after finalization (`-j`).
    pub json_copy: Option<PathBuf>,
    /// Persist normalized presenter output to this path instead of
    /// streaming to stdout (`-s`).
    pub save_output: Option<PathBuf>,
    /// Hand the bundle to the Angela dispatch tool (`-a`).
    pub dispatch: bool,
}

impl RunConfig {
    /// Build a validated run configuration from already-parsed values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] on target-selection violations or when
    /// `-m` and `-a` are combined.
    pub fn new(
        host: Option<&str>,
        pod: Option<&str>,
        modules: ModuleSpec,
        timestamp: Option<TimeFilter>,
        json_copy: Option<PathBuf>,
        save_output: Option<PathBuf>,
        dispatch: bool,
    ) -> Result<Self, ConfigError> {
        let target = Target::resolve(host, pod)?;
        if dispatch && !modules.is_empty() {
            return Err(ConfigError::ModulesWithDispatch);
        }
        Ok(Self {
            target,
            modules,
            timestamp,
            json_copy,
            save_output,
            dispatch,
        })
    }
}
