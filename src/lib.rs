//! shipit library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bundle;
pub mod cli;
pub mod collect;
pub mod command_runner;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod staging;
pub mod transport;
