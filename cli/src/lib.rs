//! monstack CLI library. The binary is a thin wrapper over [`cli::Cli::run`].

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
