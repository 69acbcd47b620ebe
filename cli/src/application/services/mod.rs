//! Use-cases. Every side effect goes through a port from
//! `crate::application::ports`; nothing here names an infra type.

pub mod config_service;
pub mod deploy;
pub mod docker;
pub mod inputs;
