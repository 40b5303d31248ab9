//! Clinic opening hours CLI library.
//!
//! This crate provides the administrative and visitor-facing CLI over the
//! schedule engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ExceptionAction, HoursAction, OverrideAction};
pub use config::Config;
