//! CLI subcommand implementations.

pub mod exception;
pub mod hours;
pub mod status;
pub mod status_override;
pub mod util;
pub mod view;
