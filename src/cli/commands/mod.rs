//! Subcommands of the `smartcab` binary

pub mod baseline;
pub mod train;
