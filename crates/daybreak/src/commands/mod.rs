//! CLI subcommands.

pub mod build;
pub mod init;
pub mod theme;
pub mod watch;
