//! Subcommands of the `sparring` binary

pub mod run;
pub mod simulate;
pub mod table;
