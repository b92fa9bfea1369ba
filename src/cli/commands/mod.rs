//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod create;
pub mod databases;
pub mod list;
pub mod remove;
pub mod show;
