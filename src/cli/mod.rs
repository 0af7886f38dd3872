//! Command-line interface
//!
//! `list` and `find` share the search scope flags in [`scope`]; both drive
//! the blocking search iterators on tokio's blocking pool.

pub mod commands;
pub mod output;
pub mod scope;

pub use commands::Cli;
pub use output::Output;
