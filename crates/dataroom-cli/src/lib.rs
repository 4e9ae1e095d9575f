//! # dataroom-cli
//!
//! Command-line front end for a signed-out data room workspace. Every
//! invocation loads the stored snapshot, applies one command through the
//! synchronization coordinator and saves the result.

pub mod commands;
pub mod output;
pub mod state;

pub use commands::Cli;
pub use state::LocalWorkspace;
