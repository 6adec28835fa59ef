//! `bugdesk` command-line dashboard.
//!
//! Library half of the binary so commands, rendering, and the session
//! store can be exercised from integration tests. The entrypoint lives in
//! `main.rs`.

pub mod args;
pub mod commands;
pub mod render;
pub mod store;

pub use args::Cli;
pub use commands::run;
