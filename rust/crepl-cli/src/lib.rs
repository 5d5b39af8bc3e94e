//! crepl CLI library.
//!
//! Terminal glue around `crepl-core`: configuration, the compiler
//! toolchain, the line driver and the interactive editor loop.

pub mod colors;
pub mod config;
pub mod driver;
pub mod error_chain;
pub mod logging;
pub mod repl;
pub mod toolchain;
