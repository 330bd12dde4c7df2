//! carnival-lsp: Carnival diagnostics, quick fixes and completions over LSP.
//!
//! The kernel does the work; this crate owns the protocol. See [`server::run`].

pub mod config;
pub mod convert;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::{Server, capabilities, run};
