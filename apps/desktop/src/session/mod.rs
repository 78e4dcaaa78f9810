//! Interactive study session: command parsing and the read-render loop.

pub mod commands;
pub mod runtime;

pub use runtime::run_session;
