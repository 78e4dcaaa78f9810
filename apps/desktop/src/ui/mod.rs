//! Text UI: workflow shell surfaces and the analysis dashboard.

pub mod dashboard;
pub mod shell;

pub use shell::render_workflow;
