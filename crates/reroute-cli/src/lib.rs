//! Reroute CLI - headless runs of the console engine.
//!
//! - run_console: replay a seeded session and print what the operator would see

pub mod session;

pub use session::{SessionPlan, SessionReport};
