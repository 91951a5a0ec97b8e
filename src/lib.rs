/// Talent Bridge - request wizards for the employer/student platform (TUI Edition)
///
/// Core library providing the multi-step wizard state machine, per-step
/// validation, media staging and the HTTP submission gateway.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
