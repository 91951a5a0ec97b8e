//! Crate-internal test support and property suites.

pub mod mocks;
mod property;
