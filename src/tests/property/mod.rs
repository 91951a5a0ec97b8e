//! Property-based tests for Talent Bridge
//!
//! Property tests verify invariants that should hold for all inputs rather
//! than for specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property
//! ```
//!
//! ## Test Modules
//!
//! - `multi_select_props`: toggling list values
//!   - Toggling twice restores the original list
//!   - A toggled value is present iff it was absent before
//!   - Other values keep their relative order
//!
//! - `validator_props`: step validation
//!   - Descriptions shorter than the minimum always fail
//!   - Whitespace-only required fields always fail
//!   - Errors only ever name fields of the validated step
//!
//! - `record_props`: lenient record decoding
//!   - Lists survive a stringify/parse cycle as lists
//!   - Arbitrary strings never fail to decode
//!
//! ## Configuration
//!
//! proptest runs 256 cases per property by default; override with
//! `PROPTEST_CASES`.

mod multi_select_props;
mod record_props;
mod validator_props;
