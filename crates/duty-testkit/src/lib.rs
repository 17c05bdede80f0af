//! Duty Testing Infrastructure
//!
//! Fakes and fixtures shared by the duty test suites: an in-memory validator
//! set, deterministic checkpoint keys, a permissive verifier and a wired
//! harness.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! duty-testkit = { path = "../duty-testkit" }
//! ```
//!
//! ```rust,ignore
//! use duty_testkit::*;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let harness = DutyHarness::accepting();
//!     harness.validators.add(test_validator("val1", 100)).await;
//!     // ... test logic
//! }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod harness;
pub mod keys;
pub mod logging;
pub mod validators;
pub mod verifier;

pub use harness::DutyHarness;
pub use keys::CheckpointKeyFixture;
pub use logging::init_test_tracing;
pub use validators::{test_validator, FakeValidatorSet};
pub use verifier::AcceptingVerifier;
