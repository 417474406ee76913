//! # Talos Testkit
//!
//! Testing utilities for Talos SDKs.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known identities and signatures for cross-SDK verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helpers that turn a seed into ready-made conformance vectors
//!
//! ## Golden Vectors
//!
//! The built-in corpus runs clean through the conformance runner:
//!
//! ```rust
//! use talos_conformance::ConformanceRunner;
//! use talos_testkit::vectors::golden_corpus;
//!
//! let report = ConformanceRunner::default().run(&golden_corpus());
//! assert!(report.all_passed());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use talos_testkit::generators::{value, SignCase};
//!
//! proptest! {
//!     #[test]
//!     fn encoding_is_deterministic(v in value()) {
//!         prop_assert_eq!(talos_core::canonical::encode(&v)?, talos_core::canonical::encode(&v)?);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use talos_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([0x42; 32]);
//! let vector = fixture.sign_vector("sign_hello", "hello");
//! assert!(vector.expected_str("did").unwrap().starts_with("did:key:z6Mk"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::SignCase;
pub use vectors::{all_vectors, golden_corpus, verify_all_vectors, GoldenVector};
