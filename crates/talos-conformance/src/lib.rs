//! # Talos Conformance
//!
//! Declarative conformance harness for Talos SDKs.
//!
//! A corpus of JSON vectors is checked against the primitives in
//! [`talos_core`]. Each vector is routed by its `test_id` prefix, evaluated,
//! and classified with positive or negative semantics. The run produces a
//! [`RunReport`] that renders as JUnit XML or JSON.
//!
//! ```rust
//! use talos_conformance::{ConformanceRunner, VectorCorpus};
//!
//! let corpus = VectorCorpus::from_json_str(r#"{
//!     "vectors": [{
//!         "test_id": "sign_zero_seed",
//!         "inputs": {"seed_hex": "0000000000000000000000000000000000000000000000000000000000000000"},
//!         "expected": {"did": "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"}
//!     }]
//! }"#).unwrap();
//!
//! let report = ConformanceRunner::default().run(&corpus);
//! assert!(report.all_passed());
//! assert_eq!(report.summary_line(), "OK");
//! ```

pub mod matcher;
pub mod report;
pub mod runner;
pub mod vectors;

pub use matcher::{check, evaluate, VectorError, VectorRoute};
pub use report::{format_seconds, ReportGenerator, RunReport, TestOutcome, DEFAULT_SUITE_NAME};
pub use runner::{run_vector, ConformanceRunner, RunnerConfig};
pub use vectors::{CorpusError, ExpectedError, Polarity, TestVector, VectorCorpus};
