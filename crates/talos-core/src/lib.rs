//! # Talos Core
//!
//! Pure primitives for Talos: canonical JSON, Ed25519 identities and
//! `did:key` identifiers.
//!
//! This crate contains no I/O, no storage, no networking. Every function is a
//! deterministic computation over in-memory data (key generation aside).
//!
//! ## Key Types
//!
//! - [`Value`] - Structured value (the JSON data model)
//! - [`Identity`] - Ed25519 keypair with DID and address derivation
//! - [`TalosError`] - Structured error with a stable [`ErrorCode`]
//!
//! ## Canonicalization
//!
//! Values are encoded as canonical JSON. See the [`canonical`] module.
//!
//! ```rust
//! use talos_core::{canonical, Value};
//!
//! let v = Value::object([("b", Value::from(2)), ("a", Value::from(1))]);
//! assert_eq!(canonical::encode(&v).unwrap(), br#"{"a":1,"b":2}"#);
//! ```

pub mod base58;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod ser;
pub mod value;
pub mod wallet;

pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash};
pub use error::{Base58Error, CanonicalError, ErrorCode, TalosError};
pub use value::{Map, Number, Value};
pub use wallet::{did_from_public_key, parse_did_key, verify, Identity};
