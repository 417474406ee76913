//! Error types for Talos Core.
//!
//! [`TalosError`] is the structured error that crosses the SDK boundary: it
//! carries a stable [`ErrorCode`], a message, free-form details, an optional
//! request id and an optional cause. The smaller enums below are local to
//! the encoders.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{Map, Value};

/// Boxed cause attached to a [`TalosError`].
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Stable Talos error codes.
///
/// The wire strings are part of the protocol and shared by every SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authorization
    #[serde(rename = "TALOS_DENIED")]
    Denied,
    #[serde(rename = "TALOS_INVALID_CAPABILITY")]
    InvalidCapability,

    // Protocol
    #[serde(rename = "TALOS_PROTOCOL_MISMATCH")]
    ProtocolMismatch,
    #[serde(rename = "TALOS_FRAME_INVALID")]
    FrameInvalid,

    // Crypto
    #[serde(rename = "TALOS_CRYPTO_ERROR")]
    CryptoError,
    #[serde(rename = "TALOS_INVALID_INPUT")]
    InvalidInput,

    // Transport
    #[serde(rename = "TALOS_TRANSPORT_TIMEOUT")]
    TransportTimeout,
    #[serde(rename = "TALOS_TRANSPORT_ERROR")]
    TransportError,
}

impl ErrorCode {
    /// All codes, in declaration order.
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::Denied,
        ErrorCode::InvalidCapability,
        ErrorCode::ProtocolMismatch,
        ErrorCode::FrameInvalid,
        ErrorCode::CryptoError,
        ErrorCode::InvalidInput,
        ErrorCode::TransportTimeout,
        ErrorCode::TransportError,
    ];

    /// The wire string for this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Denied => "TALOS_DENIED",
            ErrorCode::InvalidCapability => "TALOS_INVALID_CAPABILITY",
            ErrorCode::ProtocolMismatch => "TALOS_PROTOCOL_MISMATCH",
            ErrorCode::FrameInvalid => "TALOS_FRAME_INVALID",
            ErrorCode::CryptoError => "TALOS_CRYPTO_ERROR",
            ErrorCode::InvalidInput => "TALOS_INVALID_INPUT",
            ErrorCode::TransportTimeout => "TALOS_TRANSPORT_TIMEOUT",
            ErrorCode::TransportError => "TALOS_TRANSPORT_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// The canonical structured error of the Talos SDK.
///
/// Built with [`TalosError::new`] and the `with_*` builder methods:
///
/// ```rust
/// use talos_core::{ErrorCode, TalosError};
///
/// let err = TalosError::new(ErrorCode::InvalidInput, "bad input")
///     .with_detail("field", "age")
///     .with_request_id("req-123");
/// assert_eq!(err.to_string(), "[TALOS_INVALID_INPUT] bad input");
/// ```
#[derive(Debug)]
pub struct TalosError {
    code: ErrorCode,
    message: String,
    details: Map,
    request_id: Option<String>,
    cause: Option<Cause>,
}

impl TalosError {
    /// Create an error with a code and message and nothing else.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
            request_id: None,
            cause: None,
        }
    }

    /// Add a single detail entry, replacing any previous value for `key`.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Merge a map of details.
    pub fn with_details(mut self, details: Map) -> Self {
        self.details.extend(details);
        self
    }

    /// Attach the request id reported by a remote peer.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach an underlying cause.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &Map {
        &self.details
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Consume the error and return its cause.
    pub fn into_cause(self) -> Option<Cause> {
        self.cause
    }
}

impl fmt::Display for TalosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "[{}] {}: {}", self.code, self.message, cause),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl StdError for TalosError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Errors from canonical encoding and parsing.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("cannot encode non-finite number: {0}")]
    NonFiniteNumber(f64),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot lower value: {0}")]
    Serialize(String),
}

/// Errors from base58 decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}
