//! Vector matching: route a vector, evaluate it, classify the outcome.
//!
//! Routing is decided once per vector from its `test_id` prefix. Evaluation
//! runs the wallet operations and returns the first failed check. Classification
//! then applies positive/negative semantics:
//!
//! - positive: any evaluation error fails the vector
//! - negative: success only passes when `expected.verify` is `false`; an
//!   error passes unless it contradicts `expected_error`
//!
//! The `expected_error.code` check only applies to errors that carry a
//! structured [`ErrorCode`]. Unstructured errors (bad hex, mismatches, ...)
//! skip it. Existing corpora rely on that leniency.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use talos_core::{wallet, ErrorCode, Identity, TalosError};
use thiserror::Error;
use tracing::debug;

use crate::vectors::{ExpectedError, Polarity, TestVector};

/// Which evaluation a vector is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorRoute {
    /// Seed derivation, DID, signature and self-verification checks.
    Sign,
    /// Signature verification against a supplied or derived key.
    Verify,
    /// Not covered by this implementation; passes without assertions.
    Skip,
}

/// `test_id` prefix dispatch table. First match wins; no match is [`VectorRoute::Skip`].
const ROUTES: [(&str, VectorRoute); 3] = [
    ("sign_", VectorRoute::Sign),
    ("invalid_seed", VectorRoute::Sign),
    ("verify_", VectorRoute::Verify),
];

impl VectorRoute {
    pub fn for_test_id(test_id: &str) -> Self {
        ROUTES
            .iter()
            .find(|(prefix, _)| test_id.starts_with(prefix))
            .map_or(VectorRoute::Skip, |&(_, route)| route)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VectorRoute::Sign => "sign",
            VectorRoute::Verify => "verify",
            VectorRoute::Skip => "skip",
        }
    }
}

/// Why a vector failed.
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("invalid hex in {field}: {source}")]
    UndecodableHex {
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("invalid base64url in {field}: {source}")]
    UndecodableBase64 {
        field: &'static str,
        source: base64::DecodeError,
    },

    /// Seed derivation failed (bad length or key expansion).
    #[error(transparent)]
    Identity(#[from] TalosError),

    #[error("DID mismatch: want {expected}, got {actual}")]
    DidMismatch { expected: String, actual: String },

    #[error("signature mismatch: want {expected}, got {actual}")]
    SignatureMismatch { expected: String, actual: String },

    #[error("signature length mismatch: want {expected}, got {actual}")]
    LengthMismatch { expected: f64, actual: usize },

    #[error("self verification failed")]
    SelfVerificationFailed,

    #[error("verification result mismatch: want {expected}, got {actual}")]
    VerificationMismatch { expected: bool, actual: bool },

    #[error("expected error but operation succeeded")]
    UnexpectedSuccess,

    #[error("error message mismatch: want '{expected}', got '{actual}'")]
    MessageMismatch { expected: String, actual: String },

    #[error("error code mismatch: want {expected}, got {actual}")]
    CodeMismatch { expected: String, actual: ErrorCode },
}

impl VectorError {
    /// The structured code, for errors that have one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            VectorError::Identity(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// Route, evaluate and classify a vector.
pub fn check(vector: &TestVector, polarity: Polarity) -> Result<(), VectorError> {
    check_routed(vector, VectorRoute::for_test_id(&vector.test_id), polarity)
}

/// [`check`] with the route already decided by the caller.
pub fn check_routed(
    vector: &TestVector,
    route: VectorRoute,
    polarity: Polarity,
) -> Result<(), VectorError> {
    if route == VectorRoute::Skip {
        return Ok(());
    }
    classify(vector, polarity, evaluate_routed(vector, route))
}

/// Run the evaluation the vector's `test_id` routes to, without classification.
pub fn evaluate(vector: &TestVector) -> Result<(), VectorError> {
    evaluate_routed(vector, VectorRoute::for_test_id(&vector.test_id))
}

fn evaluate_routed(vector: &TestVector, route: VectorRoute) -> Result<(), VectorError> {
    match route {
        VectorRoute::Sign => evaluate_signing(vector),
        VectorRoute::Verify => evaluate_verification(vector),
        VectorRoute::Skip => Ok(()),
    }
}

/// Signing evaluation. Checks run in order and stop at the first failure.
pub fn evaluate_signing(vector: &TestVector) -> Result<(), VectorError> {
    let Some(seed_hex) = vector.input_str("seed_hex").filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    let message = vector.input_str("message_utf8").unwrap_or_default();

    let identity = derive_identity(seed_hex)?;

    if let Some(expected) = vector.expected_str("did") {
        let actual = identity.did();
        if actual != expected {
            return Err(VectorError::DidMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
    }

    let signature = identity.sign(message.as_bytes());

    if let Some(expected) = vector.expected_str("signature_base64url") {
        let actual = signature.to_base64url();
        if actual != expected {
            return Err(VectorError::SignatureMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
    }

    // Any number counts; it is truncated toward zero before comparing.
    if let Some(expected) = vector.expected_f64("signature_length") {
        let actual = signature.as_bytes().len();
        if expected.trunc() != actual as f64 {
            return Err(VectorError::LengthMismatch { expected, actual });
        }
    }

    if vector.expected_bool("verify") == Some(true)
        && !wallet::verify(
            identity.public_key().as_bytes(),
            message.as_bytes(),
            signature.as_bytes(),
        )
    {
        return Err(VectorError::SelfVerificationFailed);
    }

    Ok(())
}

/// Verification evaluation.
pub fn evaluate_verification(vector: &TestVector) -> Result<(), VectorError> {
    let public_key = resolve_public_key(vector)?;
    let message = vector
        .input_str("tampered_message")
        .or_else(|| vector.input_str("message_utf8"))
        .unwrap_or_default();

    let signature = match vector.input_str("signature_base64url") {
        Some(encoded) => {
            URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|source| VectorError::UndecodableBase64 {
                    field: "signature_base64url",
                    source,
                })?
        }
        None => Vec::new(),
    };

    let actual = wallet::verify(&public_key, message.as_bytes(), &signature);

    if let Some(expected) = vector.expected_bool("verify") {
        if actual != expected {
            return Err(VectorError::VerificationMismatch { expected, actual });
        }
    }

    Ok(())
}

/// Apply positive/negative semantics to an evaluation outcome.
pub fn classify(
    vector: &TestVector,
    polarity: Polarity,
    outcome: Result<(), VectorError>,
) -> Result<(), VectorError> {
    match (polarity, outcome) {
        (Polarity::Positive, outcome) => outcome,
        (Polarity::Negative, Ok(())) => {
            if vector.expected_bool("verify") == Some(false) {
                Ok(())
            } else {
                Err(VectorError::UnexpectedSuccess)
            }
        }
        (Polarity::Negative, Err(err)) => match &vector.expected_error {
            Some(expected) => match_expected_error(expected, &err),
            None => Ok(()),
        },
    }
}

fn match_expected_error(expected: &ExpectedError, err: &VectorError) -> Result<(), VectorError> {
    let message = err.to_string();

    if let Some(needle) = expected.message_contains() {
        if !message.to_lowercase().contains(&needle.to_lowercase()) {
            return Err(VectorError::MessageMismatch {
                expected: needle.to_string(),
                actual: message,
            });
        }
    }

    if let (Some(want), Some(actual)) = (expected.code(), err.code()) {
        if actual.as_str() != want {
            return Err(VectorError::CodeMismatch {
                expected: want.to_string(),
                actual,
            });
        }
    }

    Ok(())
}

fn derive_identity(seed_hex: &str) -> Result<Identity, VectorError> {
    let seed = hex::decode(seed_hex).map_err(|source| VectorError::UndecodableHex {
        field: "seed_hex",
        source,
    })?;
    Ok(Identity::from_seed(&seed, None)?)
}

/// Key precedence: `public_key_hex`, then `wrong_public_key_hex`, then the
/// key derived from `seed_hex`. Undecodable key hex becomes an empty key,
/// which fails verification rather than erroring.
fn resolve_public_key(vector: &TestVector) -> Result<Vec<u8>, VectorError> {
    for field in ["public_key_hex", "wrong_public_key_hex"] {
        if let Some(key_hex) = vector.input_str(field) {
            return Ok(hex::decode(key_hex).unwrap_or_else(|err| {
                debug!(test_id = %vector.test_id, field, error = %err, "undecodable public key");
                Vec::new()
            }));
        }
    }

    match vector.input_str("seed_hex") {
        Some(seed_hex) => Ok(derive_identity(seed_hex)?.public_key().as_bytes().to_vec()),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talos_core::Value;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const DID: &str = "did:key:z6MktwupdmLXVVqTzCw4i46r4uGyosGXRnR3XjN4Zq7oMMsw";
    const SIG_EMPTY: &str =
        "5VZDAMNgrHKQhuLMgG6CioSHfx645dl02HPgZSJJAVVfuIIVkKM7rMYeOXAc-bRr0lv18FlbviRlUUFDjnoQCw";

    fn vector(id: &str, inputs: &[(&str, Value)], expected: &[(&str, Value)]) -> TestVector {
        let mut v = TestVector::new(id);
        v.inputs = inputs.iter().map(|(k, x)| (k.to_string(), x.clone())).collect();
        v.expected = expected.iter().map(|(k, x)| (k.to_string(), x.clone())).collect();
        v
    }

    fn expect_error(mut v: TestVector, code: Option<&str>, contains: Option<&str>) -> TestVector {
        v.expected_error = Some(ExpectedError {
            code: code.map(str::to_string),
            message_contains: contains.map(str::to_string),
        });
        v
    }

    #[test]
    fn test_routing_table() {
        assert_eq!(VectorRoute::for_test_id("sign_basic"), VectorRoute::Sign);
        assert_eq!(VectorRoute::for_test_id("invalid_seed_short"), VectorRoute::Sign);
        assert_eq!(VectorRoute::for_test_id("verify_tampered"), VectorRoute::Verify);
        assert_eq!(VectorRoute::for_test_id("canonical_x"), VectorRoute::Skip);
        assert_eq!(VectorRoute::for_test_id("sign"), VectorRoute::Skip);
        assert_eq!(VectorRoute::for_test_id(""), VectorRoute::Skip);
    }

    #[test]
    fn test_signing_full_pass() {
        let v = vector(
            "sign_rfc1",
            &[("seed_hex", SEED.into()), ("message_utf8", "".into())],
            &[
                ("did", DID.into()),
                ("signature_base64url", SIG_EMPTY.into()),
                ("signature_length", 64.into()),
                ("verify", true.into()),
            ],
        );
        check(&v, Polarity::Positive).unwrap();
    }

    #[test]
    fn test_signing_without_seed_is_skipped() {
        let v = vector("sign_no_seed", &[], &[("did", "did:key:zwrong".into())]);
        check(&v, Polarity::Positive).unwrap();
    }

    #[test]
    fn test_signing_checks_short_circuit_in_order() {
        // Wrong DID and wrong signature: the DID check reports first.
        let v = vector(
            "sign_bad",
            &[("seed_hex", SEED.into())],
            &[
                ("did", "did:key:zNope".into()),
                ("signature_base64url", "AAAA".into()),
            ],
        );
        let err = evaluate_signing(&v).unwrap_err();
        assert!(matches!(err, VectorError::DidMismatch { .. }));
        assert!(err.to_string().starts_with("DID mismatch"));

        let v = vector(
            "sign_bad_sig",
            &[("seed_hex", SEED.into())],
            &[("did", DID.into()), ("signature_base64url", "AAAA".into())],
        );
        assert!(matches!(
            evaluate_signing(&v),
            Err(VectorError::SignatureMismatch { .. })
        ));

        let v = vector(
            "sign_bad_len",
            &[("seed_hex", SEED.into())],
            &[("signature_length", 65.into())],
        );
        assert!(matches!(
            evaluate_signing(&v),
            Err(VectorError::LengthMismatch { actual: 64, .. })
        ));
    }

    #[test]
    fn test_signature_length_that_is_not_a_count_fails() {
        for expected in [Value::from(-1), Value::from(63.5), Value::from(1e30)] {
            let v = vector(
                "sign_len",
                &[("seed_hex", SEED.into())],
                &[("signature_length", expected.clone())],
            );
            let err = check(&v, Polarity::Positive).unwrap_err();
            assert!(
                matches!(err, VectorError::LengthMismatch { actual: 64, .. }),
                "{expected:?} gave {err}"
            );
        }

        let err = evaluate_signing(&vector(
            "sign_len",
            &[("seed_hex", SEED.into())],
            &[("signature_length", Value::from(-1))],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "signature length mismatch: want -1, got 64");
    }

    #[test]
    fn test_signature_length_is_truncated() {
        for expected in [Value::from(64), Value::from(64.0), Value::from(64.9)] {
            let v = vector(
                "sign_len",
                &[("seed_hex", SEED.into())],
                &[("signature_length", expected)],
            );
            check(&v, Polarity::Positive).unwrap();
        }

        // A non-numeric length reads as absent.
        let v = vector(
            "sign_len",
            &[("seed_hex", SEED.into())],
            &[("signature_length", "64".into())],
        );
        check(&v, Polarity::Positive).unwrap();
    }

    #[test]
    fn test_verification_seed_fallback_errors() {
        let v = vector(
            "verify_bad_seed_hex",
            &[("seed_hex", "not hex".into()), ("signature_base64url", SIG_EMPTY.into())],
            &[("verify", false.into())],
        );
        let err = evaluate_verification(&v).unwrap_err();
        assert!(matches!(err, VectorError::UndecodableHex { field: "seed_hex", .. }));
        // Negative with no expected_error: any error passes.
        check(&v, Polarity::Negative).unwrap();

        let v = vector(
            "verify_short_seed",
            &[("seed_hex", "00".repeat(31).into()), ("signature_base64url", SIG_EMPTY.into())],
            &[("verify", false.into())],
        );
        let err = evaluate_verification(&v).unwrap_err();
        assert!(matches!(err, VectorError::Identity(_)));
        assert_eq!(err.code(), Some(ErrorCode::InvalidInput));
        assert!(matches!(
            check(&v, Polarity::Positive),
            Err(VectorError::Identity(_))
        ));
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_signing_bad_hex_is_unstructured() {
        let v = vector("sign_hex", &[("seed_hex", "zz".into())], &[]);
        let err = evaluate_signing(&v).unwrap_err();
        assert!(matches!(err, VectorError::UndecodableHex { field: "seed_hex", .. }));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_invalid_seed_negative_passes() {
        let v = expect_error(
            vector("invalid_seed_short", &[("seed_hex", "00".repeat(31).into())], &[]),
            Some("TALOS_INVALID_INPUT"),
            Some("32"),
        );
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_invalid_seed_wrong_code_fails() {
        let v = expect_error(
            vector("invalid_seed_short", &[("seed_hex", "00".repeat(31).into())], &[]),
            Some("TALOS_CRYPTO_ERROR"),
            None,
        );
        let err = check(&v, Polarity::Negative).unwrap_err();
        assert!(matches!(err, VectorError::CodeMismatch { .. }));
    }

    #[test]
    fn test_message_match_is_case_insensitive() {
        let v = expect_error(
            vector("invalid_seed_long", &[("seed_hex", "00".repeat(33).into())], &[]),
            None,
            Some("SEED MUST BE"),
        );
        check(&v, Polarity::Negative).unwrap();

        let v = expect_error(
            vector("invalid_seed_long", &[("seed_hex", "00".repeat(33).into())], &[]),
            None,
            Some("unrelated"),
        );
        let err = check(&v, Polarity::Negative).unwrap_err();
        assert!(err.to_string().starts_with("error message mismatch"));
    }

    #[test]
    fn test_code_check_skipped_for_unstructured_errors() {
        // Bad hex carries no code, so the mismatching code is not checked.
        let v = expect_error(
            vector("invalid_seed_hex", &[("seed_hex", "xyz".into())], &[]),
            Some("TALOS_DENIED"),
            None,
        );
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_negative_error_without_expectation_passes() {
        let v = vector("invalid_seed_any", &[("seed_hex", "0102".into())], &[]);
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_negative_unexpected_success() {
        let v = vector("sign_ok", &[("seed_hex", SEED.into())], &[("verify", true.into())]);
        let err = check(&v, Polarity::Negative).unwrap_err();
        assert_eq!(err.to_string(), "expected error but operation succeeded");
    }

    #[test]
    fn test_negative_skip_passes_without_classification() {
        let v = vector("hash_unknown", &[], &[]);
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_verification_with_public_key() {
        let v = vector(
            "verify_ok",
            &[
                ("public_key_hex", PUBLIC.into()),
                ("message_utf8", "".into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", true.into())],
        );
        check(&v, Polarity::Positive).unwrap();
    }

    #[test]
    fn test_verification_tampered_negative_passes() {
        let v = vector(
            "verify_tampered",
            &[
                ("seed_hex", SEED.into()),
                ("message_utf8", "".into()),
                ("tampered_message", "x".into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", false.into())],
        );
        evaluate(&v).unwrap();
        check(&v, Polarity::Negative).unwrap();
    }

    #[test]
    fn test_verification_mismatch() {
        let v = vector(
            "verify_tampered",
            &[
                ("public_key_hex", PUBLIC.into()),
                ("tampered_message", "x".into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", true.into())],
        );
        let err = check(&v, Polarity::Positive).unwrap_err();
        assert!(matches!(
            err,
            VectorError::VerificationMismatch {
                expected: true,
                actual: false
            }
        ));
    }

    #[test]
    fn test_public_key_precedence() {
        // public_key_hex wins over wrong_public_key_hex and seed_hex.
        let v = vector(
            "verify_precedence",
            &[
                ("public_key_hex", PUBLIC.into()),
                ("wrong_public_key_hex", "11".repeat(32).into()),
                ("seed_hex", "00".repeat(32).into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", true.into())],
        );
        check(&v, Polarity::Positive).unwrap();

        // wrong_public_key_hex wins over seed_hex.
        let v = vector(
            "verify_wrong_key",
            &[
                ("wrong_public_key_hex", "11".repeat(32).into()),
                ("seed_hex", SEED.into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", false.into())],
        );
        check(&v, Polarity::Positive).unwrap();
    }

    #[test]
    fn test_malformed_public_key_is_false_not_error() {
        let v = vector(
            "verify_short_key",
            &[
                ("public_key_hex", "abcd".into()),
                ("signature_base64url", SIG_EMPTY.into()),
            ],
            &[("verify", false.into())],
        );
        evaluate_verification(&v).unwrap();

        let v = vector(
            "verify_garbage_key",
            &[("public_key_hex", "not hex".into())],
            &[("verify", false.into())],
        );
        evaluate_verification(&v).unwrap();
    }

    #[test]
    fn test_padded_base64_is_hard_error() {
        let v = vector(
            "verify_padded",
            &[
                ("public_key_hex", PUBLIC.into()),
                ("signature_base64url", format!("{SIG_EMPTY}==").into()),
            ],
            &[("verify", true.into())],
        );
        let err = evaluate_verification(&v).unwrap_err();
        assert!(matches!(err, VectorError::UndecodableBase64 { .. }));
        assert_eq!(err.code(), None);
    }
}
