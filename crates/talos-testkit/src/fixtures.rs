//! Test fixtures and helpers.
//!
//! A [`TestFixture`] is one identity. Its methods emit conformance vectors whose
//! expectations are computed from that identity, so they always pass against a
//! correct implementation.

use talos_conformance::{ExpectedError, TestVector};
use talos_core::{ErrorCode, Identity, Keypair, Value};

/// A test fixture holding one deterministic identity.
pub struct TestFixture {
    pub seed: [u8; 32],
    pub identity: Identity,
}

impl TestFixture {
    /// Create a new test fixture with a random seed.
    pub fn new() -> Self {
        Self::with_seed(Keypair::generate().seed())
    }

    /// Create with a deterministic identity from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            seed,
            identity: Identity::from_keypair(Keypair::from_seed(&seed), None),
        }
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    pub fn public_key_hex(&self) -> String {
        self.identity.public_key().to_hex()
    }

    pub fn did(&self) -> String {
        self.identity.did()
    }

    /// Unpadded base64url signature over `message`.
    pub fn signature_base64url(&self, message: &str) -> String {
        self.identity.sign(message.as_bytes()).to_base64url()
    }

    /// A positive signing vector with every signing expectation set.
    pub fn sign_vector(&self, test_id: &str, message: &str) -> TestVector {
        vector(
            test_id,
            [
                ("seed_hex", self.seed_hex().into()),
                ("message_utf8", message.into()),
            ],
            [
                ("did", self.did().into()),
                ("signature_base64url", self.signature_base64url(message).into()),
                ("signature_length", 64u64.into()),
                ("verify", true.into()),
            ],
        )
    }

    /// A positive verification vector that supplies the public key.
    pub fn verify_vector(&self, test_id: &str, message: &str) -> TestVector {
        vector(
            test_id,
            [
                ("public_key_hex", self.public_key_hex().into()),
                ("message_utf8", message.into()),
                ("signature_base64url", self.signature_base64url(message).into()),
            ],
            [("verify", true.into())],
        )
    }

    /// A negative verification vector: `message` is signed, `tampered` is checked.
    pub fn tampered_vector(&self, test_id: &str, message: &str, tampered: &str) -> TestVector {
        vector(
            test_id,
            [
                ("seed_hex", self.seed_hex().into()),
                ("message_utf8", message.into()),
                ("tampered_message", tampered.into()),
                ("signature_base64url", self.signature_base64url(message).into()),
            ],
            [("verify", false.into())],
        )
    }

    /// A negative verification vector checking our signature against `other`'s key.
    pub fn wrong_key_vector(&self, test_id: &str, message: &str, other: &TestFixture) -> TestVector {
        vector(
            test_id,
            [
                ("wrong_public_key_hex", other.public_key_hex().into()),
                ("message_utf8", message.into()),
                ("signature_base64url", self.signature_base64url(message).into()),
            ],
            [("verify", false.into())],
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A negative vector whose seed is `len` bytes long. `len` must not be 32.
pub fn invalid_seed_vector(test_id: &str, len: usize) -> TestVector {
    let mut v = vector(test_id, [("seed_hex", "07".repeat(len).into())], []);
    v.expected_error = Some(ExpectedError {
        code: Some(ErrorCode::InvalidInput.as_str().to_string()),
        message_contains: Some("32".to_string()),
    });
    v
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

fn vector<const I: usize, const E: usize>(
    test_id: &str,
    inputs: [(&str, Value); I],
    expected: [(&str, Value); E],
) -> TestVector {
    let mut v = TestVector::new(test_id);
    v.inputs = inputs.into_iter().map(|(k, x)| (k.to_string(), x)).collect();
    v.expected = expected.into_iter().map(|(k, x)| (k.to_string(), x)).collect();
    v
}
