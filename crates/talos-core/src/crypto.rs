//! Cryptographic primitives for Talos.
//!
//! Ed25519 (via ed25519-dalek) and SHA-256 (via sha2) behind fixed-size byte
//! newtypes. Signatures travel as unpadded base64url.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

/// Ed25519 seed length in bytes.
pub const SEED_LEN: usize = 32;
/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Shared surface of the fixed-size byte newtypes: raw access, hex, a
/// truncated `Debug`, `AsRef<[u8]>` and `From<[u8; N]>`.
macro_rules! fixed_bytes {
    ($name:ident, $len:expr, $label:literal) => {
        impl $name {
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase hex of the raw bytes.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({}..)"), &self.to_hex()[..12])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }
    };
}

/// SHA-256 digest. Wallet addresses are its hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

fixed_bytes!(Sha256Hash, 32, "Sha256");

impl Sha256Hash {
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

/// Raw Ed25519 public key. Not checked to be a valid curve point until used.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; PUBLIC_KEY_LEN]);

fixed_bytes!(Ed25519PublicKey, PUBLIC_KEY_LEN, "Ed25519PublicKey");

impl Ed25519PublicKey {
    /// Decode exactly 32 bytes of hex.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut key = [0u8; PUBLIC_KEY_LEN];
        hex::decode_to_slice(s, &mut key)?;
        Ok(Self(key))
    }

    /// `false` for an invalid point as well as for a bad signature.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        VerifyingKey::from_bytes(&self.0)
            .map(|key| {
                key.verify(message, &Signature::from_bytes(&signature.0))
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// Raw Ed25519 signature (R || S).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; SIGNATURE_LEN]);

fixed_bytes!(Ed25519Signature, SIGNATURE_LEN, "Ed25519Signature");

impl Ed25519Signature {
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parse unpadded base64url; padding and the standard alphabet are rejected.
    pub fn from_base64url(s: &str) -> Result<Self, base64::DecodeError> {
        let decoded = URL_SAFE_NO_PAD.decode(s)?;
        <[u8; SIGNATURE_LEN]>::try_from(decoded.as_slice())
            .map(Self)
            .map_err(|_| base64::DecodeError::InvalidLength(decoded.len()))
    }
}

/// Ed25519 secret key with its derived public half.
#[derive(Clone)]
pub struct Keypair {
    secret: SigningKey,
}

impl Keypair {
    /// Fresh keypair from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self {
            secret: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// RFC 8032 §5.1.5 key expansion; the same seed always yields the same key.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            secret: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Deterministic: the same key and message always give the same signature.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.secret.sign(message).to_bytes())
    }

    /// The 32-byte seed. Secret material.
    pub fn seed(&self) -> [u8; SEED_LEN] {
        self.secret.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Verify over untrusted byte slices.
///
/// Total: a key or signature of the wrong length, or a key that is not a
/// valid curve point, is simply a failed verification.
pub fn verify_raw(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match (
        <[u8; PUBLIC_KEY_LEN]>::try_from(public_key),
        <[u8; SIGNATURE_LEN]>::try_from(signature),
    ) {
        (Ok(key), Ok(sig)) => Ed25519PublicKey(key).verify(message, &Ed25519Signature(sig)),
        _ => false,
    }
}
