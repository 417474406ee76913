//! Identity wallet: seed derivation, did:key identifiers, content addresses.
//!
//! An [`Identity`] owns exactly one Ed25519 keypair. The public key is always
//! recomputed from it; the two can never drift apart.

use std::fmt;

use crate::base58;
use crate::crypto::{self, Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash, SEED_LEN};
use crate::error::{ErrorCode, TalosError};

/// Multicodec tag for an Ed25519 public key (varint 0xed).
pub const ED25519_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Method and multibase prefix of every Talos DID.
pub const DID_KEY_PREFIX: &str = "did:key:z";

/// A Talos identity: an Ed25519 keypair and an optional display name.
#[derive(Clone)]
pub struct Identity {
    keypair: Keypair,
    name: Option<String>,
}

impl Identity {
    /// Derive an identity from a 32-byte seed.
    ///
    /// Fails with `TALOS_INVALID_INPUT` when the seed has any other length;
    /// the message names the expected length and the details carry both
    /// `expected` and `actual`.
    pub fn from_seed(seed: &[u8], name: Option<&str>) -> Result<Self, TalosError> {
        if seed.len() != SEED_LEN {
            return Err(TalosError::new(
                ErrorCode::InvalidInput,
                format!("seed must be {SEED_LEN} bytes, got {}", seed.len()),
            )
            .with_detail("expected", SEED_LEN)
            .with_detail("actual", seed.len()));
        }

        let seed: [u8; SEED_LEN] = seed.try_into().map_err(|e| {
            TalosError::new(ErrorCode::CryptoError, "failed to derive key from seed").with_cause(e)
        })?;

        Ok(Self::from_keypair(Keypair::from_seed(&seed), name))
    }

    pub fn from_keypair(keypair: Keypair, name: Option<&str>) -> Self {
        Self {
            keypair,
            name: name.map(str::to_string),
        }
    }

    /// Create a fresh identity from OS randomness.
    pub fn generate(name: Option<&str>) -> Self {
        Self::from_keypair(Keypair::generate(), name)
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Hex SHA-256 of the public key (64 lowercase hex characters).
    pub fn address(&self) -> String {
        Sha256Hash::hash(self.public_key().as_bytes()).to_hex()
    }

    /// `did:key:z` + base58(0xed 0x01 || public key).
    pub fn did(&self) -> String {
        did_from_public_key(&self.public_key())
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.keypair.sign(message)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key())
            .field("name", &self.name)
            .finish()
    }
}

/// Format the did:key identifier for a public key.
pub fn did_from_public_key(public_key: &Ed25519PublicKey) -> String {
    let mut payload = Vec::with_capacity(ED25519_MULTICODEC.len() + 32);
    payload.extend_from_slice(&ED25519_MULTICODEC);
    payload.extend_from_slice(public_key.as_bytes());
    format!("{DID_KEY_PREFIX}{}", base58::encode(&payload))
}

/// Recover the public key from a did:key identifier.
pub fn parse_did_key(did: &str) -> Result<Ed25519PublicKey, TalosError> {
    let invalid = |reason: &str| {
        TalosError::new(ErrorCode::InvalidInput, format!("invalid did:key: {reason}"))
            .with_detail("did", did)
    };

    let encoded = did
        .strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| invalid("expected did:key:z prefix"))?;
    let payload = base58::decode(encoded).map_err(|e| invalid("bad base58").with_cause(e))?;

    let key = payload
        .strip_prefix(&ED25519_MULTICODEC[..])
        .ok_or_else(|| invalid("not an ed25519 multicodec key"))?;
    let key: [u8; 32] = key
        .try_into()
        .map_err(|_| invalid("ed25519 key must be 32 bytes"))?;
    Ok(Ed25519PublicKey::from_bytes(key))
}

/// Verify a signature over untrusted inputs.
///
/// A public key that is not 32 bytes is a failed verification, never an
/// error, and the signature check is not attempted.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    if public_key.len() != crypto::PUBLIC_KEY_LEN {
        return false;
    }
    crypto::verify_raw(public_key, message, signature)
}
