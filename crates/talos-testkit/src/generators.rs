//! Proptest generators for property-based testing.

use proptest::prelude::*;

use talos_core::{Identity, Keypair, Map, Value};

/// Generate a random 32-byte seed.
pub fn seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

/// Generate an identity from a random seed.
pub fn identity() -> impl Strategy<Value = Identity> {
    seed().prop_map(|seed| Identity::from_keypair(Keypair::from_seed(&seed), None))
}

/// Generate a seed of any length except 32.
pub fn invalid_seed() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..96).prop_filter("seed must not be 32 bytes", |s| {
        s.len() != 32
    })
}

/// Generate a UTF-8 message.
pub fn message() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

/// Generate an object key, including non-ASCII and empty keys.
pub fn key() -> impl Strategy<Value = String> {
    "\\PC{0,8}"
}

/// Generate a finite f64.
pub fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

/// Generate a scalar value.
pub fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        finite_f64().prop_map(Value::from),
        any::<String>().prop_map(Value::from),
    ]
}

/// Generate a nested value tree. Every number is finite, so it always encodes.
pub fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..8).prop_map(Value::Object),
        ]
    })
}

/// Generate the same object entries twice, the second copy shuffled.
pub fn shuffled_entries() -> impl Strategy<Value = (Vec<(String, Value)>, Vec<(String, Value)>)> {
    prop::collection::btree_map(key(), value(), 0..12).prop_flat_map(|map: Map| {
        let entries: Vec<_> = map.into_iter().collect();
        (Just(entries.clone()), Just(entries).prop_shuffle())
    })
}

/// A seed and a message to sign with it.
#[derive(Debug, Clone)]
pub struct SignCase {
    pub seed: [u8; 32],
    pub message: String,
}

impl SignCase {
    pub fn identity(&self) -> Identity {
        Identity::from_keypair(Keypair::from_seed(&self.seed), None)
    }
}

impl Arbitrary for SignCase {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (seed(), message())
            .prop_map(|(seed, message)| SignCase { seed, message })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talos_core::{base58, canonical, parse_did_key, verify, ErrorCode};

    /// Render an object as JSON text with keys in the given order.
    fn object_text(entries: &[(String, Value)]) -> String {
        let fields: Vec<String> = entries
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}:{}",
                    serde_json::to_string(k).unwrap(),
                    canonical::encode_to_string(v).unwrap()
                )
            })
            .collect();
        format!("{{{}}}", fields.join(","))
    }

    proptest! {
        #[test]
        fn test_key_order_does_not_change_encoding((sorted, shuffled) in shuffled_entries()) {
            let a = canonical::parse(object_text(&sorted).as_bytes()).unwrap();
            let b = canonical::parse(object_text(&shuffled).as_bytes()).unwrap();
            prop_assert_eq!(canonical::encode(&a).unwrap(), canonical::encode(&b).unwrap());
            prop_assert_eq!(
                canonical::encode(&Value::object(sorted)).unwrap(),
                canonical::encode(&Value::object(shuffled)).unwrap()
            );
        }

        #[test]
        fn test_encoding_is_idempotent(v in value()) {
            let once = canonical::encode(&v).unwrap();
            let twice = canonical::encode(&canonical::parse(&once).unwrap()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_encoding_has_no_whitespace_outside_strings(v in value()) {
            let text = canonical::encode_to_string(&v).unwrap();
            // Whitespace can only come from string contents, which serde_json
            // escapes except for the literal space.
            prop_assert!(!text.contains('\n'));
            prop_assert!(!text.contains('\t'));
        }

        #[test]
        fn test_derivation_is_deterministic(seed in seed()) {
            let a = Identity::from_seed(&seed, None).unwrap();
            let b = Identity::from_seed(&seed, Some("again")).unwrap();
            prop_assert_eq!(a.public_key(), b.public_key());
            prop_assert_eq!(a.did(), b.did());
            prop_assert_eq!(a.address(), b.address());
        }

        #[test]
        fn test_did_shape(identity in identity()) {
            let did = identity.did();
            prop_assert!(did.starts_with("did:key:z6Mk"));

            let payload = base58::decode(&did["did:key:z".len()..]).unwrap();
            prop_assert_eq!(payload.len(), 34);
            prop_assert_eq!(&payload[..2], &[0xed, 0x01]);
            let public_key = identity.public_key();
            prop_assert_eq!(&payload[2..], public_key.as_bytes());
            prop_assert_eq!(parse_did_key(&did).unwrap(), identity.public_key());

            let address = identity.address();
            prop_assert_eq!(address.len(), 64);
            prop_assert!(address.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }

        #[test]
        fn test_sign_then_verify(case: SignCase) {
            let identity = case.identity();
            let pk = identity.public_key();
            let sig = identity.sign(case.message.as_bytes());
            prop_assert_eq!(sig.as_bytes().len(), 64);
            prop_assert!(verify(pk.as_bytes(), case.message.as_bytes(), sig.as_bytes()));
        }

        #[test]
        fn test_bit_flips_break_verification(
            case: SignCase,
            bit in 0usize..8,
            sig_index in 0usize..64,
        ) {
            let identity = case.identity();
            let pk = identity.public_key();
            let message = case.message.as_bytes();
            let sig = identity.sign(message);

            if !message.is_empty() {
                let mut tampered = message.to_vec();
                let index = sig_index % tampered.len();
                tampered[index] ^= 1 << bit;
                prop_assert!(!verify(pk.as_bytes(), &tampered, sig.as_bytes()));
            }

            let mut bad_sig = *sig.as_bytes();
            bad_sig[sig_index] ^= 1 << bit;
            prop_assert!(!verify(pk.as_bytes(), message, &bad_sig));
        }

        #[test]
        fn test_wrong_key_length_never_verifies(case: SignCase, len in 0usize..64) {
            prop_assume!(len != 32);
            let identity = case.identity();
            let sig = identity.sign(case.message.as_bytes());
            let key = vec![0x5a; len];
            prop_assert!(!verify(&key, case.message.as_bytes(), sig.as_bytes()));
        }

        #[test]
        fn test_invalid_seed_is_invalid_input(seed in invalid_seed()) {
            let err = Identity::from_seed(&seed, None).unwrap_err();
            prop_assert_eq!(err.code(), ErrorCode::InvalidInput);
            prop_assert!(err.message().contains("32"));
        }
    }
}
