//! Golden test vectors for cross-SDK verification.
//!
//! The expected values are fixed constants, not recomputed, so a regression in
//! derivation, DID formatting or signing shows up as a mismatch. The first two
//! seeds are RFC 8032 §7.1 TEST 1 and TEST 2.

use talos_conformance::{TestVector, VectorCorpus};
use talos_core::Identity;

use crate::fixtures::{invalid_seed_vector, TestFixture};

/// A golden identity vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub seed_hex: &'static str,
    pub message: &'static str,
    pub public_key_hex: &'static str,
    pub did: &'static str,
    /// Hex SHA-256 of the public key.
    pub address: &'static str,
    pub signature_base64url: &'static str,
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "rfc8032_test1",
            seed_hex: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
            message: "",
            public_key_hex: "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
            did: "did:key:z6MktwupdmLXVVqTzCw4i46r4uGyosGXRnR3XjN4Zq7oMMsw",
            address: "21fe31dfa154a261626bf854046fd2271b7bed4b6abe45aa58877ef47f9721b9",
            signature_base64url: "5VZDAMNgrHKQhuLMgG6CioSHfx645dl02HPgZSJJAVVfuIIVkKM7rMYeOXAc-bRr0lv18FlbviRlUUFDjnoQCw",
        },
        GoldenVector {
            name: "rfc8032_test2",
            seed_hex: "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb",
            message: "r",
            public_key_hex: "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c",
            did: "did:key:z6MkiaMbhXHNA4eJVCCj8dbzKzTgYDKf6crKgHVHid1F1WCT",
            address: "39f713d0a644253f04529421b9f51b9b08979d08295959c4f3990ee617f5139f",
            signature_base64url: "kqAJqfDUyrhyDoILX2QlQKKye1QWUD-Ps3YiI-vbadoIWsHkPhWZbkWPNhPQ8R2MOHsurrQwKu6wDSkWErsMAA",
        },
        GoldenVector {
            name: "zero_seed",
            seed_hex: "0000000000000000000000000000000000000000000000000000000000000000",
            message: "hello world",
            public_key_hex: "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29",
            did: "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp",
            address: "139e3940e64b5491722088d9a0d741628fc826e09475d341a780acde3c4b8070",
            signature_base64url: "sLR3gPCWrmC__42OexnDazIa5uacypcvL_mH7zDyDSl3S1O65ARIXEOR3fGz83qqipdH-YTrCIToqlMzhuczBQ",
        },
        GoldenVector {
            name: "seed_0x42",
            seed_hex: "4242424242424242424242424242424242424242424242424242424242424242",
            message: "talos conformance",
            public_key_hex: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
            did: "did:key:z6MkghLt1e8m1fmANsdJJco3aCLV8Xnigr5UWwC3u5iZFPd3",
            address: "3097e2dee2cb4a34b53840cdb705aed71067c36f68db0e0f559c3f3fa043315f",
            signature_base64url: "N2H9gx0ZgIAcDaCxl-cOYsUHoUwex8_lWUoUacPL7vqlG794AMbhUWgOCz4Bl4rb_NN2SOdWZMDkFE5V7nDfBg",
        },
    ]
}

impl GoldenVector {
    /// Signing vector carrying the golden constants as expectations.
    pub fn sign_vector(&self) -> TestVector {
        let mut v = TestVector::new(format!("sign_{}", self.name));
        v.inputs.insert("seed_hex".into(), self.seed_hex.into());
        v.inputs.insert("message_utf8".into(), self.message.into());
        v.expected.insert("did".into(), self.did.into());
        v.expected
            .insert("signature_base64url".into(), self.signature_base64url.into());
        v.expected.insert("signature_length".into(), 64u64.into());
        v.expected.insert("verify".into(), true.into());
        v
    }

    /// Verification vector using the golden public key.
    pub fn verify_vector(&self) -> TestVector {
        let mut v = TestVector::new(format!("verify_{}", self.name));
        v.inputs
            .insert("public_key_hex".into(), self.public_key_hex.into());
        v.inputs.insert("message_utf8".into(), self.message.into());
        v.inputs
            .insert("signature_base64url".into(), self.signature_base64url.into());
        v.expected.insert("verify".into(), true.into());
        v
    }

    fn fixture(&self) -> Option<TestFixture> {
        let seed: [u8; 32] = hex::decode(self.seed_hex).ok()?.try_into().ok()?;
        Some(TestFixture::with_seed(seed))
    }
}

/// The built-in corpus: every golden vector signed and verified, plus
/// tampered-message, wrong-key and bad-seed negatives.
pub fn golden_corpus() -> VectorCorpus {
    let golden = all_vectors();
    let fixtures: Vec<TestFixture> = golden.iter().filter_map(GoldenVector::fixture).collect();

    let mut corpus = VectorCorpus::default();
    for vector in &golden {
        corpus.vectors.push(vector.sign_vector());
        corpus.vectors.push(vector.verify_vector());
    }

    for (i, fixture) in fixtures.iter().enumerate() {
        let name = golden[i].name;
        let message = golden[i].message;
        corpus.negative_cases.push(fixture.tampered_vector(
            &format!("verify_tampered_{name}"),
            message,
            &format!("{message}!"),
        ));
        let other = &fixtures[(i + 1) % fixtures.len()];
        corpus.negative_cases.push(fixture.wrong_key_vector(
            &format!("verify_wrong_key_{name}"),
            message,
            other,
        ));
    }

    for len in [1, 16, 31, 33, 64] {
        corpus
            .negative_cases
            .push(invalid_seed_vector(&format!("invalid_seed_{len}_bytes"), len));
    }
    corpus
}

/// Recompute every golden vector.
///
/// Returns `(name, matches, computed did)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = hex::decode(v.seed_hex)
                .ok()
                .and_then(|seed| Identity::from_seed(&seed, None).ok());
            match computed {
                Some(identity) => {
                    let did = identity.did();
                    let matches = did == v.did
                        && identity.address() == v.address
                        && identity.public_key().to_hex() == v.public_key_hex
                        && identity.sign(v.message.as_bytes()).to_base64url()
                            == v.signature_base64url;
                    (v.name.to_string(), matches, did)
                }
                None => (v.name.to_string(), false, String::new()),
            }
        })
        .collect()
}
