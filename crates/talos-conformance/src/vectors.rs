//! Test vector corpus: the declarative input format of the harness.
//!
//! A corpus file is a JSON object with two arrays, `vectors` (positive cases)
//! and `negative_cases`. Fields inside `inputs` and `expected` are read
//! through typed accessors; a field of the wrong JSON type reads as absent.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use talos_core::{Map, Value};
use thiserror::Error;

/// Whether a vector must succeed or must fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

/// The error a negative vector expects.
///
/// An empty string is the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_contains: Option<String>,
}

impl ExpectedError {
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|s| !s.is_empty())
    }

    pub fn message_contains(&self) -> Option<&str> {
        self.message_contains.as_deref().filter(|s| !s.is_empty())
    }
}

/// A single declarative test vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVector {
    pub test_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Map,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected: Map,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<ExpectedError>,
}

impl TestVector {
    /// Create a vector with empty inputs and expectations.
    pub fn new(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            inputs: Map::new(),
            expected: Map::new(),
            expected_error: None,
        }
    }

    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).and_then(Value::as_str)
    }

    pub fn expected_str(&self, key: &str) -> Option<&str> {
        self.expected.get(key).and_then(Value::as_str)
    }

    pub fn expected_bool(&self, key: &str) -> Option<bool> {
        self.expected.get(key).and_then(Value::as_bool)
    }

    /// Any JSON number, integral or not.
    pub fn expected_f64(&self, key: &str) -> Option<f64> {
        self.expected.get(key).and_then(Value::as_f64)
    }
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors loading a corpus. These are the only fatal errors of a run.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vector file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered set of positive and negative vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorCorpus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vectors: Vec<TestVector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub negative_cases: Vec<TestVector>,
}

impl VectorCorpus {
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CorpusError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Total number of vectors, positive and negative.
    pub fn len(&self) -> usize {
        self.vectors.len() + self.negative_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All vectors in run order: positives, then negatives, each in file order.
    pub fn iter_with_polarity(&self) -> impl Iterator<Item = (Polarity, &TestVector)> {
        let positive = self.vectors.iter().map(|v| (Polarity::Positive, v));
        let negative = self.negative_cases.iter().map(|v| (Polarity::Negative, v));
        positive.chain(negative)
    }
}
