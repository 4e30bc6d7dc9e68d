//! Deterministic JSON-based [`BinaryCodec`].
//!
//! The ledger's own binary format (type-coded fields in canonical field-ID
//! order) is provided by an external codec. This implementation gives the
//! crate a self-contained, deterministic encoding for tests, tooling, and
//! offline fixtures: the JSON object is re-rendered with keys sorted at every
//! depth and no insignificant whitespace, and those UTF-8 bytes are the
//! "canonical bytes". Two JSON texts that differ only in key order or
//! formatting therefore encode identically.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{BinaryCodec, CodecError};

#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalJsonCodec;

impl CanonicalJsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BinaryCodec for CanonicalJsonCodec {
    fn encode(&self, json: &str) -> Result<String, CodecError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| CodecError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(CodecError::Malformed(
                "transaction must be a JSON object".to_string(),
            ));
        }
        let bytes = serde_json::to_vec(&canonicalize(value))
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        Ok(hex::encode_upper(bytes))
    }
}

/// Rebuilds every object with its keys in sorted order. Insertion into the
/// output map happens in sorted order too, so the result is sorted whether
/// or not serde_json is built with `preserve_order`.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            let mut out = Map::new();
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
