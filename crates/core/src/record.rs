//! Record trait: how a domain value is laid out as ledger bytes.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DomainError, DomainResult};

/// A value persisted under a single ledger key.
///
/// The default encoding is field-named JSON, so stored bytes can be handed to
/// external callers (e.g. through `read`) without re-interpretation. Records
/// with a different layout override `encode`/`decode`.
pub trait Record: Serialize + DeserializeOwned + Clone + core::fmt::Debug {
    /// Short kind name used in error messages (e.g. "product").
    const KIND: &'static str;

    fn encode(&self) -> DomainResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| DomainError::malformed(format!("{}: encoding failed: {e}", Self::KIND)))
    }

    fn decode(bytes: &[u8]) -> DomainResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DomainError::malformed(format!("{}: {e}", Self::KIND)))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u64,
    }

    impl Record for Sample {
        const KIND: &'static str = "sample";
    }

    #[test]
    fn default_encoding_is_field_named_json() {
        let bytes = Sample { name: "a".into(), count: 3 }.encode().unwrap();
        assert_eq!(bytes, br#"{"name":"a","count":3}"#);
    }

    #[test]
    fn decode_rejects_garbage_with_kind_in_message() {
        let err = Sample::decode(b"not json").unwrap_err();
        match err {
            DomainError::MalformedRecord(msg) => assert!(msg.starts_with("sample:")),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }
}
