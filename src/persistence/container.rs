//! Versioned container codec
//!
//! Persisted settings are wrapped in a container pairing a version tag with
//! an opaque payload. Encoding always writes the current version. Decoding
//! dispatches on the stored version to the decoder registered for it, so
//! data written by older releases stays readable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unreadable settings: unknown version {version} (known: {known:?})")]
    UnknownVersion { version: u32, known: Vec<u32> },

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Untyped container as held by a key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub version: u32,
    pub payload: Vec<u8>,
}

/// A version tag plus an encoded payload of a `T`
pub struct VersionedContainer<T> {
    pub version: u32,
    pub payload: Vec<u8>,
    marker: PhantomData<fn() -> T>,
}

impl<T> VersionedContainer<T> {
    pub fn new(version: u32, payload: Vec<u8>) -> Self {
        Self {
            version,
            payload,
            marker: PhantomData,
        }
    }

    /// Container for a key that has never been written
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn into_entry(self) -> StoredEntry {
        StoredEntry {
            version: self.version,
            payload: self.payload,
        }
    }
}

impl<T> From<StoredEntry> for VersionedContainer<T> {
    fn from(entry: StoredEntry) -> Self {
        Self::new(entry.version, entry.payload)
    }
}

impl<T> Clone for VersionedContainer<T> {
    fn clone(&self) -> Self {
        Self::new(self.version, self.payload.clone())
    }
}

impl<T> fmt::Debug for VersionedContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedContainer")
            .field("version", &self.version)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

type Encoder<T> = fn(&T) -> Result<Vec<u8>, CodecError>;
type Decoder<T> = fn(&[u8]) -> Result<T, CodecError>;

/// Encoder for the current version plus one decoder per known version
pub struct Codec<T> {
    current_version: u32,
    encoder: Encoder<T>,
    decoders: BTreeMap<u32, Decoder<T>>,
}

impl<T: Default> Codec<T> {
    /// Create a codec writing `current_version` with `encoder`.
    ///
    /// The decoder for `current_version` must be registered too.
    pub fn new(current_version: u32, encoder: Encoder<T>) -> Self {
        Self {
            current_version,
            encoder,
            decoders: BTreeMap::new(),
        }
    }

    /// Register the decoder for one historical or current version
    pub fn register(mut self, version: u32, decoder: Decoder<T>) -> Self {
        self.decoders.insert(version, decoder);
        self
    }

    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    pub fn known_versions(&self) -> Vec<u32> {
        self.decoders.keys().copied().collect()
    }

    pub fn encode(&self, value: &T) -> Result<VersionedContainer<T>, CodecError> {
        let payload = (self.encoder)(value)?;
        Ok(VersionedContainer::new(self.current_version, payload))
    }

    /// Decode a container. An empty payload is the default value.
    pub fn decode(&self, container: &VersionedContainer<T>) -> Result<T, CodecError> {
        if container.is_empty() {
            return Ok(T::default());
        }
        let decoder = self
            .decoders
            .get(&container.version)
            .ok_or_else(|| CodecError::UnknownVersion {
                version: container.version,
                known: self.known_versions(),
            })?;
        decoder(&container.payload)
    }
}

/// A type stored through a versioned container
pub trait Persisted: Default + Sized {
    fn codec() -> Codec<Self>;
}

pub fn encode<T: Persisted>(value: &T) -> Result<VersionedContainer<T>, CodecError> {
    T::codec().encode(value)
}

pub fn decode<T: Persisted>(container: &VersionedContainer<T>) -> Result<T, CodecError> {
    T::codec().decode(container)
}

/// Serialize a payload DTO as JSON
pub fn to_payload<D: Serialize>(dto: &D) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(dto).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Parse a JSON payload DTO
pub fn from_payload<'a, D: Deserialize<'a>>(payload: &'a [u8]) -> Result<D, CodecError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        count: u32,
        label: String,
    }

    #[derive(Serialize, Deserialize)]
    struct CounterV1 {
        count: u32,
    }

    #[derive(Serialize, Deserialize)]
    struct CounterV2 {
        count: u32,
        label: String,
    }

    impl Persisted for Counter {
        fn codec() -> Codec<Self> {
            Codec::new(2, |c: &Counter| {
                to_payload(&CounterV2 {
                    count: c.count,
                    label: c.label.clone(),
                })
            })
            .register(1, |bytes| {
                let v1: CounterV1 = from_payload(bytes)?;
                Ok(Counter {
                    count: v1.count,
                    label: "legacy".to_string(),
                })
            })
            .register(2, |bytes| {
                let v2: CounterV2 = from_payload(bytes)?;
                Ok(Counter {
                    count: v2.count,
                    label: v2.label,
                })
            })
        }
    }

    #[test]
    fn test_empty_payload_decodes_to_default() {
        let decoded = decode(&VersionedContainer::<Counter>::empty()).unwrap();
        assert_eq!(decoded, Counter::default());

        // Even an unknown version is fine when there is nothing to read
        let decoded = decode(&VersionedContainer::<Counter>::new(99, Vec::new())).unwrap();
        assert_eq!(decoded, Counter::default());
    }

    #[test]
    fn test_encode_writes_current_version() {
        let value = Counter {
            count: 3,
            label: "x".to_string(),
        };
        let container = encode(&value).unwrap();
        assert_eq!(container.version, 2);
        assert_eq!(decode(&container).unwrap(), value);
    }

    #[test]
    fn test_decode_dispatches_on_version() {
        let payload = serde_json::to_vec(&CounterV1 { count: 7 }).unwrap();
        let decoded = decode(&VersionedContainer::<Counter>::new(1, payload)).unwrap();
        assert_eq!(decoded.count, 7);
        assert_eq!(decoded.label, "legacy");
    }

    #[test]
    fn test_unknown_version_is_an_error() {
        let payload = serde_json::to_vec(&CounterV1 { count: 7 }).unwrap();
        let err = decode(&VersionedContainer::<Counter>::new(3, payload)).unwrap_err();
        match err {
            CodecError::UnknownVersion { version, known } => {
                assert_eq!(version, 3);
                assert_eq!(known, vec![1, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let container = VersionedContainer::<Counter>::new(2, b"not json".to_vec());
        assert!(matches!(decode(&container), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_stored_entry_conversion() {
        let container = VersionedContainer::<Counter>::new(2, vec![1, 2, 3]);
        let entry = container.clone().into_entry();
        let back: VersionedContainer<Counter> = entry.into();
        assert_eq!(back.version, 2);
        assert_eq!(back.payload, vec![1, 2, 3]);
    }
}
