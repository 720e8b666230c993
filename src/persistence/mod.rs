//! Settings persistence
//!
//! Versioned containers, the codecs that read and write them, and the
//! local/remote key-value stores they are kept in.

pub mod container;
pub mod dto;
pub mod store;

pub use container::{
    decode, encode, from_payload, to_payload, Codec, CodecError, Persisted, StoredEntry,
    VersionedContainer,
};
pub use dto::{LegacyParametersDto, UserParametersDto};
pub use store::{DualSourceStore, FileStore, KeyValueStore, MemoryStore, SettingsError, StoreError};
