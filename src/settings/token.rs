//! Logging session tokens
//!
//! A token marks a logging session started on a group of devices so the
//! session can be found again and downloaded later.

use super::repository::{Entry, Repository};
use crate::persistence::{from_payload, to_payload, Codec, CodecError, Persisted};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Identifies an active logging session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingToken {
    pub id: String,
    pub date: DateTime<Utc>,
    pub name: String,
}

impl LoggingToken {
    /// Token for a session starting now
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: Utc::now(),
            name: name.into(),
        }
    }
}

impl Entry for LoggingToken {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub type LoggingTokenRepository = Repository<LoggingToken>;

impl Repository<LoggingToken> {
    /// Tokens started at or after `since`, sorted by name, then id
    pub fn started_since(&self, since: DateTime<Utc>) -> Vec<LoggingToken> {
        self.select(|token| token.date >= since)
    }
}

// =============================================================================
// Persisted Shapes
// =============================================================================

const CURRENT_VERSION: u32 = 2;

/// Version 1 stored the date as unix seconds
#[derive(Deserialize)]
struct LoggingTokenV1 {
    id: String,
    date: f64,
    name: String,
}

fn encode_tokens(tokens: &Vec<LoggingToken>) -> Result<Vec<u8>, CodecError> {
    to_payload(tokens)
}

fn decode_tokens_v1(bytes: &[u8]) -> Result<Vec<LoggingToken>, CodecError> {
    let stored: Vec<LoggingTokenV1> = from_payload(bytes)?;
    let tokens = stored
        .into_iter()
        .filter_map(|token| {
            let secs = token.date.floor();
            let nanos = ((token.date - secs) * 1e9) as u32;
            match Utc.timestamp_opt(secs as i64, nanos).single() {
                Some(date) => Some(LoggingToken {
                    id: token.id,
                    date,
                    name: token.name,
                }),
                None => {
                    tracing::warn!("Skipping token '{}' with invalid date {}", token.id, token.date);
                    None
                }
            }
        })
        .collect();
    Ok(tokens)
}

impl Persisted for Vec<LoggingToken> {
    fn codec() -> Codec<Self> {
        Codec::new(CURRENT_VERSION, encode_tokens)
            .register(1, decode_tokens_v1)
            .register(CURRENT_VERSION, |bytes| from_payload(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{decode, encode, DualSourceStore, MemoryStore, VersionedContainer};
    use std::sync::Arc;
    use std::time::Duration;

    fn token(id: &str, name: &str, secs: i64) -> LoggingToken {
        LoggingToken {
            id: id.to_string(),
            date: Utc.timestamp_opt(secs, 0).single().unwrap(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_tokens_round_trip() {
        let tokens = vec![token("a1", "Morning run", 1_700_000_000)];
        let container = encode(&tokens).unwrap();
        assert_eq!(container.version, CURRENT_VERSION);
        assert_eq!(decode(&container).unwrap(), tokens);
    }

    #[test]
    fn test_tokens_round_trip_across_dates() {
        let dates = [
            (0, 0),
            (-86_400, 0),
            (1_700_000_000, 1),
            (1_700_000_000, 123_456_789),
            (4_102_444_800, 999_999_999),
        ];
        let tokens: Vec<LoggingToken> = dates
            .iter()
            .enumerate()
            .map(|(i, (secs, nanos))| LoggingToken {
                id: format!("t{}", i),
                date: Utc.timestamp_opt(*secs, *nanos).single().unwrap(),
                name: format!("Session \"{}\" ✓", i),
            })
            .collect();

        let container = encode(&tokens).unwrap();
        assert_eq!(decode(&container).unwrap(), tokens);
    }

    #[test]
    fn test_decodes_unix_seconds() {
        let payload = br#"[
            {"id": "a1", "date": 1700000000.5, "name": "Run"},
            {"id": "bad", "date": 1e300, "name": "Broken"}
        ]"#;
        let container = VersionedContainer::<Vec<LoggingToken>>::new(1, payload.to_vec());
        let tokens = decode(&container).unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, "a1");
        assert_eq!(tokens[0].date.timestamp(), 1_700_000_000);
        assert_eq!(tokens[0].date.timestamp_subsec_millis(), 500);
    }

    #[tokio::test]
    async fn test_started_since() {
        let store = DualSourceStore::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        let repo = LoggingTokenRepository::open(store, "app.loggingTokens", Duration::from_secs(10));

        repo.add(token("old", "Old", 1_000));
        repo.add(token("new", "New", 5_000));
        repo.add(LoggingToken::new("now", "Now"));

        let since = Utc.timestamp_opt(2_000, 0).single().unwrap();
        let ids: Vec<String> = repo.started_since(since).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["new".to_string(), "now".to_string()]);
    }
}
