//! Volatile key/value store backing the `memory` tool
//!
//! Lives for the process and is discarded on exit; `persist` only reports
//! the entry count and a timestamp and writes nothing durable. The server
//! handles one request at a time, so there is no interior locking.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Maximum number of entries returned by a single search.
const SEARCH_LIMIT: usize = 10;

/// Result of a `get`: a miss is an explicit indicator, never an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GetResult {
    pub key: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub key: String,
    pub value: Value,
}

/// Result of a `search`: `matches` is the true total before truncation,
/// `results` holds at most [`SEARCH_LIMIT`] hits.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub matches: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Default)]
pub struct StateStore {
    entries: HashMap<String, Value>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> GetResult {
        match self.entries.get(key) {
            Some(value) => GetResult {
                key: key.to_string(),
                found: true,
                value: Some(value.clone()),
            },
            None => GetResult {
                key: key.to_string(),
                found: false,
                value: None,
            },
        }
    }

    /// Unconditional upsert; returns the entry count after the write.
    pub fn set(&mut self, key: &str, value: Value) -> usize {
        self.entries.insert(key.to_string(), value);
        self.entries.len()
    }

    /// Substring search over keys and serialized values.
    pub fn search(&self, query: &str) -> SearchResult {
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter(|(key, value)| {
                key.contains(query) || value.to_string().contains(query)
            })
            .map(|(key, value)| SearchHit {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        hits.sort_by(|a, b| a.key.cmp(&b.key));

        let matches = hits.len();
        hits.truncate(SEARCH_LIMIT);

        SearchResult {
            query: query.to_string(),
            matches,
            results: hits,
        }
    }

    /// Reports the current size; durability is not implemented.
    pub fn persist(&self) -> Value {
        serde_json::json!({
            "entries": self.entries.len(),
            "timestamp": Utc::now().to_rfc3339(),
            "durable": false,
        })
    }
}
