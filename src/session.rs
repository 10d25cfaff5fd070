//! Session-scoped aggregation of records for the aggregate JSON mode.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{LogRecord, Result};

/// All records written during a logger's lifetime, keyed by session id.
///
/// A logger creates exactly one session; the persisted document is always the
/// whole map, so the file stays a complete JSON document after every write.
#[derive(Debug)]
pub struct SessionAggregator {
    id: String,
    sessions: BTreeMap<String, Vec<LogRecord>>,
}

impl SessionAggregator {
    /// Start a session with a fresh random id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut sessions = BTreeMap::new();
        sessions.insert(id.clone(), Vec::new());
        Self { id, sessions }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a record to the current session.
    pub fn push(&mut self, record: LogRecord) {
        self.sessions.entry(self.id.clone()).or_default().push(record);
    }

    /// Records of the current session in write order.
    pub fn records(&self) -> &[LogRecord] {
        self.sessions.get(&self.id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Pretty-printed `{session_id: [record, ...]}` document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.sessions)?)
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallSite, Level};
    use serde_json::json;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(
            String::new(),
            Level::Info,
            CallSite::new("src/lib.rs", "lib", 1),
            json!(message),
        )
    }

    #[test]
    fn test_new_session_has_uuid() {
        let session = SessionAggregator::new();
        assert!(Uuid::parse_str(session.id()).is_ok());
        assert!(session.is_empty());
        assert_ne!(session.id(), SessionAggregator::new().id());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut session = SessionAggregator::with_id("s1");
        for m in ["a", "b", "c"] {
            session.push(record(m));
        }
        let messages: Vec<String> = session.records().iter().map(|r| r.message_text()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_to_json_round_trip() {
        let mut session = SessionAggregator::with_id("s1");
        session.push(record("first"));
        session.push(record("second"));

        let bytes = session.to_json().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains('\n'), "document should be pretty-printed");

        let parsed: BTreeMap<String, Vec<LogRecord>> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["s1"], session.records());
    }

    #[test]
    fn test_empty_session_document() {
        let session = SessionAggregator::with_id("empty");
        let parsed: serde_json::Value = serde_json::from_slice(&session.to_json().unwrap()).unwrap();
        assert_eq!(parsed, json!({"empty": []}));
    }
}
