//! Input and output records

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One externally supplied event: field name → value, in insertion order.
///
/// Ordering by name only happens when the record is rendered for a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object of event fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            record.insert(key, render_value(value));
        }
        Ok(record)
    }
}

fn render_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Identifier of an analysis unit: a 1-based chunk number or the synthesis pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkId {
    Index(usize),
    Final,
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkId::Index(n) => write!(f, "{n}"),
            ChunkId::Final => f.write_str("FINAL"),
        }
    }
}

/// What came back for one chunk (or the synthesis pass)
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Success { response: String, summary: String },
    Failed { error: String },
}

/// One analysis unit before it is projected into an output record
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub chunk: ChunkId,
    pub event_count: usize,
    pub outcome: ChunkOutcome,
}

impl AnalysisResult {
    pub fn status(&self) -> &'static str {
        match self.outcome {
            ChunkOutcome::Success { .. } => "success",
            ChunkOutcome::Failed { .. } => "error",
        }
    }

    pub fn into_record(self) -> ResultRecord {
        let status = self.status().to_string();
        let (response, summary) = match self.outcome {
            ChunkOutcome::Success { response, summary } => (response, Some(summary)),
            ChunkOutcome::Failed { error } => (error, None),
        };
        ResultRecord {
            time: now_epoch_secs(),
            chunk: self.chunk.to_string(),
            status,
            event_count: self.event_count,
            response,
            summary,
        }
    }
}

/// Output record yielded per chunk and for the synthesis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "llm_chunk")]
    pub chunk: String,
    #[serde(rename = "llm_status")]
    pub status: String,
    #[serde(rename = "llm_event_count")]
    pub event_count: usize,
    #[serde(rename = "llm_response")]
    pub response: String,
    #[serde(rename = "llm_summary", skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
}

/// Emitted when the stream itself cannot continue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFailure {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "llm_error")]
    pub error: String,
    #[serde(rename = "llm_status")]
    pub status: String,
}

impl StreamFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            time: now_epoch_secs(),
            error: error.into(),
            status: "error".to_string(),
        }
    }
}

fn now_epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_keeps_insertion_order() {
        let rec: Record =
            serde_json::from_str(r#"{"zeta":"1","alpha":2,"mid":null,"mv":["a","b"]}"#).unwrap();
        let names: Vec<&str> = rec.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "mv"]);
        assert_eq!(rec.get("alpha"), Some("2"));
        assert_eq!(rec.get("mid"), Some(""));
        assert_eq!(rec.get("mv"), Some(r#"["a","b"]"#));
    }

    #[test]
    fn insert_replaces_in_place() {
        let rec = Record::new().with("a", "1").with("b", "2").with("a", "3");
        assert_eq!(
            rec.iter().collect::<Vec<_>>(),
            vec![("a", "3"), ("b", "2")]
        );
    }

    #[test]
    fn error_record_omits_summary() {
        let rec = AnalysisResult {
            chunk: ChunkId::Index(2),
            event_count: 4,
            outcome: ChunkOutcome::Failed {
                error: "boom".into(),
            },
        }
        .into_record();
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["llm_chunk"], "2");
        assert_eq!(v["llm_status"], "error");
        assert_eq!(v["llm_event_count"], 4);
        assert_eq!(v["llm_response"], "boom");
        assert!(v.get("llm_summary").is_none());
        assert!(v["_time"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn final_chunk_renders_as_text() {
        assert_eq!(ChunkId::Final.to_string(), "FINAL");
        assert_eq!(ChunkId::Index(7).to_string(), "7");
    }
}
