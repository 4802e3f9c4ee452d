use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const UNKNOWN_EVENT_TYPE: &str = "unknown_event_type";

/// A tracking event: a flat property bag with a generated identifier.
///
/// The GUID and creation timestamp are also recorded as the `guid` and
/// `timestamp` properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    properties: Map<String, Value>,
    event_type: Option<String>,
    guid: String,
    timestamp: i64,
}

impl TrackingEvent {
    /// Create an event stamped with a fresh GUID and the current time.
    pub fn new() -> Self {
        let guid = generate_guid();
        let timestamp = Utc::now().timestamp();
        let mut event = Self {
            properties: Map::new(),
            event_type: None,
            guid: guid.clone(),
            timestamp,
        };
        event.set("guid", guid).set("timestamp", timestamp);
        event
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Add properties without overwriting those already set.
    pub fn set_new_properties(&mut self, properties: Map<String, Value>) -> &mut Self {
        for (name, value) in properties {
            self.properties.entry(name).or_insert(value);
        }
        self
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// The explicit event type, else the `event_type` property, else
    /// `"unknown_event_type"`.
    pub fn event_type(&self) -> String {
        if let Some(kind) = self.event_type.as_deref().filter(|k| !k.is_empty()) {
            return kind.to_string();
        }
        match self.get("event_type") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => UNKNOWN_EVENT_TYPE.to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn set_event_type(&mut self, value: impl Into<String>) -> &mut Self {
        self.event_type = Some(value.into());
        self
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Creation time in Unix seconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// A fresh GUID, unrelated to this event's own.
    pub fn site_specific_guid(&self) -> String {
        generate_guid()
    }
}

impl Default for TrackingEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// `<unix seconds><6-digit random><first 3 digits of the process id>`.
fn generate_guid() -> String {
    let random: u32 = rand::thread_rng().gen_range(0..=999_999);
    let pid = std::process::id().to_string();
    let server: String = pid.chars().take(3).collect();
    format!("{}{:06}{}", Utc::now().timestamp(), random, server)
}
