//! Event sink system for observability.
//!
//! The catalog reports registrations and argument-history changes through an
//! [`EventSink`], so a front end can refresh its views without polling.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

#[cfg(test)]
pub(crate) use sink::MockEventSink;

use chrono::Utc;

/// Builds an event payload, stamping it with the current UTC time.
pub(crate) fn event_data(mut data: serde_json::Value) -> serde_json::Value {
    if let Some(map) = data.as_object_mut() {
        map.insert(
            "timestamp".to_string(),
            serde_json::Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()),
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_data_is_timestamped() {
        let data = event_data(serde_json::json!({"key": "cc"}));
        assert_eq!(data["key"], "cc");
        let ts = data["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }

    #[test]
    fn test_event_data_leaves_non_objects_alone() {
        assert_eq!(event_data(serde_json::json!(3)), serde_json::json!(3));
    }
}
