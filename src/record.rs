// Copyright (C) 2025-2026 the gelf-appender authors
//
// This file is part of gelf-appender.
//
// gelf-appender is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// gelf-appender is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with gelf-appender.  If
// not, see <http://www.gnu.org/licenses/>.

//! The GELF message record and its wire encoding.
//!
//! [`GelfRecord`] is the output of the [`Translator`](crate::translator::Translator) and the input
//! to the [`GelfTransport`](crate::transport::GelfTransport). The underscore prefix GELF requires
//! on user-defined fields is applied here, at serialization time; the `additional` map itself
//! carries bare keys.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::level::Level;

/// The GELF payload format version this crate emits.
pub const GELF_VERSION: &str = "1.1";

// Reserved field names user fields may never shadow; `_id` is rejected by Graylog outright.
const RESERVED: [&str; 1] = ["id"];

/// One GELF message, ready for serialization. Constructed per event and discarded once on the
/// wire; the transport does not retain it beyond its queue.
#[derive(Clone, Debug)]
pub struct GelfRecord {
    /// Concise summary. Never contains a stack trace; that lives in `full_message`.
    pub short_message: String,
    pub full_message: Option<String>,
    /// Seconds since the Unix epoch, with fractional milliseconds.
    pub timestamp: f64,
    pub level: Level,
    pub host: String,
    /// User-defined fields, serialized with a `_` prefix per GELF convention.
    pub additional: BTreeMap<String, Value>,
}

impl GelfRecord {
    /// The record as a GELF 1.1 JSON object.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("version".into(), Value::from(GELF_VERSION));
        map.insert("host".into(), Value::from(self.host.as_str()));
        map.insert(
            "short_message".into(),
            Value::from(self.short_message.as_str()),
        );
        if let Some(full) = &self.full_message {
            map.insert("full_message".into(), Value::from(full.as_str()));
        }
        map.insert("timestamp".into(), Value::from(self.timestamp));
        map.insert("level".into(), Value::from(self.level.code()));
        for (key, value) in &self.additional {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            let wire_key = if key.starts_with('_') {
                key.clone()
            } else {
                format!("_{}", key)
            };
            map.insert(wire_key, value.clone());
        }
        Value::Object(map)
    }

    /// Serialize to the JSON payload sent on the wire.
    pub fn to_wire(&self) -> Vec<u8> {
        // A Value assembled from strings & numbers cannot fail to serialize.
        serde_json::to_vec(&self.to_json()).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record() -> GelfRecord {
        let mut additional = BTreeMap::new();
        additional.insert("loggerName".to_string(), Value::from("com.example.Service"));
        additional.insert("requestId".to_string(), Value::from("abc-123"));
        GelfRecord {
            short_message: "boom".into(),
            full_message: Some("boom\n\nat A\nat B".into()),
            timestamp: 1700000000.123,
            level: Level::Error,
            host: "app-01".into(),
            additional,
        }
    }

    #[test]
    fn wire_format_fields() {
        let json = record().to_json();
        assert_eq!(json["version"], "1.1");
        assert_eq!(json["host"], "app-01");
        assert_eq!(json["short_message"], "boom");
        assert_eq!(json["full_message"], "boom\n\nat A\nat B");
        assert_eq!(json["timestamp"], 1700000000.123);
        assert_eq!(json["level"], 3);
        assert_eq!(json["_loggerName"], "com.example.Service");
        assert_eq!(json["_requestId"], "abc-123");
        // Bare keys must not leak onto the wire.
        assert!(json.get("loggerName").is_none());
    }

    #[test]
    fn full_message_is_optional() {
        let mut rec = record();
        rec.full_message = None;
        assert!(rec.to_json().get("full_message").is_none());
    }

    #[test]
    fn reserved_id_field_is_dropped() {
        let mut rec = record();
        rec.additional.insert("id".to_string(), Value::from("nope"));
        let json = rec.to_json();
        assert!(json.get("_id").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn preprefixed_keys_are_not_doubled() {
        let mut rec = record();
        rec.additional
            .insert("_already".to_string(), Value::from("kept"));
        let json = rec.to_json();
        assert_eq!(json["_already"], "kept");
        assert!(json.get("__already").is_none());
    }

    #[test]
    fn wire_bytes_parse_back() {
        let bytes = record().to_wire();
        let decoded: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded["level"], 3);
        assert_eq!(decoded["timestamp"], 1700000000.123);
    }
}
