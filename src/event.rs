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

//! The inbound log-event snapshot.
//!
//! [`LogEvent`] is the immutable record the host logging pipeline hands to
//! [`append`](crate::appender::LogSink::append), one per log statement. It carries everything the
//! [`Translator`](crate::translator::Translator) may need: the raw message with its positional
//! arguments, severity, logger & thread names, the MDC (Mapped Diagnostic Context) map, and the
//! optional marker, caller frame & throwable.

use std::collections::HashMap;

use chrono::Utc;

use crate::level::Severity;

/// The source-code location that issued the event, when the pipeline captured one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerFrame {
    pub file_name: String,
    pub method_name: String,
    pub class_name: String,
    pub line: u32,
}

/// An error attached to the event. The stack trace arrives pre-rendered; rendering frames to text
/// is the host pipeline's business, not ours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throwable {
    pub class_name: String,
    pub message: Option<String>,
    pub stack_trace: String,
}

/// One log event, snapshotted by the producing pipeline. Build with [`LogEvent::builder`].
#[derive(Clone, Debug)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub severity: Severity,
    /// The raw message, possibly containing `{}` placeholders for [`args`](Self::args).
    pub message: String,
    pub args: Vec<String>,
    pub logger_name: String,
    pub thread_name: String,
    pub marker: Option<String>,
    /// Per-event diagnostic context. Iteration order is unspecified.
    pub mdc: HashMap<String, String>,
    pub caller: Option<CallerFrame>,
    pub throwable: Option<Throwable>,
}

impl LogEvent {
    pub fn builder<M: Into<String>>(severity: Severity, message: M) -> LogEventBuilder {
        LogEventBuilder {
            imp: LogEvent {
                timestamp_ms: Utc::now().timestamp_millis(),
                severity,
                message: message.into(),
                args: Vec::new(),
                logger_name: String::new(),
                thread_name: std::thread::current().name().unwrap_or_default().to_string(),
                marker: None,
                mdc: HashMap::new(),
                caller: None,
                throwable: None,
            },
        }
    }

    /// The message with each `{}` placeholder replaced by the next positional argument. Surplus
    /// placeholders are left verbatim; surplus arguments are ignored.
    pub fn formatted_message(&self) -> String {
        let mut out = String::with_capacity(self.message.len());
        let mut args = self.args.iter();
        let mut rest = self.message.as_str();
        while let Some(idx) = rest.find("{}") {
            match args.next() {
                Some(arg) => {
                    out.push_str(&rest[..idx]);
                    out.push_str(arg);
                }
                None => out.push_str(&rest[..idx + 2]),
            }
            rest = &rest[idx + 2..];
        }
        out.push_str(rest);
        out
    }

    /// A copy of this event with the throwable removed. The translator renders short_message from
    /// this copy so that no layout, however configured, can leak a stack trace into it.
    pub fn without_throwable(&self) -> LogEvent {
        LogEvent {
            throwable: None,
            ..self.clone()
        }
    }
}

pub struct LogEventBuilder {
    imp: LogEvent,
}

impl LogEventBuilder {
    pub fn timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.imp.timestamp_ms = timestamp_ms;
        self
    }
    pub fn arg<A: Into<String>>(mut self, arg: A) -> Self {
        self.imp.args.push(arg.into());
        self
    }
    pub fn logger_name<N: Into<String>>(mut self, name: N) -> Self {
        self.imp.logger_name = name.into();
        self
    }
    pub fn thread_name<N: Into<String>>(mut self, name: N) -> Self {
        self.imp.thread_name = name.into();
        self
    }
    pub fn marker<N: Into<String>>(mut self, marker: N) -> Self {
        self.imp.marker = Some(marker.into());
        self
    }
    pub fn mdc_entry<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.imp.mdc.insert(key.into(), value.into());
        self
    }
    pub fn caller(mut self, caller: CallerFrame) -> Self {
        self.imp.caller = Some(caller);
        self
    }
    pub fn throwable(mut self, throwable: Throwable) -> Self {
        self.imp.throwable = Some(throwable);
        self
    }
    pub fn build(self) -> LogEvent {
        self.imp
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formatted_message_substitutes_positionally() {
        let event = LogEvent::builder(Severity::Info, "user {} logged in from {}")
            .arg("jane")
            .arg("10.0.0.7")
            .build();
        assert_eq!(event.formatted_message(), "user jane logged in from 10.0.0.7");
    }

    #[test]
    fn formatted_message_leaves_surplus_placeholders() {
        let event = LogEvent::builder(Severity::Info, "{} and {}").arg("one").build();
        assert_eq!(event.formatted_message(), "one and {}");
    }

    #[test]
    fn formatted_message_ignores_surplus_args() {
        let event = LogEvent::builder(Severity::Info, "plain").arg("unused").build();
        assert_eq!(event.formatted_message(), "plain");
    }

    #[test]
    fn without_throwable_redacts_only_the_throwable() {
        let event = LogEvent::builder(Severity::Error, "boom")
            .logger_name("com.example.Service")
            .throwable(Throwable {
                class_name: "RuntimeException".into(),
                message: Some("x".into()),
                stack_trace: "at A\nat B".into(),
            })
            .build();
        let redacted = event.without_throwable();
        assert!(redacted.throwable.is_none());
        assert_eq!(redacted.message, event.message);
        assert_eq!(redacted.logger_name, event.logger_name);
        assert_eq!(redacted.timestamp_ms, event.timestamp_ms);
    }
}
