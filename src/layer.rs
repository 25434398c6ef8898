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

//! [gelf-appender](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! [`GelfLayer`] adapts the [`tracing`] ecosystem to any [`LogSink`]: each tracing [`Event`] is
//! snapshotted into a [`LogEvent`] (the `message` field becomes the message, every other field
//! becomes an MDC entry, callsite metadata becomes the caller frame) and appended. Applications
//! that do not use `tracing` can skip this module entirely and drive a [`LogSink`] themselves.
//!
//! [`Event`]: https://docs.rs/tracing/latest/tracing/struct.Event.html

use tracing::Event;
use tracing_subscriber::layer::Context;

use crate::{
    appender::LogSink,
    event::{CallerFrame, LogEvent},
    level::Severity,
};

/// Maps `tracing`'s five verbosity levels onto application severities one-for-one.
fn severity_for(level: &tracing::Level) -> Severity {
    match *level {
        tracing::Level::ERROR => Severity::Error,
        tracing::Level::WARN => Severity::Warn,
        tracing::Level::INFO => Severity::Info,
        tracing::Level::DEBUG => Severity::Debug,
        tracing::Level::TRACE => Severity::Trace,
    }
}

/// A [`tracing_subscriber::layer::Layer`] that feeds a [`LogSink`].
pub struct GelfLayer<K> {
    sink: K,
}

impl<K: LogSink> GelfLayer<K> {
    pub fn new(sink: K) -> GelfLayer<K> {
        GelfLayer { sink }
    }
}

struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            // The tracing macros pre-format the message field into a `std::fmt::Arguments`, which
            // debug-prints without enclosing quotes.
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

impl<S, K> tracing_subscriber::layer::Layer<S> for GelfLayer<K>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    K: LogSink + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor {
            message: None,
            fields: Vec::new(),
        };
        event.record(&mut visitor);
        // An event without a message field has nothing to ship.
        let Some(message) = visitor.message else {
            return;
        };

        let meta = event.metadata();
        let mut builder = LogEvent::builder(severity_for(meta.level()), message)
            .logger_name(meta.target());
        for (key, value) in visitor.fields {
            builder = builder.mdc_entry(key, value);
        }
        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            builder = builder.caller(CallerFrame {
                file_name: file.to_string(),
                method_name: meta.module_path().unwrap_or_default().to_string(),
                class_name: meta.target().to_string(),
                line,
            });
        }
        self.sink.append(&builder.build());
    }
}
