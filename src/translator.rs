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

//! Translation from [`LogEvent`]s to [`GelfRecord`]s.
//!
//! [`Translator::translate`] is a pure function of the event, the configuration it was built with,
//! and two injected render functions: the layout (event to short_message text) and the stack-trace
//! renderer. It runs synchronously on the logging thread and never fails: absent caller data or
//! throwables simply leave the corresponding fields out.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    config::AppenderConfig,
    event::LogEvent,
    level::gelf_level,
    record::GelfRecord,
};

/// A pluggable render function: event in, text out.
pub type RenderFn = Box<dyn Fn(&LogEvent) -> String + Send + Sync>;

/// Builds one [`GelfRecord`] per incoming [`LogEvent`].
pub struct Translator {
    config: AppenderConfig,
    host: String,
    render: RenderFn,
    render_stack_trace: RenderFn,
}

fn default_layout(event: &LogEvent) -> String {
    event.formatted_message()
}

fn default_stack_trace(event: &LogEvent) -> String {
    event
        .throwable
        .as_ref()
        .map(|thrown| thrown.stack_trace.clone())
        .unwrap_or_default()
}

impl Translator {
    /// Build a translator from its configuration and the resolved `host` value. Render functions
    /// left unset in the configuration fall back to the defaults: the formatted message, and the
    /// throwable's pre-rendered stack text.
    pub fn new(mut config: AppenderConfig, host: String) -> Translator {
        let render = config
            .layout
            .take()
            .unwrap_or_else(|| Box::new(default_layout));
        let render_stack_trace = config
            .stack_renderer
            .take()
            .unwrap_or_else(|| Box::new(default_stack_trace));
        Translator {
            config,
            host,
            render,
            render_stack_trace,
        }
    }

    pub fn translate(&self, event: &LogEvent) -> GelfRecord {
        // The layout renders a copy of the event with the throwable stripped, so short_message
        // stays free of stack traces no matter how the layout is configured.
        let short_message = (self.render)(&event.without_throwable());
        let formatted = event.formatted_message();

        let mut additional: BTreeMap<String, Value> = BTreeMap::new();
        additional.insert("loggerName".into(), Value::from(event.logger_name.as_str()));
        additional.insert("threadName".into(), Value::from(event.thread_name.as_str()));

        if let Some(marker) = &event.marker {
            additional.insert("marker".into(), Value::from(marker.as_str()));
        }

        if self.config.include_mdc {
            // MDC entries may overwrite the fixed fields above; last write wins, and the map's
            // iteration order is deliberately unspecified.
            for (key, value) in &event.mdc {
                additional.insert(key.clone(), Value::from(value.as_str()));
            }
        }

        if self.config.include_source {
            if let Some(caller) = &event.caller {
                additional.insert("sourceFileName".into(), Value::from(caller.file_name.as_str()));
                additional.insert(
                    "sourceMethodName".into(),
                    Value::from(caller.method_name.as_str()),
                );
                additional.insert(
                    "sourceClassName".into(),
                    Value::from(caller.class_name.as_str()),
                );
                additional.insert("sourceLineNumber".into(), Value::from(caller.line));
            }
        }

        let full_message = match &event.throwable {
            Some(thrown) if self.config.include_stack_trace => {
                let stack = (self.render_stack_trace)(event);
                additional.insert("exceptionClass".into(), Value::from(thrown.class_name.as_str()));
                if let Some(message) = &thrown.message {
                    additional.insert("exceptionMessage".into(), Value::from(message.as_str()));
                }
                additional.insert("exceptionStackTrace".into(), Value::from(stack.as_str()));
                format!("{}\n\n{}", formatted, stack)
            }
            _ => formatted,
        };

        if self.config.include_level_name {
            additional.insert("levelName".into(), Value::from(event.severity.name()));
        }

        // Static configuration merges last and wins every collision with per-event fields.
        for (key, value) in &self.config.additional_fields {
            additional.insert(key.clone(), value.clone());
        }

        GelfRecord {
            short_message,
            full_message: Some(full_message),
            timestamp: event.timestamp_ms as f64 / 1000.0,
            level: gelf_level(event.severity),
            host: self.host.clone(),
            additional,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        event::{CallerFrame, Throwable},
        level::{Level, Severity},
    };

    fn throwable() -> Throwable {
        Throwable {
            class_name: "RuntimeException".into(),
            message: Some("x".into()),
            stack_trace: "at A\nat B".into(),
        }
    }

    fn translator(config: AppenderConfig) -> Translator {
        Translator::new(config, "app-01".into())
    }

    #[test]
    fn error_with_throwable_scenario() {
        let event = LogEvent::builder(Severity::Error, "boom")
            .logger_name("com.example.Service")
            .thread_name("worker-1")
            .throwable(throwable())
            .build();
        let record = translator(AppenderConfig::default()).translate(&event);

        assert_eq!(record.short_message, "boom");
        assert_eq!(record.full_message.as_deref(), Some("boom\n\nat A\nat B"));
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.additional["exceptionClass"], "RuntimeException");
        assert_eq!(record.additional["exceptionMessage"], "x");
        assert_eq!(record.additional["exceptionStackTrace"], "at A\nat B");
    }

    #[test]
    fn short_message_never_contains_the_stack_trace() {
        // A layout that would happily print the stack trace if it saw one; the translator must
        // hand it a throwable-free copy.
        let config = AppenderConfig::builder()
            .layout(|event: &LogEvent| {
                let mut out = event.formatted_message();
                if let Some(thrown) = &event.throwable {
                    out.push('\n');
                    out.push_str(&thrown.stack_trace);
                }
                out
            })
            .build();
        let event = LogEvent::builder(Severity::Error, "boom")
            .throwable(throwable())
            .build();
        let record = translator(config).translate(&event);
        assert!(!record.short_message.contains("at A"));
        assert!(record.full_message.unwrap().contains("at A"));
    }

    #[test]
    fn no_throwable_full_message_is_the_formatted_message() {
        let event = LogEvent::builder(Severity::Info, "user {} logged in")
            .arg("jane")
            .build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(record.short_message, "user jane logged in");
        assert_eq!(record.full_message.as_deref(), Some("user jane logged in"));
        assert!(record.additional.get("exceptionClass").is_none());
    }

    #[test]
    fn include_stack_trace_off_keeps_exception_fields_out() {
        let config = AppenderConfig::builder().include_stack_trace(false).build();
        let event = LogEvent::builder(Severity::Error, "boom")
            .throwable(throwable())
            .build();
        let record = translator(config).translate(&event);
        assert_eq!(record.full_message.as_deref(), Some("boom"));
        assert!(record.additional.get("exceptionClass").is_none());
        assert!(record.additional.get("exceptionStackTrace").is_none());
    }

    #[test]
    fn timestamp_is_milliseconds_over_one_thousand() {
        let event = LogEvent::builder(Severity::Info, "tick")
            .timestamp_ms(1700000000123)
            .build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(record.timestamp, 1700000000123_f64 / 1000.0);
    }

    #[test]
    fn fixed_fields_are_always_present() {
        let event = LogEvent::builder(Severity::Info, "hi")
            .logger_name("com.example.Service")
            .thread_name("main")
            .marker("AUDIT")
            .build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(record.additional["loggerName"], "com.example.Service");
        assert_eq!(record.additional["threadName"], "main");
        assert_eq!(record.additional["marker"], "AUDIT");
        assert_eq!(record.host, "app-01");
    }

    #[test]
    fn mdc_flag_gates_mdc_fields() {
        let event = LogEvent::builder(Severity::Info, "hi")
            .mdc_entry("requestId", "abc-123")
            .mdc_entry("tenant", "acme")
            .build();

        let with = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(with.additional["requestId"], "abc-123");
        assert_eq!(with.additional["tenant"], "acme");

        let config = AppenderConfig::builder().include_mdc(false).build();
        let without = translator(config).translate(&event);
        assert!(without.additional.get("requestId").is_none());
        assert!(without.additional.get("tenant").is_none());
    }

    #[test]
    fn source_fields_follow_the_flag_and_the_frame() {
        let frame = CallerFrame {
            file_name: "Service.java".into(),
            method_name: "handle".into(),
            class_name: "com.example.Service".into(),
            line: 42,
        };
        let event = LogEvent::builder(Severity::Info, "hi").caller(frame).build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(record.additional["sourceFileName"], "Service.java");
        assert_eq!(record.additional["sourceMethodName"], "handle");
        assert_eq!(record.additional["sourceClassName"], "com.example.Service");
        assert_eq!(record.additional["sourceLineNumber"], 42);

        let config = AppenderConfig::builder().include_source(false).build();
        let record = translator(config).translate(&event);
        assert!(record.additional.get("sourceFileName").is_none());

        // No frame captured: fields simply absent, no error.
        let bare = LogEvent::builder(Severity::Info, "hi").build();
        let record = translator(AppenderConfig::default()).translate(&bare);
        assert!(record.additional.get("sourceLineNumber").is_none());
    }

    #[test]
    fn level_name_is_opt_in() {
        let event = LogEvent::builder(Severity::Warn, "hi").build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert!(record.additional.get("levelName").is_none());

        let config = AppenderConfig::builder().include_level_name(true).build();
        let record = translator(config).translate(&event);
        assert_eq!(record.additional["levelName"], "WARN");
    }

    #[test]
    fn static_fields_override_per_event_fields() {
        let config = AppenderConfig::builder()
            .additional_field("loggerName", "configured-logger")
            .additional_field("env", "prod")
            .build();
        let event = LogEvent::builder(Severity::Info, "hi")
            .logger_name("com.example.Service")
            .mdc_entry("env", "event-says-dev")
            .build();
        let record = translator(config).translate(&event);
        assert_eq!(record.additional["loggerName"], "configured-logger");
        assert_eq!(record.additional["env"], "prod");
    }

    #[test]
    fn mdc_overwrites_fixed_fields_last_write_wins() {
        let event = LogEvent::builder(Severity::Info, "hi")
            .thread_name("real-thread")
            .mdc_entry("threadName", "from-mdc")
            .build();
        let record = translator(AppenderConfig::default()).translate(&event);
        assert_eq!(record.additional["threadName"], "from-mdc");
    }

    #[test]
    fn level_mapping_through_translate() {
        for (severity, code) in [
            (Severity::Error, 3),
            (Severity::Warn, 4),
            (Severity::Info, 6),
            (Severity::Debug, 7),
            (Severity::Trace, 7),
        ] {
            let event = LogEvent::builder(severity, "hi").build();
            let record = translator(AppenderConfig::default()).translate(&event);
            assert_eq!(record.level.code(), code);
        }
    }
}
