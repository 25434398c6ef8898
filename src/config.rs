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

//! Configuration for the translator & transport.
//!
//! Both configuration values are assembled once, before
//! [`GelfAppender::start`](crate::appender::GelfAppender::start), and immutable thereafter; there
//! are no setters visible to a running worker. Live reconfiguration, if an embedding application
//! wants it, is a rebuild-and-swap of the whole appender.

use std::{collections::BTreeMap, time::Duration};

use log::warn;
use serde_json::Value;

use crate::{event::LogEvent, translator::RenderFn};

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 12201;
pub const DEFAULT_QUEUE_SIZE: usize = 512;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Wire protocol used to reach the collector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Udp,
    Tcp,
}

impl Protocol {
    /// Case-insensitive parse. Anything that is not "tcp" or "udp" silently normalizes to UDP,
    /// the safe default; a bad protocol string must not prevent startup.
    pub fn parse(s: &str) -> Protocol {
        if s.eq_ignore_ascii_case("tcp") {
            Protocol::Tcp
        } else {
            Protocol::Udp
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Protocol::parse(s))
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Protocol::Udp => "UDP",
                Protocol::Tcp => "TCP",
            }
        )
    }
}

/// Settings owned by the [`GelfTransport`](crate::transport::GelfTransport).
#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub server: String,
    pub port: u16,
    pub protocol: Protocol,
    /// Capacity of the bounded outbound queue; `try_send` fails once it fills.
    pub queue_size: usize,
    pub connect_timeout: Duration,
    /// Wait between TCP reconnection attempts after a connect or write failure.
    pub reconnect_delay: Duration,
    /// Socket send-buffer size; `None` leaves the OS default.
    pub send_buffer_size: Option<usize>,
    pub tcp_no_delay: bool,
    pub tcp_keep_alive: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            protocol: Protocol::default(),
            queue_size: DEFAULT_QUEUE_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            send_buffer_size: None,
            tcp_no_delay: false,
            tcp_keep_alive: false,
        }
    }
}

impl TransportConfig {
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder {
            imp: TransportConfig::default(),
        }
    }
}

pub struct TransportConfigBuilder {
    imp: TransportConfig,
}

impl TransportConfigBuilder {
    pub fn server<S: Into<String>>(mut self, server: S) -> Self {
        self.imp.server = server.into();
        self
    }
    pub fn port(mut self, port: u16) -> Self {
        self.imp.port = port;
        self
    }
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.imp.protocol = protocol;
        self
    }
    pub fn queue_size(mut self, queue_size: usize) -> Self {
        self.imp.queue_size = queue_size;
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.imp.connect_timeout = connect_timeout;
        self
    }
    pub fn reconnect_delay(mut self, reconnect_delay: Duration) -> Self {
        self.imp.reconnect_delay = reconnect_delay;
        self
    }
    pub fn send_buffer_size(mut self, send_buffer_size: usize) -> Self {
        self.imp.send_buffer_size = Some(send_buffer_size);
        self
    }
    pub fn tcp_no_delay(mut self, tcp_no_delay: bool) -> Self {
        self.imp.tcp_no_delay = tcp_no_delay;
        self
    }
    pub fn tcp_keep_alive(mut self, tcp_keep_alive: bool) -> Self {
        self.imp.tcp_keep_alive = tcp_keep_alive;
        self
    }
    pub fn build(self) -> TransportConfig {
        self.imp
    }
}

/// Settings owned by the [`Translator`](crate::translator::Translator), plus the two pluggable
/// render functions.
pub struct AppenderConfig {
    /// Overrides the machine's resolved host name when set to a non-blank value.
    pub host_name: Option<String>,
    pub include_source: bool,
    pub include_mdc: bool,
    pub include_stack_trace: bool,
    pub include_level_name: bool,
    /// Static fields merged into every record, winning any key collision with per-event fields.
    pub additional_fields: BTreeMap<String, Value>,
    pub(crate) layout: Option<RenderFn>,
    pub(crate) stack_renderer: Option<RenderFn>,
}

impl Default for AppenderConfig {
    fn default() -> Self {
        AppenderConfig {
            host_name: None,
            include_source: true,
            include_mdc: true,
            include_stack_trace: true,
            include_level_name: false,
            additional_fields: BTreeMap::new(),
            layout: None,
            stack_renderer: None,
        }
    }
}

impl std::fmt::Debug for AppenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppenderConfig")
            .field("host_name", &self.host_name)
            .field("include_source", &self.include_source)
            .field("include_mdc", &self.include_mdc)
            .field("include_stack_trace", &self.include_stack_trace)
            .field("include_level_name", &self.include_level_name)
            .field("additional_fields", &self.additional_fields)
            .field("layout", &self.layout.as_ref().map(|_| "<fn>"))
            .field("stack_renderer", &self.stack_renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl AppenderConfig {
    pub fn builder() -> AppenderConfigBuilder {
        AppenderConfigBuilder {
            imp: AppenderConfig::default(),
        }
    }

    /// The `host` value for outgoing records: the configured override when non-blank, otherwise
    /// the local machine's host name, otherwise the literal "localhost".
    pub(crate) fn resolve_host_name(&self) -> String {
        match &self.host_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => host_name_or_fallback(local_host_name()),
        }
    }
}

fn local_host_name() -> Option<String> {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().into_owned())
}

fn host_name_or_fallback(resolved: Option<String>) -> String {
    match resolved {
        Some(name) if !name.is_empty() => name,
        _ => String::from("localhost"),
    }
}

/// Parse a comma-separated `key=value` list into a field map. Malformed entries are logged as
/// warnings and skipped; a bad entry must not abort startup.
pub fn parse_additional_fields(spec: &str) -> BTreeMap<String, Value> {
    let mut fields = BTreeMap::new();
    for entry in spec.split(',') {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                fields.insert(key.trim().to_string(), Value::from(value.trim()));
            }
            _ => warn!("failed to read additional field entry {:?}; skipping", entry),
        }
    }
    fields
}

pub struct AppenderConfigBuilder {
    imp: AppenderConfig,
}

impl AppenderConfigBuilder {
    pub fn host_name<N: Into<String>>(mut self, host_name: N) -> Self {
        self.imp.host_name = Some(host_name.into());
        self
    }
    pub fn include_source(mut self, include_source: bool) -> Self {
        self.imp.include_source = include_source;
        self
    }
    pub fn include_mdc(mut self, include_mdc: bool) -> Self {
        self.imp.include_mdc = include_mdc;
        self
    }
    pub fn include_stack_trace(mut self, include_stack_trace: bool) -> Self {
        self.imp.include_stack_trace = include_stack_trace;
        self
    }
    pub fn include_level_name(mut self, include_level_name: bool) -> Self {
        self.imp.include_level_name = include_level_name;
        self
    }
    /// Add one static additional field.
    pub fn additional_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.imp.additional_fields.insert(key.into(), value.into());
        self
    }
    /// Merge static additional fields from a comma-separated `key=value` list.
    pub fn additional_fields_spec(mut self, spec: &str) -> Self {
        self.imp.additional_fields.extend(parse_additional_fields(spec));
        self
    }
    /// Replace the default layout (the formatted message) with a custom render function. The
    /// function receives a throwable-free copy of the event; see
    /// [`LogEvent::without_throwable`](crate::event::LogEvent::without_throwable).
    pub fn layout<F>(mut self, layout: F) -> Self
    where
        F: Fn(&LogEvent) -> String + Send + Sync + 'static,
    {
        self.imp.layout = Some(Box::new(layout));
        self
    }
    /// Replace the default stack-trace renderer (the throwable's pre-rendered text).
    pub fn stack_renderer<F>(mut self, stack_renderer: F) -> Self
    where
        F: Fn(&LogEvent) -> String + Send + Sync + 'static,
    {
        self.imp.stack_renderer = Some(Box::new(stack_renderer));
        self
    }
    pub fn build(self) -> AppenderConfig {
        self.imp
    }
}
