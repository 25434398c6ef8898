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

//! A log-event shipper for GELF (Graylog Extended Log Format) collectors.
//!
//! This crate receives structured log events from an application's logging pipeline and forwards
//! them, reformatted as GELF messages, to a collector over UDP or TCP. Delivery is best-effort by
//! design: the transport's bounded queue decouples the logging threads from network I/O, and when
//! the collector cannot keep up, events are dropped rather than the application stalled. Nothing
//! in this crate ever propagates a delivery failure back into the caller's logging statement.
//!
//! The pieces, in pipeline order (see the [`_docs`] module for the long-form version):
//!
//! - [`LogEvent`] — the immutable per-statement snapshot handed in by the host pipeline
//! - [`Translator`] — event to [`GelfRecord`], with pluggable layout & stack-trace rendering
//! - [`GelfTransport`] — bounded queue, background worker, UDP chunking & TCP reconnect
//! - [`GelfAppender`] — the above composed behind the one-method [`LogSink`] trait
//! - [`GelfLayer`] — an optional [`tracing-subscriber`] layer feeding any [`LogSink`]
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//!
//! # Examples
//!
//! Ship `tracing` events to a Graylog server listening on UDP port 12201:
//!
//! ```no_run
//! use gelf_appender::{AppenderConfig, GelfAppender, GelfLayer, TransportConfig};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let appender = GelfAppender::start(
//!     AppenderConfig::builder()
//!         .additional_fields_spec("service=checkout,env=prod")
//!         .build(),
//!     TransportConfig::builder().server("graylog.example.com").build(),
//! ).unwrap();
//!
//! let subscriber = tracing_subscriber::registry().with(GelfLayer::new(appender));
//! tracing::subscriber::set_global_default(subscriber).unwrap();
//!
//! tracing::warn!(disk = "/dev/sda1", "running low on space");
//! ```

pub mod _docs;
pub mod appender;
pub mod config;
pub mod error;
pub mod event;
pub mod layer;
pub mod level;
pub mod record;
pub mod translator;
pub mod transport;

pub use appender::{GelfAppender, LogSink};
pub use config::{AppenderConfig, Protocol, TransportConfig};
pub use error::{Error, Result};
pub use event::{CallerFrame, LogEvent, Throwable};
pub use layer::GelfLayer;
pub use level::{gelf_level, Level, Severity};
pub use record::GelfRecord;
pub use translator::Translator;
pub use transport::GelfTransport;
