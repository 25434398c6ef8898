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

//! # General gelf-appender Documentation
//!
//! ## Introduction
//!
//! General (i.e. not documenting a particular struct or a method) documentation goes here.
//!
//! ## From Log Events to GELF Messages
//!
//! The journey from a log event to a Graylog server happens in three steps:
//!
//! 1. snapshotting whatever the host pipeline produces into a [LogEvent]
//! 2. translating that event into a [GelfRecord] (field mapping, enrichment, level mapping)
//! 3. serializing the record to JSON and transporting it to the collector
//!
//! [LogEvent]: crate::event::LogEvent
//! [GelfRecord]: crate::record::GelfRecord
//!
//! ### Snapshotting
//!
//! How events come to exist is the embedding application's business. Applications on the
//! [tracing] ecosystem get step 1 for free via [GelfLayer]; anything else can construct
//! [LogEvent]s with the builder and drive a [LogSink] directly.
//!
//! [tracing]: https://docs.rs/tracing/latest/tracing/index.html
//! [GelfLayer]: crate::layer::GelfLayer
//! [LogSink]: crate::appender::LogSink
//!
//! ### Translation
//!
//! The [Translator] runs synchronously on the logging thread. It is a pure function of the event,
//! the [AppenderConfig] it was built with, and two injected render functions: the layout, which
//! produces `short_message`, and the stack-trace renderer. The layout is always handed a copy of
//! the event with the throwable stripped — `short_message` must never carry a stack trace; that
//! belongs in `full_message`.
//!
//! [Translator]: crate::translator::Translator
//! [AppenderConfig]: crate::config::AppenderConfig
//!
//! ### Transport
//!
//! The [GelfTransport] owns a bounded queue and a background worker, and this queue is the only
//! concurrency boundary in the crate. Callers interact with it exclusively through
//! [try_send], which never blocks: when the collector is slow or down the queue fills and records
//! are dropped, never the application stalled. TCP connections are re-established after failures
//! with a configurable delay; UDP payloads above the safe datagram size go out as standard
//! chunked GELF.
//!
//! [GelfTransport]: crate::transport::GelfTransport
//! [try_send]: crate::transport::GelfTransport::try_send
