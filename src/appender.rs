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

//! The appender: translator & transport, composed.
//!
//! [`LogSink`] is the single capability an embedding logging pipeline needs from this crate; no
//! framework base class, just one method invoked per event. [`GelfAppender`] is its production
//! implementation. A delivery failure never disrupts the application: `append` reports problems
//! through the [`log`] crate's side channel and returns.

use log::error;

use crate::{
    config::{AppenderConfig, TransportConfig},
    error::Result,
    event::LogEvent,
    translator::Translator,
    transport::GelfTransport,
};

/// Anything that accepts log events. Implementations must tolerate concurrent callers and must
/// never panic or propagate an error back into the logging pipeline.
pub trait LogSink: Send + Sync {
    fn append(&self, event: &LogEvent);
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn append(&self, event: &LogEvent) {
        (**self).append(event)
    }
}

/// Translates incoming events to GELF records and hands them to the transport.
pub struct GelfAppender {
    translator: Translator,
    transport: GelfTransport,
}

impl GelfAppender {
    /// Resolve the host name, build the translator and start the transport. Both configuration
    /// values are frozen here; reconfiguring means building a new appender.
    pub fn start(appender: AppenderConfig, transport: TransportConfig) -> Result<GelfAppender> {
        let host = appender.resolve_host_name();
        let translator = Translator::new(appender, host);
        let transport = GelfTransport::start(transport)?;
        Ok(GelfAppender {
            translator,
            transport,
        })
    }

    /// Start with default configuration on both sides: UDP to localhost:12201.
    pub fn try_default() -> Result<GelfAppender> {
        GelfAppender::start(AppenderConfig::default(), TransportConfig::default())
    }

    /// Stop the transport, draining queued records on a best-effort basis. Idempotent; also runs
    /// on drop.
    pub fn stop(&mut self) {
        self.transport.stop();
    }
}

impl LogSink for GelfAppender {
    fn append(&self, event: &LogEvent) {
        let record = self.translator.translate(event);
        if !self.transport.try_send(record) {
            error!("failed to write log event to the GELF server using try_send");
        }
    }
}
