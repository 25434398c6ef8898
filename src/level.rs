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

//! Severity level definitions.
//!
//! GELF inherits syslog's eight numeric severities (RFC [5424], 0 "Emergency" through 7 "Debug");
//! [`Level`] models them with their wire values as discriminants. [`Severity`] models the five
//! application-side levels the logging pipeline hands us, and [`gelf_level`] is the fixed, total
//! table mapping one onto the other.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424

type StdResult<T, E> = std::result::Result<T, E>;

/// GELF numeric severity. The enumeration values are the wire values, mirroring the syslog
/// severities defined in `<syslog.h>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// system is unusable
    Emergency = 0,
    /// action must be taken immediately
    Alert = 1,
    /// critical conditions
    Critical = 2,
    /// error conditions
    Error = 3,
    /// warning conditions
    Warning = 4,
    /// normal, but significant condition
    Notice = 5,
    /// informational message
    Informational = 6,
    /// debug-level message
    Debug = 7,
}

impl Level {
    /// The numeric value carried in the GELF `level` field.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::Emergency => "Emergency",
                Level::Alert => "Alert",
                Level::Critical => "Critical",
                Level::Error => "Error",
                Level::Warning => "Warning",
                Level::Notice => "Notice",
                Level::Informational => "Informational",
                Level::Debug => "Debug",
            }
        )
    }
}

/// Application-side severity of a [`LogEvent`](crate::event::LogEvent), ordered from least to most
/// important.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// The textual name used for the `levelName` additional field.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.name())
    }
}

/// The fixed level-mapping table: every application severity maps to exactly one GELF numeric
/// level. TRACE and DEBUG collapse onto GELF's Debug; there is no finer grade on the wire.
pub fn gelf_level(severity: Severity) -> Level {
    match severity {
        Severity::Error => Level::Error,
        Severity::Warn => Level::Warning,
        Severity::Info => Level::Informational,
        Severity::Debug => Level::Debug,
        Severity::Trace => Level::Debug,
    }
}
