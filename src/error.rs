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

//! [gelf-appender](crate) errors

use backtrace::Backtrace;

/// [gelf-appender](crate) error type
///
/// [gelf-appender](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of a
/// straightforward enumeration with a few match arms chosen on the basis of what the caller will
/// need to respond. Note that these errors can only arise during startup; once the transport is
/// running, delivery failures degrade to backpressure (`try_send` returning `false`) and are never
/// surfaced through this type.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
#[non_exhaustive]
pub enum Error {
    /// The configured server name could not be resolved at all
    Resolve {
        server: String,
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// The configured server name resolved to an empty address set
    NoAddress {
        server: String,
        port: u16,
        back: Backtrace,
    },
    /// Failed to open or configure the local socket
    Socket {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// Failed to spawn the transport worker thread
    Spawn {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Resolve {
                server,
                port,
                source,
                ..
            } => {
                write!(f, "While resolving {}:{}, got {}", server, port, source)
            }
            Error::NoAddress { server, port, .. } => {
                write!(f, "{}:{} resolved to no usable address", server, port)
            }
            Error::Socket { source, .. } => {
                write!(f, "While opening the GELF socket, got {}", source)
            }
            Error::Spawn { source, .. } => {
                write!(f, "While spawning the GELF transport worker, got {}", source)
            }
            _ => write!(f, "gelf-appender error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Resolve { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::NoAddress { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::Socket { back, .. } => write!(f, "{}\n{:#?}", self, back),
            Error::Spawn { back, .. } => write!(f, "{}\n{:#?}", self, back),
            _ => write!(f, "{}", self),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
