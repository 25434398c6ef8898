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

//! The GELF transport layer.
//!
//! [`GelfTransport`] owns a bounded outbound queue and one background worker that drains it onto a
//! UDP or TCP socket. [`try_send`](GelfTransport::try_send) is the only operation callers invoke
//! concurrently, and it never blocks: under overload records are dropped, not callers stalled.
//! TCP write & connect failures are handled internally by a reconnect loop and surface to callers
//! only in aggregate, as backpressure once the queue fills.
//!
//! On the wire, TCP frames are the JSON payload followed by a NUL byte (the Graylog GELF-TCP
//! delimiter); UDP payloads above [`MAX_DATAGRAM`] bytes are split into standard chunked-GELF
//! datagrams that any stock Graylog receiver can reassemble.

use std::{
    io::Write,
    net::{SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
    thread,
    time::Duration,
};

use backtrace::Backtrace;
use bytes::BufMut;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::warn;
use parking_lot::Mutex;
use rand::Rng;
use socket2::SockRef;

use crate::{
    config::{Protocol, TransportConfig},
    error::{Error, Result},
    record::GelfRecord,
};

/// Largest UDP payload sent un-chunked; the WAN-safe figure used by the stock Graylog clients.
pub const MAX_DATAGRAM: usize = 1420;
/// Chunked-GELF magic bytes.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];
/// A chunked message carries at most this many chunks; receivers discard anything longer.
pub const MAX_CHUNKS: usize = 128;
// Magic (2) + message id (8) + sequence number (1) + sequence count (1).
const CHUNK_HEADER_LEN: usize = 12;

/// How long `stop` waits for the worker to drain & acknowledge before abandoning it.
const STOP_GRACE: Duration = Duration::from_secs(1);

enum Command {
    Record(GelfRecord),
    Shutdown(Sender<()>),
}

/// Socket state owned by the worker. UDP is connectionless; the TCP stream cycles between `None`
/// (disconnected) and `Some` (connected) under the reconnect policy.
enum Wire {
    Udp(UdpSocket),
    Tcp { stream: Option<TcpStream> },
}

/// Best-effort, non-blocking delivery of [`GelfRecord`]s to a remote collector.
pub struct GelfTransport {
    tx: Option<Sender<Command>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl GelfTransport {
    /// Resolve the collector address, open the socket (UDP) and spin up the queue & worker. Does
    /// not wait for a TCP connection to be established; that happens on the worker.
    pub fn start(config: TransportConfig) -> Result<GelfTransport> {
        let addr = resolve(&config)?;
        let wire = match config.protocol {
            Protocol::Udp => Wire::Udp(open_udp(&config, addr)?),
            Protocol::Tcp => Wire::Tcp { stream: None },
        };
        let (tx, rx) = bounded(config.queue_size.max(1));
        let handle = thread::Builder::new()
            .name("gelf-transport".into())
            .spawn(move || worker_loop(rx, config, addr, wire))
            .map_err(|err| Error::Spawn {
                source: Box::new(err),
                back: Backtrace::new(),
            })?;
        Ok(GelfTransport {
            tx: Some(tx),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Attempt to enqueue a record without blocking. Returns `false` when the queue is full or the
    /// transport has been stopped; the record is dropped in either case.
    pub fn try_send(&self, record: GelfRecord) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            return false;
        };
        match tx.try_send(Command::Record(record)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Stop the worker, letting it drain queued records on a best-effort basis within a bounded
    /// grace period. Idempotent. Every socket operation on the worker carries a timeout, so a
    /// worker that fails to acknowledge in time is abandoned rather than joined; `stop` itself
    /// cannot hang on a slow collector.
    pub fn stop(&mut self) {
        let acked = match self.tx.take() {
            Some(tx) => {
                let (ack_tx, ack_rx) = bounded(1);
                tx.send_timeout(Command::Shutdown(ack_tx), STOP_GRACE).is_ok()
                    && ack_rx.recv_timeout(STOP_GRACE).is_ok()
            }
            None => return,
        };
        let handle = self.handle.lock().take();
        match (acked, handle) {
            (true, Some(handle)) => {
                if handle.join().is_err() {
                    warn!("GELF transport worker panicked");
                }
            }
            (false, Some(_)) => {
                warn!("GELF transport worker did not drain within the grace period; abandoning it");
            }
            _ => {}
        }
    }
}

impl Drop for GelfTransport {
    fn drop(&mut self) {
        self.stop();
    }
}

fn resolve(config: &TransportConfig) -> Result<SocketAddr> {
    (config.server.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|err| Error::Resolve {
            server: config.server.clone(),
            port: config.port,
            source: Box::new(err),
            back: Backtrace::new(),
        })?
        .next()
        .ok_or_else(|| Error::NoAddress {
            server: config.server.clone(),
            port: config.port,
            back: Backtrace::new(),
        })
}

fn open_udp(config: &TransportConfig, addr: SocketAddr) -> Result<UdpSocket> {
    // Bind to any available port, then connect to the collector so plain send() works.
    let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(|err| Error::Socket {
        source: Box::new(err),
        back: Backtrace::new(),
    })?;
    socket.connect(addr).map_err(|err| Error::Socket {
        source: Box::new(err),
        back: Backtrace::new(),
    })?;
    if let Some(size) = config.send_buffer_size {
        if let Err(err) = SockRef::from(&socket).set_send_buffer_size(size) {
            warn!("failed to size the UDP send buffer to {}: {}", size, err);
        }
    }
    Ok(socket)
}

fn worker_loop(rx: Receiver<Command>, config: TransportConfig, addr: SocketAddr, mut wire: Wire) {
    // Begin connecting right away so the first record does not pay the connect latency.
    if let Wire::Tcp { stream } = &mut wire {
        *stream = try_connect(&config, addr);
    }
    loop {
        match rx.recv() {
            Ok(Command::Record(record)) => send_record(&mut wire, &config, addr, &record),
            Ok(Command::Shutdown(ack)) => {
                while let Ok(Command::Record(record)) = rx.try_recv() {
                    send_record(&mut wire, &config, addr, &record);
                }
                let _ = ack.send(());
                break;
            }
            Err(_) => break,
        }
    }
}

fn send_record(wire: &mut Wire, config: &TransportConfig, addr: SocketAddr, record: &GelfRecord) {
    let payload = record.to_wire();
    match wire {
        Wire::Udp(socket) => send_datagrams(socket, &payload),
        Wire::Tcp { stream } => {
            if stream.is_none() {
                *stream = try_connect(config, addr);
                if stream.is_none() {
                    // The record that hit the outage is dropped; callers only ever see the
                    // aggregate backpressure once the queue backs up.
                    thread::sleep(config.reconnect_delay);
                    return;
                }
            }
            if let Some(conn) = stream.as_mut() {
                if let Err(err) = write_frame(conn, &payload) {
                    warn!("GELF transport write to {} failed: {}", addr, err);
                    *stream = None;
                    thread::sleep(config.reconnect_delay);
                }
            }
        }
    }
}

fn try_connect(config: &TransportConfig, addr: SocketAddr) -> Option<TcpStream> {
    match connect(config, addr) {
        Ok(stream) => Some(stream),
        Err(err) => {
            warn!("GELF transport failed to connect to {}: {}", addr, err);
            None
        }
    }
}

fn connect(config: &TransportConfig, addr: SocketAddr) -> std::io::Result<TcpStream> {
    let stream = TcpStream::connect_timeout(&addr, config.connect_timeout)?;
    // The write timeout is what bounds the worker on a stalled collector.
    stream.set_write_timeout(Some(config.connect_timeout))?;
    stream.set_nodelay(config.tcp_no_delay)?;
    let sock = SockRef::from(&stream);
    if config.tcp_keep_alive {
        sock.set_keepalive(true)?;
    }
    if let Some(size) = config.send_buffer_size {
        sock.set_send_buffer_size(size)?;
    }
    Ok(stream)
}

fn write_frame(stream: &mut TcpStream, payload: &[u8]) -> std::io::Result<()> {
    stream.write_all(payload)?;
    // GELF over TCP delimits frames with a NUL byte; JSON string escaping guarantees the payload
    // itself never contains one.
    stream.write_all(&[0])?;
    stream.flush()
}

fn send_datagrams(socket: &UdpSocket, payload: &[u8]) {
    if payload.len() <= MAX_DATAGRAM {
        if let Err(err) = socket.send(payload) {
            warn!("GELF transport UDP send failed: {}", err);
        }
        return;
    }
    match chunk_payload(payload, MAX_DATAGRAM) {
        Some(chunks) => {
            for chunk in chunks {
                if let Err(err) = socket.send(&chunk) {
                    warn!("GELF transport UDP send failed: {}", err);
                    return;
                }
            }
        }
        None => warn!(
            "GELF message of {} bytes exceeds {} chunks; dropped",
            payload.len(),
            MAX_CHUNKS
        ),
    }
}

/// Split an oversized UDP payload into chunked-GELF datagrams: magic bytes, a shared random
/// message ID, then sequence number & count, followed by the payload slice. Returns `None` when
/// the message would not fit the 128-chunk ceiling.
fn chunk_payload(payload: &[u8], max_datagram: usize) -> Option<Vec<Vec<u8>>> {
    let body = max_datagram - CHUNK_HEADER_LEN;
    let count = (payload.len() + body - 1) / body;
    if count > MAX_CHUNKS {
        return None;
    }
    let message_id: [u8; 8] = rand::thread_rng().gen();
    let mut chunks = Vec::with_capacity(count);
    for (seq, part) in payload.chunks(body).enumerate() {
        let mut chunk = Vec::with_capacity(CHUNK_HEADER_LEN + part.len());
        chunk.put_slice(&CHUNK_MAGIC);
        chunk.put_slice(&message_id);
        chunk.put_u8(seq as u8);
        chunk.put_u8(count as u8);
        chunk.put_slice(part);
        chunks.push(chunk);
    }
    Some(chunks)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::level::Level;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::time::Instant;

    fn record() -> GelfRecord {
        let mut additional = BTreeMap::new();
        additional.insert("loggerName".to_string(), Value::from("com.example.Service"));
        additional.insert("env".to_string(), Value::from("test"));
        GelfRecord {
            short_message: "hello".into(),
            full_message: Some("hello".into()),
            timestamp: 1700000000.5,
            level: Level::Informational,
            host: "app-01".into(),
            additional,
        }
    }

    fn assert_round_trip(json: &Value) {
        assert_eq!(json["version"], "1.1");
        assert_eq!(json["host"], "app-01");
        assert_eq!(json["short_message"], "hello");
        assert_eq!(json["timestamp"], 1700000000.5);
        assert_eq!(json["level"], 6);
        assert_eq!(json["_loggerName"], "com.example.Service");
        assert_eq!(json["_env"], "test");
    }

    #[test]
    fn udp_round_trip() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let config = TransportConfig::builder()
            .server("127.0.0.1")
            .port(port)
            .protocol(Protocol::Udp)
            .build();
        let mut transport = GelfTransport::start(config).unwrap();
        assert!(transport.try_send(record()));

        let mut buf = [0u8; 64 * 1024];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        let json: Value = serde_json::from_slice(&buf[..n]).unwrap();
        assert_round_trip(&json);
        transport.stop();
    }

    #[test]
    fn tcp_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = TransportConfig::builder()
            .server("127.0.0.1")
            .port(port)
            .protocol(Protocol::Tcp)
            .tcp_no_delay(true)
            .build();
        let mut transport = GelfTransport::start(config).unwrap();
        assert!(transport.try_send(record()));

        let (stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut reader = BufReader::new(stream);
        let mut frame = Vec::new();
        reader.read_until(0, &mut frame).unwrap();
        assert_eq!(frame.pop(), Some(0));
        let json: Value = serde_json::from_slice(&frame).unwrap();
        assert_round_trip(&json);
        transport.stop();
    }

    #[test]
    fn try_send_never_blocks_against_a_stalled_transport() {
        // Grab a port that nothing is listening on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let config = TransportConfig::builder()
            .server("127.0.0.1")
            .port(port)
            .protocol(Protocol::Tcp)
            .queue_size(4)
            .connect_timeout(Duration::from_millis(200))
            .reconnect_delay(Duration::from_secs(5))
            .build();
        let transport = GelfTransport::start(config).unwrap();

        let start = Instant::now();
        let mut rejected = 0;
        for _ in 0..8 {
            if !transport.try_send(record()) {
                rejected += 1;
            }
        }
        assert!(rejected >= 1, "queue overflow never reported");
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "try_send appears to have blocked"
        );
    }

    #[test]
    fn stop_is_idempotent_and_rejects_later_sends() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = receiver.local_addr().unwrap().port();
        let config = TransportConfig::builder()
            .server("127.0.0.1")
            .port(port)
            .build();
        let mut transport = GelfTransport::start(config).unwrap();
        transport.stop();
        transport.stop();
        assert!(!transport.try_send(record()));
    }

    #[test]
    fn small_payloads_are_not_chunked() {
        let payload = vec![b'x'; MAX_DATAGRAM - CHUNK_HEADER_LEN];
        let chunks = chunk_payload(&payload, MAX_DATAGRAM).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn chunks_share_an_id_and_reassemble() {
        let payload: Vec<u8> = (0..100u8).collect();
        let chunks = chunk_payload(&payload, 20).unwrap();
        // 20 - 12 header bytes leaves 8 payload bytes per chunk.
        assert_eq!(chunks.len(), 13);

        let id = &chunks[0][2..10];
        let mut reassembled = Vec::new();
        for (seq, chunk) in chunks.iter().enumerate() {
            assert_eq!(&chunk[..2], &CHUNK_MAGIC);
            assert_eq!(&chunk[2..10], id);
            assert_eq!(chunk[10], seq as u8);
            assert_eq!(chunk[11], chunks.len() as u8);
            reassembled.extend_from_slice(&chunk[12..]);
        }
        assert_eq!(reassembled, payload);
    }

    #[test]
    fn oversized_messages_are_refused() {
        let payload = vec![0u8; (MAX_DATAGRAM - CHUNK_HEADER_LEN) * (MAX_CHUNKS + 1)];
        assert!(chunk_payload(&payload, MAX_DATAGRAM).is_none());
    }
}
