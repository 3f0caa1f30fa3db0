//! Connection State (C11): per-connection persistence decision, upgrade
//! detection, and the request/response pipeline ordering invariant.

use std::collections::VecDeque;

use thiserror::Error;

use crate::semantics::{header_values, HeaderField, Method};
use crate::version::HttpVersion;

/// `Connection` header value: a deduplicated, order-preserving set of
/// lowercase tokens (spec §4.11 Design Notes: insertion order is acceptable
/// as long as semantics match; sorting is only needed for round-trip tests).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionOptions(pub Vec<String>);

impl ConnectionOptions {
    pub const CLOSE: &'static str = "close";
    pub const KEEP_ALIVE: &'static str = "keep-alive";
    pub const UPGRADE: &'static str = "upgrade";

    pub fn parse(text: &[u8]) -> ConnectionOptions {
        let text = String::from_utf8_lossy(text);
        let mut seen = Vec::new();
        for token in text.split(',') {
            let token = token.trim_matches(|c| c == ' ' || c == '\t').to_ascii_lowercase();
            if !token.is_empty() && !seen.contains(&token) {
                seen.push(token);
            }
        }
        ConnectionOptions(seen)
    }

    pub fn has(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn has_close(&self) -> bool {
        self.has(Self::CLOSE)
    }

    pub fn has_keep_alive(&self) -> bool {
        self.has(Self::KEEP_ALIVE)
    }

    pub fn has_upgrade(&self) -> bool {
        self.has(Self::UPGRADE)
    }

    pub fn format(&self) -> String {
        self.0.join(", ")
    }
}

fn connection_options(headers: &[HeaderField]) -> ConnectionOptions {
    let mut tokens = Vec::new();
    for raw in header_values(headers, "Connection") {
        tokens.extend(ConnectionOptions::parse(raw).0);
    }
    ConnectionOptions(tokens)
}

/// Per-connection persistence and upgrade state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub version: HttpVersion,
    pub should_persist: bool,
    pub close_requested: bool,
    last_response_status: Option<u16>,
}

impl ConnectionState {
    pub fn new(version: HttpVersion) -> Self {
        ConnectionState {
            version,
            should_persist: version.is_at_least(HttpVersion::HTTP_1_1),
            close_requested: false,
            last_response_status: None,
        }
    }

    pub fn process_request(&mut self, headers: &[HeaderField]) {
        if connection_options(headers).has_close() {
            self.close_requested = true;
            self.should_persist = false;
        }
    }

    pub fn process_response(&mut self, status_code: u16, headers: &[HeaderField]) {
        self.last_response_status = Some(status_code);
        let options = connection_options(headers);
        if options.has_close() {
            self.close_requested = true;
            self.should_persist = false;
        } else if options.has_keep_alive() && self.version == HttpVersion::HTTP_1_0 {
            self.should_persist = true;
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.should_persist && !self.close_requested
    }

    pub fn close(&mut self) {
        self.close_requested = true;
    }

    /// Resets transient per-exchange state (the last observed response
    /// status) while keeping the persistence decision already in effect;
    /// used between pipelined exchanges on a connection that is staying
    /// open.
    pub fn reset(&mut self) {
        self.last_response_status = None;
    }

    pub fn is_upgrade_accepted(&self) -> bool {
        self.last_response_status == Some(101)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    #[error("cannot pipeline another request while a non-idempotent request is in flight")]
    NonIdempotentInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PipelineEntry {
    method: Method,
    timestamp: u64,
}

/// FIFO queue of in-flight requests on a pipelined connection. Enqueueing a
/// non-idempotent request blocks any further enqueue until its response is
/// dequeued: RFC 9110 §9.2.2 permits pipelining only idempotent requests
/// past one another, since a non-idempotent request whose response never
/// arrives cannot be safely retried behind others already sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineQueue {
    entries: VecDeque<PipelineEntry>,
}

impl PipelineQueue {
    pub fn new() -> Self {
        PipelineQueue { entries: VecDeque::new() }
    }

    /// `timestamp` is caller-supplied (e.g. milliseconds since some epoch);
    /// this queue never reads the system clock.
    pub fn enqueue(&mut self, method: Method, timestamp: u64) -> Result<(), PipelineError> {
        if let Some(last) = self.entries.back() {
            if !last.method.is_idempotent() {
                return Err(PipelineError::NonIdempotentInFlight);
            }
        }
        self.entries.push_back(PipelineEntry { method, timestamp });
        Ok(())
    }

    /// Matches the oldest in-flight request to its response, FIFO.
    pub fn dequeue(&mut self) -> Option<(Method, u64)> {
        self.entries.pop_front().map(|e| (e.method, e.timestamp))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
