//! Typed error taxonomy for the whole crate (see spec §7).
//!
//! Every fallible entry point returns one of these enums rather than panicking;
//! the only panics in this crate guard invariants it establishes itself (e.g. a
//! `Slice` built from its own buffer), never caller-supplied bytes.

use thiserror::Error;

/// A resource ceiling that was exceeded while parsing untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    StartLine,
    HeaderLine,
    TotalHeaderBytes,
    HeaderCount,
    Body,
    Chunk,
    TrailerBytes,
    ChunkExtensionCount,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LimitKind::StartLine => "start-line",
            LimitKind::HeaderLine => "header-line",
            LimitKind::TotalHeaderBytes => "total-header-bytes",
            LimitKind::HeaderCount => "header-count",
            LimitKind::Body => "body",
            LimitKind::Chunk => "chunk",
            LimitKind::TrailerBytes => "trailer-bytes",
            LimitKind::ChunkExtensionCount => "chunk-extension-count",
        };
        f.write_str(name)
    }
}

/// Syntax-level failures: the bytes do not conform to RFC 9112 grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("bare CR without following LF on line {0}")]
    BareCR(usize),
    #[error("line exceeded maximum length ({length} > {max})")]
    LineTooLong { length: usize, max: usize },
    #[error("header field line is missing its colon")]
    MissingColon,
    #[error("header field name is empty")]
    EmptyFieldName,
    #[error("whitespace found between field name and colon")]
    WhitespaceBeforeColon,
    #[error("header field name contains a character outside of token chars")]
    InvalidFieldName,
    #[error("header field value contains a disallowed control character")]
    InvalidFieldValueChar,
    #[error("malformed input: {reason}")]
    InvalidFormat { reason: &'static str },
    #[error("status code is not exactly 3 digits")]
    InvalidStatusCode,
    #[error("status code {0} is out of the valid range")]
    StatusCodeOutOfRange(u16),
    #[error("expected literal \"HTTP\" in version token")]
    InvalidHttpName,
    #[error("HTTP version has an invalid major/minor number")]
    InvalidVersionNumber,
    #[error("chunk size is not valid hexadecimal")]
    InvalidChunkSize,
    #[error("chunk data ended before {expected} bytes were available ({available} available)")]
    IncompleteChunk { expected: usize, available: usize },
    #[error("expected CRLF immediately after chunk data")]
    MissingCRLF,
    #[error("request target is malformed")]
    InvalidTarget,
    #[error("obsolete line folding with no preceding field to fold onto")]
    ObsFoldWithoutPrecedingField,
}

/// Framing/security failures: syntactically well-formed but ambiguous or
/// dangerous framing (request smuggling, response splitting).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    #[error("both Transfer-Encoding and Content-Length are present")]
    AmbiguousMessageFraming,
    #[error("multiple Content-Length headers carry different values")]
    MultipleContentLengthValues,
    #[error("chunked coding is present but is not the final coding")]
    ChunkedNotFinalEncoding,
    #[error("chunked coding is applied more than once")]
    ChunkedAppliedMultipleTimes,
    #[error("Transfer-Encoding present together with Content-Length")]
    TransferEncodingWithContentLength,
    #[error("Transfer-Encoding present on a response with status {0} which forbids a body")]
    TransferEncodingWithIncompatibleStatus(u16),
    #[error("status code {0} is out of the valid range for a response")]
    InvalidStatusCode(u16),
}

/// Host-header validation failures (RFC 9112 §3.2.2).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("HTTP/1.1 (or later) request has no Host header")]
    MissingHost,
    #[error("request has more than one Host header")]
    MultipleHostHeaders,
    #[error("Host header value is empty or contains whitespace")]
    InvalidHostFormat,
    #[error("Host header port is not a valid u16")]
    InvalidPort,
    #[error("Host header does not match the absolute-form request-target authority")]
    HostMismatchesAuthority,
}

/// The buffer does not yet contain a complete message/chunk/line; callers
/// should read more bytes and retry rather than treating this as a syntax
/// error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessError {
    #[error("need {expected} body bytes but only {available} are available")]
    IncompleteBody { expected: u64, available: u64 },
    #[error("no blank line separating headers from body was found")]
    MissingHeaderBodySeparator,
    #[error("input buffer is empty")]
    EmptyMessage,
}

/// Top-level error returned by `parse_request`/`parse_response` and friends,
/// unifying every failure category below a single type callers can match on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Framing(#[from] FramingError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Incomplete(#[from] CompletenessError),
    #[error("limit exceeded: {kind} (observed {observed}, cap {cap})")]
    LimitExceeded {
        kind: LimitKind,
        observed: u64,
        cap: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
