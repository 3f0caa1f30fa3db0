//! RFC 9112 HTTP/1.1 message framing: line tokenization, field parsing,
//! start-line parsing, transfer-coding and chunked-body codecs, the
//! body-length precedence, anti-smuggling/anti-splitting validators, Host
//! validation, and the message (de)serializer built on top of them.
//!
//! Every entry point is pure, single-threaded, and non-blocking: given
//! insufficient input it returns a typed [`error::CompletenessError`] rather
//! than suspending. See `SPEC_FULL.md` for the component-by-component design.

pub mod body_length;
pub mod chunked;
pub mod connection;
pub mod error;
pub mod field;
pub mod host;
pub mod line;
pub mod message;
pub mod options;
pub mod semantics;
pub mod start_line;
pub mod transfer_coding;
pub mod validate;
pub mod version;

pub use body_length::{request_body_length, response_body_length, MessageBodyLength};
pub use chunked::{decode_chunked, encode_chunked, ChunkExtension, DecodedChunked};
pub use connection::{ConnectionOptions, ConnectionState, PipelineError, PipelineQueue};
pub use error::{CompletenessError, Error, FramingError, HostError, LimitKind, Result, SyntaxError};
pub use field::{parse_field_line, parse_header_section};
pub use host::validate_host;
pub use line::{find_blank_line, tokenize, tokenize_header_block, Line, LineTerminator};
pub use message::{parse_request, parse_response, serialize_request, serialize_response, ParsedMessage};
pub use options::{Limits, ObsFoldPolicy, ParseOptions};
pub use semantics::{
    header_count, header_values, Authority, HeaderField, HeaderName, HeaderValue, Method, Path,
    Query, Request, Response, Status, Target, Uri,
};
pub use start_line::{
    format_request_line, format_status_line, parse_request_line, parse_status_line,
    resolve_target, RequestLine, StatusLine,
};
pub use transfer_coding::{TransferCoding, TransferCodingList};
pub use validate::{validate_request, validate_response};
pub use version::HttpVersion;
