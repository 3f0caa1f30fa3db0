//! Minimal RFC 9110/3986 data model: `Method`, `Status`, `HeaderName`,
//! `HeaderValue`, `Request`, `Response`, `Target`, `Uri`, `Authority`,
//! `Path`, and `Query`.
//!
//! This is a deliberately thin stand-in (see DESIGN.md, Open Question #1):
//! just enough for the framing layer to type-check, with no content
//! negotiation, caching, or URI normalization beyond what Host validation
//! needs.

use std::fmt;

/// A request method token. Case-sensitive and preserved verbatim, per
/// RFC 9110 §9: servers that accept lowercase methods do so as an extension,
/// not because the grammar allows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method(pub String);

impl Method {
    pub const GET: &'static str = "GET";
    pub const HEAD: &'static str = "HEAD";
    pub const POST: &'static str = "POST";
    pub const PUT: &'static str = "PUT";
    pub const DELETE: &'static str = "DELETE";
    pub const CONNECT: &'static str = "CONNECT";
    pub const OPTIONS: &'static str = "OPTIONS";
    pub const TRACE: &'static str = "TRACE";
    pub const PATCH: &'static str = "PATCH";

    pub fn new(raw: impl Into<String>) -> Self {
        Method(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_head(&self) -> bool {
        self.0 == Self::HEAD
    }

    pub fn is_connect(&self) -> bool {
        self.0 == Self::CONNECT
    }

    /// RFC 9110 §9.2.2: GET, HEAD, PUT, DELETE, OPTIONS, and TRACE are
    /// idempotent; POST, CONNECT, and PATCH are not (PATCH per RFC 5789 §2).
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::GET | Self::HEAD | Self::PUT | Self::DELETE | Self::OPTIONS | Self::TRACE
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{code, reason_phrase}`. `reason_phrase` is informational only; recipients
/// SHOULD NOT rely on its content (RFC 9112 §4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    pub reason_phrase: Option<String>,
}

impl Status {
    pub fn new(code: u16, reason_phrase: Option<String>) -> Self {
        Status { code, reason_phrase }
    }

    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.code)
    }

    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Case-insensitive header name, case-preserving for re-emission.
#[derive(Debug, Clone, Eq)]
pub struct HeaderName(pub String);

impl HeaderName {
    pub fn new(raw: impl Into<String>) -> Self {
        HeaderName(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn eq_ignore_ascii_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::hash::Hash for HeaderName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

/// Header field value. May contain obs-text (bytes `>= 0x80`); this is
/// deliberately a byte vector rather than a `String` since it is not
/// guaranteed to be valid UTF-8 (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValue(pub Vec<u8>);

impl HeaderValue {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        HeaderValue(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        HeaderField {
            name: HeaderName::new(name),
            value: HeaderValue::new(value),
        }
    }
}

/// `host[:port]`, userinfo deliberately excluded: RFC 9112 §3.2.2 compares
/// Host only against the authority's host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    pub host: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query(pub String);

/// A parsed absolute-form URI, kept only as deep as `Target::Absolute` and
/// Host validation (C8) require: scheme, authority, and the remainder
/// (path + query) as a single opaque tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    pub scheme: String,
    pub authority: Authority,
    pub path_and_query: String,
}

/// The resolved form of a request-target (RFC 9112 §3.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Origin { path: Path, query: Option<Query> },
    Absolute { uri: Uri },
    Authority { host: String, port: Option<u16> },
    Asterisk,
}

/// HTTP-version is a framing-layer concept (carried by `RequestLine`/
/// `StatusLine`, C3) and a caller-supplied parameter to the serializer
/// (C10); it is deliberately not a field here, so this type stays reusable
/// across the connection's whole negotiated lifetime rather than tied to
/// the wire form of a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: Target,
    pub headers: Vec<HeaderField>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub headers: Vec<HeaderField>,
    pub body: Option<Vec<u8>>,
}

/// Looks up header values by case-insensitive name, concatenated in
/// appearance order (RFC 9110 list-concatenation semantics) — used by C4/C6/
/// C7/C8 which all need "every value of this header, in order" rather than
/// just the first.
pub fn header_values<'a>(headers: &'a [HeaderField], name: &str) -> Vec<&'a [u8]> {
    headers
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_bytes())
        .collect()
}

pub fn header_count(headers: &[HeaderField], name: &str) -> usize {
    headers.iter().filter(|h| h.name.eq_ignore_ascii_case(name)).count()
}
