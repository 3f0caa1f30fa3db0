//! `HttpVersion` (spec §3) and its wire-format parser (C3).

use std::fmt;

use crate::error::SyntaxError;

/// `HTTP/<major>.<minor>`. Kept as a plain `{major, minor}` pair rather than
/// a closed enum of known versions, since the Host and body-length rules
/// both need version *comparison*, not just matching against a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpVersion {
    pub major: u16,
    pub minor: u16,
}

impl HttpVersion {
    pub const HTTP_1_0: HttpVersion = HttpVersion { major: 1, minor: 0 };
    pub const HTTP_1_1: HttpVersion = HttpVersion { major: 1, minor: 1 };

    pub fn new(major: u16, minor: u16) -> Self {
        HttpVersion { major, minor }
    }

    /// Parses `"HTTP/<digits>.<digits>"`. The literal `"HTTP"` is
    /// case-sensitive. RFC 9112 only ever emits a single digit on each side
    /// of the dot, but this parser accepts multiple digits for forward
    /// compatibility with the HTTP-version token's ABNF (`1*DIGIT "." 1*DIGIT`).
    pub fn parse(text: &[u8]) -> Result<HttpVersion, SyntaxError> {
        let rest = text.strip_prefix(b"HTTP/").ok_or(SyntaxError::InvalidHttpName)?;
        let dot = rest
            .iter()
            .position(|&b| b == b'.')
            .ok_or(SyntaxError::InvalidVersionNumber)?;
        let (major, minor) = (&rest[..dot], &rest[dot + 1..]);
        if major.is_empty() || minor.is_empty() {
            return Err(SyntaxError::InvalidVersionNumber);
        }
        let major = parse_digits(major)?;
        let minor = parse_digits(minor)?;
        Ok(HttpVersion { major, minor })
    }

    pub fn format(&self) -> String {
        format!("HTTP/{}.{}", self.major, self.minor)
    }

    pub fn is_at_least(&self, other: HttpVersion) -> bool {
        (self.major, self.minor) >= (other.major, other.minor)
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

fn parse_digits(bytes: &[u8]) -> Result<u16, SyntaxError> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(SyntaxError::InvalidVersionNumber);
    }
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or(SyntaxError::InvalidVersionNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_versions() {
        assert_eq!(HttpVersion::parse(b"HTTP/1.1").unwrap(), HttpVersion::HTTP_1_1);
        assert_eq!(HttpVersion::parse(b"HTTP/1.0").unwrap(), HttpVersion::HTTP_1_0);
    }

    #[test]
    fn accepts_multi_digit_forward_compat() {
        assert_eq!(HttpVersion::parse(b"HTTP/12.34").unwrap(), HttpVersion::new(12, 34));
    }

    #[test]
    fn rejects_lowercase_name() {
        assert!(matches!(
            HttpVersion::parse(b"http/1.1"),
            Err(SyntaxError::InvalidHttpName)
        ));
    }

    #[test]
    fn rejects_missing_dot() {
        assert!(matches!(
            HttpVersion::parse(b"HTTP/11"),
            Err(SyntaxError::InvalidVersionNumber)
        ));
    }

    #[test]
    fn round_trips_format() {
        let v = HttpVersion::new(1, 1);
        assert_eq!(HttpVersion::parse(v.format().as_bytes()).unwrap(), v);
    }

    #[test]
    fn orders_by_major_then_minor() {
        assert!(HttpVersion::HTTP_1_1.is_at_least(HttpVersion::HTTP_1_0));
        assert!(!HttpVersion::HTTP_1_0.is_at_least(HttpVersion::HTTP_1_1));
    }
}
