//! Start-Line Parsers (C3): request-line and status-line, plus resolution of
//! the raw request-target into a `Target` variant (RFC 9112 §3.2).

use crate::error::SyntaxError;
use crate::semantics::{Authority, Method, Path, Query, Status, Target, Uri};
use crate::version::HttpVersion;

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Raw, not-yet-resolved request-line: `method SP target SP HTTP-version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: HttpVersion,
}

/// `HTTP-version SP 3DIGIT SP [reason-phrase]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: HttpVersion,
    pub status_code: u16,
    pub reason_phrase: Option<String>,
}

/// Splits on the first SP to get the method, then locates the version
/// suffix by the *last* occurrence of `" HTTP/"` so that a target containing
/// literal spaces (which is itself invalid, but we want a precise error
/// rather than a misparse) cannot be mistaken for the version separator.
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine, SyntaxError> {
    let first_space = line.iter().position(|&b| b == b' ').ok_or(SyntaxError::InvalidFormat {
        reason: "request-line missing SP after method",
    })?;
    let method_bytes = &line[..first_space];
    if method_bytes.is_empty() || !method_bytes.iter().all(|&b| is_token_char(b)) {
        return Err(SyntaxError::InvalidFormat {
            reason: "request-line method is empty or not a token",
        });
    }

    let after_method = &line[first_space + 1..];
    let version_marker = b" HTTP/";
    let marker_start = find_last(after_method, version_marker)
        .ok_or(SyntaxError::InvalidFormat { reason: "request-line missing HTTP-version" })?;

    let target = &after_method[..marker_start];
    let version_token = &after_method[marker_start + 1..];

    if target.is_empty() || target.iter().any(|&b| b == b' ' || b == b'\t') {
        return Err(SyntaxError::InvalidTarget);
    }

    let version = HttpVersion::parse(version_token)?;
    let method = std::str::from_utf8(method_bytes)
        .map_err(|_| SyntaxError::InvalidFormat { reason: "method is not valid UTF-8" })?;
    let target = std::str::from_utf8(target)
        .map_err(|_| SyntaxError::InvalidTarget)?;

    Ok(RequestLine {
        method: Method::new(method),
        target: target.to_string(),
        version,
    })
}

fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// `HTTP-version SP 3DIGIT SP [reason-phrase]`. The SP before the reason is
/// mandatory even when the reason phrase itself is empty.
pub fn parse_status_line(line: &[u8]) -> Result<StatusLine, SyntaxError> {
    let first_space = line.iter().position(|&b| b == b' ').ok_or(SyntaxError::InvalidFormat {
        reason: "status-line missing SP after HTTP-version",
    })?;
    let version = HttpVersion::parse(&line[..first_space])?;

    let rest = &line[first_space + 1..];
    if rest.len() < 3 {
        return Err(SyntaxError::InvalidStatusCode);
    }
    let (code_bytes, rest) = rest.split_at(3);
    if !code_bytes.iter().all(u8::is_ascii_digit) {
        return Err(SyntaxError::InvalidStatusCode);
    }
    let status_code: u16 = std::str::from_utf8(code_bytes).unwrap().parse().unwrap();
    if !(100..=999).contains(&status_code) {
        log::debug!("status code {status_code} is out of the valid range");
        return Err(SyntaxError::StatusCodeOutOfRange(status_code));
    }

    // The separating SP is required even when the reason phrase is absent.
    let reason_phrase = if rest.is_empty() {
        None
    } else {
        let rest = rest.strip_prefix(b" ").ok_or(SyntaxError::InvalidFormat {
            reason: "status-line missing SP before reason-phrase",
        })?;
        if rest.iter().any(|&b| !is_reason_phrase_char(b)) {
            return Err(SyntaxError::InvalidFormat { reason: "reason-phrase has an invalid byte" });
        }
        if rest.is_empty() {
            Some(String::new())
        } else {
            Some(String::from_utf8_lossy(rest).into_owned())
        }
    };

    Ok(StatusLine { version, status_code, reason_phrase })
}

fn is_reason_phrase_char(b: u8) -> bool {
    b == b'\t' || b == b' ' || (0x21..=0x7E).contains(&b) || b >= 0x80
}

pub fn format_request_line(method: &Method, target: &str, version: HttpVersion) -> String {
    format!("{} {} {}", method.as_str(), target, version)
}

pub fn format_status_line(version: HttpVersion, status: &Status, include_reason: bool) -> String {
    match status.reason_phrase.as_deref().filter(|_| include_reason) {
        Some(reason) => format!("{} {} {}", version, status.code, reason),
        // The trailing SP MUST still be emitted even with no reason.
        None => format!("{} {} ", version, status.code),
    }
}

fn is_scheme_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"+-.".contains(&b)
}

fn is_authority_char(b: u8) -> bool {
    !b"/?#".contains(&b)
}

fn is_userinfo_char(b: u8) -> bool {
    !b"/?#\\@".contains(&b)
}

fn split_host_port(authority: &str) -> Result<(String, Option<u16>), SyntaxError> {
    if let Some(rest) = authority.strip_prefix('[') {
        let end = rest.find(']').ok_or(SyntaxError::InvalidTarget)?;
        let host = format!("[{}]", &rest[..end]);
        let after = &rest[end + 1..];
        let port = match after.strip_prefix(':') {
            Some(p) if !p.is_empty() => {
                Some(p.parse::<u16>().map_err(|_| SyntaxError::InvalidTarget)?)
            }
            Some(_) => return Err(SyntaxError::InvalidTarget),
            None => None,
        };
        return Ok((host, port));
    }
    match authority.rfind(':') {
        Some(idx) => {
            let port = &authority[idx + 1..];
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SyntaxError::InvalidTarget);
            }
            let port = port.parse::<u16>().map_err(|_| SyntaxError::InvalidTarget)?;
            Ok((authority[..idx].to_string(), Some(port)))
        }
        None => Ok((authority.to_string(), None)),
    }
}

/// Resolves the raw request-target octets captured by `parse_request_line`
/// into a tagged `Target`, per the form the method requires (RFC 9112 §3.2).
pub fn resolve_target(method: &Method, raw: &str) -> Result<Target, SyntaxError> {
    let bytes = raw.as_bytes();
    if method.as_str().eq_ignore_ascii_case("OPTIONS") && raw == "*" {
        return Ok(Target::Asterisk);
    }
    if method.is_connect() {
        let (host, port) = split_host_port(raw)?;
        return Ok(Target::Authority { host, port });
    }
    if bytes.first() == Some(&b'/') {
        let (path, query) = match raw.find('?') {
            Some(idx) => (&raw[..idx], Some(Query(raw[idx + 1..].to_string()))),
            None => (raw, None),
        };
        return Ok(Target::Origin { path: Path(path.to_string()), query });
    }

    // absolute-form: scheme "://" [userinfo "@"] authority path-and-query
    let scheme_end = bytes.iter().position(|&b| !is_scheme_char(b)).unwrap_or(bytes.len());
    if scheme_end == 0 || !raw[scheme_end..].starts_with("://") {
        return Err(SyntaxError::InvalidTarget);
    }
    let scheme = raw[..scheme_end].to_string();
    let after_scheme = &raw[scheme_end + 3..];

    let authority_start = match after_scheme.find('@') {
        Some(at) if !after_scheme[..at].bytes().any(|b| !is_userinfo_char(b)) => at + 1,
        _ => 0,
    };
    let rest = &after_scheme[authority_start..];
    let authority_end = rest.bytes().position(|b| !is_authority_char(b)).unwrap_or(rest.len());
    let authority_str = &rest[..authority_end];
    if authority_str.is_empty() {
        return Err(SyntaxError::InvalidTarget);
    }
    let path_and_query = &rest[authority_end..];
    let path_and_query = if path_and_query.is_empty() { "/" } else { path_and_query };

    let (host, port) = split_host_port(authority_str)?;
    Ok(Target::Absolute {
        uri: Uri {
            scheme,
            authority: Authority { host, port },
            path_and_query: path_and_query.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_origin_form_request_line() {
        let line = parse_request_line(b"GET /p HTTP/1.1").unwrap();
        assert_eq!(line.method.as_str(), "GET");
        assert_eq!(line.target, "/p");
        assert_eq!(line.version, HttpVersion::HTTP_1_1);
    }

    #[test]
    fn rejects_target_with_internal_whitespace() {
        assert_eq!(
            parse_request_line(b"GET /a b HTTP/1.1").unwrap_err(),
            SyntaxError::InvalidTarget
        );
    }

    #[test]
    fn parses_status_line_with_reason() {
        let line = parse_status_line(b"HTTP/1.1 200 OK").unwrap();
        assert_eq!(line.status_code, 200);
        assert_eq!(line.reason_phrase.as_deref(), Some("OK"));
    }

    #[test]
    fn parses_status_line_without_reason_but_requires_trailing_sp() {
        let line = parse_status_line(b"HTTP/1.1 204 ").unwrap();
        assert_eq!(line.reason_phrase.as_deref(), Some(""));
        assert!(parse_status_line(b"HTTP/1.1 204").is_err());
    }

    #[test]
    fn rejects_status_code_out_of_range() {
        assert_eq!(
            parse_status_line(b"HTTP/1.1 1000 x").unwrap_err(),
            SyntaxError::InvalidStatusCode
        );
    }

    #[test]
    fn resolves_origin_form() {
        let target = resolve_target(&Method::new("GET"), "/a/b?x=1").unwrap();
        assert_eq!(
            target,
            Target::Origin {
                path: Path("/a/b".into()),
                query: Some(Query("x=1".into()))
            }
        );
    }

    #[test]
    fn resolves_asterisk_form() {
        let target = resolve_target(&Method::new("OPTIONS"), "*").unwrap();
        assert_eq!(target, Target::Asterisk);
    }

    #[test]
    fn resolves_authority_form_for_connect() {
        let target = resolve_target(&Method::new("CONNECT"), "example.com:443").unwrap();
        assert_eq!(
            target,
            Target::Authority { host: "example.com".into(), port: Some(443) }
        );
    }

    #[test]
    fn resolves_absolute_form() {
        let target =
            resolve_target(&Method::new("GET"), "http://example.com:8080/a?b=c").unwrap();
        match target {
            Target::Absolute { uri } => {
                assert_eq!(uri.scheme, "http");
                assert_eq!(uri.authority.host, "example.com");
                assert_eq!(uri.authority.port, Some(8080));
                assert_eq!(uri.path_and_query, "/a?b=c");
            }
            other => panic!("expected absolute form, got {other:?}"),
        }
    }

    #[test]
    fn resolves_ipv6_authority() {
        let (host, port) = split_host_port("[::1]:8080").unwrap();
        assert_eq!(host, "[::1]");
        assert_eq!(port, Some(8080));
    }
}
