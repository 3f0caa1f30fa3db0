//! Field-Line Parser (C2): `name: value` lines, anti-smuggling whitespace
//! rules, and obs-fold handling (RFC 9112 §5).

use crate::error::SyntaxError;
use crate::line::Line;
use crate::options::ObsFoldPolicy;
use crate::semantics::HeaderField;

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn is_obs_text(b: u8) -> bool {
    b >= 0x80
}

/// VCHAR + SP/HTAB + obs-text; excludes the control characters RFC 9110
/// §5.5 forbids in a field value (`0x00..=0x1F` sans HTAB, and `0x7F`).
///
/// obs-text acceptance is gated behind `tolerant-parsing`, mirroring the
/// teacher's own `tolerant-http1-parser`-gated split between the lenient and
/// strict `is_header_value_char` in `protocol/h1/parser/primitives.rs`: with
/// the feature off, a field value is held to strict VCHAR/SP/HTAB only.
#[cfg(feature = "tolerant-parsing")]
fn is_field_value_char(b: u8) -> bool {
    b == b'\t' || (0x20..=0x7E).contains(&b) || is_obs_text(b)
}

#[cfg(not(feature = "tolerant-parsing"))]
fn is_field_value_char(b: u8) -> bool {
    b == b'\t' || (0x20..=0x7E).contains(&b)
}

/// Parses one already-tokenized header line (no CRLF inside it; C1
/// guarantees that). Returns the field name/value with surrounding OWS
/// trimmed from the value.
pub fn parse_field_line(line: &[u8]) -> Result<HeaderField, SyntaxError> {
    let colon = line.iter().position(|&b| b == b':').ok_or_else(|| {
        log::debug!("header field line is missing its colon");
        SyntaxError::MissingColon
    })?;
    let name = &line[..colon];
    let value = &line[colon + 1..];

    if name.is_empty() {
        return Err(SyntaxError::EmptyFieldName);
    }
    // A space or tab anywhere before the colon is either internal to the
    // name (always invalid) or directly preceding it (the single most
    // important anti-request-smuggling rule in RFC 9112 §5.1: a proxy that
    // trims "Transfer-Encoding " into "Transfer-Encoding" while the backend
    // treats it as an unknown header desyncs the two).
    if name.iter().any(|&b| b == b' ' || b == b'\t') {
        log::debug!("whitespace found before colon in header field name");
        return Err(SyntaxError::WhitespaceBeforeColon);
    }
    if !name.iter().all(|&b| is_token_char(b)) {
        return Err(SyntaxError::InvalidFieldName);
    }

    let trimmed = trim_ows(value);
    if !trimmed.iter().all(|&b| is_field_value_char(b)) {
        return Err(SyntaxError::InvalidFieldValueChar);
    }

    Ok(HeaderField::new(
        std::str::from_utf8(name).map_err(|_| SyntaxError::InvalidFieldName)?,
        trimmed.to_vec(),
    ))
}

fn trim_ows(bytes: &[u8]) -> &[u8] {
    let is_ows = |b: &u8| *b == b' ' || *b == b'\t';
    let start = bytes.iter().position(|b| !is_ows(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ows(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn is_obs_fold_continuation(line: &[u8]) -> bool {
    matches!(line.first(), Some(b' ') | Some(b'\t'))
}

/// Parses the header-section lines (everything between the start-line and
/// the blank separator line), applying the caller-selected obs-fold policy.
pub fn parse_header_section(
    lines: &[Line<'_>],
    policy: ObsFoldPolicy,
) -> Result<Vec<HeaderField>, SyntaxError> {
    let mut fields: Vec<HeaderField> = Vec::new();

    for line in lines {
        if is_obs_fold_continuation(line.bytes) {
            match policy {
                ObsFoldPolicy::Reject => return Err(SyntaxError::ObsFoldWithoutPrecedingField),
                ObsFoldPolicy::Discard => continue,
                ObsFoldPolicy::ReplaceWithSpace => {
                    let last = fields
                        .last_mut()
                        .ok_or(SyntaxError::ObsFoldWithoutPrecedingField)?;
                    let continuation = trim_ows(line.bytes);
                    if !continuation.is_empty() {
                        last.value.0.push(b' ');
                        last.value.0.extend_from_slice(continuation);
                    }
                    continue;
                }
            }
        }
        fields.push(parse_field_line(line.bytes)?);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::tokenize;

    #[test]
    fn parses_simple_field() {
        let field = parse_field_line(b"Host: example.com").unwrap();
        assert_eq!(field.name.as_str(), "Host");
        assert_eq!(field.value.as_bytes(), b"example.com");
    }

    #[test]
    fn trims_leading_and_trailing_ows_but_not_internal() {
        let field = parse_field_line(b"X-Thing: \t a  b \t").unwrap();
        assert_eq!(field.value.as_bytes(), b"a  b");
    }

    #[test]
    fn rejects_whitespace_before_colon() {
        assert_eq!(
            parse_field_line(b"Host : a").unwrap_err(),
            SyntaxError::WhitespaceBeforeColon
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(parse_field_line(b": a").unwrap_err(), SyntaxError::EmptyFieldName);
    }

    #[test]
    fn rejects_missing_colon() {
        assert_eq!(parse_field_line(b"Host a").unwrap_err(), SyntaxError::MissingColon);
    }

    #[test]
    fn rejects_control_bytes_in_value() {
        assert_eq!(
            parse_field_line(b"X: a\x01b").unwrap_err(),
            SyntaxError::InvalidFieldValueChar
        );
    }

    #[test]
    fn allows_obs_text_in_value() {
        let field = parse_field_line(&[b'X', b':', b' ', 0xC3, 0xA9]).unwrap();
        assert_eq!(field.value.as_bytes(), &[0xC3, 0xA9]);
    }

    #[test]
    fn obs_fold_reject_policy_fails_with_continuation() {
        let lines = tokenize(b"Host: a\r\n b\r\n").unwrap();
        let err = parse_header_section(&lines, ObsFoldPolicy::Reject).unwrap_err();
        assert_eq!(err, SyntaxError::ObsFoldWithoutPrecedingField);
    }

    #[test]
    fn obs_fold_replace_with_space_joins_continuation() {
        let lines = tokenize(b"Host: a\r\n b\r\n").unwrap();
        let fields = parse_header_section(&lines, ObsFoldPolicy::ReplaceWithSpace).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value.as_bytes(), b"a b");
    }

    #[test]
    fn obs_fold_discard_drops_continuation() {
        let lines = tokenize(b"Host: a\r\n b\r\n").unwrap();
        let fields = parse_header_section(&lines, ObsFoldPolicy::Discard).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value.as_bytes(), b"a");
    }

    #[test]
    fn obs_fold_at_head_always_fails_even_with_lenient_policies() {
        let lines = tokenize(b" a: b\r\n").unwrap();
        assert!(parse_header_section(&lines, ObsFoldPolicy::ReplaceWithSpace).is_err());
        assert!(parse_header_section(&lines, ObsFoldPolicy::Discard).is_err());
    }
}
