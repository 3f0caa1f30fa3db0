//! Body-Length Resolver (C6): the RFC 9112 §6.3 precedence deciding how a
//! message body is delimited.

use crate::semantics::{header_count, header_values, HeaderField};
use crate::transfer_coding::TransferCodingList;

/// How the message body is delimited, per RFC 9112 §6.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBodyLength {
    None,
    Fixed(u64),
    Chunked,
    UntilClose,
}

fn transfer_encoding(headers: &[HeaderField]) -> TransferCodingList {
    TransferCodingList::parse_all(header_values(headers, "Transfer-Encoding"))
}

/// Parses every `Content-Length` instance present. Returns `Ok(None)` when
/// the header is absent, `Ok(Some(n))` when every instance agrees on the
/// same non-negative integer, and `Err(())` when the header is malformed
/// (non-integer, negative, leading sign, or disagreeing duplicate values) —
/// per RFC 9112 §6.3 step 4 this always resolves to body length `None`
/// rather than a hard parse error, since a malformed Content-Length alone is
/// not by itself an unambiguous smuggling signal (C7 separately flags the
/// duplicate-with-distinct-values case as a hard `FramingError`).
fn content_length(headers: &[HeaderField]) -> Result<Option<u64>, ()> {
    if header_count(headers, "Content-Length") == 0 {
        return Ok(None);
    }
    let mut value: Option<u64> = None;
    for raw in header_values(headers, "Content-Length") {
        let text = std::str::from_utf8(raw).map_err(|_| ())?;
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        let parsed: u64 = text.parse().map_err(|_| ())?;
        match value {
            None => value = Some(parsed),
            Some(existing) if existing == parsed => {}
            Some(_) => return Err(()),
        }
    }
    Ok(value)
}

/// Resolves body length for a response, given the method of the request it
/// answers (required by rules 1–2).
pub fn response_body_length(
    status_code: u16,
    request_method: &str,
    headers: &[HeaderField],
) -> MessageBodyLength {
    if request_method.eq_ignore_ascii_case("HEAD")
        || (100..200).contains(&status_code)
        || status_code == 204
        || status_code == 304
    {
        return MessageBodyLength::None;
    }
    if request_method.eq_ignore_ascii_case("CONNECT") && (200..300).contains(&status_code) {
        return MessageBodyLength::None;
    }

    let transfer_encoding = transfer_encoding(headers);
    if !transfer_encoding.is_empty() {
        return if transfer_encoding.is_chunked_final() {
            MessageBodyLength::Chunked
        } else {
            // Ambiguous framing; C7 separately rejects this for callers who
            // asked for strict validation. A tolerant reader still needs a
            // delimiter, and RFC 9112 §6.3 leaves read-to-close as the only
            // safe fallback for a response.
            MessageBodyLength::UntilClose
        };
    }

    match content_length(headers) {
        Ok(Some(n)) => MessageBodyLength::Fixed(n),
        Ok(None) => MessageBodyLength::UntilClose,
        Err(()) => MessageBodyLength::None,
    }
}

/// Resolves body length for a request. Rules 3–4 are shared with responses;
/// rule 5 differs: an unframed request has no body, never read-to-close.
pub fn request_body_length(headers: &[HeaderField]) -> MessageBodyLength {
    let transfer_encoding = transfer_encoding(headers);
    if !transfer_encoding.is_empty() {
        return if transfer_encoding.is_chunked_final() {
            MessageBodyLength::Chunked
        } else {
            MessageBodyLength::UntilClose
        };
    }

    match content_length(headers) {
        Ok(Some(n)) => MessageBodyLength::Fixed(n),
        Ok(None) => MessageBodyLength::None,
        Err(()) => MessageBodyLength::None,
    }
}
