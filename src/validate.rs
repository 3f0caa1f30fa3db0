//! Framing Validators (C7): anti-smuggling (§11.2) and anti-splitting
//! (§11.1) checks on already-parsed header lists.

use crate::error::FramingError;
use crate::semantics::{header_count, header_values, HeaderField};
use crate::transfer_coding::TransferCodingList;

fn content_length_values_agree(headers: &[HeaderField]) -> bool {
    let mut value: Option<&[u8]> = None;
    for raw in header_values(headers, "Content-Length") {
        match value {
            None => value = Some(raw),
            Some(existing) => {
                // RFC 9112 compares the values as the *same integer*, not as
                // identical byte strings, so " 1" and "1" would still
                // disagree on format but agree on value; parse both as
                // integers for the comparison.
                let a = std::str::from_utf8(existing).ok().and_then(|s| s.parse::<u64>().ok());
                let b = std::str::from_utf8(raw).ok().and_then(|s| s.parse::<u64>().ok());
                if a.is_none() || a != b {
                    return false;
                }
            }
        }
    }
    true
}

/// Validates a request's framing headers. Returns the first violation found,
/// checked in the order an anti-smuggling reviewer would: the
/// Transfer-Encoding/Content-Length combination first, since that is the
/// classic desync vector, then internal consistency of each header alone.
pub fn validate_request(headers: &[HeaderField]) -> Result<(), FramingError> {
    let has_transfer_encoding = header_count(headers, "Transfer-Encoding") > 0;
    let has_content_length = header_count(headers, "Content-Length") > 0;

    if has_transfer_encoding && has_content_length {
        return Err(FramingError::AmbiguousMessageFraming);
    }

    if has_transfer_encoding {
        let list = TransferCodingList::parse_all(header_values(headers, "Transfer-Encoding"));
        if list.chunked_count() > 1 {
            return Err(FramingError::ChunkedAppliedMultipleTimes);
        }
        if list.has_chunked() && !list.is_chunked_final() {
            return Err(FramingError::ChunkedNotFinalEncoding);
        }
    }

    if has_content_length && !content_length_values_agree(headers) {
        return Err(FramingError::MultipleContentLengthValues);
    }

    Ok(())
}

/// Validates a response's framing headers, plus the status-code range and
/// the two response-only Transfer-Encoding interactions.
pub fn validate_response(status_code: u16, headers: &[HeaderField]) -> Result<(), FramingError> {
    if !(100..=599).contains(&status_code) {
        return Err(FramingError::InvalidStatusCode(status_code));
    }

    let has_transfer_encoding = header_count(headers, "Transfer-Encoding") > 0;
    let has_content_length = header_count(headers, "Content-Length") > 0;

    if has_transfer_encoding && has_content_length {
        return Err(FramingError::TransferEncodingWithContentLength);
    }

    if has_transfer_encoding
        && ((100..200).contains(&status_code) || status_code == 204 || status_code == 304)
    {
        return Err(FramingError::TransferEncodingWithIncompatibleStatus(status_code));
    }

    if has_transfer_encoding {
        let list = TransferCodingList::parse_all(header_values(headers, "Transfer-Encoding"));
        if list.chunked_count() > 1 {
            return Err(FramingError::ChunkedAppliedMultipleTimes);
        }
        if list.has_chunked() && !list.is_chunked_final() {
            return Err(FramingError::ChunkedNotFinalEncoding);
        }
    }

    if has_content_length && !content_length_values_agree(headers) {
        return Err(FramingError::MultipleContentLengthValues);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<HeaderField> {
        pairs.iter().map(|(n, v)| HeaderField::new(*n, v.as_bytes().to_vec())).collect()
    }

    #[test]
    fn rejects_both_transfer_encoding_and_content_length_on_request() {
        let h = headers(&[("Transfer-Encoding", "chunked"), ("Content-Length", "5")]);
        assert_eq!(validate_request(&h).unwrap_err(), FramingError::AmbiguousMessageFraming);
    }

    #[test]
    fn accepts_matching_duplicate_content_length() {
        let h = headers(&[("Content-Length", "5"), ("Content-Length", "5")]);
        assert!(validate_request(&h).is_ok());
    }

    #[test]
    fn rejects_disagreeing_duplicate_content_length() {
        let h = headers(&[("Content-Length", "5"), ("Content-Length", "6")]);
        assert_eq!(
            validate_request(&h).unwrap_err(),
            FramingError::MultipleContentLengthValues
        );
    }

    #[test]
    fn rejects_chunked_not_final_on_request() {
        let h = headers(&[("Transfer-Encoding", "chunked, gzip")]);
        assert_eq!(validate_request(&h).unwrap_err(), FramingError::ChunkedNotFinalEncoding);
    }

    #[test]
    fn rejects_chunked_applied_twice() {
        let h = headers(&[("Transfer-Encoding", "chunked"), ("Transfer-Encoding", "chunked")]);
        assert_eq!(
            validate_request(&h).unwrap_err(),
            FramingError::ChunkedAppliedMultipleTimes
        );
    }

    #[test]
    fn rejects_transfer_encoding_on_204_response() {
        let h = headers(&[("Transfer-Encoding", "chunked")]);
        assert_eq!(
            validate_response(204, &h).unwrap_err(),
            FramingError::TransferEncodingWithIncompatibleStatus(204)
        );
    }

    #[test]
    fn rejects_transfer_encoding_with_content_length_on_response() {
        let h = headers(&[("Transfer-Encoding", "chunked"), ("Content-Length", "5")]);
        assert_eq!(
            validate_response(200, &h).unwrap_err(),
            FramingError::TransferEncodingWithContentLength
        );
    }

    #[test]
    fn rejects_out_of_range_status() {
        assert_eq!(
            validate_response(600, &[]).unwrap_err(),
            FramingError::InvalidStatusCode(600)
        );
    }

    #[test]
    fn accepts_well_formed_chunked_response() {
        let h = headers(&[("Transfer-Encoding", "chunked")]);
        assert!(validate_response(200, &h).is_ok());
    }
}
