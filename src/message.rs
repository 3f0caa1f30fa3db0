//! Message Deserializer and Serializer (C9/C10): drives C1–C8 to produce a
//! complete `Request`/`Response` plus `bytes_consumed`, and the inverse
//! wire-format emitter.

use crate::body_length::{request_body_length, response_body_length, MessageBodyLength};
use crate::chunked::decode_chunked;
use crate::error::{CompletenessError, Error, LimitKind, SyntaxError};
use crate::field::parse_header_section;
use crate::line::{tokenize_header_block, Line};
use crate::options::ParseOptions;
use crate::semantics::{HeaderField, Method, Request, Response, Status, Target};
use crate::start_line::{
    format_request_line, format_status_line, parse_request_line, parse_status_line,
    resolve_target,
};
use crate::validate::{validate_request, validate_response};
use crate::version::HttpVersion;

/// A successfully decoded message plus how many input bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage<T> {
    pub message: T,
    pub bytes_consumed: usize,
}

fn check_header_block_limits(
    lines: &[Line<'_>],
    start_line_idx: usize,
    separator_idx: usize,
    options: &ParseOptions,
) -> Result<(), Error> {
    let start_line = &lines[start_line_idx];
    if start_line.bytes.len() > options.limits.max_start_line {
        return Err(SyntaxError::LineTooLong {
            length: start_line.bytes.len(),
            max: options.limits.max_start_line,
        }
        .into());
    }

    // `separator_idx` is the blank-line index; when the start-line itself is
    // blank (e.g. a bare "\r\n\r\n") the separator sits at `start_line_idx`,
    // leaving no room for a header block at all.
    let header_lines: &[Line<'_>] = match separator_idx.checked_sub(start_line_idx + 1) {
        Some(_) => &lines[start_line_idx + 1..separator_idx],
        None => &[],
    };
    if header_lines.len() > options.limits.max_headers {
        return Err(Error::LimitExceeded {
            kind: LimitKind::HeaderCount,
            observed: header_lines.len() as u64,
            cap: options.limits.max_headers as u64,
        });
    }
    let mut total = 0usize;
    for line in header_lines {
        if line.bytes.len() > options.limits.max_header_line {
            return Err(SyntaxError::LineTooLong {
                length: line.bytes.len(),
                max: options.limits.max_header_line,
            }
            .into());
        }
        total += line.bytes.len();
    }
    if total > options.limits.max_total_header_bytes {
        return Err(Error::LimitExceeded {
            kind: LimitKind::TotalHeaderBytes,
            observed: total as u64,
            cap: options.limits.max_total_header_bytes as u64,
        });
    }
    Ok(())
}

fn read_body(
    buf: &[u8],
    header_end: usize,
    body_length: MessageBodyLength,
    options: &ParseOptions,
    trailers: &mut Vec<HeaderField>,
) -> Result<(Option<Vec<u8>>, usize), Error> {
    match body_length {
        MessageBodyLength::None => Ok((None, header_end)),
        MessageBodyLength::Fixed(n) => {
            if n > options.limits.max_body_bytes {
                return Err(Error::LimitExceeded {
                    kind: LimitKind::Body,
                    observed: n,
                    cap: options.limits.max_body_bytes,
                });
            }
            let n = n as usize;
            let available = buf.len().saturating_sub(header_end);
            if available < n {
                log::debug!("incomplete body: need {} more bytes", n - available);
                return Err(CompletenessError::IncompleteBody {
                    expected: n as u64,
                    available: available as u64,
                }
                .into());
            }
            Ok((Some(buf[header_end..header_end + n].to_vec()), header_end + n))
        }
        MessageBodyLength::Chunked => {
            let (decoded, consumed) = decode_chunked(&buf[header_end..], &options.limits)?;
            trailers.extend(decoded.trailers);
            Ok((Some(decoded.data), header_end + consumed))
        }
        MessageBodyLength::UntilClose => {
            Ok((Some(buf[header_end..].to_vec()), buf.len()))
        }
    }
}

/// Parses a complete HTTP/1.1 request from `buf`. Pure and non-blocking:
/// insufficient bytes yield `CompletenessError`, never a block.
pub fn parse_request(buf: &[u8], options: &ParseOptions) -> Result<ParsedMessage<Request>, Error> {
    if buf.is_empty() {
        return Err(CompletenessError::EmptyMessage.into());
    }
    // Only the header block (start-line through the blank separator) is ever
    // tokenized under CRLF/bare-CR rules; body octets are arbitrary and must
    // not be rejected for a lone 0x0D (spec §3/§4.1).
    let (lines, header_end) =
        tokenize_header_block(buf)?.ok_or(CompletenessError::MissingHeaderBodySeparator)?;
    let separator = lines.len() - 1;

    check_header_block_limits(&lines, 0, separator, options)?;

    let request_line = parse_request_line(lines[0].bytes)?;
    let header_lines: &[Line<'_>] = match separator.checked_sub(1) {
        Some(_) => &lines[1..separator],
        None => &[],
    };
    let mut headers = parse_header_section(header_lines, options.obs_fold_policy)?;

    let target = resolve_target(&request_line.method, &request_line.target)?;

    validate_request(&headers).map_err(|e| {
        log::warn!("request framing rejected: {e}");
        e
    })?;
    crate::host::validate_host(request_line.version, &headers, &target).map_err(|e| {
        log::warn!("request Host header rejected: {e}");
        e
    })?;

    let body_length = request_body_length(&headers);
    let (body, bytes_consumed) = read_body(buf, header_end, body_length, options, &mut headers)?;

    Ok(ParsedMessage {
        message: Request { method: request_line.method, target, headers, body },
        bytes_consumed,
    })
}

/// Parses a complete HTTP/1.1 response from `buf`. `request_method` is the
/// method of the request this response answers (required by the C6
/// body-length precedence, rules 1–2).
pub fn parse_response(
    buf: &[u8],
    request_method: &str,
    options: &ParseOptions,
) -> Result<ParsedMessage<Response>, Error> {
    if buf.is_empty() {
        return Err(CompletenessError::EmptyMessage.into());
    }
    let (lines, header_end) =
        tokenize_header_block(buf)?.ok_or(CompletenessError::MissingHeaderBodySeparator)?;
    let separator = lines.len() - 1;

    check_header_block_limits(&lines, 0, separator, options)?;

    let status_line = parse_status_line(lines[0].bytes)?;
    let header_lines: &[Line<'_>] = match separator.checked_sub(1) {
        Some(_) => &lines[1..separator],
        None => &[],
    };
    let mut headers = parse_header_section(header_lines, options.obs_fold_policy)?;

    validate_response(status_line.status_code, &headers).map_err(|e| {
        log::warn!("response framing rejected: {e}");
        e
    })?;

    let body_length =
        response_body_length(status_line.status_code, request_method, &headers);
    let (body, bytes_consumed) = read_body(buf, header_end, body_length, options, &mut headers)?;

    Ok(ParsedMessage {
        message: Response {
            status: Status::new(status_line.status_code, status_line.reason_phrase),
            headers,
            body,
        },
        bytes_consumed,
    })
}

fn render_target(target: &Target) -> String {
    match target {
        Target::Origin { path, query } => match query {
            Some(q) if !q.0.is_empty() => format!("{}?{}", path.0, q.0),
            _ => path.0.clone(),
        },
        Target::Absolute { uri } => {
            let host_port = match uri.authority.port {
                Some(p) => format!("{}:{}", uri.authority.host, p),
                None => uri.authority.host.clone(),
            };
            format!("{}://{}{}", uri.scheme, host_port, uri.path_and_query)
        }
        Target::Authority { host, port } => match port {
            Some(p) => format!("{host}:{p}"),
            None => host.clone(),
        },
        Target::Asterisk => "*".to_string(),
    }
}

fn write_field_lines(out: &mut Vec<u8>, headers: &[HeaderField]) -> Result<(), Error> {
    for field in headers {
        if field.value.as_bytes().iter().any(|&b| b == b'\r' || b == b'\n') {
            return Err(SyntaxError::InvalidFieldValueChar.into());
        }
        out.extend_from_slice(field.name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(field.value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    Ok(())
}

/// Emits `request-line CRLF *(field-line CRLF) CRLF [body]`. Never produces
/// obs-fold, never inserts SP before `:`. `version` is caller-supplied: the
/// framing layer's HTTP-version is not stored on the long-lived `Request`
/// value (see `semantics::Request`).
pub fn serialize_request(request: &Request, version: HttpVersion) -> Result<Vec<u8>, Error> {
    let target = render_target(&request.target);
    let mut out = Vec::new();
    out.extend_from_slice(format_request_line(&request.method, &target, version).as_bytes());
    out.extend_from_slice(b"\r\n");
    write_field_lines(&mut out, &request.headers)?;
    out.extend_from_slice(b"\r\n");
    if let Some(body) = &request.body {
        out.extend_from_slice(body);
    }
    Ok(out)
}

/// Emits `status-line CRLF *(field-line CRLF) CRLF [body]`. A missing reason
/// phrase still emits the terminating SP after the status code; `include_reason
/// = false` suppresses a present reason phrase the same way (e.g. a caller
/// normalizing responses before re-emission).
pub fn serialize_response(
    response: &Response,
    version: HttpVersion,
    include_reason: bool,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    out.extend_from_slice(
        format_status_line(version, &response.status, include_reason).as_bytes(),
    );
    out.extend_from_slice(b"\r\n");
    write_field_lines(&mut out, &response.headers)?;
    out.extend_from_slice(b"\r\n");
    if let Some(body) = &response.body {
        out.extend_from_slice(body);
    }
    Ok(out)
}
