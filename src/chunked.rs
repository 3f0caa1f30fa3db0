//! Chunked Codec (C5): encode/decode of `chunked-body` (RFC 9112 §7.1),
//! including chunk extensions and the trailer section.

use crate::error::{CompletenessError, Error, LimitKind, SyntaxError};
use crate::field::parse_field_line;
use crate::options::Limits;
use crate::semantics::HeaderField;

const DEFAULT_CHUNK_SIZE: usize = 8192;

/// `;name[=value]` chunk metadata. Unrecognized extensions are retained but
/// never cause rejection (RFC 9112 §7.1.1: "recipients MUST ignore
/// unrecognized chunk extensions").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkExtension {
    pub name: String,
    pub value: Option<Vec<u8>>,
}

impl ChunkExtension {
    pub fn new(name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        ChunkExtension { name: name.into(), value }
    }
}

/// Result of decoding a complete chunked body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedChunked {
    pub data: Vec<u8>,
    /// One entry per chunk (excluding the last-chunk), in order.
    pub chunk_extensions: Vec<Vec<ChunkExtension>>,
    pub trailers: Vec<HeaderField>,
}

/// Emits a complete `chunked-body`: `data` split into `chunk_size`-byte
/// chunks (default 8192), each tagged with `extensions` if given, followed
/// by the last-chunk and an optional `trailers` section.
pub fn encode_chunked(
    data: &[u8],
    chunk_size: Option<usize>,
    extensions: Option<&[ChunkExtension]>,
    trailers: Option<&[HeaderField]>,
) -> Vec<u8> {
    let chunk_size = chunk_size.filter(|&n| n > 0).unwrap_or(DEFAULT_CHUNK_SIZE);
    let mut out = Vec::with_capacity(data.len() + data.len() / chunk_size.max(1) * 16 + 32);

    for slice in data.chunks(chunk_size) {
        write_chunk(&mut out, slice, extensions);
    }

    out.extend_from_slice(b"0");
    write_extensions(&mut out, extensions);
    out.extend_from_slice(b"\r\n");

    if let Some(trailers) = trailers {
        for trailer in trailers {
            out.extend_from_slice(trailer.name.as_str().as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(trailer.value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
    }
    out.extend_from_slice(b"\r\n");
    out
}

fn write_chunk(out: &mut Vec<u8>, slice: &[u8], extensions: Option<&[ChunkExtension]>) {
    out.extend_from_slice(format!("{:x}", slice.len()).as_bytes());
    write_extensions(out, extensions);
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(slice);
    out.extend_from_slice(b"\r\n");
}

fn write_extensions(out: &mut Vec<u8>, extensions: Option<&[ChunkExtension]>) {
    let Some(extensions) = extensions else { return };
    for ext in extensions {
        out.push(b';');
        out.extend_from_slice(ext.name.as_bytes());
        if let Some(value) = &ext.value {
            out.push(b'=');
            if needs_quoting(value) {
                out.push(b'"');
                for &b in value {
                    if b == b'"' || b == b'\\' {
                        out.push(b'\\');
                    }
                    out.push(b);
                }
                out.push(b'"');
            } else {
                out.extend_from_slice(value);
            }
        }
    }
}

fn needs_quoting(value: &[u8]) -> bool {
    value.iter().any(|&b| b == b';' || b == b' ' || b == b'\t' || b == b',' || b == b'"')
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Decodes a complete chunked body starting at the first chunk-size line.
/// Returns the decoded content alongside the exact number of input bytes
/// consumed (including the terminating CRLF of the trailer section) — never
/// derived from "how much of the slice is left", which would silently
/// misreport the cursor if the caller over-supplied trailing bytes.
pub fn decode_chunked(buf: &[u8], limits: &Limits) -> Result<(DecodedChunked, usize), Error> {
    let mut cursor = 0usize;
    let mut result = DecodedChunked::default();
    let mut total_body: u64 = 0;

    loop {
        let size_line_len = find_crlf(&buf[cursor..]).ok_or(SyntaxError::InvalidFormat {
            reason: "missing CRLF after chunk-size line",
        })?;
        let size_line = &buf[cursor..cursor + size_line_len];
        cursor += size_line_len + 2;

        let (size_hex, ext_part) = match size_line.iter().position(|&b| b == b';') {
            Some(idx) => (&size_line[..idx], Some(&size_line[idx + 1..])),
            None => (size_line, None),
        };
        let size_text = std::str::from_utf8(size_hex).map_err(|_| SyntaxError::InvalidChunkSize)?;
        let size =
            u64::from_str_radix(size_text.trim(), 16).map_err(|_| SyntaxError::InvalidChunkSize)?;
        if size > limits.max_chunk_bytes {
            return Err(Error::LimitExceeded {
                kind: LimitKind::Chunk,
                observed: size,
                cap: limits.max_chunk_bytes,
            });
        }
        let extensions = parse_extensions(ext_part, limits)?;

        if size == 0 {
            let trailers = parse_trailers(buf, &mut cursor, limits)?;
            result.trailers = trailers;
            return Ok((result, cursor));
        }

        let size = size as usize;
        if cursor + size > buf.len() {
            return Err(SyntaxError::IncompleteChunk {
                expected: size,
                available: buf.len().saturating_sub(cursor),
            }
            .into());
        }
        total_body += size as u64;
        if total_body > limits.max_body_bytes {
            return Err(Error::LimitExceeded {
                kind: LimitKind::Body,
                observed: total_body,
                cap: limits.max_body_bytes,
            });
        }
        result.data.extend_from_slice(&buf[cursor..cursor + size]);
        cursor += size;

        if buf.get(cursor..cursor + 2) != Some(b"\r\n") {
            return Err(SyntaxError::MissingCRLF.into());
        }
        cursor += 2;
        log::trace!("decoded chunk of {size} bytes, {total_body} total so far");
        result.chunk_extensions.push(extensions);
    }
}

fn parse_extensions(
    part: Option<&[u8]>,
    limits: &Limits,
) -> Result<Vec<ChunkExtension>, Error> {
    let Some(part) = part else { return Ok(Vec::new()) };
    let mut extensions = Vec::new();
    for segment in part.split(|&b| b == b';') {
        let segment = trim(segment);
        if segment.is_empty() {
            continue;
        }
        if extensions.len() >= limits.max_chunk_extensions {
            return Err(Error::LimitExceeded {
                kind: LimitKind::ChunkExtensionCount,
                observed: (extensions.len() + 1) as u64,
                cap: limits.max_chunk_extensions as u64,
            });
        }
        let (name, value) = match segment.iter().position(|&b| b == b'=') {
            Some(idx) => (&segment[..idx], Some(unquote(&segment[idx + 1..]))),
            None => (segment, None),
        };
        let name = String::from_utf8_lossy(name).into_owned();
        extensions.push(ChunkExtension::new(name, value));
    }
    Ok(extensions)
}

fn unquote(value: &[u8]) -> Vec<u8> {
    if value.len() >= 2 && value.first() == Some(&b'"') && value.last() == Some(&b'"') {
        let inner = &value[1..value.len() - 1];
        let mut out = Vec::with_capacity(inner.len());
        let mut iter = inner.iter().copied();
        while let Some(b) = iter.next() {
            if b == b'\\' {
                if let Some(next) = iter.next() {
                    out.push(next);
                }
            } else {
                out.push(b);
            }
        }
        out
    } else {
        value.to_vec()
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let is_ows = |b: &u8| *b == b' ' || *b == b'\t';
    let start = bytes.iter().position(|b| !is_ows(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ows(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Reads field lines until an empty CRLF line. A trailer that fails to
/// parse is skipped rather than aborting the whole body, per RFC 9112
/// §7.1.2 ("a recipient MUST ignore... unrecognized trailer fields"):
/// treating one malformed trailer as fatal would let an attacker truncate
/// an otherwise-valid body by corrupting a single trailer line.
fn parse_trailers(
    buf: &[u8],
    cursor: &mut usize,
    limits: &Limits,
) -> Result<Vec<HeaderField>, Error> {
    let mut trailers = Vec::new();
    let mut trailer_bytes = 0usize;
    loop {
        let line_len = find_crlf(&buf[*cursor..])
            .ok_or(CompletenessError::MissingHeaderBodySeparator)?;
        let line = &buf[*cursor..*cursor + line_len];
        *cursor += line_len + 2;

        if line.is_empty() {
            return Ok(trailers);
        }

        trailer_bytes += line.len() + 2;
        if trailer_bytes > limits.max_trailer_bytes {
            return Err(Error::LimitExceeded {
                kind: LimitKind::TrailerBytes,
                observed: trailer_bytes as u64,
                cap: limits.max_trailer_bytes as u64,
            });
        }

        if let Ok(field) = parse_field_line(line) {
            trailers.push(field);
        } else {
            log::debug!("skipping malformed trailer field line");
        }
    }
}
