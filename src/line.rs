//! Line Tokenizer (C1): splits raw bytes into lines under RFC 9112's
//! CRLF/LF robustness rules, rejecting bare CR as a smuggling vector.

use crate::error::SyntaxError;

/// How a `Line` was terminated in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    CRLF,
    /// Accepted leniently per RFC 9112 §2.2 ("a recipient MAY recognize a
    /// single LF as a line terminator"). Never produced on send (see C10).
    LF,
    /// Legal only for the final line of a buffer: the caller has not yet
    /// supplied the terminator (or any terminator at all, e.g. a body
    /// fragment without a trailing newline).
    None,
}

/// A tokenized line: content never contains `0x0D` or `0x0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub bytes: &'a [u8],
    pub terminator: LineTerminator,
    /// 1-based.
    pub number: usize,
}

impl<'a> Line<'a> {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Scans `buf` front-to-back, splitting on CRLF or bare LF. A `0x0D` not
/// immediately followed by `0x0A` is rejected: RFC 9112 §11.1 singles out
/// bare CR in protocol elements as a desync/smuggling vector, so unlike bare
/// LF (merely lenient) it is never tolerated.
pub fn tokenize(buf: &[u8]) -> Result<Vec<Line<'_>>, SyntaxError> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let mut number = 1usize;

    while i < buf.len() {
        match buf[i] {
            b'\r' => {
                if buf.get(i + 1) == Some(&b'\n') {
                    lines.push(Line {
                        bytes: &buf[start..i],
                        terminator: LineTerminator::CRLF,
                        number,
                    });
                    i += 2;
                    start = i;
                    number += 1;
                } else {
                    log::debug!("bare CR without following LF on line {number}");
                    return Err(SyntaxError::BareCR(number));
                }
            }
            b'\n' => {
                lines.push(Line {
                    bytes: &buf[start..i],
                    terminator: LineTerminator::LF,
                    number,
                });
                i += 1;
                start = i;
                number += 1;
            }
            _ => i += 1,
        }
    }

    if start < buf.len() {
        lines.push(Line {
            bytes: &buf[start..],
            terminator: LineTerminator::None,
            number,
        });
    }

    Ok(lines)
}

/// Tokenizes only the header block of `buf`: the start-line and field lines
/// up to and including the first blank line, never scanning past it. Body
/// bytes are arbitrary octets (spec §3/§4.1) and must never be subjected to
/// CRLF line-tokenization rules — a bare CR with no following LF is a
/// framing violation in the header block but entirely unremarkable inside a
/// binary or compressed body. Returns `None` if no blank-line separator is
/// found before the buffer ends, alongside the byte offset of the first
/// byte after that separator (where the body, if any, begins).
pub fn tokenize_header_block(buf: &[u8]) -> Result<Option<(Vec<Line<'_>>, usize)>, SyntaxError> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let mut number = 1usize;

    while i < buf.len() {
        match buf[i] {
            b'\r' => {
                if buf.get(i + 1) == Some(&b'\n') {
                    let line = Line { bytes: &buf[start..i], terminator: LineTerminator::CRLF, number };
                    let is_blank = line.is_empty();
                    lines.push(line);
                    i += 2;
                    start = i;
                    number += 1;
                    if is_blank {
                        return Ok(Some((lines, start)));
                    }
                } else {
                    log::debug!("bare CR without following LF on line {number}");
                    return Err(SyntaxError::BareCR(number));
                }
            }
            b'\n' => {
                let line = Line { bytes: &buf[start..i], terminator: LineTerminator::LF, number };
                let is_blank = line.is_empty();
                lines.push(line);
                i += 1;
                start = i;
                number += 1;
                if is_blank {
                    return Ok(Some((lines, start)));
                }
            }
            _ => i += 1,
        }
    }

    Ok(None)
}

/// Returns the index of the first empty line, i.e. the header/body
/// separator.
pub fn find_blank_line(lines: &[Line<'_>]) -> Option<usize> {
    lines.iter().position(Line::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_crlf() {
        let lines = tokenize(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].bytes, b"GET / HTTP/1.1");
        assert_eq!(lines[0].terminator, LineTerminator::CRLF);
        assert!(lines[2].is_empty());
    }

    #[test]
    fn accepts_bare_lf_leniently() {
        let lines = tokenize(b"a\nb\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].terminator, LineTerminator::LF);
    }

    #[test]
    fn rejects_bare_cr() {
        let err = tokenize(b"GET / HTTP/1.1\rHost: a\r\n\r\n").unwrap_err();
        assert_eq!(err, SyntaxError::BareCR(1));
    }

    #[test]
    fn final_line_without_terminator_is_none() {
        let lines = tokenize(b"a\r\nb").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].terminator, LineTerminator::None);
        assert_eq!(lines[1].bytes, b"b");
    }

    #[test]
    fn never_contains_terminator_bytes() {
        for line in tokenize(b"a\r\nb\nc\r\n\r\n").unwrap() {
            assert!(!line.bytes.contains(&b'\r'));
            assert!(!line.bytes.contains(&b'\n'));
        }
    }

    #[test]
    fn find_blank_line_locates_separator() {
        let lines = tokenize(b"a\r\nb\r\n\r\nbody").unwrap();
        assert_eq!(find_blank_line(&lines), Some(2));
    }

    #[test]
    fn tokenize_header_block_stops_at_blank_line_and_reports_body_offset() {
        let buf = b"GET / HTTP/1.1\r\nHost: a\r\n\r\nbody";
        let (lines, body_offset) = tokenize_header_block(buf).unwrap().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].is_empty());
        assert_eq!(&buf[body_offset..], b"body");
    }

    #[test]
    fn tokenize_header_block_never_scans_bare_cr_in_body() {
        // A bare CR (no following LF) inside the body must not be rejected:
        // only the header block is subject to CRLF tokenization rules.
        let buf = b"GET / HTTP/1.1\r\nHost: a\r\n\r\na\rb";
        let (_, body_offset) = tokenize_header_block(buf).unwrap().unwrap();
        assert_eq!(&buf[body_offset..], b"a\rb");
    }

    #[test]
    fn tokenize_header_block_returns_none_without_blank_line() {
        let buf = b"GET / HTTP/1.1\r\nHost: a\r\n";
        assert!(tokenize_header_block(buf).unwrap().is_none());
    }

    #[test]
    fn tokenize_header_block_still_rejects_bare_cr_in_header_block() {
        let err = tokenize_header_block(b"GET / HTTP/1.1\rHost: a\r\n\r\n").unwrap_err();
        assert_eq!(err, SyntaxError::BareCR(1));
    }
}
