//! Transfer-Coding Model (C4): `Transfer-Encoding` list parsing with the
//! chunked-position invariants that the framing validators (C7) depend on.

/// A single transfer-coding name, lowercased. Well-known names are
/// normalized (including the `x-compress` legacy alias); anything else is
/// kept verbatim as an extension coding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCoding(pub String);

impl TransferCoding {
    pub const CHUNKED: &'static str = "chunked";
    pub const GZIP: &'static str = "gzip";
    pub const DEFLATE: &'static str = "deflate";
    pub const COMPRESS: &'static str = "compress";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_chunked(&self) -> bool {
        self.0 == Self::CHUNKED
    }
}

fn normalize(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    if lower == "x-compress" {
        TransferCoding::COMPRESS.to_string()
    } else {
        lower
    }
}

/// The full, ordered list of transfer-codings taken from every
/// `Transfer-Encoding` header instance, concatenated in appearance order
/// (RFC 9110 list-concatenation semantics — spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferCodingList(pub Vec<TransferCoding>);

impl TransferCodingList {
    /// Parses one `Transfer-Encoding` header's value (a comma-separated
    /// list). A value with zero codings (empty, or all-OWS) yields an empty
    /// list, equivalent to the header being absent.
    pub fn parse(text: &[u8]) -> TransferCodingList {
        let text = String::from_utf8_lossy(text);
        let codings = text
            .split(',')
            .map(|part| part.trim_matches(|c| c == ' ' || c == '\t'))
            .filter(|part| !part.is_empty())
            .map(|part| TransferCoding(normalize(part)))
            .collect();
        TransferCodingList(codings)
    }

    /// Concatenates every `Transfer-Encoding` header instance, in the order
    /// they were supplied, into one list.
    pub fn parse_all<'a>(values: impl IntoIterator<Item = &'a [u8]>) -> TransferCodingList {
        let mut all = Vec::new();
        for value in values {
            all.extend(TransferCodingList::parse(value).0);
        }
        TransferCodingList(all)
    }

    pub fn has_chunked(&self) -> bool {
        self.0.iter().any(TransferCoding::is_chunked)
    }

    pub fn chunked_count(&self) -> usize {
        self.0.iter().filter(|c| c.is_chunked()).count()
    }

    /// True when `chunked` is absent, or present exactly once and last.
    pub fn is_chunked_final(&self) -> bool {
        match self.0.last() {
            Some(last) if self.has_chunked() => last.is_chunked(),
            _ => !self.has_chunked(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn format(&self) -> String {
        self.0.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_list() {
        let list = TransferCodingList::parse(b"gzip, chunked");
        assert_eq!(list.0, vec![TransferCoding("gzip".into()), TransferCoding("chunked".into())]);
        assert!(list.has_chunked());
        assert!(list.is_chunked_final());
    }

    #[test]
    fn normalizes_x_compress_alias() {
        let list = TransferCodingList::parse(b"x-compress");
        assert_eq!(list.0, vec![TransferCoding("compress".into())]);
    }

    #[test]
    fn empty_value_yields_empty_list() {
        let list = TransferCodingList::parse(b"  ");
        assert!(list.is_empty());
        assert!(list.is_chunked_final());
    }

    #[test]
    fn chunked_not_final_is_detected() {
        let list = TransferCodingList::parse(b"chunked, gzip");
        assert!(!list.is_chunked_final());
    }

    #[test]
    fn chunked_count_detects_duplicates() {
        let list = TransferCodingList::parse(b"chunked, chunked");
        assert_eq!(list.chunked_count(), 2);
    }

    #[test]
    fn parse_all_concatenates_multiple_headers_in_order() {
        let list = TransferCodingList::parse_all([b"gzip".as_slice(), b"chunked".as_slice()]);
        assert_eq!(
            list.0,
            vec![TransferCoding("gzip".into()), TransferCoding("chunked".into())]
        );
    }
}
