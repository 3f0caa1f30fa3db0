//! Caller-configurable resource limits and parsing policy (spec §5, §9).
//!
//! This is the crate's entire "configuration layer": there is no file, env
//! var, or global mutable state, only a value threaded explicitly through
//! every public entry point.

/// What to do with obsolete line folding (RFC 9112 §5.2) when parsing header
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObsFoldPolicy {
    /// Reject the whole header block if an obs-fold continuation is found.
    /// This is the recommended default for recipients.
    Reject,
    /// Concatenate the continuation onto the previous field's value with a
    /// single SP separator.
    ReplaceWithSpace,
    /// Drop the continuation bytes entirely.
    Discard,
}

impl Default for ObsFoldPolicy {
    fn default() -> Self {
        ObsFoldPolicy::Reject
    }
}

/// Resource ceilings enforced while parsing untrusted input (spec §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_start_line: usize,
    pub max_header_line: usize,
    pub max_total_header_bytes: usize,
    pub max_headers: usize,
    pub max_body_bytes: u64,
    pub max_chunk_bytes: u64,
    pub max_trailer_bytes: usize,
    pub max_chunk_extensions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_start_line: 8000,
            max_header_line: 8000,
            max_total_header_bytes: 64 * 1024,
            max_headers: 100,
            max_body_bytes: 1 << 34,
            max_chunk_bytes: 1 << 31,
            max_trailer_bytes: 8192,
            max_chunk_extensions: 16,
        }
    }
}

/// Parsing policy passed to `parse_request`/`parse_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub obs_fold_policy: ObsFoldPolicy,
    pub limits: Limits,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            obs_fold_policy: ObsFoldPolicy::default(),
            limits: Limits::default(),
        }
    }
}
