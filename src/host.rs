//! Host Validator (C8): RFC 9112 §3.2.2 Host-header rules, including the
//! absolute-form authority cross-check.

use crate::error::HostError;
use crate::semantics::{header_values, Authority, HeaderField, Target};
use crate::version::HttpVersion;

fn split_host_port(value: &str) -> Result<(String, Option<u16>), HostError> {
    if let Some(rest) = value.strip_prefix('[') {
        let end = rest.find(']').ok_or(HostError::InvalidHostFormat)?;
        let host = format!("[{}]", &rest[..end]);
        let after = &rest[end + 1..];
        let port = match after.strip_prefix(':') {
            Some(p) if !p.is_empty() => {
                Some(p.parse::<u16>().map_err(|_| HostError::InvalidPort)?)
            }
            Some(_) => return Err(HostError::InvalidPort),
            None => None,
        };
        return Ok((host, port));
    }
    match value.rfind(':') {
        Some(idx) => {
            let port_text = &value[idx + 1..];
            let port = port_text.parse::<u16>().map_err(|_| HostError::InvalidPort)?;
            Ok((value[..idx].to_string(), Some(port)))
        }
        None => Ok((value.to_string(), None)),
    }
}

/// Validates the `Host` header of a request against RFC 9112 §3.2.2.
/// `target` is the already-resolved request-target, needed for the
/// absolute-form cross-check.
pub fn validate_host(
    version: HttpVersion,
    headers: &[HeaderField],
    target: &Target,
) -> Result<(), HostError> {
    let values = header_values(headers, "Host");

    if values.is_empty() {
        return if version.is_at_least(HttpVersion::HTTP_1_1) {
            Err(HostError::MissingHost)
        } else {
            Ok(())
        };
    }
    if values.len() > 1 {
        return Err(HostError::MultipleHostHeaders);
    }

    let raw = values[0];
    if raw.iter().any(|&b| b == b' ' || b == b'\t') {
        return Err(HostError::InvalidHostFormat);
    }
    let text = std::str::from_utf8(raw).map_err(|_| HostError::InvalidHostFormat)?;
    if text.is_empty() {
        return Err(HostError::InvalidHostFormat);
    }
    let (host, port) = split_host_port(text)?;

    if let Target::Absolute { uri } = target {
        let authority = &uri.authority;
        if !host.eq_ignore_ascii_case(&authority.host) || port != authority.port {
            return Err(HostError::HostMismatchesAuthority);
        }
    }

    Ok(())
}
