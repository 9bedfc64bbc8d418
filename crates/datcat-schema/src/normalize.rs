use crate::digest::DigestKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("{kind} digest is not hex: '{value}'")]
    InvalidHex { kind: DigestKind, value: String },
    #[error("{kind} digest is too long: '{value}' (expected at most {max} hex characters)")]
    TooLong {
        kind: DigestKind,
        value: String,
        max: usize,
    },
}

/// Placeholder spellings scanners emit for "no digest available".
const UNKNOWN_MARKERS: &[&str] = &["", "-", "null", "none"];

/// Canonicalize digest text: trimmed, `0x` prefix stripped, lower-cased and
/// left-padded with zeros to the class width.
///
/// Returns `Ok(None)` when the text denotes an unknown digest.
pub fn normalize_digest_text(kind: DigestKind, text: &str) -> Result<Option<String>, DigestError> {
    let trimmed = text.trim();
    if UNKNOWN_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        return Ok(None);
    }

    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DigestError::InvalidHex {
            kind,
            value: text.to_owned(),
        });
    }

    let width = kind.hex_len();
    if body.len() > width {
        return Err(DigestError::TooLong {
            kind,
            value: text.to_owned(),
            max: width,
        });
    }

    Ok(Some(format!(
        "{body:0>width$}",
        body = body.to_ascii_lowercase()
    )))
}
