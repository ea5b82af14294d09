//! Wire-format dispatch: prefix sniffing plus explicit encode/decode
//! entry points.

use crate::{binary, json, notation, xml, LlsdError, Value};

/// The four llsd wire encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Binary,
    Notation,
    Xml,
    Json,
}

/// Sniffs the wire format from a short prefix, after skipping leading
/// whitespace. Returns `None` when no format claims the lead bytes —
/// detection never falls back to trial parsing.
pub fn detect(input: &[u8]) -> Option<Format> {
    let trimmed = skip_leading_ws(input);
    if trimmed.starts_with(binary::HEADER) {
        return Some(Format::Binary);
    }
    match trimmed.first()? {
        b'<' => Some(Format::Xml),
        b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' => Some(Format::Json),
        // JSON literals win over notation's single-letter booleans
        b't' if trimmed.starts_with(b"true") => Some(Format::Json),
        b'f' if trimmed.starts_with(b"false") => Some(Format::Json),
        b'n' if trimmed.starts_with(b"null") => Some(Format::Json),
        b'!' | b'i' | b'r' | b'u' | b's' | b'd' | b'l' | b'b' | b'\'' | b't' | b'T' | b'f'
        | b'F' => Some(Format::Notation),
        _ => None,
    }
}

/// Auto-detecting decode. Undetectable input is an error, never a
/// best-effort guess; a sniffed format that then rejects the payload
/// propagates its own error.
pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    match detect(input) {
        Some(Format::Binary) => binary::decode(skip_leading_ws(input)),
        Some(Format::Notation) => notation::decode(input),
        Some(Format::Xml) => xml::decode(input),
        Some(Format::Json) => json::decode(input),
        None => Err(LlsdError::UnknownFormat),
    }
}

/// Decode with a caller-known format.
pub fn decode_with(input: &[u8], format: Format) -> Result<Value, LlsdError> {
    match format {
        Format::Binary => binary::decode(input),
        Format::Notation => notation::decode(input),
        Format::Xml => xml::decode(input),
        Format::Json => json::decode(input),
    }
}

/// Encode into the named format.
pub fn encode(value: &Value, format: Format) -> Vec<u8> {
    match format {
        Format::Binary => binary::encode(value),
        Format::Notation => notation::encode(value),
        Format::Xml => xml::encode(value),
        Format::Json => json::encode(value),
    }
}

fn skip_leading_ws(input: &[u8]) -> &[u8] {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    &input[start..]
}
