//! File uploads arrive as a single-part multipart body. The helpdesk upload
//! endpoint wants the raw file bytes, so the part preamble (boundary line and
//! part headers) is cut off at the first blank line and the payload is cut to
//! the length announced in the `Data-Length` header.

use crate::errors::HelpdeskRelayError;
use bytes::Bytes;

/// Offset of the first byte after the first blank line (`\n\n` or `\r\n\r\n`).
pub fn payload_offset(body: &[u8]) -> Option<usize> {
    for i in 1..body.len() {
        if body[i] != b'\n' {
            continue;
        }
        if body[i - 1] == b'\n' || (i >= 3 && &body[i - 3..i] == b"\r\n\r") {
            return Some(i + 1);
        }
    }
    None
}

/// Parses the `Data-Length` header value.
pub fn parse_data_length(value: &[u8]) -> Result<usize, HelpdeskRelayError> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HelpdeskRelayError::InvalidDataLength(String::from_utf8_lossy(value).into_owned())
        })
}

/// Slices the uploaded file out of a multipart body.
///
/// Without a data length the payload runs to the end of the body. A data
/// length past the end of the body is clamped.
pub fn extract_payload(
    body: &Bytes,
    data_length: Option<usize>,
) -> Result<Bytes, HelpdeskRelayError> {
    let start = payload_offset(body).ok_or(HelpdeskRelayError::MissingMultipartPreamble)?;
    let end = match data_length {
        Some(len) => start.saturating_add(len).min(body.len()),
        None => body.len(),
    };
    Ok(body.slice(start..end))
}
