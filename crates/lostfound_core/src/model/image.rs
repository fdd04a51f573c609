//! Photo payload codec for `Item::image_data`.
//!
//! Payloads are standard base64. Mobile encoders commonly wrap output at 76
//! columns, so decoding ignores ASCII whitespace.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Photo payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDecodeError(base64::DecodeError);

impl Display for ImageDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid image payload: {}", self.0)
    }
}

impl Error for ImageDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Encodes raw photo bytes for storage in `image_data`.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes an `image_data` payload.
///
/// Blank payloads mean "no photo" and return `Ok(None)`.
pub fn decode_image(payload: &str) -> Result<Option<Vec<u8>>, ImageDecodeError> {
    let compact: String = payload
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Ok(None);
    }
    STANDARD
        .decode(compact.as_bytes())
        .map(Some)
        .map_err(ImageDecodeError)
}
