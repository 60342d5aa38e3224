// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Codec primitives: base64url, unsigned big-integer byte conversion, and a
//! size-bounded byte reader for external (e.g. remote JWK) input.

mod biguint;
mod bounded;

pub use biguint::pad_to_length;
pub use biguint::strip_leading_zero;
pub use bounded::BoundedReader;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::Error;
use crate::error::ParseReason;

/// Encodes `data` as unpadded base64url, per every compact-serialization
/// segment and every base64url-typed header/JWK field in the spec.
pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
  URL_SAFE_NO_PAD.encode(data)
}

/// Decodes unpadded base64url, tagging the failure with `part` for error
/// context (e.g. "header", "payload", "signature").
pub fn decode_b64(data: impl AsRef<[u8]>, part: &'static str) -> Result<Vec<u8>, Error> {
  URL_SAFE_NO_PAD
    .decode(data)
    .map_err(|_| Error::parse(ParseReason::InvalidBase64 { part }))
}

/// Decodes an ASCII UTF-8 string's bytes as unpadded base64url text (used for
/// decoding the `.`-joined compact segments, which are themselves ASCII).
pub fn decode_b64_str(data: &str, part: &'static str) -> Result<Vec<u8>, Error> {
  decode_b64(data.as_bytes(), part)
}
