// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Unsigned big-endian byte-string helpers used by EC coordinates and RSA
//! key components (spec.md §4.5).

/// Strips a single leading `0x00` byte that only exists to disambiguate a
/// signed big-integer encoding's sign bit. JWK fields are always *unsigned*
/// big-endian integers (`Base64urlUInt`, RFC 7518 §2), so such a leading
/// zero is never required there.
pub fn strip_leading_zero(bytes: &[u8]) -> &[u8] {
  match bytes {
    [0x00, rest @ ..] if !rest.is_empty() => rest,
    _ => bytes,
  }
}

/// Zero-pads `bytes` on the high side to exactly `len` bytes. Used to encode
/// EC coordinates to `ceil(field_size_bits / 8)` bytes (spec.md §4.5).
///
/// Accepts inputs already longer than `len` by returning them unchanged;
/// callers that must enforce the exact width should check the result.
pub fn pad_to_length(bytes: &[u8], len: usize) -> Vec<u8> {
  if bytes.len() >= len {
    return bytes.to_vec();
  }
  let mut out = vec![0u8; len - bytes.len()];
  out.extend_from_slice(bytes);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pads_short_coordinate() {
    assert_eq!(pad_to_length(&[0x01, 0x02], 4), vec![0x00, 0x00, 0x01, 0x02]);
  }

  #[test]
  fn leaves_exact_length_alone() {
    assert_eq!(pad_to_length(&[0x01, 0x02], 2), vec![0x01, 0x02]);
  }

  #[test]
  fn strips_single_leading_zero() {
    assert_eq!(strip_leading_zero(&[0x00, 0x80, 0x01]), &[0x80, 0x01]);
  }

  #[test]
  fn keeps_zero_value_as_is() {
    assert_eq!(strip_leading_zero(&[0x00]), &[0x00]);
  }

  #[test]
  fn leaves_unsigned_value_alone() {
    assert_eq!(strip_leading_zero(&[0x7f, 0x01]), &[0x7f, 0x01]);
  }
}
