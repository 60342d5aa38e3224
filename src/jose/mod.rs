// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! The three JOSE object lifecycles (spec.md §3 "JOSE object", §4.1
//! "compact serialization"): unsecured, JWS, and JWE. Each type tracks its
//! own runtime state (spec.md §9 "typestate is enforced at the call site,
//! not in the type system" — compact-serialized input arrives untyped, so
//! the state machine is a field checked by each operation, not a
//! phantom-typed wrapper).

mod jwe;
mod jws;
mod unsecured;

pub use jwe::JweObject;
pub use jwe::JweState;
pub use jws::JwsObject;
pub use jws::JwsState;
pub use unsecured::UnsecuredObject;

use crate::error::Error;
use crate::error::ParseReason;

/// Splits a compact-serialized JOSE object into its `.`-joined segments,
/// checking the expected count up front (spec.md §4.1).
pub(crate) fn split_compact<'a>(input: &'a str, expected: &'static str, expected_count: usize) -> Result<Vec<&'a str>, Error> {
  let parts: Vec<&str> = input.split('.').collect();
  if parts.len() != expected_count {
    return Err(Error::parse(ParseReason::PartCountMismatch { expected, found: parts.len() }));
  }
  Ok(parts)
}

/// The three possible shapes of a compact-serialized JOSE object, chosen by
/// inspecting the protected header's `alg` before committing to a concrete
/// parse (spec.md §4.1 "compact-form dispatch").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactKind {
  Unsecured,
  Jws,
  Jwe,
}

/// Determines which of the three compact forms `input` is, without fully
/// parsing it, by counting `.`-delimiters and peeking at `alg`.
pub fn sniff_compact_kind(input: &str) -> Result<CompactKind, Error> {
  let dots = input.matches('.').count();
  match dots {
    2 => {
      let header = peek_header(input)?;
      let alg = header.get("alg").and_then(|v| v.as_str()).ok_or(Error::parse(ParseReason::MissingField { field: "alg" }))?;
      if alg == "none" {
        Ok(CompactKind::Unsecured)
      } else {
        Ok(CompactKind::Jws)
      }
    }
    4 => Ok(CompactKind::Jwe),
    0 => Err(Error::parse(ParseReason::MissingDelimiter)),
    _ => Err(Error::parse(ParseReason::ExcessDelimiter)),
  }
}

fn peek_header(input: &str) -> Result<serde_json::Map<String, serde_json::Value>, Error> {
  let first = input.split('.').next().ok_or(Error::parse(ParseReason::MissingDelimiter))?;
  let bytes = crate::codec::decode_b64_str(first, "header")?;
  let value: serde_json::Value = serde_json::from_slice(&bytes)?;
  value
    .as_object()
    .cloned()
    .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "header", reason: "not a JSON object".into() }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sniffs_unsecured_vs_jws_by_alg() {
    let unsecured = UnsecuredObject::new(crate::header::UnsecuredHeader::new(), crate::payload::Payload::from_text("x"))
      .serialize()
      .unwrap();
    assert_eq!(sniff_compact_kind(&unsecured).unwrap(), CompactKind::Unsecured);
  }

  #[test]
  fn sniffs_jwe_by_dot_count() {
    assert_eq!(sniff_compact_kind("a.b.c.d.e").unwrap(), CompactKind::Jwe);
  }

  #[test]
  fn rejects_malformed_dot_counts() {
    assert!(sniff_compact_kind("a.b.c.d").is_err());
    assert!(sniff_compact_kind("a").is_err());
  }
}
