// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use crate::codec;
use crate::error::Error;
use crate::header::UnsecuredHeader;
use crate::payload::Payload;

/// An unsecured (`alg: none`) JOSE object (spec.md §3 "UnsecuredObject").
/// Carries no integrity protection at all; callers almost always want to
/// reject these rather than accept them (spec.md §7 "PolicyErrorKind::
/// UnsecuredRejected").
#[derive(Debug, Clone, PartialEq)]
pub struct UnsecuredObject {
  header: UnsecuredHeader,
  payload: Payload,
}

impl UnsecuredObject {
  pub fn new(header: UnsecuredHeader, payload: Payload) -> Self {
    Self { header, payload }
  }

  pub fn header(&self) -> &UnsecuredHeader {
    &self.header
  }

  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  pub fn serialize(&self) -> Result<String, Error> {
    let header_b64 = codec::encode_b64(serde_json::to_vec(&self.header.to_json())?);
    let payload_b64 = codec::encode_b64(self.payload.as_bytes());
    Ok(format!("{header_b64}.{payload_b64}."))
  }

  pub fn parse(compact: &str) -> Result<Self, Error> {
    let parts = super::split_compact(compact, "3", 3)?;
    let header_bytes = codec::decode_b64_str(parts[0], "header")?;
    let header_value: serde_json::Value = serde_json::from_slice(&header_bytes)?;
    let header_map = header_value.as_object().cloned().ok_or(Error::parse(crate::error::ParseReason::InvalidFieldValue {
      field: "header",
      reason: "not a JSON object".into(),
    }))?;
    let header = UnsecuredHeader::parse(header_map)?;
    let payload_bytes = codec::decode_b64_str(parts[1], "payload")?;
    Ok(Self { header, payload: Payload::from_bytes(payload_bytes) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_through_compact_serialization() {
    let object = UnsecuredObject::new(UnsecuredHeader::new(), Payload::from_text("hello"));
    let compact = object.serialize().unwrap();
    assert!(compact.ends_with('.'));
    let parsed = UnsecuredObject::parse(&compact).unwrap();
    assert_eq!(parsed.payload().to_text().unwrap(), "hello");
  }
}
