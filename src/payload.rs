// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Polymorphic JOSE payload (spec.md §3 "Payload") with lossless conversions
//! between its byte/JSON/string projections.

use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::ParseReason;
use crate::jose::JwsObject;
use crate::jwt::ClaimsSet;

/// The content carried by a JOSE object, before or after cryptographic
/// processing. Bytes are the canonical form; JSON object and UTF-8 string
/// are lossless projections of it. `SignedJwt` and `Claims` are convenience
/// views produced on demand by `try_as_signed_jwt`/`try_as_claims` — they are
/// not a third storage representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
  pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
    Self(bytes.into())
  }

  pub fn from_text(text: impl Into<String>) -> Self {
    Self(text.into().into_bytes())
  }

  pub fn from_json(object: Map<String, Value>) -> Result<Self, Error> {
    let bytes = serde_json::to_vec(&Value::Object(object))?;
    Ok(Self(bytes))
  }

  pub fn from_json_value(value: Value) -> Result<Self, Error> {
    if !value.is_object() {
      return Err(Error::invalid_argument("JSON payload must be an object"));
    }
    Ok(Self(serde_json::to_vec(&value)?))
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.0
  }

  pub fn to_text(&self) -> Result<String, Error> {
    String::from_utf8(self.0.clone()).map_err(|_| Error::parse(ParseReason::InvalidUtf8))
  }

  pub fn to_json(&self) -> Result<Value, Error> {
    serde_json::from_slice(&self.0).map_err(Error::from)
  }

  /// Re-enters the compact JWS parser on this payload's bytes. Used by the
  /// nested-JWT detection rule (spec.md §9): triggered by the enclosing
  /// header's `cty == "JWT"`.
  pub fn try_as_signed_jwt(&self) -> Result<JwsObject, Error> {
    let text = self.to_text()?;
    JwsObject::parse(&text)
  }

  /// Interprets this payload's bytes as a JSON claims set (spec.md §3
  /// "ClaimsSet").
  pub fn try_as_claims(&self) -> Result<ClaimsSet, Error> {
    let value = self.to_json()?;
    ClaimsSet::from_json_value(value)
  }
}

impl From<Vec<u8>> for Payload {
  fn from(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_and_bytes_round_trip() {
    let payload = Payload::from_text("hello");
    assert_eq!(payload.as_bytes(), b"hello");
    assert_eq!(payload.to_text().unwrap(), "hello");
  }

  #[test]
  fn json_round_trips_through_bytes() {
    let mut obj = Map::new();
    obj.insert("iss".to_owned(), Value::from("joe"));
    let payload = Payload::from_json(obj.clone()).unwrap();
    assert_eq!(payload.to_json().unwrap(), Value::Object(obj));
  }

  #[test]
  fn invalid_utf8_bytes_reject_text_conversion() {
    let payload = Payload::from_bytes(vec![0xff, 0xfe]);
    assert!(payload.to_text().is_err());
  }
}
