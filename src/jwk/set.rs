// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;

use super::Jwk;
use crate::error::Error;
use crate::error::ParseReason;

/// A JWK Set (RFC 7517 §5): an ordered list of keys plus any unrecognized
/// top-level members, preserved for round-tripping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwkSet {
  keys: Vec<Jwk>,
  custom: Map<String, Value>,
}

impl JwkSet {
  pub fn new() -> Self {
    Self { keys: Vec::new(), custom: Map::new() }
  }

  pub fn from_keys(keys: Vec<Jwk>) -> Self {
    Self { keys, custom: Map::new() }
  }

  pub fn keys(&self) -> &[Jwk] {
    &self.keys
  }

  pub fn push(&mut self, key: Jwk) {
    self.keys.push(key);
  }

  pub fn iter(&self) -> impl Iterator<Item = &Jwk> {
    self.keys.iter()
  }

  pub fn find_by_kid(&self, kid: &str) -> Option<&Jwk> {
    self.keys.iter().find(|k| k.kid() == Some(kid))
  }

  /// A copy of this set with every key projected to its public form. Keys
  /// with no public representation (`oct`) are dropped (spec.md §4.5,
  /// §4.6 "publishable JWK set").
  pub fn to_public(&self) -> Self {
    Self { keys: self.keys.iter().filter_map(Jwk::to_public).collect(), custom: self.custom.clone() }
  }

  pub fn parse(value: &str) -> Result<Self, Error> {
    let root: Value = serde_json::from_str(value)?;
    let Value::Object(mut map) = root else {
      return Err(Error::parse(ParseReason::InvalidFieldValue {
        field: "keys",
        reason: "JWK set must be a JSON object".into(),
      }));
    };
    let raw_keys = map
      .remove("keys")
      .ok_or(Error::parse(ParseReason::MissingField { field: "keys" }))?;
    let Value::Array(items) = raw_keys else {
      return Err(Error::parse(ParseReason::InvalidFieldValue { field: "keys", reason: "not an array".into() }));
    };
    let keys = items.into_iter().map(Jwk::from_json_value).collect::<Result<Vec<_>, Error>>()?;
    Ok(Self { keys, custom: map })
  }

  pub fn to_json(&self) -> Result<Value, Error> {
    let mut map = self.custom.clone();
    let keys = self.keys.iter().map(Jwk::to_json_value).collect::<Result<Vec<_>, Error>>()?;
    map.insert("keys".to_owned(), Value::from(keys));
    Ok(Value::Object(map))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_through_json() {
    let key = crate::jwk::OctKeyBuilder::new().k(vec![1, 2, 3, 4]).kid("k1").build().unwrap();
    let set = JwkSet::from_keys(vec![Jwk::Oct(key)]);
    let json = serde_json::to_string(&set.to_json().unwrap()).unwrap();
    let parsed = JwkSet::parse(&json).unwrap();
    assert_eq!(parsed.keys().len(), 1);
    assert_eq!(parsed.find_by_kid("k1").unwrap().kid(), Some("k1"));
  }

  #[test]
  fn to_public_drops_oct_keys() {
    let key = crate::jwk::OctKeyBuilder::new().k(vec![9, 9, 9]).build().unwrap();
    let set = JwkSet::from_keys(vec![Jwk::Oct(key)]);
    assert!(set.to_public().keys().is_empty());
  }
}
