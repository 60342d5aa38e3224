// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::ParseReason;

const RESERVED: &[&str] = &["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// A JWT claims set (RFC 7519 §4, spec.md §3 "ClaimsSet"): the seven
/// registered claims plus any custom ones the issuer adds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimsSet {
  iss: Option<String>,
  sub: Option<String>,
  aud: Vec<String>,
  exp: Option<i64>,
  nbf: Option<i64>,
  iat: Option<i64>,
  jti: Option<String>,
  custom: Map<String, Value>,
}

impl ClaimsSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn iss(&self) -> Option<&str> {
    self.iss.as_deref()
  }

  pub fn set_iss(&mut self, value: impl Into<String>) {
    self.iss = Some(value.into());
  }

  pub fn sub(&self) -> Option<&str> {
    self.sub.as_deref()
  }

  pub fn set_sub(&mut self, value: impl Into<String>) {
    self.sub = Some(value.into());
  }

  pub fn aud(&self) -> &[String] {
    &self.aud
  }

  pub fn set_aud(&mut self, value: Vec<String>) {
    self.aud = value;
  }

  pub fn exp(&self) -> Option<i64> {
    self.exp
  }

  pub fn set_exp(&mut self, value: i64) {
    self.exp = Some(value);
  }

  pub fn nbf(&self) -> Option<i64> {
    self.nbf
  }

  pub fn set_nbf(&mut self, value: i64) {
    self.nbf = Some(value);
  }

  pub fn iat(&self) -> Option<i64> {
    self.iat
  }

  pub fn set_iat(&mut self, value: i64) {
    self.iat = Some(value);
  }

  pub fn jti(&self) -> Option<&str> {
    self.jti.as_deref()
  }

  pub fn set_jti(&mut self, value: impl Into<String>) {
    self.jti = Some(value.into());
  }

  pub fn custom(&self, name: &str) -> Option<&Value> {
    self.custom.get(name)
  }

  pub fn set_custom(&mut self, name: impl Into<String>, value: Value) -> Result<(), Error> {
    let name = name.into();
    if RESERVED.contains(&name.as_str()) {
      return Err(Error::invalid_argument(format!("`{name}` is a registered claim, not a custom one")));
    }
    self.custom.insert(name, value);
    Ok(())
  }

  pub fn custom_claims(&self) -> &Map<String, Value> {
    &self.custom
  }

  /// `aud` accepts either a bare string or an array of strings (RFC 7519
  /// §4.1.3).
  pub fn from_json_value(value: Value) -> Result<Self, Error> {
    let mut map = value
      .as_object()
      .cloned()
      .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "claims", reason: "not a JSON object".into() }))?;

    let iss = map.remove("iss").and_then(|v| v.as_str().map(String::from));
    let sub = map.remove("sub").and_then(|v| v.as_str().map(String::from));
    let aud = match map.remove("aud") {
      None => Vec::new(),
      Some(Value::String(s)) => vec![s],
      Some(Value::Array(items)) => items
        .into_iter()
        .map(|v| {
          v.as_str().map(String::from).ok_or_else(|| {
            Error::parse(ParseReason::InvalidFieldValue { field: "aud", reason: "array element is not a string".into() })
          })
        })
        .collect::<Result<Vec<_>, _>>()?,
      Some(_) => {
        return Err(Error::parse(ParseReason::InvalidFieldValue { field: "aud", reason: "must be a string or array of strings".into() }))
      }
    };
    let exp = map.remove("exp").and_then(|v| v.as_i64());
    let nbf = map.remove("nbf").and_then(|v| v.as_i64());
    let iat = map.remove("iat").and_then(|v| v.as_i64());
    let jti = map.remove("jti").and_then(|v| v.as_str().map(String::from));

    Ok(Self { iss, sub, aud, exp, nbf, iat, jti, custom: map })
  }

  pub fn to_json_value(&self) -> Value {
    let mut map = self.custom.clone();
    if let Some(v) = &self.iss {
      map.insert("iss".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.sub {
      map.insert("sub".to_owned(), Value::from(v.as_str()));
    }
    match self.aud.as_slice() {
      [] => {}
      [single] => {
        map.insert("aud".to_owned(), Value::from(single.as_str()));
      }
      many => {
        map.insert("aud".to_owned(), Value::from(many.to_vec()));
      }
    }
    if let Some(v) = self.exp {
      map.insert("exp".to_owned(), Value::from(v));
    }
    if let Some(v) = self.nbf {
      map.insert("nbf".to_owned(), Value::from(v));
    }
    if let Some(v) = self.iat {
      map.insert("iat".to_owned(), Value::from(v));
    }
    if let Some(v) = &self.jti {
      map.insert("jti".to_owned(), Value::from(v.as_str()));
    }
    Value::Object(map)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn aud_parses_bare_string_as_single_element_array() {
    let claims = ClaimsSet::from_json_value(serde_json::json!({"aud": "service-a"})).unwrap();
    assert_eq!(claims.aud(), &["service-a".to_owned()]);
  }

  #[test]
  fn aud_round_trips_as_array_when_multiple() {
    let mut claims = ClaimsSet::new();
    claims.set_aud(vec!["a".to_owned(), "b".to_owned()]);
    let json = claims.to_json_value();
    assert_eq!(json["aud"], serde_json::json!(["a", "b"]));
    let parsed = ClaimsSet::from_json_value(json).unwrap();
    assert_eq!(parsed.aud(), &["a".to_owned(), "b".to_owned()]);
  }

  #[test]
  fn rejects_custom_claim_with_reserved_name() {
    let mut claims = ClaimsSet::new();
    assert!(claims.set_custom("iss", Value::from("x")).is_err());
  }

  #[test]
  fn round_trips_full_claims_set() {
    let mut claims = ClaimsSet::new();
    claims.set_iss("joe");
    claims.set_exp(1300819380);
    claims.set_custom("http://example.com/is_root", Value::from(true)).unwrap();
    let json = claims.to_json_value();
    let parsed = ClaimsSet::from_json_value(json).unwrap();
    assert_eq!(parsed, claims);
  }
}
