// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;
use url::Url;

use super::require_str;
use super::take_b64;
use super::take_json;
use super::take_str;
use super::take_str_array;
use super::CustomParams;
use super::JoseHeader;
use crate::error::Error;
use crate::error::ParseReason;
use crate::jwa::JwsAlgorithm;
use crate::jwk::Jwk;

const RESERVED: &[&str] = &["alg", "jku", "jwk", "kid", "x5u", "x5c", "x5t", "x5t#S256", "typ", "cty", "crit"];

/// JWS JOSE header (spec.md §3 "JWSHeader", §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct JwsHeader {
  alg: JwsAlgorithm,
  kid: Option<String>,
  jku: Option<Url>,
  jwk: Option<Jwk>,
  x5u: Option<Url>,
  x5c: Option<Vec<String>>,
  x5t: Option<String>,
  x5t_s256: Option<String>,
  typ: Option<String>,
  cty: Option<String>,
  crit: Option<Vec<String>>,
  custom: CustomParams,
}

impl JwsHeader {
  pub fn new(alg: JwsAlgorithm) -> Self {
    Self {
      alg,
      kid: None,
      jku: None,
      jwk: None,
      x5u: None,
      x5c: None,
      x5t: None,
      x5t_s256: None,
      typ: None,
      cty: None,
      crit: None,
      custom: CustomParams::new(),
    }
  }

  pub fn alg(&self) -> JwsAlgorithm {
    self.alg
  }

  pub fn set_alg(&mut self, value: JwsAlgorithm) {
    self.alg = value;
  }

  pub fn kid(&self) -> Option<&str> {
    self.kid.as_deref()
  }

  pub fn set_kid(&mut self, value: impl Into<String>) {
    self.kid = Some(value.into());
  }

  pub fn jku(&self) -> Option<&Url> {
    self.jku.as_ref()
  }

  pub fn set_jku(&mut self, value: Url) {
    self.jku = Some(value);
  }

  /// The inline JWK, always expected to hold only public key material
  /// (spec.md §3 "inline JWK (public only)"). Construction does not enforce
  /// this — callers are expected to pass `Jwk::to_public()` output — because
  /// the header model has no way to reject a private JWK without special-
  /// casing every key type; `JwsObject::sign`/`verify` do not consult this
  /// field, it exists purely for informational/interop purposes.
  pub fn jwk(&self) -> Option<&Jwk> {
    self.jwk.as_ref()
  }

  pub fn set_jwk(&mut self, value: Jwk) {
    self.jwk = Some(value);
  }

  pub fn x5u(&self) -> Option<&Url> {
    self.x5u.as_ref()
  }

  pub fn set_x5u(&mut self, value: Url) {
    self.x5u = Some(value);
  }

  pub fn x5c(&self) -> Option<&[String]> {
    self.x5c.as_deref()
  }

  pub fn set_x5c(&mut self, value: Vec<String>) {
    self.x5c = Some(value);
  }

  pub fn x5t(&self) -> Option<&str> {
    self.x5t.as_deref()
  }

  pub fn set_x5t(&mut self, value: impl Into<String>) {
    self.x5t = Some(value.into());
  }

  pub fn x5t_s256(&self) -> Option<&str> {
    self.x5t_s256.as_deref()
  }

  pub fn set_x5t_s256(&mut self, value: impl Into<String>) {
    self.x5t_s256 = Some(value.into());
  }

  pub fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let alg_name = require_str(&map, "alg")?;
    let alg: JwsAlgorithm = serde_json::from_value(Value::from(alg_name.clone())).map_err(|_| {
      Error::parse(ParseReason::InvalidFieldValue {
        field: "alg",
        reason: format!("unrecognized JWS algorithm `{alg_name}`"),
      })
    })?;
    map.remove("alg");

    let kid = take_str(&mut map, "kid");
    let jku = take_str(&mut map, "jku")
      .map(|s| Url::parse(&s))
      .transpose()
      .map_err(|_| Error::parse(ParseReason::InvalidFieldValue { field: "jku", reason: "not a URI".into() }))?;
    let jwk = match take_json(&mut map, "jwk") {
      Some(v) => Some(Jwk::from_json_value(v)?),
      None => None,
    };
    let x5u = take_str(&mut map, "x5u")
      .map(|s| Url::parse(&s))
      .transpose()
      .map_err(|_| Error::parse(ParseReason::InvalidFieldValue { field: "x5u", reason: "not a URI".into() }))?;
    let x5c = take_str_array(&mut map, "x5c");
    let x5t = take_str(&mut map, "x5t");
    let x5t_s256 = take_str(&mut map, "x5t#S256");
    let typ = take_str(&mut map, "typ");
    let cty = take_str(&mut map, "cty");
    let crit = take_str_array(&mut map, "crit");
    let custom = CustomParams::drain_unreserved(&mut map, RESERVED);

    Ok(Self {
      alg,
      kid,
      jku,
      jwk,
      x5u,
      x5c,
      x5t,
      x5t_s256,
      typ,
      cty,
      crit,
      custom,
    })
  }

  pub fn to_json(&self) -> Result<Value, Error> {
    let mut map = Map::new();
    map.insert("alg".to_owned(), serde_json::to_value(self.alg)?);
    if let Some(v) = &self.kid {
      map.insert("kid".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.jku {
      map.insert("jku".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.jwk {
      map.insert("jwk".to_owned(), v.to_json_value()?);
    }
    if let Some(v) = &self.x5u {
      map.insert("x5u".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.x5c {
      map.insert("x5c".to_owned(), Value::from(v.clone()));
    }
    if let Some(v) = &self.x5t {
      map.insert("x5t".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.x5t_s256 {
      map.insert("x5t#S256".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.typ {
      map.insert("typ".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.cty {
      map.insert("cty".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.crit {
      map.insert("crit".to_owned(), Value::from(v.clone()));
    }
    for (key, value) in self.custom.map() {
      map.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(map))
  }

  /// The base64url-encoded form used as the first segment of the compact
  /// serialization and as the left half of the signable content (spec.md
  /// §4.1, §6).
  pub fn to_base64(&self) -> Result<String, Error> {
    let json = self.to_json()?;
    Ok(crate::codec::encode_b64(serde_json::to_vec(&json)?))
  }
}

impl JoseHeader for JwsHeader {
  fn typ(&self) -> Option<&str> {
    self.typ.as_deref()
  }

  fn set_typ(&mut self, value: impl Into<String>) {
    self.typ = Some(value.into());
  }

  fn cty(&self) -> Option<&str> {
    self.cty.as_deref()
  }

  fn set_cty(&mut self, value: impl Into<String>) {
    self.cty = Some(value.into());
  }

  fn crit(&self) -> Option<&[String]> {
    self.crit.as_deref()
  }

  fn set_crit(&mut self, value: Vec<String>) {
    self.crit = Some(value);
  }

  fn custom(&self, name: &str) -> Option<&Value> {
    self.custom.get(name)
  }

  fn set_custom(&mut self, name: impl Into<String>, value: Value) -> Result<(), Error> {
    self.custom.set(RESERVED, name, value)
  }

  fn custom_params(&self) -> &Map<String, Value> {
    self.custom.map()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn getset_kid() {
    let mut header = JwsHeader::new(JwsAlgorithm::HS256);
    assert_eq!(header.kid(), None);
    header.set_kid("key-1");
    assert_eq!(header.kid(), Some("key-1"));
  }

  #[test]
  fn rejects_custom_alg() {
    let mut header = JwsHeader::new(JwsAlgorithm::HS256);
    assert!(header.set_custom("alg", Value::from("HS384")).is_err());
  }

  #[test]
  fn round_trips_through_json() {
    let mut header = JwsHeader::new(JwsAlgorithm::ES256);
    header.set_kid("did:example:123#key-1");
    header.set_typ("JWT");
    header.set_custom("x-extra", Value::from(1)).unwrap();
    let json = header.to_json().unwrap();
    let parsed = JwsHeader::parse(json.as_object().unwrap().clone()).unwrap();
    assert_eq!(parsed, header);
  }
}
