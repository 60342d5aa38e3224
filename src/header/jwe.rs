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
use crate::jwa::JweCompression;
use crate::jwa::JweEncryption;
use crate::jwa::JweKeyAlgorithm;
use crate::jwk::Jwk;

const RESERVED: &[&str] = &[
  "alg", "enc", "zip", "jku", "jwk", "kid", "x5u", "x5c", "x5t", "x5t#S256", "typ", "cty", "crit", "epk", "apu", "apv",
  "p2s", "p2c", "iv", "tag",
];

/// JWE JOSE header (spec.md §3 "JWEHeader", §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct JweHeader {
  alg: JweKeyAlgorithm,
  enc: JweEncryption,
  zip: Option<JweCompression>,
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
  /// Ephemeral public key (ECDH-ES family).
  epk: Option<Jwk>,
  /// Agreement PartyUInfo / PartyVInfo (ECDH-ES key derivation).
  apu: Option<Vec<u8>>,
  apv: Option<Vec<u8>>,
  /// PBES2 salt input / iteration count.
  p2s: Option<Vec<u8>>,
  p2c: Option<u64>,
  /// AES-GCM key wrap initialization vector / authentication tag.
  iv: Option<Vec<u8>>,
  tag: Option<Vec<u8>>,
  custom: CustomParams,
}

impl JweHeader {
  pub fn new(alg: JweKeyAlgorithm, enc: JweEncryption) -> Self {
    Self {
      alg,
      enc,
      zip: None,
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
      epk: None,
      apu: None,
      apv: None,
      p2s: None,
      p2c: None,
      iv: None,
      tag: None,
      custom: CustomParams::new(),
    }
  }

  pub fn alg(&self) -> JweKeyAlgorithm {
    self.alg
  }

  pub fn set_alg(&mut self, value: JweKeyAlgorithm) {
    self.alg = value;
  }

  pub fn enc(&self) -> JweEncryption {
    self.enc
  }

  pub fn set_enc(&mut self, value: JweEncryption) {
    self.enc = value;
  }

  pub fn zip(&self) -> Option<&JweCompression> {
    self.zip.as_ref()
  }

  pub fn set_zip(&mut self, value: JweCompression) {
    self.zip = Some(value);
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

  pub fn epk(&self) -> Option<&Jwk> {
    self.epk.as_ref()
  }

  pub fn set_epk(&mut self, value: Jwk) {
    self.epk = Some(value);
  }

  pub fn apu(&self) -> Option<&[u8]> {
    self.apu.as_deref()
  }

  pub fn set_apu(&mut self, value: Vec<u8>) {
    self.apu = Some(value);
  }

  pub fn apv(&self) -> Option<&[u8]> {
    self.apv.as_deref()
  }

  pub fn set_apv(&mut self, value: Vec<u8>) {
    self.apv = Some(value);
  }

  pub fn p2s(&self) -> Option<&[u8]> {
    self.p2s.as_deref()
  }

  pub fn set_p2s(&mut self, value: Vec<u8>) {
    self.p2s = Some(value);
  }

  pub fn p2c(&self) -> Option<u64> {
    self.p2c
  }

  pub fn set_p2c(&mut self, value: u64) {
    self.p2c = Some(value);
  }

  pub fn iv(&self) -> Option<&[u8]> {
    self.iv.as_deref()
  }

  pub fn set_iv(&mut self, value: Vec<u8>) {
    self.iv = Some(value);
  }

  pub fn tag(&self) -> Option<&[u8]> {
    self.tag.as_deref()
  }

  pub fn set_tag(&mut self, value: Vec<u8>) {
    self.tag = Some(value);
  }

  pub fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let alg_name = require_str(&map, "alg")?;
    let alg: JweKeyAlgorithm = serde_json::from_value(Value::from(alg_name.clone())).map_err(|_| {
      Error::parse(ParseReason::InvalidFieldValue {
        field: "alg",
        reason: format!("unrecognized JWE key algorithm `{alg_name}`"),
      })
    })?;
    map.remove("alg");

    let enc_name = require_str(&map, "enc")?;
    let enc: JweEncryption = serde_json::from_value(Value::from(enc_name.clone())).map_err(|_| {
      Error::parse(ParseReason::InvalidFieldValue {
        field: "enc",
        reason: format!("unrecognized content encryption algorithm `{enc_name}`"),
      })
    })?;
    map.remove("enc");

    let zip = take_str(&mut map, "zip").map(|s| JweCompression::from_name(&s));
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
    let epk = match take_json(&mut map, "epk") {
      Some(v) => Some(Jwk::from_json_value(v)?),
      None => None,
    };
    let apu = take_b64(&mut map, "apu")?;
    let apv = take_b64(&mut map, "apv")?;
    let p2s = take_b64(&mut map, "p2s")?;
    let p2c = map.remove("p2c").and_then(|v| v.as_u64());
    let iv = take_b64(&mut map, "iv")?;
    let tag = take_b64(&mut map, "tag")?;
    let custom = CustomParams::drain_unreserved(&mut map, RESERVED);

    Ok(Self {
      alg,
      enc,
      zip,
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
      epk,
      apu,
      apv,
      p2s,
      p2c,
      iv,
      tag,
      custom,
    })
  }

  pub fn to_json(&self) -> Result<Value, Error> {
    let mut map = Map::new();
    map.insert("alg".to_owned(), serde_json::to_value(self.alg)?);
    map.insert("enc".to_owned(), serde_json::to_value(self.enc)?);
    if let Some(v) = &self.zip {
      map.insert("zip".to_owned(), Value::from(v.name()));
    }
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
    if let Some(v) = &self.epk {
      map.insert("epk".to_owned(), v.to_json_value()?);
    }
    if let Some(v) = &self.apu {
      map.insert("apu".to_owned(), Value::from(crate::codec::encode_b64(v)));
    }
    if let Some(v) = &self.apv {
      map.insert("apv".to_owned(), Value::from(crate::codec::encode_b64(v)));
    }
    if let Some(v) = &self.p2s {
      map.insert("p2s".to_owned(), Value::from(crate::codec::encode_b64(v)));
    }
    if let Some(v) = self.p2c {
      map.insert("p2c".to_owned(), Value::from(v));
    }
    if let Some(v) = &self.iv {
      map.insert("iv".to_owned(), Value::from(crate::codec::encode_b64(v)));
    }
    if let Some(v) = &self.tag {
      map.insert("tag".to_owned(), Value::from(crate::codec::encode_b64(v)));
    }
    for (key, value) in self.custom.map() {
      map.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(map))
  }

  pub fn to_base64(&self) -> Result<String, Error> {
    let json = self.to_json()?;
    Ok(crate::codec::encode_b64(serde_json::to_vec(&json)?))
  }
}

impl JoseHeader for JweHeader {
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
  fn getset_zip() {
    let mut header = JweHeader::new(JweKeyAlgorithm::Dir, JweEncryption::A128GCM);
    assert_eq!(header.zip(), None);
    header.set_zip(JweCompression::Deflate);
    assert_eq!(header.zip(), Some(&JweCompression::Deflate));
  }

  #[test]
  fn round_trips_through_json() {
    let mut header = JweHeader::new(JweKeyAlgorithm::RSA1_5, JweEncryption::A128CbcHs256);
    header.set_kid("enc-key-1");
    header.set_cty("JWT");
    let json = header.to_json().unwrap();
    let parsed = JweHeader::parse(json.as_object().unwrap().clone()).unwrap();
    assert_eq!(parsed, header);
  }
}
