// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;
use zeroize::Zeroize;
use zeroize::ZeroizeOnDrop;

use super::KeyCommon;
use super::KeyOperation;
use super::KeyUse;
use crate::codec;
use crate::error::Error;
use crate::error::ParseReason;
use crate::header::require_str;
use crate::header::take_b64;

/// `crv` values for EC keys (RFC 7518 §6.2.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
  P256,
  P384,
  P521,
}

impl EcCurve {
  pub fn name(self) -> &'static str {
    match self {
      Self::P256 => "P-256",
      Self::P384 => "P-384",
      Self::P521 => "P-521",
    }
  }

  pub fn parse(name: &str) -> Option<Self> {
    match name {
      "P-256" => Some(Self::P256),
      "P-384" => Some(Self::P384),
      "P-521" => Some(Self::P521),
      _ => None,
    }
  }

  /// Coordinate length in bytes, used to pad/validate `x`/`y`/`d` (spec.md
  /// §4.5 "EC coordinate octet length").
  pub fn coordinate_len(self) -> usize {
    match self {
      Self::P256 => 32,
      Self::P384 => 48,
      Self::P521 => 66,
    }
  }
}

/// An elliptic-curve JWK (RFC 7518 §6.2).
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EcKey {
  #[zeroize(skip)]
  pub(crate) common: KeyCommon,
  #[zeroize(skip)]
  pub(crate) curve: EcCurve,
  pub(crate) x: Vec<u8>,
  pub(crate) y: Vec<u8>,
  pub(crate) d: Option<Vec<u8>>,
}

impl EcKey {
  pub fn curve(&self) -> EcCurve {
    self.curve
  }

  pub fn x(&self) -> &[u8] {
    &self.x
  }

  pub fn y(&self) -> &[u8] {
    &self.y
  }

  pub fn d(&self) -> Option<&[u8]> {
    self.d.as_deref()
  }

  pub(crate) fn to_public(&self) -> Self {
    let mut public = self.clone();
    public.d = None;
    public
  }

  /// Parses an EC JWK, left-padding `x`/`y`/`d` to the curve's coordinate
  /// length. RFC 7518 §6.2.1 requires encoders to emit full-length
  /// coordinates, but some legacy producers omit leading zero bytes; parsing
  /// normalizes those short inputs so every accessor and the RFC 7638
  /// thumbprint see a consistently-padded coordinate (spec.md §4.5, §8).
  pub(crate) fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let crv = require_str(&map, "crv")?;
    let curve = EcCurve::parse(&crv)
      .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "crv", reason: crv.clone() }))?;
    map.remove("crv");
    let len = curve.coordinate_len();
    let x = take_b64(&mut map, "x")?.ok_or(Error::parse(ParseReason::MissingField { field: "x" }))?;
    let y = take_b64(&mut map, "y")?.ok_or(Error::parse(ParseReason::MissingField { field: "y" }))?;
    let d = take_b64(&mut map, "d")?;
    let common = KeyCommon::parse(&mut map)?;
    Ok(Self {
      common,
      curve,
      x: codec::pad_to_length(&x, len),
      y: codec::pad_to_length(&y, len),
      d: d.map(|d| codec::pad_to_length(&d, len)),
    })
  }

  pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
    map.insert("crv".to_owned(), Value::from(self.curve.name()));
    map.insert("x".to_owned(), Value::from(codec::encode_b64(&self.x)));
    map.insert("y".to_owned(), Value::from(codec::encode_b64(&self.y)));
    if let Some(d) = &self.d {
      map.insert("d".to_owned(), Value::from(codec::encode_b64(d)));
    }
    self.common.write_into(map);
  }
}

/// Builds an [`EcKey`], validating coordinate lengths against the chosen
/// curve before construction (spec.md §9 "builders vs. setters").
pub struct EcKeyBuilder {
  curve: EcCurve,
  x: Option<Vec<u8>>,
  y: Option<Vec<u8>>,
  d: Option<Vec<u8>>,
  common: KeyCommon,
}

impl EcKeyBuilder {
  pub fn new(curve: EcCurve) -> Self {
    Self { curve, x: None, y: None, d: None, common: KeyCommon::default() }
  }

  pub fn x(mut self, x: Vec<u8>) -> Self {
    self.x = Some(x);
    self
  }

  pub fn x_b64(mut self, x: &str) -> Result<Self, Error> {
    self.x = Some(codec::decode_b64_str(x, "x")?);
    Ok(self)
  }

  pub fn y(mut self, y: Vec<u8>) -> Self {
    self.y = Some(y);
    self
  }

  pub fn y_b64(mut self, y: &str) -> Result<Self, Error> {
    self.y = Some(codec::decode_b64_str(y, "y")?);
    Ok(self)
  }

  pub fn d(mut self, d: Vec<u8>) -> Self {
    self.d = Some(d);
    self
  }

  pub fn key_use(mut self, value: KeyUse) -> Self {
    self.common.key_use = Some(value);
    self
  }

  pub fn key_ops(mut self, value: Vec<KeyOperation>) -> Self {
    self.common.key_ops = Some(value);
    self
  }

  pub fn alg(mut self, value: impl Into<String>) -> Self {
    self.common.alg = Some(value.into());
    self
  }

  pub fn kid(mut self, value: impl Into<String>) -> Self {
    self.common.kid = Some(value.into());
    self
  }

  pub fn build(self) -> Result<EcKey, Error> {
    self.common.validate()?;
    let len = self.curve.coordinate_len();
    let x = self.x.ok_or(Error::invalid_argument("EC key requires `x`"))?;
    let y = self.y.ok_or(Error::invalid_argument("EC key requires `y`"))?;
    if x.len() != len || y.len() != len {
      return Err(Error::invalid_argument(format!(
        "{} coordinates must be {len} bytes",
        self.curve.name()
      )));
    }
    if let Some(d) = &self.d {
      if d.len() != len {
        return Err(Error::invalid_argument(format!("{} private scalar must be {len} bytes", self.curve.name())));
      }
    }
    Ok(EcKey { common: self.common, curve: self.curve, x, y, d: self.d })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Map;

  fn field(bytes: &[u8]) -> Value {
    Value::from(codec::encode_b64(bytes))
  }

  #[test]
  fn parse_left_pads_short_legacy_coordinates() {
    let mut map = Map::new();
    map.insert("crv".to_owned(), Value::from("P-256"));
    // One byte short of P-256's 32-byte coordinate length.
    map.insert("x".to_owned(), field(&[0x01; 31]));
    map.insert("y".to_owned(), field(&[0x02; 31]));
    let key = EcKey::parse(map).unwrap();
    assert_eq!(key.x().len(), 32);
    assert_eq!(key.x()[0], 0x00);
    assert_eq!(&key.x()[1..], [0x01; 31]);
    assert_eq!(key.y().len(), 32);
    assert_eq!(key.y()[0], 0x00);
  }

  #[test]
  fn parse_leaves_full_length_coordinates_unchanged() {
    let mut map = Map::new();
    map.insert("crv".to_owned(), Value::from("P-256"));
    map.insert("x".to_owned(), field(&[0x01; 32]));
    map.insert("y".to_owned(), field(&[0x02; 32]));
    let key = EcKey::parse(map).unwrap();
    assert_eq!(key.x(), &[0x01; 32]);
    assert_eq!(key.y(), &[0x02; 32]);
  }
}
