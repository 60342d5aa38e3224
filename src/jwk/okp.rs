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

/// `crv` values for OKP keys (RFC 8037 §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OkpCurve {
  Ed25519,
  X25519,
}

impl OkpCurve {
  pub fn name(self) -> &'static str {
    match self {
      Self::Ed25519 => "Ed25519",
      Self::X25519 => "X25519",
    }
  }

  pub fn parse(name: &str) -> Option<Self> {
    match name {
      "Ed25519" => Some(Self::Ed25519),
      "X25519" => Some(Self::X25519),
      _ => None,
    }
  }

  /// Both RFC 8037 curves use 32-byte public/private values.
  pub fn coordinate_len(self) -> usize {
    32
  }
}

/// An octet key pair JWK (RFC 8037), used for EdDSA signatures and X25519
/// key agreement (spec.md §9 "SUPPLEMENTED FEATURES").
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct OkpKey {
  #[zeroize(skip)]
  pub(crate) common: KeyCommon,
  #[zeroize(skip)]
  pub(crate) curve: OkpCurve,
  pub(crate) x: Vec<u8>,
  pub(crate) d: Option<Vec<u8>>,
}

impl OkpKey {
  pub fn curve(&self) -> OkpCurve {
    self.curve
  }

  pub fn x(&self) -> &[u8] {
    &self.x
  }

  pub fn d(&self) -> Option<&[u8]> {
    self.d.as_deref()
  }

  pub(crate) fn to_public(&self) -> Self {
    let mut public = self.clone();
    public.d = None;
    public
  }

  pub(crate) fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let crv = require_str(&map, "crv")?;
    let curve = OkpCurve::parse(&crv)
      .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "crv", reason: crv.clone() }))?;
    map.remove("crv");
    let x = take_b64(&mut map, "x")?.ok_or(Error::parse(ParseReason::MissingField { field: "x" }))?;
    let d = take_b64(&mut map, "d")?;
    let common = KeyCommon::parse(&mut map)?;
    Ok(Self { common, curve, x, d })
  }

  pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
    map.insert("crv".to_owned(), Value::from(self.curve.name()));
    map.insert("x".to_owned(), Value::from(codec::encode_b64(&self.x)));
    if let Some(d) = &self.d {
      map.insert("d".to_owned(), Value::from(codec::encode_b64(d)));
    }
    self.common.write_into(map);
  }
}

/// Builds an [`OkpKey`].
pub struct OkpKeyBuilder {
  curve: OkpCurve,
  x: Option<Vec<u8>>,
  d: Option<Vec<u8>>,
  common: KeyCommon,
}

impl OkpKeyBuilder {
  pub fn new(curve: OkpCurve) -> Self {
    Self { curve, x: None, d: None, common: KeyCommon::default() }
  }

  pub fn x(mut self, x: Vec<u8>) -> Self {
    self.x = Some(x);
    self
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

  pub fn build(self) -> Result<OkpKey, Error> {
    self.common.validate()?;
    let len = self.curve.coordinate_len();
    let x = self.x.ok_or(Error::invalid_argument("OKP key requires `x`"))?;
    if x.len() != len {
      return Err(Error::invalid_argument(format!("{} public value must be {len} bytes", self.curve.name())));
    }
    if let Some(d) = &self.d {
      if d.len() != len {
        return Err(Error::invalid_argument(format!("{} private value must be {len} bytes", self.curve.name())));
      }
    }
    Ok(OkpKey { common: self.common, curve: self.curve, x, d: self.d })
  }
}
