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
use crate::header::take_b64;

/// A symmetric ("oct") JWK (RFC 7518 §6.4). Always private: there is no
/// public projection of a shared secret (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct OctKey {
  #[zeroize(skip)]
  pub(crate) common: KeyCommon,
  pub(crate) k: Vec<u8>,
}

impl OctKey {
  pub fn k(&self) -> &[u8] {
    &self.k
  }

  pub(crate) fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let k = take_b64(&mut map, "k")?.ok_or(Error::parse(ParseReason::MissingField { field: "k" }))?;
    let common = KeyCommon::parse(&mut map)?;
    Ok(Self { common, k })
  }

  pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
    map.insert("k".to_owned(), Value::from(codec::encode_b64(&self.k)));
    self.common.write_into(map);
  }
}

/// Builds an [`OctKey`].
pub struct OctKeyBuilder {
  k: Option<Vec<u8>>,
  common: KeyCommon,
}

impl OctKeyBuilder {
  pub fn new() -> Self {
    Self { k: None, common: KeyCommon::default() }
  }

  pub fn k(mut self, k: Vec<u8>) -> Self {
    self.k = Some(k);
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

  pub fn build(self) -> Result<OctKey, Error> {
    self.common.validate()?;
    let k = self.k.ok_or(Error::invalid_argument("oct key requires `k`"))?;
    if k.is_empty() {
      return Err(Error::invalid_argument("oct key material must not be empty"));
    }
    Ok(OctKey { common: self.common, k })
  }
}

impl Default for OctKeyBuilder {
  fn default() -> Self {
    Self::new()
  }
}
