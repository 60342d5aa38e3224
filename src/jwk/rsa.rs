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

/// Additional prime for an RSA key with more than two primes (RFC 7518
/// §6.3.2.7). Rare in practice; modeled for completeness.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaOtherPrime {
  pub r: Vec<u8>,
  pub d: Vec<u8>,
  pub t: Vec<u8>,
}

/// The Chinese Remainder Theorem parameters of an RSA private key (RFC 7518
/// §6.3.2.2 through §6.3.2.6). Present as a set or not at all (spec.md §4.5
/// "RSA CRT-consistency").
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaCrtParams {
  pub p: Vec<u8>,
  pub q: Vec<u8>,
  pub dp: Vec<u8>,
  pub dq: Vec<u8>,
  pub qi: Vec<u8>,
}

/// An RSA JWK (RFC 7518 §6.3).
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaKey {
  #[zeroize(skip)]
  pub(crate) common: KeyCommon,
  pub(crate) n: Vec<u8>,
  pub(crate) e: Vec<u8>,
  pub(crate) d: Option<Vec<u8>>,
  pub(crate) crt: Option<RsaCrtParams>,
  pub(crate) oth: Vec<RsaOtherPrime>,
}

impl RsaKey {
  pub fn n(&self) -> &[u8] {
    &self.n
  }

  pub fn e(&self) -> &[u8] {
    &self.e
  }

  pub fn d(&self) -> Option<&[u8]> {
    self.d.as_deref()
  }

  pub fn crt(&self) -> Option<&RsaCrtParams> {
    self.crt.as_ref()
  }

  pub(crate) fn to_public(&self) -> Self {
    let mut public = self.clone();
    public.d = None;
    public.crt = None;
    public.oth = Vec::new();
    public
  }

  pub(crate) fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let n = take_b64(&mut map, "n")?.ok_or(Error::parse(ParseReason::MissingField { field: "n" }))?;
    let e = take_b64(&mut map, "e")?.ok_or(Error::parse(ParseReason::MissingField { field: "e" }))?;
    let d = take_b64(&mut map, "d")?;
    let p = take_b64(&mut map, "p")?;
    let q = take_b64(&mut map, "q")?;
    let dp = take_b64(&mut map, "dp")?;
    let dq = take_b64(&mut map, "dq")?;
    let qi = take_b64(&mut map, "qi")?;
    let crt = match (p, q, dp, dq, qi) {
      (None, None, None, None, None) => None,
      (Some(p), Some(q), Some(dp), Some(dq), Some(qi)) => Some(RsaCrtParams { p, q, dp, dq, qi }),
      _ => {
        return Err(Error::parse(ParseReason::InvalidFieldValue {
          field: "p/q/dp/dq/qi",
          reason: "CRT parameters must be present as a complete set or not at all".into(),
        }))
      }
    };
    let oth = match map.remove("oth") {
      Some(Value::Array(items)) => items
        .into_iter()
        .map(|item| {
          let mut item_map = item.as_object().cloned().ok_or_else(|| {
            Error::parse(ParseReason::InvalidFieldValue { field: "oth", reason: "not an object".into() })
          })?;
          let r = take_b64(&mut item_map, "r")?.ok_or(Error::parse(ParseReason::MissingField { field: "r" }))?;
          let d = take_b64(&mut item_map, "d")?.ok_or(Error::parse(ParseReason::MissingField { field: "d" }))?;
          let t = take_b64(&mut item_map, "t")?.ok_or(Error::parse(ParseReason::MissingField { field: "t" }))?;
          Ok(RsaOtherPrime { r, d, t })
        })
        .collect::<Result<Vec<_>, Error>>()?,
      Some(_) => {
        return Err(Error::parse(ParseReason::InvalidFieldValue { field: "oth", reason: "not an array".into() }))
      }
      None => Vec::new(),
    };
    let common = KeyCommon::parse(&mut map)?;
    Ok(Self { common, n, e, d, crt, oth })
  }

  pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
    map.insert("n".to_owned(), Value::from(codec::encode_b64(&self.n)));
    map.insert("e".to_owned(), Value::from(codec::encode_b64(&self.e)));
    if let Some(d) = &self.d {
      map.insert("d".to_owned(), Value::from(codec::encode_b64(d)));
    }
    if let Some(crt) = &self.crt {
      map.insert("p".to_owned(), Value::from(codec::encode_b64(&crt.p)));
      map.insert("q".to_owned(), Value::from(codec::encode_b64(&crt.q)));
      map.insert("dp".to_owned(), Value::from(codec::encode_b64(&crt.dp)));
      map.insert("dq".to_owned(), Value::from(codec::encode_b64(&crt.dq)));
      map.insert("qi".to_owned(), Value::from(codec::encode_b64(&crt.qi)));
    }
    if !self.oth.is_empty() {
      let items = self
        .oth
        .iter()
        .map(|p| {
          let mut item = Map::new();
          item.insert("r".to_owned(), Value::from(codec::encode_b64(&p.r)));
          item.insert("d".to_owned(), Value::from(codec::encode_b64(&p.d)));
          item.insert("t".to_owned(), Value::from(codec::encode_b64(&p.t)));
          Value::Object(item)
        })
        .collect::<Vec<_>>();
      map.insert("oth".to_owned(), Value::from(items));
    }
    self.common.write_into(map);
  }
}

/// Builds an [`RsaKey`], enforcing the CRT-consistency invariant at
/// construction time rather than at use time (spec.md §9).
pub struct RsaKeyBuilder {
  n: Option<Vec<u8>>,
  e: Option<Vec<u8>>,
  d: Option<Vec<u8>>,
  crt: Option<RsaCrtParams>,
  oth: Vec<RsaOtherPrime>,
  common: KeyCommon,
}

impl RsaKeyBuilder {
  pub fn new() -> Self {
    Self { n: None, e: None, d: None, crt: None, oth: Vec::new(), common: KeyCommon::default() }
  }

  pub fn n(mut self, n: Vec<u8>) -> Self {
    self.n = Some(n);
    self
  }

  pub fn e(mut self, e: Vec<u8>) -> Self {
    self.e = Some(e);
    self
  }

  pub fn d(mut self, d: Vec<u8>) -> Self {
    self.d = Some(d);
    self
  }

  pub fn crt(mut self, crt: RsaCrtParams) -> Self {
    self.crt = Some(crt);
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

  pub fn build(self) -> Result<RsaKey, Error> {
    self.common.validate()?;
    let n = self.n.ok_or(Error::invalid_argument("RSA key requires `n`"))?;
    let e = self.e.ok_or(Error::invalid_argument("RSA key requires `e`"))?;
    if self.crt.is_some() && self.d.is_none() {
      return Err(Error::invalid_argument("RSA CRT parameters require `d`"));
    }
    Ok(RsaKey { common: self.common, n, e, d: self.d, crt: self.crt, oth: self.oth })
  }
}

impl Default for RsaKeyBuilder {
  fn default() -> Self {
    Self::new()
  }
}
