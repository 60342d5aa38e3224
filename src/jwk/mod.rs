// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Key model (RFC 7517/7518/8037, spec.md §3 "Jwk", §4.5).
//!
//! A [`Jwk`] is a tagged union over the four key types this crate models:
//! elliptic curve, RSA, symmetric ("oct"), and octet-string key pairs
//! ("OKP", RFC 8037). Each variant carries its own required/optional
//! parameters plus the common registry parameters (`use`, `key_ops`, `alg`,
//! `kid`, `x5u`, `x5c`, `x5t`, `x5t#S256`) shared across all key types.

mod ec;
mod matcher;
mod oct;
mod okp;
mod rsa;
mod set;
mod selector;

pub use ec::EcCurve;
pub use ec::EcKey;
pub use ec::EcKeyBuilder;
pub use matcher::JwkMatcher;
pub use oct::OctKey;
pub use oct::OctKeyBuilder;
pub use okp::OkpCurve;
pub use okp::OkpKey;
pub use okp::OkpKeyBuilder;
pub use rsa::RsaCrtParams;
pub use rsa::RsaKey;
pub use rsa::RsaKeyBuilder;
pub use rsa::RsaOtherPrime;
pub use selector::select;
pub use set::JwkSet;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Map;
use serde_json::Value;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;

use crate::error::Error;
use crate::error::ParseReason;

/// The `kty` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
  Ec,
  Rsa,
  Oct,
  Okp,
}

impl KeyType {
  pub fn name(self) -> &'static str {
    match self {
      Self::Ec => "EC",
      Self::Rsa => "RSA",
      Self::Oct => "oct",
      Self::Okp => "OKP",
    }
  }
}

impl fmt::Display for KeyType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// The `use` registry parameter (RFC 7517 §4.2). Mutually exclusive with
/// `key_ops` (spec.md §4.5 "use/key_ops mutual exclusivity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUse {
  Sig,
  Enc,
}

impl KeyUse {
  pub fn name(self) -> &'static str {
    match self {
      Self::Sig => "sig",
      Self::Enc => "enc",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "sig" => Some(Self::Sig),
      "enc" => Some(Self::Enc),
      _ => None,
    }
  }
}

/// The `key_ops` registry parameter (RFC 7517 §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOperation {
  Sign,
  Verify,
  Encrypt,
  Decrypt,
  WrapKey,
  UnwrapKey,
  DeriveKey,
  DeriveBits,
}

impl KeyOperation {
  pub fn name(self) -> &'static str {
    match self {
      Self::Sign => "sign",
      Self::Verify => "verify",
      Self::Encrypt => "encrypt",
      Self::Decrypt => "decrypt",
      Self::WrapKey => "wrapKey",
      Self::UnwrapKey => "unwrapKey",
      Self::DeriveKey => "deriveKey",
      Self::DeriveBits => "deriveBits",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "sign" => Some(Self::Sign),
      "verify" => Some(Self::Verify),
      "encrypt" => Some(Self::Encrypt),
      "decrypt" => Some(Self::Decrypt),
      "wrapKey" => Some(Self::WrapKey),
      "unwrapKey" => Some(Self::UnwrapKey),
      "deriveKey" => Some(Self::DeriveKey),
      "deriveBits" => Some(Self::DeriveBits),
      _ => None,
    }
  }
}

/// Registry parameters shared by every key type (RFC 7517 §4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct KeyCommon {
  pub(crate) key_use: Option<KeyUse>,
  pub(crate) key_ops: Option<Vec<KeyOperation>>,
  pub(crate) alg: Option<String>,
  pub(crate) kid: Option<String>,
  pub(crate) x5u: Option<String>,
  pub(crate) x5c: Option<Vec<String>>,
  pub(crate) x5t: Option<String>,
  pub(crate) x5t_s256: Option<String>,
}

impl KeyCommon {
  /// Enforces the `use`/`key_ops` mutual-exclusivity invariant (spec.md
  /// §4.5). Called by every builder before it hands back a `Jwk`.
  pub(crate) fn validate(&self) -> Result<(), Error> {
    if self.key_use.is_some() && self.key_ops.is_some() {
      return Err(Error::parse(ParseReason::ReservedFieldConflict { fields: ("use", "key_ops") }));
    }
    Ok(())
  }

  pub(crate) fn parse(map: &mut Map<String, Value>) -> Result<Self, Error> {
    let key_use = crate::header::take_str(map, "use")
      .map(|s| KeyUse::parse(&s).ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "use", reason: s })))
      .transpose()?;
    let key_ops = match map.remove("key_ops") {
      Some(Value::Array(items)) => {
        let mut ops = Vec::with_capacity(items.len());
        for item in items {
          let name = item.as_str().ok_or_else(|| {
            Error::parse(ParseReason::InvalidFieldValue { field: "key_ops", reason: "not a string".into() })
          })?;
          ops.push(KeyOperation::parse(name).ok_or_else(|| {
            Error::parse(ParseReason::InvalidFieldValue { field: "key_ops", reason: name.to_owned() })
          })?);
        }
        Some(ops)
      }
      Some(_) => {
        return Err(Error::parse(ParseReason::InvalidFieldValue {
          field: "key_ops",
          reason: "not an array".into(),
        }))
      }
      None => None,
    };
    let common = Self {
      key_use,
      key_ops,
      alg: crate::header::take_str(map, "alg"),
      kid: crate::header::take_str(map, "kid"),
      x5u: crate::header::take_str(map, "x5u"),
      x5c: crate::header::take_str_array(map, "x5c"),
      x5t: crate::header::take_str(map, "x5t"),
      x5t_s256: crate::header::take_str(map, "x5t#S256"),
    };
    common.validate()?;
    Ok(common)
  }

  pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
    if let Some(v) = self.key_use {
      map.insert("use".to_owned(), Value::from(v.name()));
    }
    if let Some(v) = &self.key_ops {
      map.insert("key_ops".to_owned(), Value::from(v.iter().map(|o| o.name()).collect::<Vec<_>>()));
    }
    if let Some(v) = &self.alg {
      map.insert("alg".to_owned(), Value::from(v.as_str()));
    }
    if let Some(v) = &self.kid {
      map.insert("kid".to_owned(), Value::from(v.as_str()));
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
  }
}

/// Digest used to compute a JWK thumbprint (RFC 7638 §3.1 permits any
/// hash function; SHA-256 is the common default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbprintHash {
  Sha256,
  Sha1,
}

/// A JSON Web Key (spec.md §3 "Jwk").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jwk {
  Ec(EcKey),
  Rsa(RsaKey),
  Oct(OctKey),
  Okp(OkpKey),
}

impl Jwk {
  pub fn kty(&self) -> KeyType {
    match self {
      Self::Ec(_) => KeyType::Ec,
      Self::Rsa(_) => KeyType::Rsa,
      Self::Oct(_) => KeyType::Oct,
      Self::Okp(_) => KeyType::Okp,
    }
  }

  pub(crate) fn common(&self) -> &KeyCommon {
    match self {
      Self::Ec(k) => &k.common,
      Self::Rsa(k) => &k.common,
      Self::Oct(k) => &k.common,
      Self::Okp(k) => &k.common,
    }
  }

  pub fn key_use(&self) -> Option<KeyUse> {
    self.common().key_use
  }

  pub fn key_ops(&self) -> Option<&[KeyOperation]> {
    self.common().key_ops.as_deref()
  }

  pub fn alg(&self) -> Option<&str> {
    self.common().alg.as_deref()
  }

  pub fn kid(&self) -> Option<&str> {
    self.common().kid.as_deref()
  }

  pub fn x5t(&self) -> Option<&str> {
    self.common().x5t.as_deref()
  }

  pub fn x5t_s256(&self) -> Option<&str> {
    self.common().x5t_s256.as_deref()
  }

  /// Whether this key carries private material (a signing/decryption
  /// secret), as opposed to only public verification/encryption material.
  pub fn is_private(&self) -> bool {
    match self {
      Self::Ec(k) => k.d.is_some(),
      Self::Rsa(k) => k.d.is_some(),
      Self::Oct(_) => true,
      Self::Okp(k) => k.d.is_some(),
    }
  }

  /// Strips private material, returning a key safe to publish. `Oct` keys
  /// have no public representation and return `None` (spec.md §4.5
  /// "oct keys are always private").
  pub fn to_public(&self) -> Option<Jwk> {
    match self {
      Self::Ec(k) => Some(Jwk::Ec(k.to_public())),
      Self::Rsa(k) => Some(Jwk::Rsa(k.to_public())),
      Self::Oct(_) => None,
      Self::Okp(k) => Some(Jwk::Okp(k.to_public())),
    }
  }

  /// The lexicographically-ordered required members used for the RFC 7638
  /// thumbprint input, per key type (spec.md §4.5).
  fn thumbprint_members(&self) -> BTreeMap<&'static str, String> {
    let mut members = BTreeMap::new();
    match self {
      Self::Ec(k) => {
        members.insert("crv", k.curve.name().to_owned());
        members.insert("kty", "EC".to_owned());
        members.insert("x", crate::codec::encode_b64(&k.x));
        members.insert("y", crate::codec::encode_b64(&k.y));
      }
      Self::Rsa(k) => {
        members.insert("e", crate::codec::encode_b64(&k.e));
        members.insert("kty", "RSA".to_owned());
        members.insert("n", crate::codec::encode_b64(&k.n));
      }
      Self::Oct(k) => {
        members.insert("k", crate::codec::encode_b64(&k.k));
        members.insert("kty", "oct".to_owned());
      }
      Self::Okp(k) => {
        members.insert("crv", k.curve.name().to_owned());
        members.insert("kty", "OKP".to_owned());
        members.insert("x", crate::codec::encode_b64(&k.x));
      }
    }
    members
  }

  /// Computes the RFC 7638 JWK thumbprint as raw digest bytes.
  pub fn thumbprint(&self, hash: ThumbprintHash) -> Result<Vec<u8>, Error> {
    let members = self.thumbprint_members();
    let canonical = serde_json::to_vec(&members)?;
    Ok(match hash {
      ThumbprintHash::Sha256 => Sha256::digest(&canonical).to_vec(),
      ThumbprintHash::Sha1 => Sha1::digest(&canonical).to_vec(),
    })
  }

  /// The SHA-256 thumbprint, base64url-encoded — the form most commonly
  /// used as a `kid` value.
  pub fn thumbprint_b64(&self) -> Result<String, Error> {
    Ok(crate::codec::encode_b64(self.thumbprint(ThumbprintHash::Sha256)?))
  }

  pub fn from_json_value(value: Value) -> Result<Self, Error> {
    let Value::Object(mut map) = value else {
      return Err(Error::parse(ParseReason::InvalidFieldValue {
        field: "jwk",
        reason: "not a JSON object".into(),
      }));
    };
    let kty = crate::header::require_str(&map, "kty")?;
    map.remove("kty");
    match kty.as_str() {
      "EC" => Ok(Jwk::Ec(EcKey::parse(map)?)),
      "RSA" => Ok(Jwk::Rsa(RsaKey::parse(map)?)),
      "oct" => Ok(Jwk::Oct(OctKey::parse(map)?)),
      "OKP" => Ok(Jwk::Okp(OkpKey::parse(map)?)),
      other => Err(Error::parse(ParseReason::InvalidFieldValue {
        field: "kty",
        reason: format!("unrecognized key type `{other}`"),
      })),
    }
  }

  pub fn to_json_value(&self) -> Result<Value, Error> {
    let mut map = Map::new();
    map.insert("kty".to_owned(), Value::from(self.kty().name()));
    match self {
      Self::Ec(k) => k.write_into(&mut map),
      Self::Rsa(k) => k.write_into(&mut map),
      Self::Oct(k) => k.write_into(&mut map),
      Self::Okp(k) => k.write_into(&mut map),
    }
    Ok(Value::Object(map))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn thumbprint_matches_rfc7638_example() {
    // RFC 7638 §3.1 example key and expected thumbprint.
    let mut map = Map::new();
    map.insert("kty".to_owned(), Value::from("RSA"));
    map.insert(
      "n".to_owned(),
      Value::from(
        "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
      ),
    );
    map.insert("e".to_owned(), Value::from("AQAB"));
    map.insert("alg".to_owned(), Value::from("RS256"));
    map.insert("kid".to_owned(), Value::from("2011-04-29"));
    let key = Jwk::from_json_value(Value::Object(map)).unwrap();
    assert_eq!(key.thumbprint_b64().unwrap(), "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs");
  }

  #[test]
  fn oct_key_has_no_public_projection() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1, 2, 3]).build().unwrap());
    assert!(key.to_public().is_none());
  }
}
