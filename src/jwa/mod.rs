// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Named algorithm values (RFC 7518) with implementation-requirement tags and
//! family predicates (spec.md §3 "Algorithm", §9 "Sentinel for algorithm
//! families").

use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// RFC 7518 implementation-requirement level for an algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
  Required,
  Recommended,
  Optional,
}

/// `alg` values usable in a JWS header. `NONE` is the sentinel marking an
/// unsecured object (spec.md §3 "Algorithm").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwsAlgorithm {
  #[serde(rename = "HS256")]
  HS256,
  #[serde(rename = "HS384")]
  HS384,
  #[serde(rename = "HS512")]
  HS512,
  #[serde(rename = "RS256")]
  RS256,
  #[serde(rename = "RS384")]
  RS384,
  #[serde(rename = "RS512")]
  RS512,
  #[serde(rename = "ES256")]
  ES256,
  #[serde(rename = "ES384")]
  ES384,
  #[serde(rename = "ES512")]
  ES512,
  #[serde(rename = "PS256")]
  PS256,
  #[serde(rename = "PS384")]
  PS384,
  #[serde(rename = "PS512")]
  PS512,
  #[serde(rename = "EdDSA")]
  EdDSA,
  #[serde(rename = "none")]
  NONE,
}

impl JwsAlgorithm {
  pub const ALL: &'static [JwsAlgorithm] = &[
    Self::HS256,
    Self::HS384,
    Self::HS512,
    Self::RS256,
    Self::RS384,
    Self::RS512,
    Self::ES256,
    Self::ES384,
    Self::ES512,
    Self::PS256,
    Self::PS384,
    Self::PS512,
    Self::EdDSA,
    Self::NONE,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::HS256 => "HS256",
      Self::HS384 => "HS384",
      Self::HS512 => "HS512",
      Self::RS256 => "RS256",
      Self::RS384 => "RS384",
      Self::RS512 => "RS512",
      Self::ES256 => "ES256",
      Self::ES384 => "ES384",
      Self::ES512 => "ES512",
      Self::PS256 => "PS256",
      Self::PS384 => "PS384",
      Self::PS512 => "PS512",
      Self::EdDSA => "EdDSA",
      Self::NONE => "none",
    }
  }

  pub fn requirement(self) -> Requirement {
    match self {
      Self::HS256 | Self::RS256 | Self::NONE => Requirement::Required,
      Self::ES256 | Self::HS384 | Self::HS512 => Requirement::Recommended,
      _ => Requirement::Optional,
    }
  }

  pub fn is_hmac(self) -> bool {
    matches!(self, Self::HS256 | Self::HS384 | Self::HS512)
  }

  pub fn is_rsa(self) -> bool {
    matches!(
      self,
      Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512
    )
  }

  pub fn is_ec(self) -> bool {
    matches!(self, Self::ES256 | Self::ES384 | Self::ES512)
  }

  pub fn is_okp(self) -> bool {
    matches!(self, Self::EdDSA)
  }

  pub fn is_unsecured(self) -> bool {
    matches!(self, Self::NONE)
  }
}

impl fmt::Display for JwsAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// `alg` values usable as a JWE key-management algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JweKeyAlgorithm {
  #[serde(rename = "RSA1_5")]
  RSA1_5,
  #[serde(rename = "RSA-OAEP")]
  RsaOaep,
  #[serde(rename = "RSA-OAEP-256")]
  RsaOaep256,
  #[serde(rename = "A128KW")]
  A128KW,
  #[serde(rename = "A192KW")]
  A192KW,
  #[serde(rename = "A256KW")]
  A256KW,
  #[serde(rename = "dir")]
  Dir,
  #[serde(rename = "ECDH-ES")]
  EcdhEs,
  #[serde(rename = "ECDH-ES+A128KW")]
  EcdhEsA128KW,
  #[serde(rename = "ECDH-ES+A192KW")]
  EcdhEsA192KW,
  #[serde(rename = "ECDH-ES+A256KW")]
  EcdhEsA256KW,
  #[serde(rename = "A128GCMKW")]
  A128GcmKW,
  #[serde(rename = "A192GCMKW")]
  A192GcmKW,
  #[serde(rename = "A256GCMKW")]
  A256GcmKW,
  #[serde(rename = "PBES2-HS256+A128KW")]
  Pbes2Hs256A128KW,
  #[serde(rename = "PBES2-HS384+A192KW")]
  Pbes2Hs384A192KW,
  #[serde(rename = "PBES2-HS512+A256KW")]
  Pbes2Hs512A256KW,
}

impl JweKeyAlgorithm {
  pub const ALL: &'static [JweKeyAlgorithm] = &[
    Self::RSA1_5,
    Self::RsaOaep,
    Self::RsaOaep256,
    Self::A128KW,
    Self::A192KW,
    Self::A256KW,
    Self::Dir,
    Self::EcdhEs,
    Self::EcdhEsA128KW,
    Self::EcdhEsA192KW,
    Self::EcdhEsA256KW,
    Self::A128GcmKW,
    Self::A192GcmKW,
    Self::A256GcmKW,
    Self::Pbes2Hs256A128KW,
    Self::Pbes2Hs384A192KW,
    Self::Pbes2Hs512A256KW,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::RSA1_5 => "RSA1_5",
      Self::RsaOaep => "RSA-OAEP",
      Self::RsaOaep256 => "RSA-OAEP-256",
      Self::A128KW => "A128KW",
      Self::A192KW => "A192KW",
      Self::A256KW => "A256KW",
      Self::Dir => "dir",
      Self::EcdhEs => "ECDH-ES",
      Self::EcdhEsA128KW => "ECDH-ES+A128KW",
      Self::EcdhEsA192KW => "ECDH-ES+A192KW",
      Self::EcdhEsA256KW => "ECDH-ES+A256KW",
      Self::A128GcmKW => "A128GCMKW",
      Self::A192GcmKW => "A192GCMKW",
      Self::A256GcmKW => "A256GCMKW",
      Self::Pbes2Hs256A128KW => "PBES2-HS256+A128KW",
      Self::Pbes2Hs384A192KW => "PBES2-HS384+A192KW",
      Self::Pbes2Hs512A256KW => "PBES2-HS512+A256KW",
    }
  }

  pub fn is_rsa(self) -> bool {
    matches!(self, Self::RSA1_5 | Self::RsaOaep | Self::RsaOaep256)
  }

  pub fn is_aes_kw(self) -> bool {
    matches!(self, Self::A128KW | Self::A192KW | Self::A256KW)
  }

  pub fn is_ecdh_es(self) -> bool {
    matches!(
      self,
      Self::EcdhEs | Self::EcdhEsA128KW | Self::EcdhEsA192KW | Self::EcdhEsA256KW
    )
  }

  pub fn is_aes_gcm_kw(self) -> bool {
    matches!(self, Self::A128GcmKW | Self::A192GcmKW | Self::A256GcmKW)
  }

  pub fn is_pbes2(self) -> bool {
    matches!(
      self,
      Self::Pbes2Hs256A128KW | Self::Pbes2Hs384A192KW | Self::Pbes2Hs512A256KW
    )
  }

  pub fn is_direct(self) -> bool {
    matches!(self, Self::Dir)
  }
}

impl fmt::Display for JweKeyAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// `enc` values: the content-encryption algorithm (spec.md §3 JWEHeader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JweEncryption {
  #[serde(rename = "A128CBC-HS256")]
  A128CbcHs256,
  #[serde(rename = "A192CBC-HS384")]
  A192CbcHs384,
  #[serde(rename = "A256CBC-HS512")]
  A256CbcHs512,
  #[serde(rename = "A128GCM")]
  A128GCM,
  #[serde(rename = "A192GCM")]
  A192GCM,
  #[serde(rename = "A256GCM")]
  A256GCM,
}

impl JweEncryption {
  pub const ALL: &'static [JweEncryption] = &[
    Self::A128CbcHs256,
    Self::A192CbcHs384,
    Self::A256CbcHs512,
    Self::A128GCM,
    Self::A192GCM,
    Self::A256GCM,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::A128CbcHs256 => "A128CBC-HS256",
      Self::A192CbcHs384 => "A192CBC-HS384",
      Self::A256CbcHs512 => "A256CBC-HS512",
      Self::A128GCM => "A128GCM",
      Self::A192GCM => "A192GCM",
      Self::A256GCM => "A256GCM",
    }
  }

  /// Content-encryption key length in bytes.
  pub fn cek_len(self) -> usize {
    match self {
      Self::A128CbcHs256 => 32,
      Self::A192CbcHs384 => 48,
      Self::A256CbcHs512 => 64,
      Self::A128GCM => 16,
      Self::A192GCM => 24,
      Self::A256GCM => 32,
    }
  }

  pub fn is_cbc_hmac(self) -> bool {
    matches!(self, Self::A128CbcHs256 | Self::A192CbcHs384 | Self::A256CbcHs512)
  }

  pub fn is_gcm(self) -> bool {
    matches!(self, Self::A128GCM | Self::A192GCM | Self::A256GCM)
  }
}

impl fmt::Display for JweEncryption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// `zip` compression algorithm identifier. `DEF` is the only RFC-defined
/// value; extension values round-trip as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JweCompression {
  Deflate,
  Other(String),
}

impl JweCompression {
  pub fn name(&self) -> &str {
    match self {
      Self::Deflate => "DEF",
      Self::Other(s) => s,
    }
  }

  pub fn from_name(name: &str) -> Self {
    match name {
      "DEF" => Self::Deflate,
      other => Self::Other(other.to_owned()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn family_predicates_are_disjoint_for_jws() {
    for alg in JwsAlgorithm::ALL {
      let families = [alg.is_hmac(), alg.is_rsa(), alg.is_ec(), alg.is_okp(), alg.is_unsecured()];
      assert_eq!(families.iter().filter(|b| **b).count(), 1, "{alg} matched {families:?}");
    }
  }

  #[test]
  fn jwe_key_algorithm_families_cover_all_members() {
    for alg in JweKeyAlgorithm::ALL {
      let matched =
        alg.is_rsa() || alg.is_aes_kw() || alg.is_ecdh_es() || alg.is_aes_gcm_kw() || alg.is_pbes2() || alg.is_direct();
      assert!(matched, "{alg} matched no family");
    }
  }

  #[test]
  fn compression_round_trips_extension_values() {
    assert_eq!(JweCompression::from_name("DEF"), JweCompression::Deflate);
    assert_eq!(JweCompression::from_name("DEF").name(), "DEF");
    assert_eq!(JweCompression::from_name("XYZ").name(), "XYZ");
  }
}
