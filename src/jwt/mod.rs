// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Tokens: a [`ClaimsSet`] carried by one of the three JOSE object
//! lifecycles (spec.md §3 "JWT layer", "type dispatch over plain/signed/
//! encrypted").

mod builder;
mod claims;

pub use builder::ClaimsSetBuilder;
pub use claims::ClaimsSet;

use crate::error::Error;
use crate::jose::sniff_compact_kind;
use crate::jose::CompactKind;
use crate::jose::JweObject;
use crate::jose::JwsObject;
use crate::jose::UnsecuredObject;
use crate::payload::Payload;

/// A parsed JWT before cryptographic processing: its payload is a
/// [`ClaimsSet`] once unwrapped, but which JOSE lifecycle wraps it depends on
/// how it arrived over the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Jwt {
  Unsecured(UnsecuredObject),
  Signed(JwsObject),
  Encrypted(JweObject),
}

impl Jwt {
  /// Parses a compact-serialized token, dispatching on [`sniff_compact_kind`]
  /// to the matching JOSE object type. Does not verify a signature or
  /// decrypt ciphertext — use [`crate::processor::JoseProcessor`] for that.
  pub fn parse(compact: &str) -> Result<Self, Error> {
    match sniff_compact_kind(compact)? {
      CompactKind::Unsecured => Ok(Jwt::Unsecured(UnsecuredObject::parse(compact)?)),
      CompactKind::Jws => Ok(Jwt::Signed(JwsObject::parse(compact)?)),
      CompactKind::Jwe => Ok(Jwt::Encrypted(JweObject::parse(compact)?)),
    }
  }

  /// The claims set carried by an [`Jwt::Unsecured`] token, or a signed/
  /// encrypted token whose payload has already been produced by successful
  /// verification or decryption. Returns `None` for a signed token not yet
  /// verified or an encrypted token not yet decrypted.
  pub fn claims(&self) -> Result<Option<ClaimsSet>, Error> {
    let payload: Option<&Payload> = match self {
      Jwt::Unsecured(object) => Some(object.payload()),
      Jwt::Signed(object) => Some(object.payload()),
      Jwt::Encrypted(object) => object.payload(),
    };
    payload.map(|p| p.try_as_claims()).transpose()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::UnsecuredHeader;

  #[test]
  fn parses_unsecured_and_extracts_claims() {
    let claims = ClaimsSetBuilder::new().iss("joe").exp(1300819380).build();
    let payload = Payload::from_json_value(claims.to_json_value()).unwrap();
    let compact = UnsecuredObject::new(UnsecuredHeader::new(), payload).serialize().unwrap();

    let jwt = Jwt::parse(&compact).unwrap();
    assert!(matches!(jwt, Jwt::Unsecured(_)));
    assert_eq!(jwt.claims().unwrap().unwrap().iss(), Some("joe"));
  }
}
