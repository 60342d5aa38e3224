// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use super::ClaimsVerifier;
use super::JoseProcessor;
use crate::error::Error;
use crate::jwt::ClaimsSet;

/// Wraps a [`JoseProcessor`] with an optional [`ClaimsVerifier`], turning
/// compact JWT input directly into a validated [`ClaimsSet`] (spec.md §4.7
/// "JwtProcessor composes JoseProcessor with claims verification").
pub struct JwtProcessor<V> {
  inner: JoseProcessor,
  claims_verifier: Option<V>,
}

impl<V: ClaimsVerifier> JwtProcessor<V> {
  pub fn new(inner: JoseProcessor, claims_verifier: Option<V>) -> Self {
    Self { inner, claims_verifier }
  }

  /// Processes `compact` through the inner [`JoseProcessor`], parses the
  /// resulting payload as a claims set, and applies the configured claims
  /// verifier, if any.
  pub fn process(&self, compact: &str) -> Result<ClaimsSet, Error> {
    let payload = self.inner.process(compact)?;
    let claims = payload.try_as_claims()?;
    if let Some(verifier) = &self.claims_verifier {
      verifier.verify(&claims)?;
    }
    Ok(claims)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::JwsHeader;
  use crate::jose::JwsObject;
  use crate::jwa::JwsAlgorithm;
  use crate::jwk::Jwk;
  use crate::jwk::JwkSet;
  use crate::jwk::OctKeyBuilder;
  use crate::payload::Payload;
  use crate::processor::DefaultClaimsVerifier;
  use crate::processor::JwkSetKeySelector;
  use crate::provider::HmacProvider;
  use crate::provider::SignerFactory;
  use crate::source::InMemoryJwkSource;
  use std::time::Duration;

  fn signed_compact_with_exp(key: &Jwk, exp: i64) -> String {
    let header = JwsHeader::new(JwsAlgorithm::HS256);
    let payload = Payload::from_text(format!(r#"{{"iss":"joe","exp":{exp}}}"#));
    let mut object = JwsObject::new(header, payload);
    let signer = HmacProvider::new().create_signer(JwsAlgorithm::HS256, key).unwrap().unwrap();
    object.sign(signer.as_ref()).unwrap();
    object.serialize().unwrap()
  }

  #[test]
  fn rejects_expired_jwt_when_claims_verifier_configured() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![5; 32]).alg("HS256").build().unwrap());
    let set = JwkSet::from_keys(vec![key.clone()]);
    let inner = JoseProcessor::builder()
      .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set)))
      .jws_verifier_factory(HmacProvider::new())
      .build();
    let processor = JwtProcessor::new(inner, Some(DefaultClaimsVerifier::new(Duration::ZERO)));

    let compact = signed_compact_with_exp(&key, 1);
    assert!(processor.process(&compact).is_err());
  }

  #[test]
  fn skips_claims_verification_when_no_verifier_configured() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![5; 32]).alg("HS256").build().unwrap());
    let set = JwkSet::from_keys(vec![key.clone()]);
    let inner = JoseProcessor::builder()
      .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set)))
      .jws_verifier_factory(HmacProvider::new())
      .build();
    let processor: JwtProcessor<DefaultClaimsVerifier> = JwtProcessor::new(inner, None);

    let compact = signed_compact_with_exp(&key, 1);
    let claims = processor.process(&compact).unwrap();
    assert_eq!(claims.exp(), Some(1));
  }
}
