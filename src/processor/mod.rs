// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end JOSE/JWT processing: parse, select candidate keys, trial
//! verify/decrypt, unwrap nested JWTs, and (via [`jwt_processor`]) apply a
//! claims verifier (spec.md §4.7 "Processor").

mod claims_verifier;
mod jwt_processor;
mod selector;

pub use claims_verifier::ClaimsVerifier;
pub use claims_verifier::DefaultClaimsVerifier;
pub use claims_verifier::IssuerAudienceVerifier;
pub use jwt_processor::JwtProcessor;
pub use selector::JweKeySelector;
pub use selector::JwkSetKeySelector;
pub use selector::JwsKeySelector;

use crate::error::Error;
use crate::error::PolicyErrorKind;
use crate::header::JoseHeader;
use crate::jose::sniff_compact_kind;
use crate::jose::CompactKind;
use crate::jose::JweObject;
use crate::jose::JwsObject;
use crate::jose::UnsecuredObject;
use crate::payload::Payload;
use crate::provider::ContentCipherFactory;
use crate::provider::KeyDecrypterFactory;
use crate::provider::VerifierFactory;

/// A fully wired JOSE processor: selectors name *which* keys to try,
/// factories build the provider that does the actual cryptography for a
/// given `(alg, key)` pairing (spec.md §6 "configuration options recognized
/// by the JOSE/JWT processor").
pub struct JoseProcessor {
  jws_key_selector: Option<Box<dyn JwsKeySelector>>,
  jwe_key_selector: Option<Box<dyn JweKeySelector>>,
  jws_verifier_factory: Option<Box<dyn VerifierFactory>>,
  jwe_decrypter_factory: Option<Box<dyn KeyDecrypterFactory>>,
  jwe_content_cipher_factory: Option<Box<dyn ContentCipherFactory>>,
  critical_parameter_deferral: Vec<String>,
  accept_unsecured: bool,
}

impl JoseProcessor {
  pub fn builder() -> ProcessorBuilder {
    ProcessorBuilder::new()
  }

  /// Parses and fully processes a compact-serialized JOSE object, returning
  /// its extracted payload. Dispatches on shape, trial-verifies/decrypts
  /// against the configured selector's candidates in order, and unwraps a
  /// nested JWT when `cty == "JWT"` (spec.md §9 "nested JWT detection").
  pub fn process(&self, compact: &str) -> Result<Payload, Error> {
    match sniff_compact_kind(compact)? {
      CompactKind::Unsecured => {
        if !self.accept_unsecured {
          return Err(Error::policy(PolicyErrorKind::UnsecuredRejected));
        }
        let object = UnsecuredObject::parse(compact)?;
        self.finish(object.header().cty(), object.payload().clone())
      }
      CompactKind::Jws => self.process_jws(compact),
      CompactKind::Jwe => self.process_jwe(compact),
    }
  }

  fn process_jws(&self, compact: &str) -> Result<Payload, Error> {
    let mut object = JwsObject::parse(compact)?;
    let selector = self.jws_key_selector.as_deref().ok_or_else(|| Error::policy(PolicyErrorKind::NoMatchingKey))?;
    let factory = self.jws_verifier_factory.as_deref().ok_or_else(|| Error::policy(PolicyErrorKind::NoMatchingKey))?;
    let candidates = selector.select(object.header())?;
    if candidates.is_empty() {
      return Err(Error::policy(PolicyErrorKind::NoMatchingKey));
    }
    let understood: Vec<&str> = self.critical_parameter_deferral.iter().map(String::as_str).collect();

    let mut last_err = Error::policy(PolicyErrorKind::NoMatchingKey);
    for (index, key) in candidates.iter().enumerate() {
      let is_last = index + 1 == candidates.len();
      let verifier = match factory.create_verifier(object.header().alg(), key) {
        None => continue,
        Some(Ok(verifier)) => verifier,
        Some(Err(err)) => {
          last_err = err;
          continue;
        }
      };
      match object.verify(verifier.as_ref(), &understood) {
        Ok(()) => return self.finish(object.header().cty(), object.payload().clone()),
        Err(err) => {
          if err.is_integrity_definitive() && is_last {
            return Err(err);
          }
          last_err = err;
        }
      }
    }
    Err(last_err)
  }

  fn process_jwe(&self, compact: &str) -> Result<Payload, Error> {
    let mut object = JweObject::parse(compact)?;
    let selector = self.jwe_key_selector.as_deref().ok_or_else(|| Error::policy(PolicyErrorKind::NoMatchingKey))?;
    let key_factory = self.jwe_decrypter_factory.as_deref().ok_or_else(|| Error::policy(PolicyErrorKind::NoMatchingKey))?;
    let cipher_factory =
      self.jwe_content_cipher_factory.as_deref().ok_or_else(|| Error::policy(PolicyErrorKind::NoMatchingKey))?;
    let content_cipher = cipher_factory
      .create_content_cipher(object.header().enc())
      .ok_or_else(|| Error::unsupported_algorithm(object.header().enc().name()))?;
    let candidates = selector.select(object.header())?;
    if candidates.is_empty() {
      return Err(Error::policy(PolicyErrorKind::NoMatchingKey));
    }
    let understood: Vec<&str> = self.critical_parameter_deferral.iter().map(String::as_str).collect();

    let mut last_err = Error::policy(PolicyErrorKind::NoMatchingKey);
    for (index, key) in candidates.iter().enumerate() {
      let is_last = index + 1 == candidates.len();
      let decrypter = match key_factory.create_key_decrypter(object.header().alg(), key) {
        None => continue,
        Some(Ok(decrypter)) => decrypter,
        Some(Err(err)) => {
          last_err = err;
          continue;
        }
      };
      match object.decrypt(decrypter.as_ref(), content_cipher.as_ref(), &understood) {
        Ok(()) => {
          let payload = object.payload().expect("DECRYPTED state always carries a payload").clone();
          return self.finish(object.header().cty(), payload);
        }
        Err(err) => {
          if err.is_integrity_definitive() && is_last {
            return Err(err);
          }
          last_err = err;
        }
      }
    }
    Err(last_err)
  }

  /// If the enclosing header's `cty` is `JWT` and the payload's text parses
  /// as another compact JOSE object, recurses into it; otherwise (or on any
  /// failure along the way) returns the payload unchanged (spec.md §9
  /// "if parsing fails, return the payload as bytes without error").
  fn finish(&self, cty: Option<&str>, payload: Payload) -> Result<Payload, Error> {
    let is_nested_jwt = cty.map(|s| s.eq_ignore_ascii_case("JWT")).unwrap_or(false);
    if is_nested_jwt {
      if let Ok(text) = payload.to_text() {
        if let Ok(inner) = self.process(&text) {
          return Ok(inner);
        }
      }
    }
    Ok(payload)
  }
}

/// Builder for [`JoseProcessor`] (spec.md §9 "builders vs. setters").
#[derive(Default)]
pub struct ProcessorBuilder {
  jws_key_selector: Option<Box<dyn JwsKeySelector>>,
  jwe_key_selector: Option<Box<dyn JweKeySelector>>,
  jws_verifier_factory: Option<Box<dyn VerifierFactory>>,
  jwe_decrypter_factory: Option<Box<dyn KeyDecrypterFactory>>,
  jwe_content_cipher_factory: Option<Box<dyn ContentCipherFactory>>,
  critical_parameter_deferral: Vec<String>,
  accept_unsecured: bool,
}

impl ProcessorBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn jws_key_selector(mut self, selector: impl JwsKeySelector + 'static) -> Self {
    self.jws_key_selector = Some(Box::new(selector));
    self
  }

  pub fn jwe_key_selector(mut self, selector: impl JweKeySelector + 'static) -> Self {
    self.jwe_key_selector = Some(Box::new(selector));
    self
  }

  pub fn jws_verifier_factory(mut self, factory: impl VerifierFactory + 'static) -> Self {
    self.jws_verifier_factory = Some(Box::new(factory));
    self
  }

  pub fn jwe_decrypter_factory(mut self, factory: impl KeyDecrypterFactory + 'static) -> Self {
    self.jwe_decrypter_factory = Some(Box::new(factory));
    self
  }

  pub fn jwe_content_cipher_factory(mut self, factory: impl ContentCipherFactory + 'static) -> Self {
    self.jwe_content_cipher_factory = Some(Box::new(factory));
    self
  }

  pub fn critical_parameter_deferral(mut self, names: Vec<String>) -> Self {
    self.critical_parameter_deferral = names;
    self
  }

  /// Accepts `alg: none` input instead of the default `PolicyError{Unsecured}`
  /// rejection (spec.md §4.7 "extension point allows acceptance").
  pub fn accept_unsecured(mut self) -> Self {
    self.accept_unsecured = true;
    self
  }

  pub fn build(self) -> JoseProcessor {
    JoseProcessor {
      jws_key_selector: self.jws_key_selector,
      jwe_key_selector: self.jwe_key_selector,
      jws_verifier_factory: self.jws_verifier_factory,
      jwe_decrypter_factory: self.jwe_decrypter_factory,
      jwe_content_cipher_factory: self.jwe_content_cipher_factory,
      critical_parameter_deferral: self.critical_parameter_deferral,
      accept_unsecured: self.accept_unsecured,
    }
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
  use crate::provider::HmacProvider;
  use crate::provider::SignerFactory;
  use crate::source::InMemoryJwkSource;

  fn signed_compact(key: &Jwk, kid: &str) -> String {
    let mut header = JwsHeader::new(JwsAlgorithm::HS256);
    header.set_kid(kid);
    let payload = Payload::from_text(r#"{"iss":"joe","exp":9999999999}"#);
    let mut object = JwsObject::new(header, payload);
    let signer = HmacProvider::new().create_signer(JwsAlgorithm::HS256, key).unwrap().unwrap();
    object.sign(signer.as_ref()).unwrap();
    object.serialize().unwrap()
  }

  #[test]
  fn selector_ordering_finds_matching_key_regardless_of_position() {
    let a = Jwk::Oct(OctKeyBuilder::new().k(vec![9; 32]).alg("HS256").kid("a").build().unwrap());
    let b_material = vec![7u8; 32];
    let b = Jwk::Oct(OctKeyBuilder::new().k(b_material.clone()).alg("HS256").kid("b").build().unwrap());
    let set = JwkSet::from_keys(vec![a, b.clone()]);
    let compact = signed_compact(&b, "b");

    let processor = JoseProcessor::builder()
      .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set)))
      .jws_verifier_factory(HmacProvider::new())
      .build();

    let payload = processor.process(&compact).unwrap();
    assert_eq!(payload.to_text().unwrap(), r#"{"iss":"joe","exp":9999999999}"#);
  }

  #[test]
  fn no_candidates_fails_with_no_matching_key() {
    let set = JwkSet::new();
    let a = Jwk::Oct(OctKeyBuilder::new().k(vec![9; 32]).alg("HS256").kid("a").build().unwrap());
    let compact = signed_compact(&a, "a");

    let processor = JoseProcessor::builder()
      .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set)))
      .jws_verifier_factory(HmacProvider::new())
      .build();

    assert!(matches!(
      processor.process(&compact),
      Err(Error::Policy { kind: PolicyErrorKind::NoMatchingKey })
    ));
  }

  #[test]
  fn unsecured_input_is_rejected_by_default() {
    let processor = JoseProcessor::builder().build();
    let header = crate::header::UnsecuredHeader::new();
    let compact = UnsecuredObject::new(header, Payload::from_text("x")).serialize().unwrap();
    assert!(matches!(
      processor.process(&compact),
      Err(Error::Policy { kind: PolicyErrorKind::UnsecuredRejected })
    ));
  }
}
