// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use jose::header::JoseHeader;
use jose::header::JweHeader;
use jose::header::JwsHeader;
use jose::header::UnsecuredHeader;
use jose::jose::JweObject;
use jose::jose::JwsObject;
use jose::jose::UnsecuredObject;
use jose::jwa::JweEncryption;
use jose::jwa::JweKeyAlgorithm;
use jose::jwa::JwsAlgorithm;
use jose::jwk::Jwk;
use jose::jwk::JwkSet;
use jose::jwk::OctKeyBuilder;
use jose::jwt::ClaimsSetBuilder;
use jose::processor::DefaultClaimsVerifier;
use jose::processor::JoseProcessor;
use jose::processor::JwkSetKeySelector;
use jose::processor::JwtProcessor;
use jose::provider::AesCbcHmacCipherProvider;
use jose::provider::ContentCipherFactory;
use jose::provider::DirectKeyProvider;
use jose::provider::HmacProvider;
use jose::provider::KeyDecrypterFactory;
use jose::provider::KeyEncrypterFactory;
use jose::provider::SignerFactory;
use jose::source::InMemoryJwkSource;
use jose::Error;
use jose::Payload;
use jose::PolicyErrorKind;
use pretty_assertions::assert_eq;

fn hs256_key(seed: u8) -> Jwk {
  Jwk::Oct(OctKeyBuilder::new().k(vec![seed; 32]).alg("HS256").build().unwrap())
}

fn signed_compact(key: &Jwk, kid: &str, claims_json: &str) -> String {
  let mut header = JwsHeader::new(JwsAlgorithm::HS256);
  header.set_kid(kid);
  let mut object = JwsObject::new(header, Payload::from_text(claims_json));
  let signer = HmacProvider::new().create_signer(JwsAlgorithm::HS256, key).unwrap().unwrap();
  object.sign(signer.as_ref()).unwrap();
  object.serialize().unwrap()
}

// Scenario 1: unsecured JWT round-trip.
#[test]
fn unsecured_jwt_round_trips_claims() {
  let claims =
    ClaimsSetBuilder::new().iss("joe").exp(1300819380).custom("http://example.com/is_root", true.into()).unwrap().build();

  let header = UnsecuredHeader::new();
  let object = UnsecuredObject::new(header, Payload::from_json_value(claims.to_json_value()).unwrap());
  let compact = object.serialize().unwrap();
  assert!(compact.ends_with('.'));

  let parsed = UnsecuredObject::parse(&compact).unwrap();
  let parsed_claims = parsed.payload().try_as_claims().unwrap();
  assert_eq!(parsed_claims, claims);
}

// Scenario 3 (shape): a JWE whose protected header declares `cty: JWT` wraps
// a signed JWT; the processor must decrypt then recursively verify and
// return the inner claims, never the outer compact-encoded JWS text.
#[test]
fn jwe_wrapped_jwt_is_unwrapped_by_the_processor() {
  let signing_key = hs256_key(0x11);
  let inner_compact = signed_compact(&signing_key, "inner", r#"{"iss":"joe","exp":9999999999}"#);

  let mut jwe_header = JweHeader::new(JweKeyAlgorithm::Dir, JweEncryption::A128CbcHs256);
  jwe_header.set_cty("JWT");
  let mut jwe = JweObject::new(jwe_header, Payload::from_text(inner_compact));

  let cek_key = Jwk::Oct(OctKeyBuilder::new().k(vec![0x22; 32]).build().unwrap());
  let keys = DirectKeyProvider::new();
  let ciphers = AesCbcHmacCipherProvider::new();
  let encrypter = keys.create_key_encrypter(JweKeyAlgorithm::Dir, &cek_key).unwrap().unwrap();
  let cipher = ciphers.create_content_cipher(JweEncryption::A128CbcHs256).unwrap();
  jwe.encrypt(encrypter.as_ref(), cipher.as_ref()).unwrap();
  let compact = jwe.serialize().unwrap();

  let jwe_set = JwkSet::from_keys(vec![cek_key]);
  let jws_set = JwkSet::from_keys(vec![signing_key]);
  let processor = JoseProcessor::builder()
    .jwe_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(jwe_set)))
    .jwe_decrypter_factory(DirectKeyProvider::new())
    .jwe_content_cipher_factory(AesCbcHmacCipherProvider::new())
    .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(jws_set)))
    .jws_verifier_factory(HmacProvider::new())
    .build();

  let payload = processor.process(&compact).unwrap();
  let claims = payload.try_as_claims().unwrap();
  assert_eq!(claims.iss(), Some("joe"));
  assert_eq!(claims.exp(), Some(9999999999));
}

/// Returns a fixed key list regardless of the header, letting a test dictate
/// trial order directly instead of going through alg-based narrowing.
struct FixedOrderSelector(Vec<Jwk>);

impl jose::processor::JwsKeySelector for FixedOrderSelector {
  fn select(&self, _header: &JwsHeader) -> Result<Vec<Jwk>, Error> {
    Ok(self.0.clone())
  }
}

fn mismatched_key_type() -> Jwk {
  use jose::jwk::RsaKeyBuilder;
  Jwk::Rsa(RsaKeyBuilder::new().n(vec![1, 2, 3]).e(vec![1, 0, 1]).build().unwrap())
}

// Scenario 5: selector ordering. A (wrong key type -> HmacProvider's factory
// skips it without attempting a verify) and B (matches) are tried in the
// order the selector returns, with B found regardless of position.
#[test]
fn selector_ordering_succeeds_regardless_of_position_but_fails_on_duplicates() {
  let a = mismatched_key_type();
  let b = hs256_key(0xBB);
  let compact = signed_compact(&b, "b", r#"{"iss":"joe"}"#);

  let forward = JoseProcessor::builder()
    .jws_key_selector(FixedOrderSelector(vec![a.clone(), b.clone()]))
    .jws_verifier_factory(HmacProvider::new())
    .build();
  assert!(forward.process(&compact).is_ok());

  let reversed = JoseProcessor::builder()
    .jws_key_selector(FixedOrderSelector(vec![b, a.clone()]))
    .jws_verifier_factory(HmacProvider::new())
    .build();
  assert!(reversed.process(&compact).is_ok());

  let only_a = JoseProcessor::builder()
    .jws_key_selector(FixedOrderSelector(vec![a.clone(), a]))
    .jws_verifier_factory(HmacProvider::new())
    .build();
  assert!(matches!(only_a.process(&compact), Err(Error::Policy { kind: PolicyErrorKind::NoMatchingKey })));
}

// Scenario 6: an expired JWT is rejected by the default claims verifier and
// accepted once claims verification is disabled.
#[test]
fn expired_jwt_rejected_with_verifier_accepted_without() {
  let key = hs256_key(0x33);
  let set = JwkSet::from_keys(vec![key.clone()]);
  let compact = signed_compact(&key, "k", r#"{"iss":"joe","exp":1}"#);

  let inner = JoseProcessor::builder()
    .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set.clone())))
    .jws_verifier_factory(HmacProvider::new())
    .build();
  let strict = JwtProcessor::new(inner, Some(DefaultClaimsVerifier::new(Duration::ZERO)));
  assert!(matches!(strict.process(&compact), Err(Error::Policy { kind: PolicyErrorKind::Expired })));

  let inner = JoseProcessor::builder()
    .jws_key_selector(JwkSetKeySelector::new(InMemoryJwkSource::new(set)))
    .jws_verifier_factory(HmacProvider::new())
    .build();
  let lenient: JwtProcessor<DefaultClaimsVerifier> = JwtProcessor::new(inner, None);
  let claims = lenient.process(&compact).unwrap();
  assert_eq!(claims.iss(), Some("joe"));
}
