// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use hmac::Hmac;
use hmac::Mac;
use hmac::digest::KeyInit;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use super::Signer;
use super::SignerFactory;
use super::Verifier;
use super::VerifierFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JwsAlgorithm;
use crate::jwk::Jwk;

fn mac_sign<M: Mac + KeyInit>(key: &[u8], input: &[u8]) -> Result<Vec<u8>, Error> {
  let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
  mac.update(input);
  Ok(mac.finalize().into_bytes().to_vec())
}

fn mac_verify<M: Mac + KeyInit>(key: &[u8], input: &[u8], signature: &[u8]) -> Result<(), Error> {
  let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
  mac.update(input);
  mac.verify_slice(signature).map_err(|_| Error::crypto(CryptoErrorKind::InvalidSignature))
}

struct HmacSigner {
  alg: JwsAlgorithm,
  key: Vec<u8>,
}

impl Signer for HmacSigner {
  fn algorithm(&self) -> JwsAlgorithm {
    self.alg
  }

  fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, Error> {
    match self.alg {
      JwsAlgorithm::HS256 => mac_sign::<Hmac<Sha256>>(&self.key, signing_input),
      JwsAlgorithm::HS384 => mac_sign::<Hmac<Sha384>>(&self.key, signing_input),
      JwsAlgorithm::HS512 => mac_sign::<Hmac<Sha512>>(&self.key, signing_input),
      other => Err(Error::unsupported_algorithm(other.name())),
    }
  }
}

struct HmacVerifier {
  alg: JwsAlgorithm,
  key: Vec<u8>,
}

impl Verifier for HmacVerifier {
  fn algorithm(&self) -> JwsAlgorithm {
    self.alg
  }

  fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), Error> {
    match self.alg {
      JwsAlgorithm::HS256 => mac_verify::<Hmac<Sha256>>(&self.key, signing_input, signature),
      JwsAlgorithm::HS384 => mac_verify::<Hmac<Sha384>>(&self.key, signing_input, signature),
      JwsAlgorithm::HS512 => mac_verify::<Hmac<Sha512>>(&self.key, signing_input, signature),
      other => Err(Error::unsupported_algorithm(other.name())),
    }
  }
}

/// HS256/HS384/HS512 over an `oct` JWK (RFC 7518 §3.2).
#[derive(Debug, Default)]
pub struct HmacProvider;

impl HmacProvider {
  pub fn new() -> Self {
    Self
  }
}

fn oct_bytes(key: &Jwk) -> Option<Vec<u8>> {
  match key {
    Jwk::Oct(k) => Some(k.k().to_vec()),
    _ => None,
  }
}

impl SignerFactory for HmacProvider {
  fn create_signer(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Signer>, Error>> {
    if !alg.is_hmac() {
      return None;
    }
    let key = oct_bytes(key)?;
    Some(Ok(Box::new(HmacSigner { alg, key })))
  }
}

impl VerifierFactory for HmacProvider {
  fn create_verifier(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Verifier>, Error>> {
    if !alg.is_hmac() {
      return None;
    }
    let key = oct_bytes(key)?;
    Some(Ok(Box::new(HmacVerifier { alg, key })))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_hs256() {
    let provider = HmacProvider::new();
    let key = Jwk::Oct(crate::jwk::OctKeyBuilder::new().k(b"a-string-secret-at-least-256-bits-long".to_vec()).build().unwrap());
    let signer = provider.create_signer(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    let sig = signer.sign(b"signing-input").unwrap();
    let verifier = provider.create_verifier(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    assert!(verifier.verify(b"signing-input", &sig).is_ok());
  }

  #[test]
  fn rejects_non_hmac_algorithm() {
    let provider = HmacProvider::new();
    let key = Jwk::Oct(crate::jwk::OctKeyBuilder::new().k(vec![1; 32]).build().unwrap());
    assert!(provider.create_signer(JwsAlgorithm::RS256, &key).is_none());
  }
}
