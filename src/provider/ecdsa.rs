// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use ecdsa::signature::Signer as _;
use ecdsa::signature::Verifier as _;
use p256::ecdsa::Signature;
use p256::ecdsa::SigningKey;
use p256::ecdsa::VerifyingKey;

use super::Signer;
use super::SignerFactory;
use super::Verifier;
use super::VerifierFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JwsAlgorithm;
use crate::jwk::EcKey;
use crate::jwk::Jwk;

fn signing_key(key: &EcKey) -> Result<SigningKey, Error> {
  let d = key.d().ok_or_else(|| Error::crypto(CryptoErrorKind::KeyType))?;
  SigningKey::from_slice(d).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))
}

fn verifying_key(key: &EcKey) -> Result<VerifyingKey, Error> {
  let mut sec1 = Vec::with_capacity(1 + key.x().len() + key.y().len());
  sec1.push(0x04);
  sec1.extend_from_slice(key.x());
  sec1.extend_from_slice(key.y());
  VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))
}

struct EcdsaSigner {
  key: SigningKey,
}

impl Signer for EcdsaSigner {
  fn algorithm(&self) -> JwsAlgorithm {
    JwsAlgorithm::ES256
  }

  fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, Error> {
    let signature: Signature = self.key.sign(signing_input);
    Ok(signature.to_bytes().to_vec())
  }
}

struct EcdsaVerifier {
  key: VerifyingKey,
}

impl Verifier for EcdsaVerifier {
  fn algorithm(&self) -> JwsAlgorithm {
    JwsAlgorithm::ES256
  }

  fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), Error> {
    let signature = Signature::from_slice(signature).map_err(|_| Error::crypto(CryptoErrorKind::InvalidSignature))?;
    self
      .key
      .verify(signing_input, &signature)
      .map_err(|_| Error::crypto(CryptoErrorKind::InvalidSignature))
  }
}

/// ES256 (ECDSA over P-256 with SHA-256, RFC 7518 §3.4) over an `EC` JWK.
/// ES384/ES512 are modeled in [`JwsAlgorithm`] but not implemented here —
/// they need the P-384/P-521 curve crates, which this reference set omits.
#[derive(Debug, Default)]
pub struct EcdsaProvider;

impl EcdsaProvider {
  pub fn new() -> Self {
    Self
  }
}

impl SignerFactory for EcdsaProvider {
  fn create_signer(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Signer>, Error>> {
    if alg != JwsAlgorithm::ES256 {
      return None;
    }
    let Jwk::Ec(ec_key) = key else { return None };
    Some(signing_key(ec_key).map(|key| Box::new(EcdsaSigner { key }) as Box<dyn Signer>))
  }
}

impl VerifierFactory for EcdsaProvider {
  fn create_verifier(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Verifier>, Error>> {
    if alg != JwsAlgorithm::ES256 {
      return None;
    }
    let Jwk::Ec(ec_key) = key else { return None };
    Some(verifying_key(ec_key).map(|key| Box::new(EcdsaVerifier { key }) as Box<dyn Verifier>))
  }
}
