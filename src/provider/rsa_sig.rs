// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use rsa::BigUint;
use rsa::Pkcs1v15Sign;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;
use sha2::Digest;
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
use crate::jwk::RsaKey;

fn public_key(key: &RsaKey) -> Result<RsaPublicKey, Error> {
  let n = BigUint::from_bytes_be(key.n());
  let e = BigUint::from_bytes_be(key.e());
  RsaPublicKey::new(n, e).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))
}

fn private_key(key: &RsaKey) -> Result<RsaPrivateKey, Error> {
  let n = BigUint::from_bytes_be(key.n());
  let e = BigUint::from_bytes_be(key.e());
  let d = BigUint::from_bytes_be(key.d().ok_or_else(|| Error::crypto(CryptoErrorKind::KeyType))?);
  let crt = key.crt().ok_or_else(|| Error::unsupported_algorithm("RSA private key without CRT primes"))?;
  let primes = vec![BigUint::from_bytes_be(&crt.p), BigUint::from_bytes_be(&crt.q)];
  RsaPrivateKey::from_components(n, e, d, primes).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))
}

fn digest(alg: JwsAlgorithm, input: &[u8]) -> Result<Vec<u8>, Error> {
  Ok(match alg {
    JwsAlgorithm::RS256 => Sha256::digest(input).to_vec(),
    JwsAlgorithm::RS384 => Sha384::digest(input).to_vec(),
    JwsAlgorithm::RS512 => Sha512::digest(input).to_vec(),
    other => return Err(Error::unsupported_algorithm(other.name())),
  })
}

fn padding(alg: JwsAlgorithm) -> Pkcs1v15Sign {
  match alg {
    JwsAlgorithm::RS256 => Pkcs1v15Sign::new::<Sha256>(),
    JwsAlgorithm::RS384 => Pkcs1v15Sign::new::<Sha384>(),
    JwsAlgorithm::RS512 => Pkcs1v15Sign::new::<Sha512>(),
    _ => unreachable!("caller has already rejected non-RSA-PKCS1v15 algorithms"),
  }
}

struct RsaSigner {
  alg: JwsAlgorithm,
  key: RsaPrivateKey,
}

impl Signer for RsaSigner {
  fn algorithm(&self) -> JwsAlgorithm {
    self.alg
  }

  fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, Error> {
    let hashed = digest(self.alg, signing_input)?;
    self
      .key
      .sign(padding(self.alg), &hashed)
      .map_err(|_| Error::crypto(CryptoErrorKind::KeyType))
  }
}

struct RsaVerifier {
  alg: JwsAlgorithm,
  key: RsaPublicKey,
}

impl Verifier for RsaVerifier {
  fn algorithm(&self) -> JwsAlgorithm {
    self.alg
  }

  fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), Error> {
    let hashed = digest(self.alg, signing_input)?;
    self
      .key
      .verify(padding(self.alg), &hashed, signature)
      .map_err(|_| Error::crypto(CryptoErrorKind::InvalidSignature))
  }
}

/// RS256/RS384/RS512 (RSASSA-PKCS1-v1_5, RFC 7518 §3.3) over an `RSA` JWK.
/// PS256/384/512 (RSASSA-PSS) are modeled in [`JwsAlgorithm`] but not
/// implemented here.
#[derive(Debug, Default)]
pub struct RsaPkcs1Provider;

impl RsaPkcs1Provider {
  pub fn new() -> Self {
    Self
  }
}

fn is_rsa_pkcs1(alg: JwsAlgorithm) -> bool {
  matches!(alg, JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512)
}

impl SignerFactory for RsaPkcs1Provider {
  fn create_signer(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Signer>, Error>> {
    if !is_rsa_pkcs1(alg) {
      return None;
    }
    let Jwk::Rsa(rsa_key) = key else { return None };
    Some(private_key(rsa_key).map(|key| Box::new(RsaSigner { alg, key }) as Box<dyn Signer>))
  }
}

impl VerifierFactory for RsaPkcs1Provider {
  fn create_verifier(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Verifier>, Error>> {
    if !is_rsa_pkcs1(alg) {
      return None;
    }
    let Jwk::Rsa(rsa_key) = key else { return None };
    Some(public_key(rsa_key).map(|key| Box::new(RsaVerifier { alg, key }) as Box<dyn Verifier>))
  }
}
