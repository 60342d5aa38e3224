// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use rsa::BigUint;
use rsa::Oaep;
use rsa::Pkcs1v15Encrypt;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::Sha256;

use super::KeyDecrypter;
use super::KeyDecrypterFactory;
use super::KeyEncrypter;
use super::KeyEncrypterFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JweKeyAlgorithm;
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

struct RsaKeyEncrypter {
  alg: JweKeyAlgorithm,
  key: RsaPublicKey,
}

impl KeyEncrypter for RsaKeyEncrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm {
    self.alg
  }

  fn encrypt_key(&self, cek_len: usize) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let mut cek = vec![0u8; cek_len];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut cek);
    let mut rng = rand::thread_rng();
    let encrypted = match self.alg {
      JweKeyAlgorithm::RSA1_5 => self.key.encrypt(&mut rng, Pkcs1v15Encrypt, &cek),
      JweKeyAlgorithm::RsaOaep => self.key.encrypt(&mut rng, Oaep::new::<Sha1>(), &cek),
      JweKeyAlgorithm::RsaOaep256 => self.key.encrypt(&mut rng, Oaep::new::<Sha256>(), &cek),
      other => return Err(Error::unsupported_algorithm(other.name())),
    }
    .map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
    Ok((cek, encrypted))
  }
}

struct RsaKeyDecrypter {
  alg: JweKeyAlgorithm,
  key: RsaPrivateKey,
}

impl KeyDecrypter for RsaKeyDecrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm {
    self.alg
  }

  /// Recovers the CEK. RSA1_5 decryption failures are deliberately not
  /// distinguished from a length mismatch — reporting them differently
  /// would open a Bleichenbacher-style padding oracle (RFC 7516 §11.5
  /// calls this out as a known PKCS#1 v1.5 risk).
  fn decrypt_key(&self, encrypted_key: &[u8], cek_len: usize) -> Result<Vec<u8>, Error> {
    let cek = match self.alg {
      JweKeyAlgorithm::RSA1_5 => self.key.decrypt(Pkcs1v15Encrypt, encrypted_key),
      JweKeyAlgorithm::RsaOaep => self.key.decrypt(Oaep::new::<Sha1>(), encrypted_key),
      JweKeyAlgorithm::RsaOaep256 => self.key.decrypt(Oaep::new::<Sha256>(), encrypted_key),
      other => return Err(Error::unsupported_algorithm(other.name())),
    }
    .map_err(|_| Error::crypto(CryptoErrorKind::Decryption))?;
    if cek.len() != cek_len {
      return Err(Error::crypto(CryptoErrorKind::Decryption));
    }
    Ok(cek)
  }
}

/// RSA1_5, RSA-OAEP, and RSA-OAEP-256 key management (RFC 7518 §4.2-§4.3)
/// over an `RSA` JWK.
#[derive(Debug, Default)]
pub struct RsaKeyManagementProvider;

impl RsaKeyManagementProvider {
  pub fn new() -> Self {
    Self
  }
}

impl KeyEncrypterFactory for RsaKeyManagementProvider {
  fn create_key_encrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyEncrypter>, Error>> {
    if !alg.is_rsa() {
      return None;
    }
    let Jwk::Rsa(rsa_key) = key else { return None };
    Some(public_key(rsa_key).map(|key| Box::new(RsaKeyEncrypter { alg, key }) as Box<dyn KeyEncrypter>))
  }
}

impl KeyDecrypterFactory for RsaKeyManagementProvider {
  fn create_key_decrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyDecrypter>, Error>> {
    if !alg.is_rsa() {
      return None;
    }
    let Jwk::Rsa(rsa_key) = key else { return None };
    Some(private_key(rsa_key).map(|key| Box::new(RsaKeyDecrypter { alg, key }) as Box<dyn KeyDecrypter>))
  }
}
