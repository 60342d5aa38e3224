// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use super::KeyDecrypter;
use super::KeyDecrypterFactory;
use super::KeyEncrypter;
use super::KeyEncrypterFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JweKeyAlgorithm;
use crate::jwk::Jwk;

struct DirectEncrypter {
  cek: Vec<u8>,
}

impl KeyEncrypter for DirectEncrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm {
    JweKeyAlgorithm::Dir
  }

  fn encrypt_key(&self, cek_len: usize) -> Result<(Vec<u8>, Vec<u8>), Error> {
    if self.cek.len() != cek_len {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    Ok((self.cek.clone(), Vec::new()))
  }
}

struct DirectDecrypter {
  cek: Vec<u8>,
}

impl KeyDecrypter for DirectDecrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm {
    JweKeyAlgorithm::Dir
  }

  fn decrypt_key(&self, encrypted_key: &[u8], cek_len: usize) -> Result<Vec<u8>, Error> {
    if !encrypted_key.is_empty() {
      return Err(Error::crypto(CryptoErrorKind::Decryption));
    }
    if self.cek.len() != cek_len {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    Ok(self.cek.clone())
  }
}

/// `dir` key management (RFC 7516 §4.1.1): the shared `oct` key is used
/// directly as the content-encryption key, with no wrapped-key segment.
#[derive(Debug, Default)]
pub struct DirectKeyProvider;

impl DirectKeyProvider {
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

impl KeyEncrypterFactory for DirectKeyProvider {
  fn create_key_encrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyEncrypter>, Error>> {
    if alg != JweKeyAlgorithm::Dir {
      return None;
    }
    let cek = oct_bytes(key)?;
    Some(Ok(Box::new(DirectEncrypter { cek })))
  }
}

impl KeyDecrypterFactory for DirectKeyProvider {
  fn create_key_decrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyDecrypter>, Error>> {
    if alg != JweKeyAlgorithm::Dir {
      return None;
    }
    let cek = oct_bytes(key)?;
    Some(Ok(Box::new(DirectDecrypter { cek })))
  }
}
