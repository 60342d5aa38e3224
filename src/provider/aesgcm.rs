// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::aead::KeyInit;
use aes_gcm::aead::Payload;
use aes_gcm::Aes128Gcm;
use aes_gcm::Aes256Gcm;
use aes_gcm::AesGcm;
use rand::RngCore;

use super::ContentCipher;
use super::ContentCipherFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JweEncryption;

type Aes192Gcm = AesGcm<aes::Aes192, aes_gcm::aead::consts::U12>;

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

fn seal(combined_key_bits: usize, key: &[u8], iv: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error> {
  let nonce = GenericArray::from_slice(iv);
  let payload = Payload { msg: plaintext, aad };
  let result = match combined_key_bits {
    128 => Aes128Gcm::new(GenericArray::from_slice(key)).encrypt(nonce, payload),
    192 => Aes192Gcm::new(GenericArray::from_slice(key)).encrypt(nonce, payload),
    256 => Aes256Gcm::new(GenericArray::from_slice(key)).encrypt(nonce, payload),
    _ => unreachable!("caller restricted key_bits to 128/192/256"),
  };
  result.map_err(|_| Error::crypto(CryptoErrorKind::Decryption))
}

fn open(combined_key_bits: usize, key: &[u8], iv: &[u8], combined: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error> {
  let nonce = GenericArray::from_slice(iv);
  let payload = Payload { msg: combined, aad };
  let result = match combined_key_bits {
    128 => Aes128Gcm::new(GenericArray::from_slice(key)).decrypt(nonce, payload),
    192 => Aes192Gcm::new(GenericArray::from_slice(key)).decrypt(nonce, payload),
    256 => Aes256Gcm::new(GenericArray::from_slice(key)).decrypt(nonce, payload),
    _ => unreachable!("caller restricted key_bits to 128/192/256"),
  };
  result.map_err(|_| Error::crypto(CryptoErrorKind::IntegrityFailed))
}

struct AesGcmCipher {
  enc: JweEncryption,
}

impl ContentCipher for AesGcmCipher {
  fn encryption(&self) -> JweEncryption {
    self.enc
  }

  fn encrypt(&self, cek: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), Error> {
    if cek.len() != self.enc.cek_len() {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    let mut iv = vec![0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let combined = seal(cek.len() * 8, cek, &iv, plaintext, aad)?;
    let (ciphertext, tag) = combined.split_at(combined.len() - TAG_LEN);
    Ok((iv, ciphertext.to_vec(), tag.to_vec()))
  }

  fn decrypt(&self, cek: &[u8], iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error> {
    if cek.len() != self.enc.cek_len() {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    let combined = [ciphertext, tag].concat();
    open(cek.len() * 8, cek, iv, &combined, aad)
  }
}

/// A128GCM/A192GCM/A256GCM content encryption (RFC 7518 §5.3).
#[derive(Debug, Default)]
pub struct AesGcmCipherProvider;

impl AesGcmCipherProvider {
  pub fn new() -> Self {
    Self
  }
}

impl ContentCipherFactory for AesGcmCipherProvider {
  fn create_content_cipher(&self, enc: JweEncryption) -> Option<Box<dyn ContentCipher>> {
    if !enc.is_gcm() {
      return None;
    }
    Some(Box::new(AesGcmCipher { enc }))
  }
}
