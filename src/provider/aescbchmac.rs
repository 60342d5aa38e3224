// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use aes::Aes128;
use aes::Aes192;
use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::BlockDecryptMut;
use cbc::cipher::BlockEncryptMut;
use cbc::cipher::KeyIvInit;
use hmac::Hmac;
use hmac::Mac;
use hmac::digest::KeyInit;
use rand::RngCore;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::ContentCipher;
use super::ContentCipherFactory;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::jwa::JweEncryption;

const IV_LEN: usize = 16;

/// Computes the RFC 7518 §5.2.2.1 authentication tag input: AAD, IV,
/// ciphertext, and the AAD bit-length as a fixed 8-byte big-endian suffix.
fn mac_input(aad: &[u8], iv: &[u8], ciphertext: &[u8]) -> Vec<u8> {
  let al = ((aad.len() as u64) * 8).to_be_bytes();
  let mut input = Vec::with_capacity(aad.len() + iv.len() + ciphertext.len() + al.len());
  input.extend_from_slice(aad);
  input.extend_from_slice(iv);
  input.extend_from_slice(ciphertext);
  input.extend_from_slice(&al);
  input
}

fn compute_tag<M: Mac + KeyInit>(mac_key: &[u8], tag_len: usize, input: &[u8]) -> Result<Vec<u8>, Error> {
  let mut mac = <M as Mac>::new_from_slice(mac_key).map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
  mac.update(input);
  let full = mac.finalize().into_bytes();
  Ok(full[..tag_len].to_vec())
}

macro_rules! cbc_encrypt {
  ($cipher:ty, $enc_key:expr, $iv:expr, $plaintext:expr) => {{
    let encryptor = cbc::Encryptor::<$cipher>::new_from_slices($enc_key, $iv)
      .map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
    encryptor.encrypt_padded_vec_mut::<Pkcs7>($plaintext)
  }};
}

macro_rules! cbc_decrypt {
  ($cipher:ty, $enc_key:expr, $iv:expr, $ciphertext:expr) => {{
    let decryptor = cbc::Decryptor::<$cipher>::new_from_slices($enc_key, $iv)
      .map_err(|_| Error::crypto(CryptoErrorKind::KeyType))?;
    decryptor
      .decrypt_padded_vec_mut::<Pkcs7>($ciphertext)
      .map_err(|_| Error::crypto(CryptoErrorKind::Decryption))?
  }};
}

struct AesCbcHmacCipher {
  enc: JweEncryption,
}

impl ContentCipher for AesCbcHmacCipher {
  fn encryption(&self) -> JweEncryption {
    self.enc
  }

  fn encrypt(&self, cek: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), Error> {
    if cek.len() != self.enc.cek_len() {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    let half = cek.len() / 2;
    let (mac_key, enc_key) = cek.split_at(half);
    let mut iv = vec![0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let ciphertext = match self.enc {
      JweEncryption::A128CbcHs256 => cbc_encrypt!(Aes128, enc_key, &iv, plaintext),
      JweEncryption::A192CbcHs384 => cbc_encrypt!(Aes192, enc_key, &iv, plaintext),
      JweEncryption::A256CbcHs512 => cbc_encrypt!(Aes256, enc_key, &iv, plaintext),
      _ => unreachable!("caller restricted enc to CBC-HMAC variants"),
    };
    let input = mac_input(aad, &iv, &ciphertext);
    let tag = match self.enc {
      JweEncryption::A128CbcHs256 => compute_tag::<Hmac<Sha256>>(mac_key, half, &input)?,
      JweEncryption::A192CbcHs384 => compute_tag::<Hmac<Sha384>>(mac_key, half, &input)?,
      JweEncryption::A256CbcHs512 => compute_tag::<Hmac<Sha512>>(mac_key, half, &input)?,
      _ => unreachable!(),
    };
    Ok((iv, ciphertext, tag))
  }

  fn decrypt(&self, cek: &[u8], iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error> {
    if cek.len() != self.enc.cek_len() {
      return Err(Error::crypto(CryptoErrorKind::KeyType));
    }
    let half = cek.len() / 2;
    let (mac_key, enc_key) = cek.split_at(half);
    let input = mac_input(aad, iv, ciphertext);
    let expected_tag = match self.enc {
      JweEncryption::A128CbcHs256 => compute_tag::<Hmac<Sha256>>(mac_key, half, &input)?,
      JweEncryption::A192CbcHs384 => compute_tag::<Hmac<Sha384>>(mac_key, half, &input)?,
      JweEncryption::A256CbcHs512 => compute_tag::<Hmac<Sha512>>(mac_key, half, &input)?,
      _ => unreachable!(),
    };
    if expected_tag.ct_eq(tag).unwrap_u8() != 1 {
      return Err(Error::crypto(CryptoErrorKind::IntegrityFailed));
    }
    let plaintext = match self.enc {
      JweEncryption::A128CbcHs256 => cbc_decrypt!(Aes128, enc_key, iv, ciphertext),
      JweEncryption::A192CbcHs384 => cbc_decrypt!(Aes192, enc_key, iv, ciphertext),
      JweEncryption::A256CbcHs512 => cbc_decrypt!(Aes256, enc_key, iv, ciphertext),
      _ => unreachable!(),
    };
    Ok(plaintext)
  }
}

/// A128CBC-HS256/A192CBC-HS384/A256CBC-HS512 content encryption (RFC 7518
/// §5.2): AES-CBC with a PKCS#7-padded plaintext, authenticated by an
/// HMAC computed over the AAD, IV, and ciphertext (encrypt-then-MAC).
#[derive(Debug, Default)]
pub struct AesCbcHmacCipherProvider;

impl AesCbcHmacCipherProvider {
  pub fn new() -> Self {
    Self
  }
}

impl ContentCipherFactory for AesCbcHmacCipherProvider {
  fn create_content_cipher(&self, enc: JweEncryption) -> Option<Box<dyn ContentCipher>> {
    if !enc.is_cbc_hmac() {
      return None;
    }
    Some(Box::new(AesCbcHmacCipher { enc }))
  }
}
