// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use crate::codec;
use crate::error::CryptoErrorKind;
use crate::error::Error;
use crate::error::ParseReason;
use crate::header::check_crit;
use crate::header::JoseHeader;
use crate::header::JweHeader;
use crate::jwa::JweCompression;
use crate::payload::Payload;
use crate::provider::ContentCipher;
use crate::provider::KeyDecrypter;
use crate::provider::KeyEncrypter;

/// Size limit applied to DEFLATE decompression, guarding against a
/// decompression-bomb ciphertext (spec.md §4.8 "zip is decompressed under a
/// bound, never to completion unconditionally").
const MAX_INFLATED_LEN: usize = 16 * 1024 * 1024;

/// Lifecycle state of a [`JweObject`] (spec.md §3 "JWEObject").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JweState {
  /// Freshly constructed with a plaintext payload, not yet encrypted.
  Unencrypted,
  /// Either freshly encrypted, or parsed from compact form — ciphertext has
  /// not yet been decrypted, so `payload()` returns `None`.
  Encrypted,
  /// Decrypted; `payload()` returns the recovered plaintext.
  Decrypted,
}

/// A JSON Web Encryption object (RFC 7516, spec.md §3 "JWEObject").
#[derive(Debug, Clone, PartialEq)]
pub struct JweObject {
  header: JweHeader,
  payload: Option<Payload>,
  encrypted_key: Vec<u8>,
  iv: Vec<u8>,
  ciphertext: Vec<u8>,
  tag: Vec<u8>,
  state: JweState,
  /// The original `BASE64URL(header)` segment when parsed from compact form.
  /// `None` for freshly constructed objects (spec.md §4.3 "verification uses
  /// the original base64url(header) bytes").
  header_b64: Option<String>,
}

impl JweObject {
  pub fn new(header: JweHeader, payload: Payload) -> Self {
    Self {
      header,
      payload: Some(payload),
      encrypted_key: Vec::new(),
      iv: Vec::new(),
      ciphertext: Vec::new(),
      tag: Vec::new(),
      state: JweState::Unencrypted,
      header_b64: None,
    }
  }

  pub fn header(&self) -> &JweHeader {
    &self.header
  }

  pub fn payload(&self) -> Option<&Payload> {
    self.payload.as_ref()
  }

  pub fn state(&self) -> JweState {
    self.state
  }

  pub fn encrypted_key(&self) -> &[u8] {
    &self.encrypted_key
  }

  pub fn iv(&self) -> &[u8] {
    &self.iv
  }

  pub fn ciphertext(&self) -> &[u8] {
    &self.ciphertext
  }

  pub fn tag(&self) -> &[u8] {
    &self.tag
  }

  /// The header's base64url form: the original parsed segment when
  /// available, otherwise a fresh encoding of `self.header` (spec.md §4.3).
  fn header_b64(&self) -> Result<String, Error> {
    match &self.header_b64 {
      Some(b64) => Ok(b64.clone()),
      None => self.header.to_base64(),
    }
  }

  /// The protected header's base64url form, reused both as the fifth
  /// compact segment and as AEAD additional authenticated data (RFC 7516
  /// §5.1 step 14).
  fn aad(&self) -> Result<Vec<u8>, Error> {
    Ok(self.header_b64()?.into_bytes())
  }

  /// Encrypts the payload, transitioning `UNENCRYPTED -> ENCRYPTED`. The
  /// payload is cleared from memory once consumed; call [`Self::decrypt`] to
  /// recover it.
  pub fn encrypt(&mut self, key_encrypter: &dyn KeyEncrypter, content_cipher: &dyn ContentCipher) -> Result<(), Error> {
    if self.state != JweState::Unencrypted {
      return Err(Error::state("encrypt", state_name(self.state)));
    }
    if key_encrypter.key_algorithm() != self.header.alg() {
      return Err(Error::invalid_argument(format!(
        "key encrypter is for {} but header declares {}",
        key_encrypter.key_algorithm(),
        self.header.alg()
      )));
    }
    if content_cipher.encryption() != self.header.enc() {
      return Err(Error::invalid_argument(format!(
        "content cipher is for {} but header declares {}",
        content_cipher.encryption(),
        self.header.enc()
      )));
    }
    let payload = self.payload.take().ok_or_else(|| Error::state("encrypt", "UNENCRYPTED (no payload)"))?;
    let plaintext = match self.header.zip() {
      Some(JweCompression::Deflate) => miniz_oxide::deflate::compress_to_vec(payload.as_bytes(), 6),
      Some(JweCompression::Other(name)) => return Err(Error::unsupported_algorithm(format!("zip={name}"))),
      None => payload.as_bytes().to_vec(),
    };
    let (cek, encrypted_key) = key_encrypter.encrypt_key(self.header.enc().cek_len())?;
    let aad = self.aad()?;
    let (iv, ciphertext, tag) = content_cipher.encrypt(&cek, &plaintext, &aad)?;
    self.encrypted_key = encrypted_key;
    self.iv = iv;
    self.ciphertext = ciphertext;
    self.tag = tag;
    self.state = JweState::Encrypted;
    Ok(())
  }

  /// Decrypts the ciphertext, transitioning `ENCRYPTED -> DECRYPTED`.
  /// `understood_crit` lists the extension header parameters the caller is
  /// prepared to act on (spec.md §4.7 "crit enforcement runs before any
  /// crypto").
  pub fn decrypt(
    &mut self,
    key_decrypter: &dyn KeyDecrypter,
    content_cipher: &dyn ContentCipher,
    understood_crit: &[&str],
  ) -> Result<(), Error> {
    if self.state != JweState::Encrypted {
      return Err(Error::state("decrypt", state_name(self.state)));
    }
    check_crit(self.header.crit(), understood_crit)?;
    if key_decrypter.key_algorithm() != self.header.alg() {
      return Err(Error::invalid_argument(format!(
        "key decrypter is for {} but header declares {}",
        key_decrypter.key_algorithm(),
        self.header.alg()
      )));
    }
    if content_cipher.encryption() != self.header.enc() {
      return Err(Error::invalid_argument(format!(
        "content cipher is for {} but header declares {}",
        content_cipher.encryption(),
        self.header.enc()
      )));
    }
    let cek = key_decrypter.decrypt_key(&self.encrypted_key, self.header.enc().cek_len())?;
    let aad = self.aad()?;
    let compressed = content_cipher.decrypt(&cek, &self.iv, &self.ciphertext, &self.tag, &aad)?;
    let plaintext = match self.header.zip() {
      Some(JweCompression::Deflate) => miniz_oxide::inflate::decompress_to_vec_with_limit(&compressed, MAX_INFLATED_LEN)
        .map_err(|_| Error::crypto(CryptoErrorKind::Decryption))?,
      Some(JweCompression::Other(name)) => return Err(Error::unsupported_algorithm(format!("zip={name}"))),
      None => compressed,
    };
    self.payload = Some(Payload::from_bytes(plaintext));
    self.state = JweState::Decrypted;
    Ok(())
  }

  /// Renders the compact serialization. Requires `ENCRYPTED` or `DECRYPTED`.
  pub fn serialize(&self) -> Result<String, Error> {
    if self.state == JweState::Unencrypted {
      return Err(Error::state("serialize", state_name(self.state)));
    }
    let header_b64 = self.header_b64()?;
    Ok(format!(
      "{header_b64}.{}.{}.{}.{}",
      codec::encode_b64(&self.encrypted_key),
      codec::encode_b64(&self.iv),
      codec::encode_b64(&self.ciphertext),
      codec::encode_b64(&self.tag),
    ))
  }

  /// Parses a compact-serialized JWE, leaving it in the `ENCRYPTED` (not yet
  /// decrypted) state.
  pub fn parse(compact: &str) -> Result<Self, Error> {
    let parts = super::split_compact(compact, "5", 5)?;
    let header_bytes = codec::decode_b64_str(parts[0], "header")?;
    let header_value: serde_json::Value = serde_json::from_slice(&header_bytes)?;
    let header_map = header_value
      .as_object()
      .cloned()
      .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "header", reason: "not a JSON object".into() }))?;
    let header = JweHeader::parse(header_map)?;
    let encrypted_key = codec::decode_b64_str(parts[1], "encrypted_key")?;
    let iv = codec::decode_b64_str(parts[2], "iv")?;
    let ciphertext = codec::decode_b64_str(parts[3], "ciphertext")?;
    let tag = codec::decode_b64_str(parts[4], "tag")?;
    Ok(Self {
      header,
      payload: None,
      encrypted_key,
      iv,
      ciphertext,
      tag,
      state: JweState::Encrypted,
      header_b64: Some(parts[0].to_owned()),
    })
  }
}

fn state_name(state: JweState) -> &'static str {
  match state {
    JweState::Unencrypted => "UNENCRYPTED",
    JweState::Encrypted => "ENCRYPTED",
    JweState::Decrypted => "DECRYPTED",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwa::JweEncryption;
  use crate::jwa::JweKeyAlgorithm;
  use crate::jwk::Jwk;
  use crate::jwk::OctKeyBuilder;
  use crate::provider::ContentCipherFactory;
  use crate::provider::DirectKeyProvider;
  use crate::provider::KeyDecrypterFactory;
  use crate::provider::KeyEncrypterFactory;

  fn dir_key(len: usize) -> Jwk {
    Jwk::Oct(OctKeyBuilder::new().k(vec![0x42; len]).build().unwrap())
  }

  #[test]
  fn dir_a128gcm_round_trip() {
    let header = JweHeader::new(JweKeyAlgorithm::Dir, JweEncryption::A128GCM);
    let payload = Payload::from_text("the true sign and credence of a title");
    let mut object = JweObject::new(header, payload);

    let key = dir_key(16);
    let keys = DirectKeyProvider::new();
    let ciphers = crate::provider::AesGcmCipherProvider::new();
    let encrypter = keys.create_key_encrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    let cipher = ciphers.create_content_cipher(JweEncryption::A128GCM).unwrap();
    object.encrypt(encrypter.as_ref(), cipher.as_ref()).unwrap();
    assert_eq!(object.state(), JweState::Encrypted);
    assert!(object.payload().is_none());

    let compact = object.serialize().unwrap();
    let mut parsed = JweObject::parse(&compact).unwrap();
    let decrypter = keys.create_key_decrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    parsed.decrypt(decrypter.as_ref(), cipher.as_ref(), &[]).unwrap();
    assert_eq!(parsed.state(), JweState::Decrypted);
    assert_eq!(parsed.payload().unwrap().to_text().unwrap(), "the true sign and credence of a title");
  }

  #[test]
  fn dir_a128cbc_hs256_round_trip_with_compression() {
    let mut header = JweHeader::new(JweKeyAlgorithm::Dir, JweEncryption::A128CbcHs256);
    header.set_zip(JweCompression::Deflate);
    let payload = Payload::from_text(&"repeat ".repeat(64));
    let mut object = JweObject::new(header, payload);

    let key = dir_key(32);
    let keys = DirectKeyProvider::new();
    let ciphers = crate::provider::AesCbcHmacCipherProvider::new();
    let encrypter = keys.create_key_encrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    let cipher = ciphers.create_content_cipher(JweEncryption::A128CbcHs256).unwrap();
    object.encrypt(encrypter.as_ref(), cipher.as_ref()).unwrap();

    let compact = object.serialize().unwrap();
    let mut parsed = JweObject::parse(&compact).unwrap();
    let decrypter = keys.create_key_decrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    parsed.decrypt(decrypter.as_ref(), cipher.as_ref(), &[]).unwrap();
    assert_eq!(parsed.payload().unwrap().to_text().unwrap(), "repeat ".repeat(64));
  }

  #[test]
  fn decrypt_uses_original_header_bytes_as_aad_not_a_reserialization() {
    // Header member order reversed relative to this crate's own serializer
    // (alg before enc), so re-serializing before computing AAD would change
    // the authenticated bytes and fail the AEAD tag check.
    let header_b64 = codec::encode_b64(br#"{"enc":"A128GCM","alg":"dir"}"#.to_vec());

    let key = dir_key(16);
    let keys = DirectKeyProvider::new();
    let ciphers = crate::provider::AesGcmCipherProvider::new();
    let encrypter = keys.create_key_encrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    let cipher = ciphers.create_content_cipher(JweEncryption::A128GCM).unwrap();

    let (cek, encrypted_key) = encrypter.encrypt_key(JweEncryption::A128GCM.cek_len()).unwrap();
    let aad = header_b64.clone().into_bytes();
    let (iv, ciphertext, tag) = cipher.encrypt(&cek, b"hello", &aad).unwrap();

    let compact = format!(
      "{header_b64}.{}.{}.{}.{}",
      codec::encode_b64(&encrypted_key),
      codec::encode_b64(&iv),
      codec::encode_b64(&ciphertext),
      codec::encode_b64(&tag),
    );

    let mut parsed = JweObject::parse(&compact).unwrap();
    let decrypter = keys.create_key_decrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    parsed.decrypt(decrypter.as_ref(), cipher.as_ref(), &[]).unwrap();
    assert_eq!(parsed.payload().unwrap().to_text().unwrap(), "hello");
    assert_eq!(parsed.serialize().unwrap(), compact);
  }

  #[test]
  fn decrypt_rejects_before_encrypt_transition() {
    let header = JweHeader::new(JweKeyAlgorithm::Dir, JweEncryption::A128GCM);
    let mut object = JweObject::new(header, Payload::from_text("x"));
    let key = dir_key(16);
    let keys = DirectKeyProvider::new();
    let ciphers = crate::provider::AesGcmCipherProvider::new();
    let decrypter = keys.create_key_decrypter(JweKeyAlgorithm::Dir, &key).unwrap().unwrap();
    let cipher = ciphers.create_content_cipher(JweEncryption::A128GCM).unwrap();
    assert!(object.decrypt(decrypter.as_ref(), cipher.as_ref(), &[]).is_err());
  }
}
