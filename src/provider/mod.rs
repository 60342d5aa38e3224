// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic provider abstraction (spec.md §4.7 "Signer/Verifier",
//! §4.8 "Encrypter/Decrypter factories").
//!
//! Every actual cryptographic operation is reached only through these
//! traits. The concrete implementations in this module are a deliberately
//! partial reference set — enough to exercise every algorithm exercised by
//! this crate's own tests — not an exhaustive JOSE crypto backend. A caller
//! who needs PS*, ES384/512, ECDH-ES, or AES-KW wraps their own provider
//! around the same traits; the factory contract (`None` = "I don't handle
//! this algorithm/key pairing") is what makes that composable.

mod aescbchmac;
mod aesgcm;
mod direct;
mod ecdsa;
mod hmac;
mod rsaes;
mod rsa_sig;

pub use aescbchmac::AesCbcHmacCipherProvider;
pub use aesgcm::AesGcmCipherProvider;
pub use direct::DirectKeyProvider;
pub use ecdsa::EcdsaProvider;
pub use hmac::HmacProvider;
pub use rsaes::RsaKeyManagementProvider;
pub use rsa_sig::RsaPkcs1Provider;

use crate::error::Error;
use crate::jwa::JweEncryption;
use crate::jwa::JweKeyAlgorithm;
use crate::jwa::JwsAlgorithm;
use crate::jwk::Jwk;

/// Produces a MAC or digital signature over a JWS signing input.
pub trait Signer {
  fn algorithm(&self) -> JwsAlgorithm;
  fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Verifies a MAC or digital signature over a JWS signing input.
pub trait Verifier {
  fn algorithm(&self) -> JwsAlgorithm;
  fn verify(&self, signing_input: &[u8], signature: &[u8]) -> Result<(), Error>;
}

/// Produces a [`Signer`] for a given algorithm/key pairing, or `None` if
/// this factory does not handle that combination (spec.md §4.7).
pub trait SignerFactory {
  fn create_signer(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Signer>, Error>>;
}

/// Produces a [`Verifier`] for a given algorithm/key pairing, or `None`.
pub trait VerifierFactory {
  fn create_verifier(&self, alg: JwsAlgorithm, key: &Jwk) -> Option<Result<Box<dyn Verifier>, Error>>;
}

/// Produces the content-encryption key and its encrypted form (the `dir`
/// algorithm returns an empty encrypted-key value, per RFC 7516 §5.1).
pub trait KeyEncrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm;
  fn encrypt_key(&self, cek_len: usize) -> Result<(Vec<u8>, Vec<u8>), Error>;
}

/// Recovers the content-encryption key from an encrypted-key value.
pub trait KeyDecrypter {
  fn key_algorithm(&self) -> JweKeyAlgorithm;
  fn decrypt_key(&self, encrypted_key: &[u8], cek_len: usize) -> Result<Vec<u8>, Error>;
}

pub trait KeyEncrypterFactory {
  fn create_key_encrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyEncrypter>, Error>>;
}

pub trait KeyDecrypterFactory {
  fn create_key_decrypter(&self, alg: JweKeyAlgorithm, key: &Jwk) -> Option<Result<Box<dyn KeyDecrypter>, Error>>;
}

/// Authenticated content encryption under the content-encryption key
/// (spec.md §4.8 "content encryption is a separate collaborator from key
/// management").
pub trait ContentCipher {
  fn encryption(&self) -> JweEncryption;
  fn encrypt(&self, cek: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), Error>;
  fn decrypt(&self, cek: &[u8], iv: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>, Error>;
}

pub trait ContentCipherFactory {
  fn create_content_cipher(&self, enc: JweEncryption) -> Option<Box<dyn ContentCipher>>;
}
