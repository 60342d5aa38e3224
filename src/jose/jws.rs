// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use crate::codec;
use crate::error::Error;
use crate::error::ParseReason;
use crate::error::PolicyErrorKind;
use crate::header::check_crit;
use crate::header::JoseHeader;
use crate::header::JwsHeader;
use crate::payload::Payload;
use crate::provider::Signer;
use crate::provider::Verifier;

/// Lifecycle state of a [`JwsObject`] (spec.md §3 "JWSObject").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwsState {
  /// Freshly constructed; has no signature yet.
  Unsigned,
  /// Either freshly signed, or parsed from compact form with a signature
  /// that has not yet been checked.
  Signed,
  /// Parsed or signed, and then successfully verified.
  Verified,
}

/// A JSON Web Signature object (RFC 7515, spec.md §3 "JWSObject").
#[derive(Debug, Clone, PartialEq)]
pub struct JwsObject {
  header: JwsHeader,
  payload: Payload,
  signature: Option<Vec<u8>>,
  state: JwsState,
  /// The original `BASE64URL(header)` segment when parsed from compact form.
  /// `None` for freshly constructed objects, which have never had an
  /// external encoding to preserve (spec.md §4.3 "verification uses the
  /// original base64url(header) bytes").
  header_b64: Option<String>,
}

impl JwsObject {
  pub fn new(header: JwsHeader, payload: Payload) -> Self {
    Self { header, payload, signature: None, state: JwsState::Unsigned, header_b64: None }
  }

  pub fn header(&self) -> &JwsHeader {
    &self.header
  }

  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  pub fn state(&self) -> JwsState {
    self.state
  }

  pub fn signature(&self) -> Option<&[u8]> {
    self.signature.as_deref()
  }

  /// The base64url encoding of the header: the original parsed segment when
  /// available, otherwise a fresh encoding of `self.header` (spec.md §4.3).
  fn header_b64(&self) -> Result<String, Error> {
    match &self.header_b64 {
      Some(b64) => Ok(b64.clone()),
      None => self.header.to_base64(),
    }
  }

  /// The ASCII bytes actually signed/verified: `BASE64URL(header) || "." ||
  /// BASE64URL(payload)` (RFC 7515 §5.1).
  fn signing_input(&self) -> Result<Vec<u8>, Error> {
    let header_b64 = self.header_b64()?;
    let payload_b64 = codec::encode_b64(self.payload.as_bytes());
    Ok(format!("{header_b64}.{payload_b64}").into_bytes())
  }

  /// Signs the object, transitioning `UNSIGNED -> SIGNED`.
  pub fn sign(&mut self, signer: &dyn Signer) -> Result<(), Error> {
    if self.state != JwsState::Unsigned {
      return Err(Error::state("sign", state_name(self.state)));
    }
    if signer.algorithm() != self.header.alg() {
      return Err(Error::invalid_argument(format!(
        "signer is for {} but header declares {}",
        signer.algorithm(),
        self.header.alg()
      )));
    }
    let input = self.signing_input()?;
    self.signature = Some(signer.sign(&input)?);
    self.state = JwsState::Signed;
    Ok(())
  }

  /// Verifies the object, transitioning `SIGNED -> VERIFIED`. `understood_crit`
  /// lists the extension header parameters the caller is prepared to act on
  /// (spec.md §4.7 "crit enforcement runs before any crypto").
  pub fn verify(&mut self, verifier: &dyn Verifier, understood_crit: &[&str]) -> Result<(), Error> {
    if self.state != JwsState::Signed {
      return Err(Error::state("verify", state_name(self.state)));
    }
    check_crit(self.header.crit(), understood_crit)?;
    if self.header.alg().is_unsecured() {
      return Err(Error::policy(PolicyErrorKind::UnsecuredRejected));
    }
    if verifier.algorithm() != self.header.alg() {
      return Err(Error::invalid_argument(format!(
        "verifier is for {} but header declares {}",
        verifier.algorithm(),
        self.header.alg()
      )));
    }
    let input = self.signing_input()?;
    let signature = self.signature.as_ref().ok_or_else(|| Error::state("verify", "SIGNED (no signature bytes)"))?;
    verifier.verify(&input, signature)?;
    self.state = JwsState::Verified;
    Ok(())
  }

  /// Renders the compact serialization. Requires `SIGNED` or `VERIFIED`.
  pub fn serialize(&self) -> Result<String, Error> {
    let signature = match self.state {
      JwsState::Unsigned => return Err(Error::state("serialize", state_name(self.state))),
      JwsState::Signed | JwsState::Verified => self.signature.as_ref().expect("SIGNED/VERIFIED always carries a signature"),
    };
    let header_b64 = self.header_b64()?;
    let payload_b64 = codec::encode_b64(self.payload.as_bytes());
    let signature_b64 = codec::encode_b64(signature);
    Ok(format!("{header_b64}.{payload_b64}.{signature_b64}"))
  }

  /// Parses a compact-serialized JWS, leaving it in the `SIGNED` (not yet
  /// verified) state. Rejects `alg: none` — that compact form belongs to
  /// [`crate::jose::UnsecuredObject`].
  pub fn parse(compact: &str) -> Result<Self, Error> {
    let parts = super::split_compact(compact, "3", 3)?;
    let header_bytes = codec::decode_b64_str(parts[0], "header")?;
    let header_value: serde_json::Value = serde_json::from_slice(&header_bytes)?;
    let header_map = header_value
      .as_object()
      .cloned()
      .ok_or_else(|| Error::parse(ParseReason::InvalidFieldValue { field: "header", reason: "not a JSON object".into() }))?;
    let header = JwsHeader::parse(header_map)?;
    let payload_bytes = codec::decode_b64_str(parts[1], "payload")?;
    let signature = codec::decode_b64_str(parts[2], "signature")?;
    Ok(Self {
      header,
      payload: Payload::from_bytes(payload_bytes),
      signature: Some(signature),
      state: JwsState::Signed,
      header_b64: Some(parts[0].to_owned()),
    })
  }
}

fn state_name(state: JwsState) -> &'static str {
  match state {
    JwsState::Unsigned => "UNSIGNED",
    JwsState::Signed => "SIGNED",
    JwsState::Verified => "VERIFIED",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwa::JwsAlgorithm;
  use crate::jwk::Jwk;
  use crate::jwk::OctKeyBuilder;
  use crate::provider::HmacProvider;
  use crate::provider::SignerFactory;
  use crate::provider::VerifierFactory;

  #[test]
  fn hs256_round_trip_matches_rfc7515_appendix_a1() {
    // RFC 7515 §A.1 example: same header, claims payload, and key.
    let header = JwsHeader::new(JwsAlgorithm::HS256);
    let payload = Payload::from_bytes(
      br#"{"iss":"joe","exp":1300819380,"http://example.com/is_root":true}"#.to_vec(),
    );
    let key = Jwk::Oct(
      OctKeyBuilder::new()
        .k(codec::decode_b64_str(
          "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow",
          "k",
        ).unwrap())
        .build()
        .unwrap(),
    );
    let provider = HmacProvider::new();
    let signer = provider.create_signer(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    let mut object = JwsObject::new(header, payload);
    object.sign(signer.as_ref()).unwrap();
    assert_eq!(object.state(), JwsState::Signed);
    let compact = object.serialize().unwrap();

    let mut parsed = JwsObject::parse(&compact).unwrap();
    let verifier = provider.create_verifier(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    parsed.verify(verifier.as_ref(), &[]).unwrap();
    assert_eq!(parsed.state(), JwsState::Verified);
  }

  #[test]
  fn verifies_rfc7515_appendix_a1_compact_vector_with_nonstandard_header_order() {
    // The literal RFC 7515 §A.1 compact encoding: header member order is
    // typ-then-alg, the reverse of this crate's own serialization order.
    // Verification must use the header bytes actually present in `compact`,
    // not a re-serialization of the parsed header.
    let compact = "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.\
eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ.\
dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    let key = Jwk::Oct(
      OctKeyBuilder::new()
        .k(codec::decode_b64_str(
          "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow",
          "k",
        ).unwrap())
        .build()
        .unwrap(),
    );
    let provider = HmacProvider::new();
    let verifier = provider.create_verifier(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    let mut parsed = JwsObject::parse(compact).unwrap();
    parsed.verify(verifier.as_ref(), &[]).unwrap();
    assert_eq!(parsed.state(), JwsState::Verified);
    // serialize() must reproduce the original bytes exactly, not a
    // re-canonicalized header.
    assert_eq!(parsed.serialize().unwrap(), compact);
  }

  #[test]
  fn verify_rejects_before_sign_transition() {
    let header = JwsHeader::new(JwsAlgorithm::HS256);
    let mut object = JwsObject::new(header, Payload::from_text("x"));
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 32]).build().unwrap());
    let provider = HmacProvider::new();
    let verifier = provider.create_verifier(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    assert!(object.verify(verifier.as_ref(), &[]).is_err());
  }

  #[test]
  fn unknown_crit_parameter_is_rejected_before_verification() {
    let mut header = JwsHeader::new(JwsAlgorithm::HS256);
    header.set_crit(vec!["x-custom".to_owned()]);
    header.set_custom("x-custom", serde_json::Value::Bool(true)).unwrap();
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 32]).build().unwrap());
    let provider = HmacProvider::new();
    let signer = provider.create_signer(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    let mut object = JwsObject::new(header, Payload::from_text("x"));
    object.sign(signer.as_ref()).unwrap();
    let compact = object.serialize().unwrap();
    let mut parsed = JwsObject::parse(&compact).unwrap();
    let verifier = provider.create_verifier(JwsAlgorithm::HS256, &key).unwrap().unwrap();
    assert!(parsed.verify(verifier.as_ref(), &[]).is_err());
    assert!(parsed.verify(verifier.as_ref(), &["x-custom"]).is_ok());
  }
}
