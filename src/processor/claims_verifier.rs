// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::error::Error;
use crate::error::PolicyErrorKind;
use crate::jwt::ClaimsSet;

/// Applies policy to an already-extracted [`ClaimsSet`] (spec.md §4.7
/// "claims verifier").
pub trait ClaimsVerifier {
  fn verify(&self, claims: &ClaimsSet) -> Result<(), Error>;
}

/// Rejects expired and not-yet-valid tokens, honoring a clock-skew
/// tolerance. Missing `exp`/`nbf` skip the corresponding check (RFC 7519
/// §4.1.4, §4.1.5).
#[derive(Debug, Clone, Copy)]
pub struct DefaultClaimsVerifier {
  clock_skew: Duration,
}

impl DefaultClaimsVerifier {
  pub fn new(clock_skew: Duration) -> Self {
    Self { clock_skew }
  }

  fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
  }
}

impl Default for DefaultClaimsVerifier {
  fn default() -> Self {
    Self::new(Duration::ZERO)
  }
}

impl ClaimsVerifier for DefaultClaimsVerifier {
  fn verify(&self, claims: &ClaimsSet) -> Result<(), Error> {
    let skew = self.clock_skew.as_secs() as i64;
    let now = Self::now();
    if let Some(exp) = claims.exp() {
      if now - skew >= exp {
        return Err(Error::policy(PolicyErrorKind::Expired));
      }
    }
    if let Some(nbf) = claims.nbf() {
      if now + skew < nbf {
        return Err(Error::policy(PolicyErrorKind::NotYetValid));
      }
    }
    Ok(())
  }
}

/// Chains an inner [`ClaimsVerifier`] (typically [`DefaultClaimsVerifier`])
/// with an issuer allow-list and required-audience check (spec.md §4.7
/// "an application-supplied verifier may chain additional checks").
pub struct IssuerAudienceVerifier<V> {
  inner: V,
  allowed_issuers: Vec<String>,
  required_audience: Option<String>,
}

impl<V: ClaimsVerifier> IssuerAudienceVerifier<V> {
  pub fn new(inner: V) -> Self {
    Self { inner, allowed_issuers: Vec::new(), required_audience: None }
  }

  pub fn allow_issuer(mut self, issuer: impl Into<String>) -> Self {
    self.allowed_issuers.push(issuer.into());
    self
  }

  pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
    self.required_audience = Some(audience.into());
    self
  }
}

impl<V: ClaimsVerifier> ClaimsVerifier for IssuerAudienceVerifier<V> {
  fn verify(&self, claims: &ClaimsSet) -> Result<(), Error> {
    self.inner.verify(claims)?;
    if !self.allowed_issuers.is_empty() {
      let matches = claims.iss().map(|iss| self.allowed_issuers.iter().any(|a| a == iss)).unwrap_or(false);
      if !matches {
        return Err(Error::policy(PolicyErrorKind::IssuerMismatch));
      }
    }
    if let Some(required) = &self.required_audience {
      if !claims.aud().iter().any(|aud| aud == required) {
        return Err(Error::policy(PolicyErrorKind::AudienceMismatch));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claims_expiring_in(seconds_from_now: i64) -> ClaimsSet {
    let mut claims = ClaimsSet::new();
    claims.set_exp(DefaultClaimsVerifier::now() + seconds_from_now);
    claims
  }

  #[test]
  fn rejects_expired_claims() {
    let verifier = DefaultClaimsVerifier::default();
    let claims = claims_expiring_in(-1);
    assert!(matches!(verifier.verify(&claims), Err(Error::Policy { kind: PolicyErrorKind::Expired })));
  }

  #[test]
  fn accepts_unexpired_claims() {
    let verifier = DefaultClaimsVerifier::default();
    let claims = claims_expiring_in(3600);
    assert!(verifier.verify(&claims).is_ok());
  }

  #[test]
  fn clock_skew_tolerates_small_overshoot() {
    let verifier = DefaultClaimsVerifier::new(Duration::from_secs(120));
    let claims = claims_expiring_in(-60);
    assert!(verifier.verify(&claims).is_ok());
  }

  #[test]
  fn issuer_audience_verifier_rejects_unknown_issuer() {
    let mut claims = ClaimsSet::new();
    claims.set_iss("https://evil.example");
    let verifier = IssuerAudienceVerifier::new(DefaultClaimsVerifier::default()).allow_issuer("https://good.example");
    assert!(matches!(verifier.verify(&claims), Err(Error::Policy { kind: PolicyErrorKind::IssuerMismatch })));
  }
}
