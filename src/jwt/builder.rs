// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value;

use super::ClaimsSet;
use crate::error::Error;

/// Builder-style constructor for a [`ClaimsSet`], matching the `*KeyBuilder`
/// chain style used throughout `jwk`.
#[derive(Debug, Clone, Default)]
pub struct ClaimsSetBuilder {
  claims: ClaimsSet,
}

impl ClaimsSetBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn iss(mut self, value: impl Into<String>) -> Self {
    self.claims.set_iss(value);
    self
  }

  pub fn sub(mut self, value: impl Into<String>) -> Self {
    self.claims.set_sub(value);
    self
  }

  pub fn aud(mut self, value: Vec<String>) -> Self {
    self.claims.set_aud(value);
    self
  }

  pub fn exp(mut self, value: i64) -> Self {
    self.claims.set_exp(value);
    self
  }

  pub fn nbf(mut self, value: i64) -> Self {
    self.claims.set_nbf(value);
    self
  }

  pub fn iat(mut self, value: i64) -> Self {
    self.claims.set_iat(value);
    self
  }

  pub fn jti(mut self, value: impl Into<String>) -> Self {
    self.claims.set_jti(value);
    self
  }

  pub fn custom(mut self, name: impl Into<String>, value: Value) -> Result<Self, Error> {
    self.claims.set_custom(name, value)?;
    Ok(self)
  }

  pub fn build(self) -> ClaimsSet {
    self.claims
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builds_claims_with_registered_and_custom_fields() {
    let claims = ClaimsSetBuilder::new()
      .iss("joe")
      .exp(1300819380)
      .custom("http://example.com/is_root", Value::from(true))
      .unwrap()
      .build();
    assert_eq!(claims.iss(), Some("joe"));
    assert_eq!(claims.exp(), Some(1300819380));
    assert_eq!(claims.custom("http://example.com/is_root"), Some(&Value::from(true)));
  }
}
