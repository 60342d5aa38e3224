// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Composable JWK selection criteria (spec.md §4.6 "Matcher/Selector").

use super::Jwk;
use super::KeyOperation;
use super::KeyType;
use super::KeyUse;

/// A conjunction of independent criteria. Every `Some` field must match for
/// a key to be selected; `None` means "don't care about this criterion".
/// `PrivacyFilter::Unspecified` is the sentinel that matches keys which omit
/// the corresponding registry parameter (spec.md §9 "sentinel for
/// unspecified").
#[derive(Debug, Clone, Default)]
pub struct JwkMatcher {
  key_types: Option<Vec<KeyType>>,
  key_uses: Option<Vec<Option<KeyUse>>>,
  key_ops: Option<Vec<Option<KeyOperation>>>,
  algorithms: Option<Vec<Option<String>>>,
  key_ids: Option<Vec<Option<String>>>,
  private_only: bool,
  public_only: bool,
  min_size_bits: Option<usize>,
  max_size_bits: Option<usize>,
}

impl JwkMatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn key_type(mut self, kty: KeyType) -> Self {
    self.key_types.get_or_insert_with(Vec::new).push(kty);
    self
  }

  /// `None` matches keys that omit `use` entirely.
  pub fn key_use(mut self, value: Option<KeyUse>) -> Self {
    self.key_uses.get_or_insert_with(Vec::new).push(value);
    self
  }

  /// `None` admits keys that omit `key_ops` entirely; a `Some(op)` adds `op`
  /// to the allowed set a JWK's own operations must be a subset of.
  pub fn key_operation(mut self, op: Option<KeyOperation>) -> Self {
    self.key_ops.get_or_insert_with(Vec::new).push(op);
    self
  }

  /// `None` matches keys that omit `alg` entirely.
  pub fn algorithm(mut self, value: Option<impl Into<String>>) -> Self {
    self.algorithms.get_or_insert_with(Vec::new).push(value.map(Into::into));
    self
  }

  /// `None` matches keys that omit `kid` entirely.
  pub fn key_id(mut self, value: Option<impl Into<String>>) -> Self {
    self.key_ids.get_or_insert_with(Vec::new).push(value.map(Into::into));
    self
  }

  pub fn private_only(mut self) -> Self {
    self.private_only = true;
    self
  }

  pub fn public_only(mut self) -> Self {
    self.public_only = true;
    self
  }

  pub fn min_size_bits(mut self, bits: usize) -> Self {
    self.min_size_bits = Some(bits);
    self
  }

  pub fn max_size_bits(mut self, bits: usize) -> Self {
    self.max_size_bits = Some(bits);
    self
  }

  pub fn matches(&self, key: &Jwk) -> bool {
    if let Some(types) = &self.key_types {
      if !types.contains(&key.kty()) {
        return false;
      }
    }
    if let Some(uses) = &self.key_uses {
      if !uses.contains(&key.key_use()) {
        return false;
      }
    }
    if let Some(criterion) = &self.key_ops {
      // (a) criterion admits "unspecified" and the JWK's ops are absent.
      let unspecified_matches = criterion.contains(&None) && key.key_ops().is_none();
      // (b) the JWK's declared ops are a subset of the criterion.
      let subset_matches = key
        .key_ops()
        .map(|key_ops| key_ops.iter().all(|op| criterion.contains(&Some(*op))))
        .unwrap_or(false);
      if !unspecified_matches && !subset_matches {
        return false;
      }
    }
    if let Some(algs) = &self.algorithms {
      let key_alg = key.alg().map(str::to_owned);
      if !algs.contains(&key_alg) {
        return false;
      }
    }
    if let Some(ids) = &self.key_ids {
      let key_id = key.kid().map(str::to_owned);
      if !ids.contains(&key_id) {
        return false;
      }
    }
    if self.private_only && !key.is_private() {
      return false;
    }
    if self.public_only && key.is_private() {
      return false;
    }
    if self.min_size_bits.is_some() || self.max_size_bits.is_some() {
      let Some(bits) = key_size_bits(key) else {
        return false;
      };
      if let Some(min) = self.min_size_bits {
        if bits < min {
          return false;
        }
      }
      if let Some(max) = self.max_size_bits {
        if bits > max {
          return false;
        }
      }
    }
    true
  }
}

/// Approximate key size in bits, used for minimum-strength filtering.
/// `None` for key types this crate does not size-bound (currently none).
fn key_size_bits(key: &Jwk) -> Option<usize> {
  match key {
    Jwk::Ec(k) => Some(k.curve().coordinate_len() * 8),
    Jwk::Rsa(k) => Some(crate::codec::strip_leading_zero(k.n()).len() * 8),
    Jwk::Oct(k) => Some(k.k().len() * 8),
    Jwk::Okp(k) => Some(k.curve().coordinate_len() * 8),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::OctKeyBuilder;

  #[test]
  fn key_type_filter_excludes_other_types() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).build().unwrap());
    let matcher = JwkMatcher::new().key_type(KeyType::Rsa);
    assert!(!matcher.matches(&key));
  }

  #[test]
  fn unspecified_use_sentinel_matches_absent_use() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).build().unwrap());
    let matcher = JwkMatcher::new().key_use(None);
    assert!(matcher.matches(&key));
  }

  #[test]
  fn key_ops_subset_of_criterion_matches() {
    // Criterion allows {sign, verify}; a JWK declaring only {sign} is a
    // subset and must match.
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).key_ops(vec![KeyOperation::Sign]).build().unwrap());
    let matcher = JwkMatcher::new().key_operation(Some(KeyOperation::Sign)).key_operation(Some(KeyOperation::Verify));
    assert!(matcher.matches(&key));
  }

  #[test]
  fn key_ops_not_subset_of_criterion_rejects() {
    let key =
      Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).key_ops(vec![KeyOperation::Sign, KeyOperation::Verify]).build().unwrap());
    let matcher = JwkMatcher::new().key_operation(Some(KeyOperation::Sign));
    assert!(!matcher.matches(&key));
  }

  #[test]
  fn unspecified_key_ops_sentinel_matches_absent_key_ops() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).build().unwrap());
    let matcher = JwkMatcher::new().key_operation(None).key_operation(Some(KeyOperation::Sign));
    assert!(matcher.matches(&key));
  }

  #[test]
  fn missing_unspecified_sentinel_rejects_absent_key_ops() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).build().unwrap());
    let matcher = JwkMatcher::new().key_operation(Some(KeyOperation::Sign));
    assert!(!matcher.matches(&key));
  }

  #[test]
  fn min_size_rejects_short_keys() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 8]).build().unwrap());
    let matcher = JwkMatcher::new().min_size_bits(256);
    assert!(!matcher.matches(&key));
  }
}
