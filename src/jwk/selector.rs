// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use super::Jwk;
use super::JwkMatcher;
use super::JwkSet;

/// Returns every key in `set` that satisfies `matcher`, in set order
/// (spec.md §4.6 "selection preserves set order"). The processor's trial
/// loop relies on this ordering to make key selection deterministic.
pub fn select<'a>(set: &'a JwkSet, matcher: &JwkMatcher) -> Vec<&'a Jwk> {
  set.iter().filter(|key| matcher.matches(key)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::KeyType;
  use crate::jwk::OctKeyBuilder;
  use crate::jwk::RsaKeyBuilder;

  #[test]
  fn preserves_set_order() {
    let oct = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).kid("a").build().unwrap());
    let rsa = Jwk::Rsa(RsaKeyBuilder::new().n(vec![1; 256]).e(vec![1, 0, 1]).kid("b").build().unwrap());
    let set = JwkSet::from_keys(vec![oct, rsa]);
    let matcher = JwkMatcher::new();
    let selected = select(&set, &matcher);
    assert_eq!(selected[0].kid(), Some("a"));
    assert_eq!(selected[1].kid(), Some("b"));
  }

  #[test]
  fn filters_by_key_type() {
    let oct = Jwk::Oct(OctKeyBuilder::new().k(vec![1; 16]).build().unwrap());
    let set = JwkSet::from_keys(vec![oct]);
    let matcher = JwkMatcher::new().key_type(KeyType::Rsa);
    assert!(select(&set, &matcher).is_empty());
  }
}
