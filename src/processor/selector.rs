// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::header::JweHeader;
use crate::header::JwsHeader;
use crate::jwk::select;
use crate::jwk::JwkMatcher;
use crate::jwk::KeyUse;
use crate::jwk::Jwk;
use crate::source::JwkSource;

/// Produces candidate verification keys for a JWS header, in the order they
/// should be tried (spec.md §4.7 "trial policy").
pub trait JwsKeySelector {
  fn select(&self, header: &JwsHeader) -> Result<Vec<Jwk>, Error>;
}

/// Produces candidate decryption keys for a JWE header.
pub trait JweKeySelector {
  fn select(&self, header: &JweHeader) -> Result<Vec<Jwk>, Error>;
}

/// The common selector shape: pull the current set from a [`JwkSource`],
/// then narrow it with a [`JwkMatcher`] built from the header's `alg` and
/// (if present) `kid` (spec.md §4.6 "selector/factory composition").
pub struct JwkSetKeySelector<S> {
  source: S,
  key_use: Option<KeyUse>,
}

impl<S: JwkSource> JwkSetKeySelector<S> {
  pub fn new(source: S) -> Self {
    Self { source, key_use: None }
  }

  /// Additionally requires candidates to declare this `use` (or omit it).
  pub fn with_key_use(mut self, key_use: KeyUse) -> Self {
    self.key_use = Some(key_use);
    self
  }

  fn candidates(&self, alg_name: &str, kid: Option<&str>) -> Result<Vec<Jwk>, Error> {
    let set = self.source.jwk_set()?;
    let mut matcher = JwkMatcher::new().algorithm(Some(alg_name));
    if let Some(kid) = kid {
      matcher = matcher.key_id(Some(kid));
    }
    if let Some(key_use) = self.key_use {
      matcher = matcher.key_use(Some(key_use));
    }
    Ok(select(&set, &matcher).into_iter().cloned().collect())
  }
}

impl<S: JwkSource> JwsKeySelector for JwkSetKeySelector<S> {
  fn select(&self, header: &JwsHeader) -> Result<Vec<Jwk>, Error> {
    self.candidates(header.alg().name(), header.kid())
  }
}

impl<S: JwkSource> JweKeySelector for JwkSetKeySelector<S> {
  fn select(&self, header: &JweHeader) -> Result<Vec<Jwk>, Error> {
    self.candidates(header.alg().name(), header.kid())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwa::JwsAlgorithm;
  use crate::jwk::JwkSet;
  use crate::jwk::OctKeyBuilder;
  use crate::source::InMemoryJwkSource;

  #[test]
  fn narrows_by_algorithm_and_kid() {
    let matching = OctKeyBuilder::new().k(vec![1; 32]).alg("HS256").kid("k1").build().unwrap();
    let other = OctKeyBuilder::new().k(vec![2; 32]).alg("HS384").kid("k2").build().unwrap();
    let set = JwkSet::from_keys(vec![Jwk::Oct(matching), Jwk::Oct(other)]);
    let selector = JwkSetKeySelector::new(InMemoryJwkSource::new(set));

    let header = JwsHeader::new(JwsAlgorithm::HS256);
    let candidates = JwsKeySelector::select(&selector, &header).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kid(), Some("k1"));
  }
}
