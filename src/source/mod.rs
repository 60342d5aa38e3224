// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Sources of a [`JwkSet`]: an in-memory set, a file reloaded on change, and
//! (behind the `remote-jwk` feature) an HTTP(S) JWK set endpoint (spec.md §6
//! "JwkSource").

mod file;
#[cfg(feature = "remote-jwk")]
mod remote;

pub use file::FileJwkSource;
#[cfg(feature = "remote-jwk")]
pub use remote::RemoteJwkSource;
#[cfg(feature = "remote-jwk")]
pub use remote::RemoteJwkSourceConfig;

use crate::error::Error;
use crate::jwk::JwkSet;

/// Anything that can hand back the current [`JwkSet`] on demand. Selector
/// candidates are drawn from whatever this returns at call time — sources
/// that cache are expected to invalidate themselves internally.
pub trait JwkSource {
  fn jwk_set(&self) -> Result<JwkSet, Error>;
}

/// A fixed, never-changing [`JwkSet`] (spec.md §6 "the trivial source").
#[derive(Debug, Clone)]
pub struct InMemoryJwkSource {
  set: JwkSet,
}

impl InMemoryJwkSource {
  pub fn new(set: JwkSet) -> Self {
    Self { set }
  }
}

impl JwkSource for InMemoryJwkSource {
  fn jwk_set(&self) -> Result<JwkSet, Error> {
    Ok(self.set.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::Jwk;
  use crate::jwk::OctKeyBuilder;

  #[test]
  fn in_memory_source_returns_a_clone_of_its_set() {
    let key = Jwk::Oct(OctKeyBuilder::new().k(vec![1, 2, 3]).build().unwrap());
    let source = InMemoryJwkSource::new(JwkSet::from_keys(vec![key]));
    let set = source.jwk_set().unwrap();
    assert_eq!(set.keys().len(), 1);
  }
}
