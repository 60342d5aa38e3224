// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use std::io::Read;
use std::time::Duration;

use super::JwkSource;
use crate::codec::BoundedReader;
use crate::error::Error;
use crate::error::IoErrorKind;
use crate::jwk::JwkSet;

/// Connect/read timeouts and a response size cap for [`RemoteJwkSource`]
/// (spec.md §6 "configuration options recognized by remote sources").
#[derive(Debug, Clone)]
pub struct RemoteJwkSourceConfig {
  pub connect_timeout: Duration,
  pub read_timeout: Duration,
  /// Maximum response body size in bytes. Zero means unbounded.
  pub max_response_bytes: u64,
}

impl Default for RemoteJwkSourceConfig {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(5),
      read_timeout: Duration::from_secs(10),
      max_response_bytes: 1024 * 1024,
    }
  }
}

/// A [`JwkSet`] fetched fresh on every call from an HTTPS JWK set endpoint
/// (spec.md §6 "RemoteJwkSource"). Callers who want caching should wrap this
/// in their own memoizing layer; this type intentionally does not guess a
/// cache lifetime.
pub struct RemoteJwkSource {
  url: String,
  config: RemoteJwkSourceConfig,
  agent: ureq::Agent,
}

impl RemoteJwkSource {
  pub fn new(url: impl Into<String>, config: RemoteJwkSourceConfig) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout_connect(config.connect_timeout)
      .timeout_read(config.read_timeout)
      .build();
    Self { url: url.into(), config, agent }
  }
}

impl JwkSource for RemoteJwkSource {
  fn jwk_set(&self) -> Result<JwkSet, Error> {
    let response = self
      .agent
      .get(&self.url)
      .set("Accept", "application/jwk-set+json")
      .call()
      .map_err(|err| match err {
        ureq::Error::Status(status, _) => Error::io(IoErrorKind::BadStatus { status }),
        ureq::Error::Transport(transport) => Error::io(IoErrorKind::Transport(transport.to_string())),
      })?;

    let mut body = String::new();
    BoundedReader::new(response.into_reader(), self.config.max_response_bytes)
      .read_to_string(&mut body)
      .map_err(|_| Error::io(IoErrorKind::SizeLimit))?;

    JwkSet::parse(&body)
  }
}
