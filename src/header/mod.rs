// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Header model shared by unsecured, JWS, and JWE objects (spec.md §3
//! "Header (abstract)", §4.2).

mod jwe;
mod jws;
mod unsecured;

pub use jwe::JweHeader;
pub use jws::JwsHeader;
pub use unsecured::UnsecuredHeader;

use serde_json::Map;
use serde_json::Value;

use crate::codec;
use crate::error::Error;
use crate::error::ParseReason;

/// Behavior common to every header variant: a required algorithm name, an
/// optional media type / content type, a `crit` set, and reserved-name-aware
/// custom parameters.
///
/// `alg` itself is intentionally not part of this trait: each variant types
/// it differently (`JwsAlgorithm`, `JweKeyAlgorithm`, or the `NONE` sentinel),
/// so callers go through the concrete type rather than this trait for it.
pub trait JoseHeader {
  fn typ(&self) -> Option<&str>;
  fn set_typ(&mut self, value: impl Into<String>);

  fn cty(&self) -> Option<&str>;
  fn set_cty(&mut self, value: impl Into<String>);

  fn crit(&self) -> Option<&[String]>;
  fn set_crit(&mut self, value: Vec<String>);

  fn custom(&self, name: &str) -> Option<&Value>;
  fn set_custom(&mut self, name: impl Into<String>, value: Value) -> Result<(), Error>;
  fn custom_params(&self) -> &Map<String, Value>;
}

/// Shared storage + reserved-name bookkeeping for a header variant's custom
/// parameters. Each concrete header embeds one of these and delegates
/// `JoseHeader::{custom,set_custom,custom_params}` to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CustomParams(Map<String, Value>);

impl CustomParams {
  pub(crate) fn new() -> Self {
    Self(Map::new())
  }

  pub(crate) fn get(&self, name: &str) -> Option<&Value> {
    self.0.get(name)
  }

  pub(crate) fn set(&mut self, reserved: &[&'static str], name: impl Into<String>, value: Value) -> Result<(), Error> {
    let name = name.into();
    if reserved.contains(&name.as_str()) {
      return Err(Error::invalid_argument(format!(
        "`{name}` is a reserved header parameter and cannot be set as custom"
      )));
    }
    self.0.insert(name, value);
    Ok(())
  }

  pub(crate) fn map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub(crate) fn map_mut(&mut self) -> &mut Map<String, Value> {
    &mut self.0
  }

  /// Pulls every entry out of `source` whose key is not in `reserved`,
  /// leaving `source` containing only reserved keys. Used when parsing: the
  /// typed getters consume reserved fields, and whatever remains becomes
  /// custom parameters (spec.md §4.2).
  pub(crate) fn drain_unreserved(source: &mut Map<String, Value>, reserved: &[&'static str]) -> Self {
    let keys: Vec<String> = source.keys().filter(|k| !reserved.contains(&k.as_str())).cloned().collect();
    let mut custom = Map::new();
    for key in keys {
      if let Some(value) = source.remove(&key) {
        custom.insert(key, value);
      }
    }
    Self(custom)
  }
}

/// Reads a required string field by name, failing with a `ParseError` naming
/// the field (spec.md §4.2 "typed getter").
pub(crate) fn require_str(map: &Map<String, Value>, field: &'static str) -> Result<String, Error> {
  map
    .get(field)
    .and_then(Value::as_str)
    .map(str::to_owned)
    .ok_or(Error::parse(ParseReason::MissingField { field }))
}

pub(crate) fn take_str(map: &mut Map<String, Value>, field: &'static str) -> Option<String> {
  map.remove(field).and_then(|v| v.as_str().map(str::to_owned))
}

pub(crate) fn take_str_array(map: &mut Map<String, Value>, field: &'static str) -> Option<Vec<String>> {
  let value = map.remove(field)?;
  value
    .as_array()
    .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_owned).collect())
}

pub(crate) fn take_b64(map: &mut Map<String, Value>, field: &'static str) -> Result<Option<Vec<u8>>, Error> {
  match take_str(map, field) {
    Some(s) => Ok(Some(codec::decode_b64_str(&s, field)?)),
    None => Ok(None),
  }
}

pub(crate) fn take_json(map: &mut Map<String, Value>, field: &'static str) -> Option<Value> {
  map.remove(field)
}

/// Rejects a header whose `crit` set names an extension parameter the
/// caller does not understand (RFC 7515 §4.1.11 / RFC 7516 §4.1.13,
/// spec.md §4.7 "crit enforcement"). Must run before any cryptographic
/// verification step.
pub(crate) fn check_crit(crit: Option<&[String]>, understood: &[&str]) -> Result<(), Error> {
  if let Some(names) = crit {
    for name in names {
      if !understood.contains(&name.as_str()) {
        return Err(Error::policy(crate::error::PolicyErrorKind::CritNotUnderstood(name.clone())));
      }
    }
  }
  Ok(())
}
