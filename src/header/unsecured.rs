// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;

use super::require_str;
use super::take_str;
use super::take_str_array;
use super::CustomParams;
use super::JoseHeader;
use crate::error::Error;
use crate::error::ParseReason;

const RESERVED: &[&str] = &["alg", "typ", "cty", "crit"];

/// Header of an unsecured JOSE object. `alg` is always the `NONE` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsecuredHeader {
  typ: Option<String>,
  cty: Option<String>,
  crit: Option<Vec<String>>,
  custom: CustomParams,
}

impl UnsecuredHeader {
  pub fn new() -> Self {
    Self {
      typ: None,
      cty: None,
      crit: None,
      custom: CustomParams::new(),
    }
  }

  pub fn parse(mut map: Map<String, Value>) -> Result<Self, Error> {
    let alg = require_str(&map, "alg")?;
    if alg != "none" {
      return Err(Error::parse(ParseReason::InvalidFieldValue {
        field: "alg",
        reason: format!("expected `none`, found `{alg}`"),
      }));
    }
    map.remove("alg");
    let typ = take_str(&mut map, "typ");
    let cty = take_str(&mut map, "cty");
    let crit = take_str_array(&mut map, "crit");
    let custom = CustomParams::drain_unreserved(&mut map, RESERVED);
    Ok(Self { typ, cty, crit, custom })
  }

  pub fn to_json(&self) -> Value {
    let mut map = Map::new();
    map.insert("alg".to_owned(), Value::from("none"));
    if let Some(typ) = &self.typ {
      map.insert("typ".to_owned(), Value::from(typ.as_str()));
    }
    if let Some(cty) = &self.cty {
      map.insert("cty".to_owned(), Value::from(cty.as_str()));
    }
    if let Some(crit) = &self.crit {
      map.insert("crit".to_owned(), Value::from(crit.clone()));
    }
    for (key, value) in self.custom.map() {
      map.insert(key.clone(), value.clone());
    }
    Value::Object(map)
  }
}

impl Default for UnsecuredHeader {
  fn default() -> Self {
    Self::new()
  }
}

impl JoseHeader for UnsecuredHeader {
  fn typ(&self) -> Option<&str> {
    self.typ.as_deref()
  }

  fn set_typ(&mut self, value: impl Into<String>) {
    self.typ = Some(value.into());
  }

  fn cty(&self) -> Option<&str> {
    self.cty.as_deref()
  }

  fn set_cty(&mut self, value: impl Into<String>) {
    self.cty = Some(value.into());
  }

  fn crit(&self) -> Option<&[String]> {
    self.crit.as_deref()
  }

  fn set_crit(&mut self, value: Vec<String>) {
    self.crit = Some(value);
  }

  fn custom(&self, name: &str) -> Option<&Value> {
    self.custom.get(name)
  }

  fn set_custom(&mut self, name: impl Into<String>, value: Value) -> Result<(), Error> {
    self.custom.set(RESERVED, name, value)
  }

  fn custom_params(&self) -> &Map<String, Value> {
    self.custom.map()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_custom_reserved_name() {
    let mut header = UnsecuredHeader::new();
    assert!(header.set_custom("cty", Value::from("x")).is_err());
  }

  #[test]
  fn round_trips_through_json() {
    let mut header = UnsecuredHeader::new();
    header.set_custom("http://example.com/is_root", Value::Bool(true)).unwrap();
    let json = header.to_json();
    let parsed = UnsecuredHeader::parse(json.as_object().unwrap().clone()).unwrap();
    assert_eq!(parsed, header);
  }

  #[test]
  fn rejects_non_none_alg() {
    let mut map = Map::new();
    map.insert("alg".to_owned(), Value::from("HS256"));
    assert!(UnsecuredHeader::parse(map).is_err());
  }
}
