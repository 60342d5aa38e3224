// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON Object Signing and Encryption (JOSE): JWS (RFC 7515), JWE (RFC 7516),
//! JWK (RFC 7517), JWA (RFC 7518) and JWT (RFC 7519).
//!
//! The crate is organized bottom-up: [`jwa`] names the algorithm catalog,
//! [`header`] and [`jwk`] model the JSON structures the algorithms operate
//! over, [`jose`] implements the compact-serialized object lifecycles (sign,
//! verify, encrypt, decrypt), [`jwt`] layers registered claims on top, and
//! [`processor`] ties selectors and crypto [`provider`]s together into a
//! single `process(compact) -> payload` entry point.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unreachable_pub)]

mod codec;
mod error;
pub mod header;
pub mod jose;
pub mod jwa;
pub mod jwk;
pub mod jwt;
pub mod processor;
pub mod provider;
pub mod source;

mod payload;

pub use crate::error::CryptoErrorKind;
pub use crate::error::Error;
pub use crate::error::IoErrorKind;
pub use crate::error::ParseReason;
pub use crate::error::PolicyErrorKind;
pub use crate::payload::Payload;
