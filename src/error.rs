// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy shared by every module in this crate.
//!
//! Variants map directly onto the kinds described in the specification's
//! error-handling design: input parsing, builder/setter misuse, state-machine
//! violations, unsupported algorithms, cryptographic failures, policy
//! rejections, remote I/O, and integer overflow during size arithmetic.

use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error kind. Each variant carries the context needed to explain
/// the failure (offending field, algorithm name, expected/actual state)
/// without resorting to string-typed kinds.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
  /// Input was not well-formed: malformed compact serialization, invalid
  /// JSON, a header/JWK/claims field with the wrong shape.
  #[error("parse error: {reason}")]
  Parse { reason: ParseReason },

  /// A builder or setter was given an invalid value: a required field was
  /// missing, or a caller tried to set a reserved parameter name as custom.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// An operation was attempted while the enclosing JOSE object was in the
  /// wrong lifecycle state.
  #[error("state error: cannot {operation} while in state {state}")]
  State { operation: &'static str, state: &'static str },

  /// The named algorithm is not implemented by any configured provider.
  #[error("unsupported algorithm: {0}")]
  UnsupportedAlgorithm(String),

  /// A cryptographic step failed.
  #[error("crypto error: {kind}")]
  Crypto { kind: CryptoErrorKind },

  /// The input was structurally valid but rejected by policy.
  #[error("policy error: {kind}")]
  Policy { kind: PolicyErrorKind },

  /// A remote JWK source retrieval failed.
  #[error("io error: {kind}")]
  Io { kind: IoErrorKind },

  /// Size arithmetic overflowed while computing a digest or key length.
  #[error("integer overflow computing {context}")]
  IntegerOverflow { context: &'static str },
}

impl Error {
  pub fn parse(reason: ParseReason) -> Self {
    Error::Parse { reason }
  }

  pub fn invalid_argument(msg: impl Into<String>) -> Self {
    Error::InvalidArgument(msg.into())
  }

  pub fn state(operation: &'static str, state: &'static str) -> Self {
    Error::State { operation, state }
  }

  pub fn unsupported_algorithm(name: impl Into<String>) -> Self {
    Error::UnsupportedAlgorithm(name.into())
  }

  pub fn crypto(kind: CryptoErrorKind) -> Self {
    Error::Crypto { kind }
  }

  pub fn policy(kind: PolicyErrorKind) -> Self {
    Error::Policy { kind }
  }

  pub fn io(kind: IoErrorKind) -> Self {
    Error::Io { kind }
  }

  /// True for failures that are *integrity-definitive*: trying another
  /// selector candidate cannot change the outcome, so the processor's trial
  /// loop should stop advancing once this is the final candidate (spec.md
  /// §4.7, §7 propagation policy).
  pub fn is_integrity_definitive(&self) -> bool {
    matches!(
      self,
      Error::Crypto {
        kind: CryptoErrorKind::InvalidSignature | CryptoErrorKind::IntegrityFailed
      }
    )
  }
}

/// Why a parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseReason {
  MissingDelimiter,
  ExcessDelimiter,
  PartCountMismatch { expected: &'static str, found: usize },
  InvalidBase64 { part: &'static str },
  InvalidJson { context: String },
  InvalidUtf8,
  MissingField { field: &'static str },
  ReservedFieldConflict { fields: (&'static str, &'static str) },
  InvalidFieldValue { field: &'static str, reason: String },
}

impl fmt::Display for ParseReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParseReason::MissingDelimiter => write!(f, "missing '.' delimiter"),
      ParseReason::ExcessDelimiter => write!(f, "too many '.' delimiters"),
      ParseReason::PartCountMismatch { expected, found } => {
        write!(f, "expected {expected} parts, found {found}")
      }
      ParseReason::InvalidBase64 { part } => write!(f, "invalid base64url in {part}"),
      ParseReason::InvalidJson { context } => write!(f, "invalid JSON: {context}"),
      ParseReason::InvalidUtf8 => write!(f, "invalid UTF-8"),
      ParseReason::MissingField { field } => write!(f, "missing required field `{field}`"),
      ParseReason::ReservedFieldConflict { fields } => {
        write!(f, "`{}` and `{}` are mutually exclusive", fields.0, fields.1)
      }
      ParseReason::InvalidFieldValue { field, reason } => {
        write!(f, "invalid value for `{field}`: {reason}")
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CryptoErrorKind {
  InvalidSignature,
  IntegrityFailed,
  Decryption,
  KeyType,
}

impl fmt::Display for CryptoErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      CryptoErrorKind::InvalidSignature => "invalid signature",
      CryptoErrorKind::IntegrityFailed => "integrity check failed",
      CryptoErrorKind::Decryption => "decryption failed",
      CryptoErrorKind::KeyType => "incompatible key type",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyErrorKind {
  UnsecuredRejected,
  NoMatchingKey,
  Expired,
  NotYetValid,
  CritNotUnderstood(String),
  IssuerMismatch,
  AudienceMismatch,
}

impl fmt::Display for PolicyErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PolicyErrorKind::UnsecuredRejected => write!(f, "unsecured (alg=none) objects are rejected"),
      PolicyErrorKind::NoMatchingKey => write!(f, "no matching key found"),
      PolicyErrorKind::Expired => write!(f, "token has expired"),
      PolicyErrorKind::NotYetValid => write!(f, "token is not yet valid"),
      PolicyErrorKind::CritNotUnderstood(name) => write!(f, "critical parameter `{name}` not understood"),
      PolicyErrorKind::IssuerMismatch => write!(f, "issuer not in allow-list"),
      PolicyErrorKind::AudienceMismatch => write!(f, "audience does not contain expected value"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IoErrorKind {
  BadStatus { status: u16 },
  SizeLimit,
  Transport(String),
}

impl fmt::Display for IoErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IoErrorKind::BadStatus { status } => write!(f, "unexpected HTTP status {status}"),
      IoErrorKind::SizeLimit => write!(f, "response exceeded configured size limit"),
      IoErrorKind::Transport(msg) => write!(f, "transport error: {msg}"),
    }
  }
}

impl From<serde_json::Error> for Error {
  fn from(source: serde_json::Error) -> Self {
    Error::parse(ParseReason::InvalidJson { context: source.to_string() })
  }
}
