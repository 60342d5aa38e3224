// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

//! A `Read` wrapper that caps the number of bytes it will ever yield, so that
//! retrieving a remote JWK set (spec.md §5 "size-bounded input streams") can
//! never exhaust memory regardless of what the server sends.

use std::io;
use std::io::Read;

pub struct BoundedReader<R> {
  inner: R,
  remaining: u64,
}

impl<R: Read> BoundedReader<R> {
  /// `limit` of `0` means unbounded, matching spec.md §5's "defaults: zero =
  /// infinite".
  pub fn new(inner: R, limit: u64) -> Self {
    Self {
      inner,
      remaining: if limit == 0 { u64::MAX } else { limit },
    }
  }
}

impl<R: Read> Read for BoundedReader<R> {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    if self.remaining == 0 {
      return Err(io::Error::new(io::ErrorKind::Other, "size limit exceeded"));
    }
    let cap = buf.len().min(self.remaining as usize);
    let n = self.inner.read(&mut buf[..cap])?;
    self.remaining -= n as u64;
    // Detect a body that would have exceeded the limit had we not capped the
    // read: if the underlying reader still has more to give beyond `cap`
    // bytes, the caller's subsequent read will hit `remaining == 0` above.
    Ok(n)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_within_limit() {
    let data = b"hello world";
    let mut reader = BoundedReader::new(&data[..], 100);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
  }

  #[test]
  fn rejects_past_limit() {
    let data = vec![0u8; 10];
    let mut reader = BoundedReader::new(&data[..], 4);
    let mut out = Vec::new();
    let result = reader.read_to_end(&mut out);
    assert!(result.is_err());
  }

  #[test]
  fn zero_limit_is_unbounded() {
    let data = vec![1u8; 4096];
    let mut reader = BoundedReader::new(&data[..], 0);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out.len(), 4096);
  }
}
