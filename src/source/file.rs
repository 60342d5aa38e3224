// Copyright 2020-2024 jose contributors
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use super::JwkSource;
use crate::error::Error;
use crate::error::IoErrorKind;
use crate::jwk::JwkSet;

struct Cache {
  set: JwkSet,
  modified: Option<SystemTime>,
}

/// A [`JwkSet`] backed by a JSON file on disk, reread only when the file's
/// mtime advances past the cached read (spec.md §6 "file sources reload on
/// change, not on every call").
pub struct FileJwkSource {
  path: PathBuf,
  cache: Mutex<Option<Cache>>,
}

impl FileJwkSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), cache: Mutex::new(None) }
  }

  fn mtime(path: &Path) -> Result<Option<SystemTime>, Error> {
    match fs::metadata(path) {
      Ok(meta) => Ok(meta.modified().ok()),
      Err(err) => Err(Error::io(IoErrorKind::Transport(err.to_string()))),
    }
  }

  fn load(&self) -> Result<JwkSet, Error> {
    let text = fs::read_to_string(&self.path).map_err(|err| Error::io(IoErrorKind::Transport(err.to_string())))?;
    JwkSet::parse(&text)
  }
}

impl JwkSource for FileJwkSource {
  fn jwk_set(&self) -> Result<JwkSet, Error> {
    let current_mtime = Self::mtime(&self.path)?;
    let mut guard = self.cache.lock().expect("cache mutex poisoned");
    let stale = match guard.as_ref() {
      Some(cache) => cache.modified != current_mtime,
      None => true,
    };
    if stale {
      let set = self.load()?;
      *guard = Some(Cache { set: set.clone(), modified: current_mtime });
      return Ok(set);
    }
    Ok(guard.as_ref().expect("checked Some above").set.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn reloads_after_file_changes() {
    let mut path = std::env::temp_dir();
    path.push(format!("jose-filejwksource-test-{}.json", std::process::id()));
    {
      let mut file = fs::File::create(&path).unwrap();
      write!(file, r#"{{"keys":[]}}"#).unwrap();
    }
    let source = FileJwkSource::new(&path);
    assert_eq!(source.jwk_set().unwrap().keys().len(), 0);

    std::thread::sleep(std::time::Duration::from_millis(10));
    {
      let mut file = fs::File::create(&path).unwrap();
      write!(
        file,
        r#"{{"keys":[{{"kty":"oct","k":"AQID"}}]}}"#
      )
      .unwrap();
    }
    assert_eq!(source.jwk_set().unwrap().keys().len(), 1);
    fs::remove_file(&path).ok();
  }
}
