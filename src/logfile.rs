//! Recovers an authkey and the viewed banner ids from the game's logfile,
//! without touching the network.
//!
//! The game writes the gacha-history URL, authkey included, to
//! `output_log.txt` whenever the wish history is opened in-game. An authkey
//! pulled out of there is cached to a file in the temporary directory so it
//! can still be handed out after the log rotates, until it expires
//! server-side. Banner ids only show up for banners whose details page was
//! opened during the session.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Installation directory names under the miHoYo application data root,
/// one per known product/region variant.
const INSTALL_DIR_NAMES: [&str; 3] = ["Genshin Impact", "原神", "YuanShen"];

const MIHOYO_DIR: &str = "~/AppData/LocalLow/miHoYo/";

static RX_AUTHKEY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"https://.+?authkey=([^&#]+)").unwrap()
});

static RX_GACHA_ID: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"OnGetWebViewPageFinish:https://.+?gacha_id=([^&#]+)").unwrap()
});

/// Options that specify where to look for the game's logfile and where
/// extracted authkeys are cached.
#[derive(Debug, Clone)]
pub struct Options {
  /// Explicit path to the game's `output_log.txt`.
  /// When `None`, the known installation directories are probed instead.
  pub logfile: Option<PathBuf>,
  /// The file freshly extracted authkeys are written to, and read back from
  /// when the logfile no longer contains one.
  pub cache_file: PathBuf
}

impl Options {
  /// Defaults to `gi_data_authkey.txt` in the platform's temporary directory.
  pub fn default_cache_file() -> PathBuf {
    env::temp_dir().join("gi_data_authkey.txt")
  }

  pub fn logfile(self, logfile: impl Into<PathBuf>) -> Self {
    Options { logfile: Some(logfile.into()), cache_file: self.cache_file }
  }

  pub fn cache_file(self, cache_file: impl Into<PathBuf>) -> Self {
    Options { logfile: self.logfile, cache_file: cache_file.into() }
  }
}

impl Default for Options {
  fn default() -> Self {
    Options {
      logfile: None,
      cache_file: Options::default_cache_file()
    }
  }
}

/// Finds the Genshin Impact logfile. `None` if no installation was found.
pub fn locate_logfile() -> Option<PathBuf> {
  let mihoyo_dir = shellexpand::tilde(MIHOYO_DIR);
  let mihoyo_dir = Path::new(mihoyo_dir.as_ref());
  INSTALL_DIR_NAMES.iter()
    .map(|name| mihoyo_dir.join(name).join("output_log.txt"))
    .find(|logfile| logfile.is_file())
}

fn read_logfile(logfile: Option<&Path>) -> Result<String, crate::Error> {
  let logfile = match logfile {
    Some(logfile) => logfile.to_owned(),
    None => locate_logfile().ok_or(crate::Error::SourceNotFound)?
  };

  Ok(fs::read_to_string(logfile)?)
}

/// Extracts an authkey from the given text. `None` if none is present.
///
/// Matches the first `https://...authkey=...` occurrence anywhere in the
/// text and returns the key percent-decoded.
pub fn extract_authkey(text: &str) -> Option<String> {
  RX_AUTHKEY.captures(text)
    .and_then(|captures| captures.get(1))
    .map(|key| percent_decode(key.as_str()))
}

fn percent_decode(text: &str) -> String {
  String::from_utf8_lossy(&urlencoding::decode_binary(text.as_bytes())).into_owned()
}

/// Gets an authkey, from the logfile if possible, from the cache otherwise.
///
/// A key freshly extracted from the logfile overwrites the cache file before
/// being returned. When the log yields nothing the cached key is returned
/// verbatim, which may mean handing out an expired key, the expiry is not
/// detectable locally. Fails with
/// [`Error::AuthKeyNotFound`][crate::Error::AuthKeyNotFound] when neither
/// source has one.
pub fn get_authkey(options: &Options) -> Result<String, crate::Error> {
  match read_logfile(options.logfile.as_deref()) {
    Ok(log) => if let Some(authkey) = extract_authkey(&log) {
      fs::write(&options.cache_file, &authkey)?;
      return Ok(authkey);
    },
    // the cache may still hold a key
    Err(crate::Error::SourceNotFound) => debug!("no installation found, trying the authkey cache"),
    Err(err) => return Err(err)
  }

  if options.cache_file.is_file() {
    debug!("returning cached authkey from {}", options.cache_file.display());
    return Ok(fs::read_to_string(&options.cache_file)?);
  }

  Err(crate::Error::AuthKeyNotFound)
}

/// Gets the distinct banner ids appearing in the logfile.
///
/// Only banners whose details page was opened in-game leave a trace, so an
/// empty set just means none were viewed this session.
pub fn get_banner_ids(options: &Options) -> Result<HashSet<String>, crate::Error> {
  let log = read_logfile(options.logfile.as_deref())?;
  Ok(RX_GACHA_ID.captures_iter(&log)
    .filter_map(|captures| captures.get(1))
    .map(|id| id.as_str().to_owned())
    .collect())
}
