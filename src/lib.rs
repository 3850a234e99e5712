#![warn(missing_debug_implementations, unreachable_pub)]

//! A Rust library for recovering Genshin Impact credentials from the game's
//! local logfile and exposing Hoyolab API responses as easy to understand
//! Rust structures.
//!
//! This crate does not talk to the network itself. The [`logfile`] module
//! digs an authkey and the viewed banner ids out of the game's
//! `output_log.txt`, and the [`records`] module parses the JSON objects an
//! external API client fetches with them.

extern crate log;
extern crate once_cell;
extern crate regex;
#[macro_use]
extern crate serde;
extern crate serde_json;
extern crate shellexpand;
#[macro_use]
extern crate thiserror;
extern crate urlencoding;

pub mod logfile;
pub mod records;

pub use crate::logfile::Options;
pub use crate::records::{Account, RecordCard, RecordCardEntry, SearchUser};

#[derive(Debug, Error)]
pub enum Error {
  /// Returned when no logfile path was supplied and none of the known
  /// installation directories contain one.
  #[error("no Genshin Impact installation was found, could not get gacha data")]
  SourceNotFound,
  /// Returned when neither the logfile nor the cache file yielded an authkey.
  #[error("no authkey could be found in the logs or in the cache file, \
    open the wish history in-game first before attempting to request it")]
  AuthKeyNotFound,
  #[error(transparent)]
  IoError(#[from] std::io::Error),
  #[error(transparent)]
  JsonError(#[from] serde_json::Error),
  /// Returned when a record card's data list is shorter than the four fixed
  /// slots, or a numeric slot does not hold a number.
  #[error("malformed record card data: {0}")]
  MalformedRecordCard(String),
  #[error("unsupported locale {0:?}, only \"en-us\" is implemented")]
  UnsupportedLocale(String)
}
