//! Structs modeling responses from the Hoyolab community API.
//!
//! These types are passive data contracts, they perform no I/O. An external
//! API client fetches the JSON and hands each object to [`Account::from_json`],
//! [`RecordCard::from_json`] or [`SearchUser::from_json`]. Wire field names
//! (`game_uid`, `region`, ...) are translated to canonical names at the
//! deserialization boundary, the in-memory records keep only the latter.

use serde::de::{self, Deserializer, Visitor};
use serde_json::Value;

use std::collections::HashMap;
use std::fmt;

/// A Genshin account attached to a Hoyolab user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
  /// The in-game uid.
  #[serde(rename = "game_uid", deserialize_with = "deserialize_uint_lenient")]
  pub uid: u64,
  /// The account's adventure rank.
  pub level: u32,
  pub nickname: String,
  /// Server code, for example `os_euro`.
  #[serde(rename = "region")]
  pub server: String,
  #[serde(rename = "region_name")]
  pub server_name: String,
  /// Undocumented meaning, passed through untouched.
  #[serde(rename = "game_biz")]
  pub biz: String,
  /// Undocumented meaning, passed through untouched.
  #[serde(rename = "is_chosen")]
  pub chosen: bool,
  /// Undocumented meaning, passed through untouched.
  #[serde(rename = "is_official")]
  pub official: bool
}

impl Account {
  pub fn from_json(value: Value) -> Result<Self, crate::Error> {
    Ok(serde_json::from_value(value)?)
  }
}

/// One labeled entry of a record card's data list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordCardEntry {
  pub name: String,
  pub value: String
}

#[derive(Debug, Clone, Deserialize)]
struct RawRecordCard {
  #[serde(rename = "game_role_id", deserialize_with = "deserialize_uint_lenient")]
  uid: u64,
  level: u32,
  nickname: String,
  #[serde(rename = "region")]
  server: String,
  #[serde(rename = "region_name")]
  server_name: String,
  background_image: String,
  #[serde(rename = "has_role")]
  has_uid: bool,
  #[serde(rename = "is_public")]
  public: bool,
  data: Vec<RecordCardEntry>
}

impl RawRecordCard {
  fn into_record_card(self) -> Result<RecordCard, crate::Error> {
    if self.data.len() < RECORD_CARD_SLOTS {
      return Err(crate::Error::MalformedRecordCard(format!(
        "expected at least {} entries, found {}", RECORD_CARD_SLOTS, self.data.len()
      )));
    }

    Ok(RecordCard {
      uid: self.uid,
      level: self.level,
      nickname: self.nickname,
      server: self.server,
      server_name: self.server_name,
      background_image: self.background_image,
      has_uid: self.has_uid,
      public: self.public,
      days_active: numeric_entry(&self.data[0])?,
      characters: numeric_entry(&self.data[1])?,
      achievements: numeric_entry(&self.data[2])?,
      spiral_abyss: self.data[3].value.clone(),
      data: self.data
    })
  }
}

fn numeric_entry(entry: &RecordCardEntry) -> Result<u32, crate::Error> {
  entry.value.parse().map_err(|_| crate::Error::MalformedRecordCard(format!(
    "entry {:?} has non-numeric value {:?}", entry.name, entry.value
  )))
}

const RECORD_CARD_SLOTS: usize = 4;

/// A Hoyolab record card, the profile snapshot shown on a user's page.
///
/// The wire format carries the headline stats as a list of `(name, value)`
/// pairs whose positions have fixed meaning. [`RecordCard::from_json`] checks
/// that at least four entries are present and fills the named slot fields
/// from them, so a card that parsed successfully always has valid stats.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCard {
  /// The in-game uid.
  pub uid: u64,
  /// The account's adventure rank.
  pub level: u32,
  pub nickname: String,
  /// Server code, for example `os_euro`.
  pub server: String,
  pub server_name: String,
  /// Undocumented meaning, passed through untouched.
  pub background_image: String,
  /// Undocumented meaning, passed through untouched.
  pub has_uid: bool,
  /// Undocumented meaning, passed through untouched.
  pub public: bool,
  /// Slot 0 of the data list.
  pub days_active: u32,
  /// Slot 1 of the data list.
  pub characters: u32,
  /// Slot 2 of the data list.
  pub achievements: u32,
  /// Slot 3 of the data list, a floor-chamber descriptor such as `12-3`.
  pub spiral_abyss: String,
  /// The raw data list the slots above were taken from.
  pub data: Vec<RecordCardEntry>
}

impl RecordCard {
  /// The only locale [`RecordCard::to_map`] currently understands.
  pub const DEFAULT_LOCALE: &'static str = "en-us";

  pub fn from_json(value: Value) -> Result<Self, crate::Error> {
    serde_json::from_value::<RawRecordCard>(value)?.into_record_card()
  }

  /// Projects the data list into a map from entry name to value, coercing
  /// values that consist only of ASCII digits into numbers.
  ///
  /// Entry names are locale dependent, and only [`RecordCard::DEFAULT_LOCALE`]
  /// is implemented. Any other tag fails with
  /// [`Error::UnsupportedLocale`][crate::Error::UnsupportedLocale] rather than
  /// silently returning wrongly keyed data.
  pub fn to_map(&self, locale: &str) -> Result<HashMap<String, Value>, crate::Error> {
    if locale != Self::DEFAULT_LOCALE {
      return Err(crate::Error::UnsupportedLocale(locale.to_owned()));
    }

    Ok(self.data.iter()
      .map(|entry| (entry.name.clone(), coerce_stat_value(&entry.value)))
      .collect())
  }
}

fn coerce_stat_value(value: &str) -> Value {
  if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
    if let Ok(number) = value.parse::<u64>() {
      return Value::from(number);
    }
  }

  Value::from(value)
}

/// A single result from a Hoyolab user search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchUser {
  /// The Hoyolab community uid, not an in-game uid.
  #[serde(rename = "uid", deserialize_with = "deserialize_uint_lenient")]
  pub hoyolab_uid: u64,
  pub nickname: String,
  /// The user's free-text bio.
  #[serde(rename = "introduce")]
  pub introduction: String,
  #[serde(rename = "avatar", deserialize_with = "deserialize_uint_lenient")]
  pub avatar_id: u64,
  /// Numeric gender code as reported by the API.
  pub gender: u32,
  #[serde(rename = "avatar_url")]
  pub icon: String
}

impl SearchUser {
  pub fn from_json(value: Value) -> Result<Self, crate::Error> {
    Ok(serde_json::from_value(value)?)
  }
}

/// The API is inconsistent about whether uids are numbers or digit strings,
/// so accept both.
fn deserialize_uint_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  struct UintLenientVisitor;

  impl<'de> Visitor<'de> for UintLenientVisitor {
    type Value = u64;

    #[inline]
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
      formatter.write_str("an unsigned integer or a string containing one")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where E: de::Error {
      Ok(v)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where E: de::Error {
      v.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
  }

  deserializer.deserialize_any(UintLenientVisitor)
}
