#![cfg(test)]

use gi_data::logfile::{extract_authkey, get_authkey, get_banner_ids, Options};
use gi_data::Error;

use std::fs;
use std::path::Path;

fn options_in(dir: &Path) -> Options {
  Options::default()
    .logfile(dir.join("output_log.txt"))
    .cache_file(dir.join("authkey_cache.txt"))
}

fn write_logfile(options: &Options, contents: &str) {
  fs::write(options.logfile.as_ref().unwrap(), contents).unwrap();
}

#[test]
fn extract_authkey_stops_at_next_parameter() {
  let text = "https://x/y?authkey=ABC123&foo=1";
  assert_eq!(extract_authkey(text).as_deref(), Some("ABC123"));
}

#[test]
fn extract_authkey_stops_at_fragment() {
  let text = "https://x/y?authkey=ABC123#frag";
  assert_eq!(extract_authkey(text).as_deref(), Some("ABC123"));
}

#[test]
fn extract_authkey_percent_decodes() {
  let text = "https://x/y?authkey=a%2Bb%3D%3D&end=1";
  assert_eq!(extract_authkey(text).as_deref(), Some("a+b=="));
}

#[test]
fn extract_authkey_finds_first_match_in_multiline_text() {
  let text = "line one, nothing here\n\
    OnGetWebViewPageFinish:https://hk4e-api.example.com/event/gacha?authkey=FIRST&x=1\n\
    https://hk4e-api.example.com/event/gacha?authkey=SECOND&x=2\n";
  assert_eq!(extract_authkey(text).as_deref(), Some("FIRST"));
}

#[test]
fn extract_authkey_returns_none_without_match() {
  assert_eq!(extract_authkey("no urls in here at all"), None);
  assert_eq!(extract_authkey("https://x/y?other=1"), None);
}

#[test]
fn get_authkey_writes_extracted_key_to_cache() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  write_logfile(&options, "https://x/y?authkey=FRESH&foo=1\n");

  assert_eq!(get_authkey(&options).unwrap(), "FRESH");
  assert_eq!(fs::read_to_string(&options.cache_file).unwrap(), "FRESH");
}

#[test]
fn get_authkey_overwrites_previous_cache() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  fs::write(&options.cache_file, "STALE").unwrap();
  write_logfile(&options, "https://x/y?authkey=FRESH&foo=1\n");

  assert_eq!(get_authkey(&options).unwrap(), "FRESH");
  assert_eq!(fs::read_to_string(&options.cache_file).unwrap(), "FRESH");
}

#[test]
fn get_authkey_falls_back_to_cache() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  fs::write(&options.cache_file, "OLD").unwrap();
  write_logfile(&options, "nothing of interest\n");

  assert_eq!(get_authkey(&options).unwrap(), "OLD");
}

#[test]
fn get_authkey_fails_without_key_or_cache() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  write_logfile(&options, "nothing of interest\n");

  let err = get_authkey(&options).unwrap_err();
  assert!(matches!(err, Error::AuthKeyNotFound), "unexpected error: {err:?}");
}

#[test]
fn get_authkey_propagates_missing_explicit_logfile() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());

  let err = get_authkey(&options).unwrap_err();
  assert!(matches!(err, Error::IoError(_)), "unexpected error: {err:?}");
}

#[test]
fn get_banner_ids_deduplicates() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  write_logfile(&options, "\
    OnGetWebViewPageFinish:https://x/y?gacha_id=AAA&foo=1\n\
    OnGetWebViewPageFinish:https://x/y?gacha_id=BBB&foo=1\n\
    OnGetWebViewPageFinish:https://x/y?gacha_id=AAA&foo=2\n");

  let ids = get_banner_ids(&options).unwrap();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains("AAA"));
  assert!(ids.contains("BBB"));
}

#[test]
fn get_banner_ids_empty_without_matches() {
  let dir = tempfile::tempdir().unwrap();
  let options = options_in(dir.path());
  write_logfile(&options, "https://x/y?gacha_id=AAA but no webview marker\n");

  assert!(get_banner_ids(&options).unwrap().is_empty());
}
