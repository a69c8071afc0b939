//! Field extraction for the three provider payloads.
//!
//! None of these functions is a general CSV or JSON parser. The literal
//! scanners pull a single value out of the exact shapes the providers return,
//! and they inherit the limits of that approach: the JSON key lookup is a
//! plain substring search, so a key that also appears inside another key or a
//! string value earlier in the body is matched there instead.
//!
//! [`Mode::Structured`] is the stricter alternative for the JSON bodies. It
//! parses the whole document with `serde_json` and looks the key up properly.

use memchr::{memchr, memchr3, memmem};
use serde_json::Value;
use thiserror::Error;

/// Upper bound on the length of any extracted value, in bytes.
pub const MAX_FIELD_LEN: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("invalid field index {0} for CSV record")]
  InvalidFieldIndex(usize),
  #[error("unable to read field {0} from CSV record")]
  FieldNotFound(usize),
  #[error("malformed CSV field")]
  MalformedField,
  #[error("unable to parse value for '{0}'")]
  UnableToParse(String),
  #[error("malformed JSON value for '{0}'")]
  MalformedValue(String),
  #[error("response body is not valid JSON: {0}")]
  InvalidJson(String),
  #[error("value for '{0}' has an unexpected type")]
  UnexpectedType(String),
}

/// How the JSON provider bodies are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  /// Substring key lookup followed by delimiter scanning.
  #[default]
  Literal,
  /// Full `serde_json` parse with a depth-first key search.
  Structured,
}

impl Mode {
  /// Extracts a value written as a quoted string.
  ///
  /// # Errors
  /// See [`json_string_value`] and [`structured_string_value`].
  pub fn string_value(self, body: &str, key: &str) -> Result<String, Error> {
    match self {
      Self::Literal => json_string_value(body, key),
      Self::Structured => structured_string_value(body, key),
    }
  }

  /// Extracts a value written as a bare number.
  ///
  /// # Errors
  /// See [`json_number_value`] and [`structured_number_value`].
  pub fn number_value(self, body: &str, key: &str) -> Result<String, Error> {
    match self {
      Self::Literal => json_number_value(body, key),
      Self::Structured => structured_number_value(body, key),
    }
  }
}

/// Returns the unquoted text of the `index`-th (1-based) field of a
/// single-line CSV record.
///
/// A `"` toggles quoted mode. Commas inside quotes belong to the field, the
/// quotes themselves are dropped. The last field needs no trailing comma.
///
/// # Errors
/// - [`Error::InvalidFieldIndex`] when `index` is 0
/// - [`Error::MalformedField`] when a field grows past [`MAX_FIELD_LEN`] or a
///   quote is never closed
/// - [`Error::FieldNotFound`] when the record has fewer than `index` fields
pub fn csv_field(record: &str, index: usize) -> Result<String, Error> {
  if index < 1 {
    return Err(Error::InvalidFieldIndex(index));
  }

  let mut field = String::new();
  let mut count = 1;
  let mut quoted = false;

  for c in record.chars() {
    match c {
      '"' => quoted = !quoted,
      ',' if !quoted => {
        if count == index {
          return Ok(field);
        }
        count += 1;
        field.clear();
      }
      _ => {
        if field.len() + c.len_utf8() > MAX_FIELD_LEN {
          return Err(Error::MalformedField);
        }
        field.push(c);
      }
    }
  }

  if quoted {
    return Err(Error::MalformedField);
  }
  if count == index {
    Ok(field)
  } else {
    Err(Error::FieldNotFound(index))
  }
}

/// Returns the quoted string value written after the first occurrence of
/// `key` in a flat JSON-like body.
///
/// # Errors
/// [`Error::UnableToParse`] when the key, the colon, or either quote cannot
/// be found before the end of the body, and [`Error::MalformedValue`] when
/// the value is longer than [`MAX_FIELD_LEN`].
pub fn json_string_value(body: &str, key: &str) -> Result<String, Error> {
  let bytes = body.as_bytes();
  let unable = || Error::UnableToParse(key.to_owned());

  let after_colon = value_start(bytes, key)?;
  let open =
    after_colon + memchr(b'"', &bytes[after_colon..]).ok_or_else(unable)? + 1;
  let close = open + memchr(b'"', &bytes[open..]).ok_or_else(unable)?;

  bounded(&body[open..close], key)
}

/// Returns the unquoted numeric text written after the first occurrence of
/// `key`, ending at `,`, a space, or `}`.
///
/// The scan skips everything up to the first ASCII digit, so the sign of a
/// negative value is not part of the result.
///
/// # Errors
/// Same as [`json_string_value`].
pub fn json_number_value(body: &str, key: &str) -> Result<String, Error> {
  let bytes = body.as_bytes();
  let unable = || Error::UnableToParse(key.to_owned());

  let after_colon = value_start(bytes, key)?;
  let start = after_colon
    + bytes[after_colon..]
      .iter()
      .position(u8::is_ascii_digit)
      .ok_or_else(unable)?;
  let end = start + memchr3(b',', b' ', b'}', &bytes[start..]).ok_or_else(unable)?;

  bounded(&body[start..end], key)
}

/// Parses `body` as JSON and returns the string stored under `key`.
///
/// # Errors
/// [`Error::InvalidJson`], [`Error::UnableToParse`] when no object holds
/// `key`, [`Error::UnexpectedType`] when the value is not a string.
pub fn structured_string_value(body: &str, key: &str) -> Result<String, Error> {
  let root = parse_body(body)?;
  match find_key(&root, key) {
    Some(Value::String(s)) => bounded(s, key),
    Some(_) => Err(Error::UnexpectedType(key.to_owned())),
    None => Err(Error::UnableToParse(key.to_owned())),
  }
}

/// Parses `body` as JSON and returns the number stored under `key` as text,
/// sign included.
///
/// # Errors
/// Same as [`structured_string_value`], with numbers instead of strings.
pub fn structured_number_value(body: &str, key: &str) -> Result<String, Error> {
  let root = parse_body(body)?;
  match find_key(&root, key) {
    Some(Value::Number(n)) => bounded(&n.to_string(), key),
    Some(_) => Err(Error::UnexpectedType(key.to_owned())),
    None => Err(Error::UnableToParse(key.to_owned())),
  }
}

/// Byte offset just past the first `:` that follows `key`.
fn value_start(bytes: &[u8], key: &str) -> Result<usize, Error> {
  let unable = || Error::UnableToParse(key.to_owned());
  if key.is_empty() {
    return Err(unable());
  }

  let at = memmem::find(bytes, key.as_bytes()).ok_or_else(unable)? + key.len();
  let colon = memchr(b':', &bytes[at..]).ok_or_else(unable)?;
  Ok(at + colon + 1)
}

fn bounded(value: &str, key: &str) -> Result<String, Error> {
  if value.len() > MAX_FIELD_LEN {
    Err(Error::MalformedValue(key.to_owned()))
  } else {
    Ok(value.to_owned())
  }
}

fn parse_body(body: &str) -> Result<Value, Error> {
  serde_json::from_str(body).map_err(|e| Error::InvalidJson(e.to_string()))
}

/// Depth-first: an object's own keys are checked before its children, and
/// children are visited in document order (`preserve_order`).
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
  match value {
    Value::Object(map) => map
      .get(key)
      .or_else(|| map.values().find_map(|v| find_key(v, key))),
    Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const IP_API: &str = "success,United States,US,VA,Virginia,Ashburn,20149,\
    39.03,-77.5,America/New_York,Google LLC,\"Google, Public DNS\",\
    \"AS15169 Google LLC\",8.8.8.8\n";

  #[test]
  fn test_csv_plain_fields() {
    assert_eq!(csv_field(IP_API, 1).unwrap(), "success");
    assert_eq!(csv_field(IP_API, 6).unwrap(), "Ashburn");
    assert_eq!(csv_field(IP_API, 8).unwrap(), "39.03");
    assert_eq!(csv_field(IP_API, 9).unwrap(), "-77.5");
  }

  #[test]
  fn test_csv_quoted_field_keeps_commas() {
    assert_eq!(csv_field(IP_API, 12).unwrap(), "Google, Public DNS");
    assert_eq!(csv_field(IP_API, 13).unwrap(), "AS15169 Google LLC");
  }

  #[test]
  fn test_csv_last_field_has_no_delimiter() {
    assert_eq!(csv_field(IP_API, 14).unwrap(), "8.8.8.8\n");
    assert_eq!(csv_field("a,b,c", 3).unwrap(), "c");
  }

  #[test]
  fn test_csv_matches_manual_split() {
    let record = "one,\"two, too\",three,,five";
    let expected = ["one", "two, too", "three", "", "five"];
    for (i, want) in expected.iter().enumerate() {
      assert_eq!(&csv_field(record, i + 1).unwrap(), want, "field {}", i + 1);
    }
  }

  #[test]
  fn test_csv_invalid_index() {
    assert_eq!(csv_field("a,b", 0), Err(Error::InvalidFieldIndex(0)));
  }

  #[test]
  fn test_csv_field_not_found() {
    assert_eq!(csv_field("a,b", 3), Err(Error::FieldNotFound(3)));
    assert_eq!(csv_field("", 2), Err(Error::FieldNotFound(2)));
  }

  #[test]
  fn test_csv_oversized_field_fails_loudly() {
    let long = "x".repeat(MAX_FIELD_LEN + 1);
    let record = format!("ok,{long},tail");
    assert_eq!(csv_field(&record, 2), Err(Error::MalformedField));

    let exact = "y".repeat(MAX_FIELD_LEN);
    assert_eq!(csv_field(&exact, 1).unwrap(), exact);
  }

  #[test]
  fn test_csv_unterminated_quote() {
    assert_eq!(csv_field("a,\"b,c", 2), Err(Error::MalformedField));
  }

  #[test]
  fn test_json_string_value() {
    let body = r#"{"status":"success","description":"Data received."}"#;
    assert_eq!(json_string_value(body, "status").unwrap(), "success");
    assert_eq!(
      json_string_value(body, "description").unwrap(),
      "Data received."
    );
  }

  #[test]
  fn test_json_string_value_tolerates_whitespace() {
    let body = "{\n  \"ip\": \"8.8.8.8\",\n  \"loc\": \"37.4056,-122.0775\"\n}";
    assert_eq!(json_string_value(body, "loc").unwrap(), "37.4056,-122.0775");
  }

  #[test]
  fn test_json_string_value_empty_string() {
    assert_eq!(json_string_value(r#"{"city":""}"#, "city").unwrap(), "");
  }

  #[test]
  fn test_json_string_value_substring_match_is_literal() {
    // "loc" first appears inside "locale", so its value is returned.
    let body = r#"{"locale":"en-US","loc":"1.0,2.0"}"#;
    assert_eq!(json_string_value(body, "loc").unwrap(), "en-US");
  }

  #[test]
  fn test_json_string_value_errors() {
    let unable = Err(Error::UnableToParse("loc".into()));
    assert_eq!(json_string_value(r#"{"ip":"1.2.3.4"}"#, "loc"), unable);
    assert_eq!(json_string_value(r#"{"loc" "x"}"#, "loc"), unable);
    assert_eq!(json_string_value(r#"{"loc": 12}"#, "loc"), unable);
    assert_eq!(json_string_value(r#"{"loc":"12"#, "loc"), unable);
    assert_eq!(json_string_value("anything", ""), Err(Error::UnableToParse(String::new())));
  }

  #[test]
  fn test_json_string_value_oversized() {
    let body = format!(r#"{{"loc":"{}"}}"#, "1".repeat(MAX_FIELD_LEN + 1));
    assert_eq!(
      json_string_value(&body, "loc"),
      Err(Error::MalformedValue("loc".into()))
    );
  }

  #[test]
  fn test_json_number_value() {
    let body = r#"{"latitude": 12.34, "longitude":56.78}"#;
    assert_eq!(json_number_value(body, "latitude").unwrap(), "12.34");
    assert_eq!(json_number_value(body, "longitude").unwrap(), "56.78");
    assert_eq!(json_number_value("latitude: 12.34,", "latitude").unwrap(), "12.34");
  }

  #[test]
  fn test_json_number_value_drops_leading_minus() {
    let body = r#"{"latitude":37.751,"longitude":-97.822,"metro_code":null}"#;
    assert_eq!(json_number_value(body, "longitude").unwrap(), "97.822");
  }

  #[test]
  fn test_json_number_value_errors() {
    let unable = Err(Error::UnableToParse("latitude".into()));
    assert_eq!(json_number_value(r#"{"lat":1.0}"#, "latitude"), unable);
    assert_eq!(json_number_value(r#"{"latitude":null}"#, "latitude"), unable);
    assert_eq!(json_number_value(r#"{"latitude":1.0"#, "latitude"), unable);
  }

  #[test]
  fn test_mode_literal_dispatch() {
    let body = r#"{"status":"success","latitude":-1.5}"#;
    assert_eq!(Mode::Literal.string_value(body, "status").unwrap(), "success");
    assert_eq!(Mode::Literal.number_value(body, "latitude").unwrap(), "1.5");
  }

  #[test]
  fn test_structured_nested_lookup_keeps_sign() {
    let body = r#"{"status":"success","data":{"geo":{"latitude":37.751,"longitude":-97.822}}}"#;
    assert_eq!(Mode::Structured.string_value(body, "status").unwrap(), "success");
    assert_eq!(Mode::Structured.number_value(body, "latitude").unwrap(), "37.751");
    assert_eq!(Mode::Structured.number_value(body, "longitude").unwrap(), "-97.822");
  }

  #[test]
  fn test_structured_avoids_substring_match() {
    let body = r#"{"locale":"en-US","loc":"1.0,2.0"}"#;
    assert_eq!(structured_string_value(body, "loc").unwrap(), "1.0,2.0");
  }

  #[test]
  fn test_structured_descends_in_document_order() {
    let body = r#"{"z":{"loc":"1.0,1.0"},"a":{"loc":"2.0,2.0"}}"#;
    assert_eq!(structured_string_value(body, "loc").unwrap(), "1.0,1.0");
  }

  #[test]
  fn test_structured_errors() {
    assert!(matches!(
      structured_string_value("not json", "loc"),
      Err(Error::InvalidJson(_))
    ));
    assert_eq!(
      structured_string_value(r#"{"loc":5}"#, "loc"),
      Err(Error::UnexpectedType("loc".into()))
    );
    assert_eq!(
      structured_number_value(r#"{"latitude":null}"#, "latitude"),
      Err(Error::UnexpectedType("latitude".into()))
    );
    assert_eq!(
      structured_number_value(r#"{"lat":1}"#, "latitude"),
      Err(Error::UnableToParse("latitude".into()))
    );
  }
}
