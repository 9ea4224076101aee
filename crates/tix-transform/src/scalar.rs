//! Decoding of boxed Extended JSON scalars.
//!
//! Ticket store exports mix plain values with tagged wrappers such as
//! `{"$oid": "..."}`, `{"$date": {"$numberLong": "1700000000000"}}` and
//! `{"$numberLong": "42"}`. [`normalize_scalar`] turns either form into a
//! [`Scalar`]; every later stage works on `Scalar` only.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Hex string of an object reference.
    ObjectId(String),
    /// UTC instant.
    Timestamp(NaiveDateTime),
    /// Anything not recognized, passed through untouched.
    Other(Value),
}

impl Scalar {
    /// Null, or a floating point NaN.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Reads the value as an instant.
    ///
    /// Integers are taken as epoch milliseconds, text is parsed as ISO 8601.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(value) => Some(*value),
            Self::Text(text) => parse_timestamp(text),
            Self::Int(millis) => timestamp_from_millis(*millis),
            _ => None,
        }
    }

    /// Reads the value as an integer; fractional numbers do not qualify.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) => float_to_i64(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_i64))
            }
            _ => None,
        }
    }

    /// Reads the value as a finite float.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Renders the value as text, `None` for null-like values.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Float(value) if value.is_nan() => None,
            Self::Float(value) => Some(value.to_string()),
            Self::Text(text) | Self::ObjectId(text) => Some(text.clone()),
            Self::Timestamp(value) => Some(format_timestamp(*value)),
            Self::Other(value) => Some(value.to_string()),
        }
    }
}

impl From<Option<String>> for Scalar {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl From<Option<i64>> for Scalar {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Null, Self::Int)
    }
}

impl From<Option<f64>> for Scalar {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Float)
    }
}

impl From<Option<NaiveDateTime>> for Scalar {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Self::Null, Self::Timestamp)
    }
}

/// Decodes one field value.
///
/// Never fails: a `$date` whose payload cannot be read becomes [`Scalar::Null`],
/// unknown wrappers come back as [`Scalar::Other`].
pub fn normalize_scalar(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(flag) => Scalar::Bool(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => Scalar::Int(int),
            None => number.as_f64().map_or(Scalar::Other(value.clone()), Scalar::Float),
        },
        Value::String(text) => Scalar::Text(text.clone()),
        Value::Object(map) => decode_wrapper(map).unwrap_or_else(|| Scalar::Other(value.clone())),
        Value::Array(_) => Scalar::Other(value.clone()),
    }
}

/// Decodes an optional field; a missing field is [`Scalar::Null`].
pub fn normalize_field(value: Option<&Value>) -> Scalar {
    value.map_or(Scalar::Null, normalize_scalar)
}

fn decode_wrapper(map: &Map<String, Value>) -> Option<Scalar> {
    if let Some(inner) = map.get("$oid") {
        return match inner {
            Value::String(hex) => Some(Scalar::ObjectId(hex.clone())),
            _ => None,
        };
    }
    if let Some(inner) = map.get("$date") {
        return Some(decode_date(inner));
    }
    for tag in ["$numberLong", "$numberInt"] {
        if let Some(inner) = map.get(tag) {
            return integer_payload(inner).map(Scalar::Int);
        }
    }
    for tag in ["$numberDouble", "$numberDecimal"] {
        if let Some(inner) = map.get(tag) {
            return float_payload(inner).map(Scalar::Float);
        }
    }
    None
}

fn decode_date(inner: &Value) -> Scalar {
    let decoded = match inner {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number.as_i64().and_then(timestamp_from_millis),
        Value::Object(map) => map
            .get("$numberLong")
            .and_then(integer_payload)
            .and_then(timestamp_from_millis),
        _ => None,
    };
    decoded.map_or(Scalar::Null, Scalar::Timestamp)
}

fn integer_payload(value: &Value) -> Option<i64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    }
}

fn float_payload(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn float_to_i64(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Parses an ISO 8601 date or date-time into a UTC instant.
///
/// Values with an offset are converted to UTC; values without one are taken
/// as UTC already. A bare date means midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Converts epoch milliseconds to a UTC instant.
pub fn timestamp_from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|value| value.naive_utc())
}

/// Formats an instant as `YYYY-MM-DD HH:MM:SS[.fraction]`.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(date: &str) -> NaiveDateTime {
        parse_timestamp(date).unwrap()
    }

    #[test]
    fn unwraps_object_id() {
        assert_eq!(
            normalize_scalar(&json!({"$oid": "65a1f0c2e4b0"})),
            Scalar::ObjectId("65a1f0c2e4b0".to_string())
        );
    }

    #[test]
    fn unwraps_dates() {
        let expected = at("2023-11-14T22:13:20");
        assert_eq!(
            normalize_scalar(&json!({"$date": {"$numberLong": "1700000000000"}})),
            Scalar::Timestamp(expected)
        );
        assert_eq!(
            normalize_scalar(&json!({"$date": 1_700_000_000_000_i64})),
            Scalar::Timestamp(expected)
        );
        assert_eq!(
            normalize_scalar(&json!({"$date": "2023-11-15T06:13:20+08:00"})),
            Scalar::Timestamp(expected)
        );
        assert_eq!(
            normalize_scalar(&json!({"$date": "2023-11-14T22:13:20.000Z"})),
            Scalar::Timestamp(expected)
        );
    }

    #[test]
    fn undecodable_date_is_null() {
        assert_eq!(normalize_scalar(&json!({"$date": "not a date"})), Scalar::Null);
        assert_eq!(normalize_scalar(&json!({"$date": true})), Scalar::Null);
    }

    #[test]
    fn unwraps_numbers() {
        assert_eq!(normalize_scalar(&json!({"$numberLong": "42"})), Scalar::Int(42));
        assert_eq!(normalize_scalar(&json!({"$numberInt": "7"})), Scalar::Int(7));
        assert_eq!(
            normalize_scalar(&json!({"$numberDouble": "2.5"})),
            Scalar::Float(2.5)
        );
        assert_eq!(normalize_scalar(&json!(12)), Scalar::Int(12));
        assert_eq!(normalize_scalar(&json!(1.25)), Scalar::Float(1.25));
    }

    #[test]
    fn unknown_wrappers_pass_through() {
        let value = json!({"$regex": "^a"});
        assert_eq!(normalize_scalar(&value), Scalar::Other(value.clone()));
        let malformed = json!({"$numberLong": "forty-two"});
        assert_eq!(normalize_scalar(&malformed), Scalar::Other(malformed.clone()));
        let list = json!([1, 2]);
        assert_eq!(normalize_scalar(&list), Scalar::Other(list.clone()));
    }

    #[test]
    fn plain_scalars_pass_through() {
        assert_eq!(normalize_scalar(&json!("open")), Scalar::Text("open".into()));
        assert_eq!(normalize_scalar(&json!(null)), Scalar::Null);
        assert_eq!(normalize_scalar(&json!(false)), Scalar::Bool(false));
        assert_eq!(normalize_field(None), Scalar::Null);
    }

    #[test]
    fn parses_timestamp_variants() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-03-01 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp(" 2024-03-01T00:00 "), Some(midnight));
        assert_eq!(parse_timestamp("2024-03-01T08:00:00+0800"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn integers_from_mixed_encodings() {
        assert_eq!(Scalar::Text(" 15 ".into()).as_i64(), Some(15));
        assert_eq!(Scalar::Text("15.0".into()).as_i64(), Some(15));
        assert_eq!(Scalar::Float(15.5).as_i64(), None);
        assert_eq!(Scalar::Float(f64::NAN).as_i64(), None);
        assert_eq!(Scalar::Float(1e300).as_i64(), None);
        assert_eq!(Scalar::ObjectId("15".into()).as_i64(), None);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(Scalar::Float(40.0).to_text().as_deref(), Some("40"));
        assert_eq!(Scalar::Float(f64::NAN).to_text(), None);
        assert_eq!(
            Scalar::Timestamp(at("2024-03-01T10:30:00")).to_text().as_deref(),
            Some("2024-03-01 10:30:00")
        );
        assert_eq!(
            Scalar::Other(json!({"a": 1})).to_text().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn formatted_timestamps_parse_back() {
        let value = at("2024-03-01T10:30:00.250");
        assert_eq!(parse_timestamp(&format_timestamp(value)), Some(value));
    }
}
