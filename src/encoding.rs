//! Wire encodings shared by both API versions.
//!
//! UptimeRobot is loose with JSON scalars: the legacy API sends every number
//! as a string, v2 sends numbers but uses `""` for unset ones, booleans are
//! `"1"`/`"0"`, and dates are UNIX seconds where `0` means "never". The
//! `deserialize_with` helpers here normalize all of that into plain Rust
//! types so the per-version DTOs stay declarative.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Any JSON scalar the vendor may use for a single value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

/// Encode a boolean the way UptimeRobot expects it in request parameters.
pub(crate) fn encode_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Encode a timestamp as UNIX seconds.
pub(crate) fn encode_timestamp(value: DateTime<Utc>) -> i64 {
    value.timestamp()
}

/// Join the non-blank list values with `-`, the vendor's list separator.
pub(crate) fn join_dashed<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .filter(|value| !value.trim().is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Enum code sent either as a number or as a numeric string.
pub(crate) fn code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Scalar::deserialize(deserializer)?;
    scalar_to_u64::<D::Error>(&scalar)?
        .ok_or_else(|| de::Error::custom("missing enum code"))
        .and_then(|value| u16::try_from(value).map_err(de::Error::custom))
}

/// Optional enum code; `null` and `""` mean "not set".
pub(crate) fn opt_code<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u16>,
{
    let scalar = Scalar::deserialize(deserializer)?;
    scalar_to_u64::<D::Error>(&scalar)?
        .map(|value| u16::try_from(value).map(T::from).map_err(de::Error::custom))
        .transpose()
}

/// Optional enum code where `0` also means "not set" (subtypes, keyword types).
pub(crate) fn opt_nonzero_code<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u16>,
{
    let scalar = Scalar::deserialize(deserializer)?;
    match scalar_to_u64::<D::Error>(&scalar)? {
        None | Some(0) => Ok(None),
        Some(value) => u16::try_from(value)
            .map(|code| Some(T::from(code)))
            .map_err(de::Error::custom),
    }
}

pub(crate) fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Scalar::deserialize(deserializer)?;
    scalar_to_u64(&scalar)
}

pub(crate) fn u64_value<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    opt_u64(deserializer)?.ok_or_else(|| de::Error::custom("expected an integer"))
}

/// Port numbers; `0` and `""` mean "no port".
pub(crate) fn opt_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_u64(deserializer)? {
        None | Some(0) => Ok(None),
        Some(port) => u16::try_from(port).map(Some).map_err(de::Error::custom),
    }
}

pub(crate) fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        scalar if scalar.is_blank() => Ok(None),
        Scalar::Int(value) => i32::try_from(value).map(Some).map_err(de::Error::custom),
        Scalar::Text(text) => text.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Err(de::Error::custom("expected an integer")),
    }
}

pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        scalar if scalar.is_blank() => Ok(None),
        Scalar::Int(value) => Ok(Some(value as f64)),
        Scalar::Float(value) => Ok(Some(value)),
        Scalar::Text(text) => text.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Err(de::Error::custom("expected a number")),
    }
}

/// Dash-separated uptime ratios, e.g. `"100.00-99.95"`.
pub(crate) fn ratio_list<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        scalar if scalar.is_blank() => Ok(Vec::new()),
        Scalar::Int(value) => Ok(vec![value as f64]),
        Scalar::Float(value) => Ok(vec![value]),
        Scalar::Text(text) => text
            .split('-')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(de::Error::custom))
            .collect(),
        _ => Err(de::Error::custom("expected uptime ratios")),
    }
}

/// Free text; numbers are stringified and `""` becomes `None`.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Null => None,
        Scalar::Text(text) if text.is_empty() => None,
        Scalar::Text(text) => Some(text),
        Scalar::Int(value) => Some(value.to_string()),
        Scalar::Float(value) => Some(value.to_string()),
        Scalar::Bool(value) => Some(value.to_string()),
    })
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Identifier that must be present. Alert contact ids keep leading zeros,
/// so they are never parsed as numbers.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_string(deserializer)?.ok_or_else(|| de::Error::custom("missing id"))
}

/// UNIX seconds as a number or a string; `0` and `""` mean "not set".
pub(crate) fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = match Scalar::deserialize(deserializer)? {
        scalar if scalar.is_blank() => return Ok(None),
        Scalar::Int(value) => value,
        Scalar::Float(value) => value as i64,
        Scalar::Text(text) => text.trim().parse::<i64>().map_err(de::Error::custom)?,
        _ => return Err(de::Error::custom("expected a UNIX timestamp")),
    };

    if seconds == 0 {
        return Ok(None);
    }

    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {seconds}")))
}

/// A list field that may also hold a single bare item.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrMany<T>>::deserialize(deserializer)?
        .map(OneOrMany::into_vec)
        .unwrap_or_default())
}

fn scalar_to_u64<E: de::Error>(scalar: &Scalar) -> Result<Option<u64>, E> {
    match scalar {
        scalar if scalar.is_blank() => Ok(None),
        Scalar::Int(value) => u64::try_from(*value).map(Some).map_err(E::custom),
        Scalar::Float(value) if value.fract() == 0.0 && *value >= 0.0 => Ok(Some(*value as u64)),
        Scalar::Text(text) => text.trim().parse::<u64>().map(Some).map_err(E::custom),
        _ => Err(E::custom("expected an unsigned integer")),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A list nested one level deep under a singleton key, as in
/// `{"monitor": [...]}`.
pub(crate) struct Wrapped<T>(pub(crate) Vec<T>);

impl<'de, T> Deserialize<'de> for Wrapped<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = BTreeMap::<String, OneOrMany<T>>::deserialize(deserializer)?;
        Ok(Wrapped(
            inner.into_values().flat_map(OneOrMany::into_vec).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `"1"`, `1` or `true` decode to `true`; anything else to `false`.
    fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Bool(value) => value,
            Scalar::Int(value) => value == 1,
            Scalar::Float(value) => value == 1.0,
            Scalar::Text(text) => {
                let text = text.trim();
                text == "1" || text.eq_ignore_ascii_case("true")
            }
            Scalar::Null => false,
        })
    }

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "flag")]
        flag: bool,
        #[serde(default, deserialize_with = "opt_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "opt_u64")]
        number: Option<u64>,
        #[serde(default, deserialize_with = "ratio_list")]
        ratios: Vec<f64>,
        #[serde(default, deserialize_with = "opt_string")]
        label: Option<String>,
        #[serde(default, deserialize_with = "opt_port")]
        port: Option<u16>,
    }

    fn decode_fields(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bool_encoding_round_trip() {
        for value in [true, false] {
            let json = format!(r#"{{"flag": "{}"}}"#, encode_bool(value));
            assert_eq!(decode_fields(&json).flag, value);
        }
    }

    #[test]
    fn test_flag_accepts_vendor_variants() {
        assert!(decode_fields(r#"{"flag": 1}"#).flag);
        assert!(decode_fields(r#"{"flag": true}"#).flag);
        assert!(decode_fields(r#"{"flag": "TRUE"}"#).flag);
        assert!(!decode_fields(r#"{"flag": 0}"#).flag);
        assert!(!decode_fields(r#"{"flag": null}"#).flag);
        assert!(!decode_fields(r#"{}"#).flag);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let at = Utc.with_ymd_and_hms(2014, 1, 1, 12, 30, 0).unwrap();
        let seconds = encode_timestamp(at);

        assert_eq!(decode_fields(&format!(r#"{{"at": {seconds}}}"#)).at, Some(at));
        assert_eq!(decode_fields(&format!(r#"{{"at": "{seconds}"}}"#)).at, Some(at));
    }

    #[test]
    fn test_zero_timestamp_is_absent() {
        assert_eq!(decode_fields(r#"{"at": "0"}"#).at, None);
        assert_eq!(decode_fields(r#"{"at": 0}"#).at, None);
        assert_eq!(decode_fields(r#"{"at": ""}"#).at, None);
    }

    #[test]
    fn test_numbers_from_strings() {
        assert_eq!(decode_fields(r#"{"number": "775851423"}"#).number, Some(775851423));
        assert_eq!(decode_fields(r#"{"number": 42}"#).number, Some(42));
        assert_eq!(decode_fields(r#"{"number": ""}"#).number, None);
        assert!(serde_json::from_str::<Fields>(r#"{"number": "abc"}"#).is_err());
    }

    #[test]
    fn test_ratio_list() {
        assert_eq!(
            decode_fields(r#"{"ratios": "100.00-99.95"}"#).ratios,
            vec![100.0, 99.95]
        );
        assert_eq!(decode_fields(r#"{"ratios": 99.5}"#).ratios, vec![99.5]);
        assert!(decode_fields(r#"{"ratios": ""}"#).ratios.is_empty());
    }

    #[test]
    fn test_blank_strings_are_absent() {
        assert_eq!(decode_fields(r#"{"label": ""}"#).label, None);
        assert_eq!(decode_fields(r#"{"label": 12}"#).label, Some("12".to_string()));
        assert_eq!(decode_fields(r#"{"port": ""}"#).port, None);
        assert_eq!(decode_fields(r#"{"port": "8080"}"#).port, Some(8080));
    }

    #[test]
    fn test_wrapped_list_keeps_order() {
        let Wrapped(items): Wrapped<u32> =
            serde_json::from_str(r#"{"monitor": [3, 1, 2]}"#).unwrap();
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_wrapped_single_item() {
        let Wrapped(items): Wrapped<String> =
            serde_json::from_str(r#"{"alertcontact": "only"}"#).unwrap();
        assert_eq!(items, vec!["only".to_string()]);
    }

    #[test]
    fn test_join_dashed() {
        assert_eq!(join_dashed(&[1, 2, 3]), "1-2-3");
        assert_eq!(join_dashed::<u64>(&[]), "");
        assert_eq!(join_dashed(&["", "0526", " ", "4561"]), "0526-4561");
    }
}
