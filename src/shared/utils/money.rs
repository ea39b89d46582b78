//! 금액 직렬화 헬퍼
//! Decimal <-> JSON number.
//!
//! The wallet service speaks plain JSON numbers. Values go through their
//! shortest text form in both directions so `12.3456` stays `12.3456`
//! instead of picking up binary floating point noise.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let as_float = f64::from_str(&value.to_string()).map_err(serde::ser::Error::custom)?;
    serializer.serialize_f64(as_float)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(Decimal::from(v)),
        Raw::Float(v) => decimal_from_f64(v).map_err(serde::de::Error::custom),
        Raw::Text(v) => Decimal::from_str(v.trim()).map_err(serde::de::Error::custom),
    }
}

/// f64 → Decimal (최단 표현 문자열 경유)
pub fn decimal_from_f64(value: f64) -> Result<Decimal, String> {
    if !value.is_finite() {
        return Err(format!("non-finite amount: {}", value));
    }
    Decimal::from_str(&value.to_string()).map_err(|e| e.to_string())
}
