//! FromValue trait for converting column values to Rust types
//!
//! Conversions are best-effort: a column is accepted whenever its value has
//! an unambiguous reading in the target type (an integral `Float` into an
//! integer, numeric `Text` into a number, and so on).

use crate::error::{Error, Result};
use crate::value::{Value, TIMESTAMP_FORMAT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Trait for types that can be constructed from a column value.
///
/// This is implemented for common Rust types and can be manually
/// implemented for custom types (e.g., enums).
pub trait FromValue: Sized {
    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> Error {
    match value {
        Value::Null => Error::UnexpectedNull(expected.to_string()),
        _ => Error::TypeConversion {
            expected,
            actual: value.type_name().to_string(),
        },
    }
}

/// Read any integer-like value as an `i128`, which holds every value the
/// supported integer targets can represent.
fn integral(expected: &'static str, value: Value) -> Result<i128> {
    match value {
        Value::Int(v) => Ok(v.into()),
        Value::Bool(v) => Ok(v.into()),
        Value::Float(v) if v.fract() == 0.0 && v.abs() < 1e19 => Ok(v as i128),
        Value::Text(ref v) => v.trim().parse::<i128>().map_err(|_| Error::TypeConversion {
            expected,
            actual: format!("non-numeric text {:?}", v),
        }),
        other => Err(mismatch(expected, &other)),
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    let wide = integral(stringify!($ty), value)?;
                    <$ty>::try_from(wide).map_err(|_| Error::TypeConversion {
                        expected: stringify!($ty),
                        actual: format!("{} out of range", wide),
                    })
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::Text(ref v) => v.trim().parse().map_err(|_| Error::TypeConversion {
                expected: "f64",
                actual: format!("non-numeric text {:?}", v),
            }),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::Int(v) => Ok(v != 0),
            Value::Text(ref v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(Error::TypeConversion {
                    expected: "bool",
                    actual: format!("text {:?}", v),
                }),
            },
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "utf8 string",
                actual: format!("invalid utf8: {}", e),
            }),
            Value::Int(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Timestamp(v) => Ok(v.format(TIMESTAMP_FORMAT).to_string()),
            Value::Null => Err(Error::UnexpectedNull("string".to_string())),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::Text(v) => Ok(v.into_bytes()),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|v| v.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::Text(ref v) => parse_timestamp(v).ok_or_else(|| Error::TypeConversion {
                expected: "timestamp",
                actual: format!("unparseable text {:?}", v),
            }),
            Value::Int(v) => DateTime::from_timestamp(v, 0)
                .map(|v| v.naive_utc())
                .ok_or_else(|| Error::TypeConversion {
                    expected: "timestamp",
                    actual: format!("unix seconds {} out of range", v),
                }),
            other => Err(mismatch("timestamp", &other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(v) => Ok(v.date()),
            Value::Text(ref v) => parse_timestamp(v)
                .map(|v| v.date())
                .ok_or_else(|| Error::TypeConversion {
                    expected: "date",
                    actual: format!("unparseable text {:?}", v),
                }),
            other => Err(mismatch("date", &other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

// Implement for Option<T>
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}
