//! Heterogeneous cell values and the column type tags they convert to.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies the representation of a column.
///
/// `Untyped` is the default heterogeneous state; the packed variants
/// are entered explicitly through `cast`/`convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Untyped,
    Int64,
    Float64,
    Bool,
    Str,
    Date,
}

/// A single cell. `Null` marks a present-but-missing value, distinct
/// from an out-of-range position (which is a range error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value participates in numeric aggregation.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int64(_) | Value::Float64(_))
    }

    /// Numeric view of the value; `None` for nulls and non-numerics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// The narrowest column type that holds this value, or `None` for
    /// null (null fits every representation).
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(ColumnType::Int64),
            Value::Float64(_) => Some(ColumnType::Float64),
            Value::Bool(_) => Some(ColumnType::Bool),
            Value::Str(_) => Some(ColumnType::Str),
            Value::Date(_) => Some(ColumnType::Date),
        }
    }

    /// Coerce the value to `target`, failing with a cast error when it
    /// cannot be represented. Null coerces to null under every type.
    pub fn cast_to(&self, target: ColumnType) -> Result<Value> {
        let fail = || {
            Error::Cast(format!(
                "cannot represent {} as {:?}",
                self, target
            ))
        };
        match (self, target) {
            (Value::Null, _) => Ok(Value::Null),
            (v, ColumnType::Untyped) => Ok(v.clone()),
            (Value::Int64(v), ColumnType::Int64) => Ok(Value::Int64(*v)),
            (Value::Int64(v), ColumnType::Float64) => Ok(Value::Float64(*v as f64)),
            (Value::Float64(v), ColumnType::Float64) => Ok(Value::Float64(*v)),
            (Value::Float64(v), ColumnType::Int64) => {
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 {
                    Ok(Value::Int64(*v as i64))
                } else {
                    Err(fail())
                }
            }
            (Value::Bool(v), ColumnType::Bool) => Ok(Value::Bool(*v)),
            (Value::Bool(v), ColumnType::Int64) => Ok(Value::Int64(*v as i64)),
            (Value::Bool(v), ColumnType::Float64) => Ok(Value::Float64(*v as i64 as f64)),
            (Value::Date(v), ColumnType::Date) => Ok(Value::Date(*v)),
            (Value::Str(s), ColumnType::Int64) => {
                s.trim().parse::<i64>().map(Value::Int64).map_err(|_| fail())
            }
            (Value::Str(s), ColumnType::Float64) => {
                s.trim().parse::<f64>().map(Value::Float64).map_err(|_| fail())
            }
            (Value::Str(s), ColumnType::Bool) => match parse_bool(s) {
                Some(b) => Ok(Value::Bool(b)),
                None => Err(fail()),
            },
            (Value::Str(s), ColumnType::Date) => parse_date(s).ok_or_else(fail).map(Value::Date),
            (Value::Str(s), ColumnType::Str) => Ok(Value::Str(s.clone())),
            (v, ColumnType::Str) => Ok(Value::Str(v.to_string())),
            _ => Err(fail()),
        }
    }

    /// Rendering used for grouping and join keys. Distinguishes null
    /// from the literal string "null" via an unprintable prefix.
    pub(crate) fn key_string(&self) -> String {
        match self {
            Value::Null => "\u{0}null".to_string(),
            other => other.to_string(),
        }
    }

    /// Total ordering used by value sorts: null first, numerics by
    /// magnitude (integers and floats compare cross-type), then bools,
    /// strings, and dates; mixed non-numeric types compare by their
    /// display form.
    pub fn compare(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (a, b) if a.is_numeric() && b.is_numeric() => {
                // as_f64 is Some for both sides here.
                let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                x.total_cmp(&y)
            }
            (Bool(a), Bool(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

/// Case-insensitive boolean tokens accepted by `convert`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "yes" => Some(true),
        "f" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Temporal forms accepted by `convert`: ISO dash and slash dates.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
