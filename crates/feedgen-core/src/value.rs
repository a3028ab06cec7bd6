//! Resolved field values.
//!
//! A field resolves to nothing ([`FieldValue::Null`], meaning "omit this
//! field"), a single [`Scalar`], or an ordered sequence. Sequences may nest
//! while values are being merged; resolvers flatten them before a document
//! is emitted.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    /// Money and other exact decimals. Serialized as a string.
    Decimal(Decimal),
    Bool(bool),
}

impl Scalar {
    /// Truthiness used when filtering merged values: empty strings,
    /// `false` and numeric zeros are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::String(s) => !s.is_empty(),
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0 && !f.is_nan(),
            Scalar::Decimal(d) => !d.is_zero(),
            Scalar::Bool(b) => *b,
        }
    }

    /// `true` for an integer, float or decimal equal to zero.
    #[must_use]
    pub fn is_numeric_zero(&self) -> bool {
        match self {
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Decimal(d) => d.is_zero(),
            Scalar::String(_) | Scalar::Bool(_) => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Decimal(d) => write!(f, "{d}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

// Numbers compare by value across representations so `2`, `2.0` and the
// decimal `2.00` deduplicate against each other. Strings never equal numbers.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Decimal(a), Scalar::Decimal(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Int(i), Scalar::Decimal(d)) | (Scalar::Decimal(d), Scalar::Int(i)) => {
                Decimal::from(*i) == *d
            }
            #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
            (Scalar::Int(i), Scalar::Float(f)) | (Scalar::Float(f), Scalar::Int(i)) => {
                (*i as f64) == *f
            }
            (Scalar::Float(f), Scalar::Decimal(d)) | (Scalar::Decimal(d), Scalar::Float(f)) => {
                d.to_f64() == Some(*f)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Scalar(Scalar),
    List(Vec<FieldValue>),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Truthiness of the whole value: null is falsy, a list is truthy when
    /// non-empty, scalars follow [`Scalar::is_truthy`].
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Scalar(s) => s.is_truthy(),
            FieldValue::List(items) => !items.is_empty(),
        }
    }

    #[must_use]
    pub fn is_numeric_zero(&self) -> bool {
        matches!(self, FieldValue::Scalar(s) if s.is_numeric_zero())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => s.as_str(),
            _ => None,
        }
    }

    /// Wraps a non-sequence value in a one-element sequence. `Null` becomes
    /// `[Null]`.
    #[must_use]
    pub fn into_list(self) -> Vec<FieldValue> {
        match self {
            FieldValue::List(items) => items,
            other => vec![other],
        }
    }

    /// Recursively flattens nested sequences into `out`, dropping nulls.
    pub fn flatten_into(self, out: &mut Vec<Scalar>) {
        match self {
            FieldValue::Null => {}
            FieldValue::Scalar(s) => out.push(s),
            FieldValue::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Maps each string scalar through `f`, recursing into sequences.
    #[must_use]
    pub fn map_strings<F>(self, f: &F) -> FieldValue
    where
        F: Fn(&str) -> String,
    {
        match self {
            FieldValue::Scalar(Scalar::String(s)) => FieldValue::Scalar(Scalar::String(f(&s))),
            FieldValue::List(items) => {
                FieldValue::List(items.into_iter().map(|v| v.map_strings(f)).collect())
            }
            other => other,
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(Scalar::String(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Int(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(value))
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Scalar(Scalar::Decimal(value))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Catalog attributes arrive as arbitrary JSON. Objects have no field-value
/// shape and are kept as their JSON text.
impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::from(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::from(i),
                None => n.as_f64().map_or(FieldValue::Null, FieldValue::from),
            },
            serde_json::Value::String(s) => FieldValue::from(s.as_str()),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(_) => FieldValue::from(value.to_string()),
        }
    }
}
