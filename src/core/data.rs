//! Tagged data store shared by the actions of one machine.
//!
//! Values are kept in an explicit [`Value`] enum. Typed reads go through
//! [`FromValue`], whose conversion rules are:
//!
//! | Target        | Accepted                                                     |
//! |---------------|--------------------------------------------------------------|
//! | integers      | `Int` in range, integral finite `Float` in range, `Bool` (1/0), `Text` parsing as an integer |
//! | `f32` / `f64` | `Int`, `Float`, `Bool` (1.0/0.0), `Text` parsing as a float  |
//! | `bool`        | `Bool`, `Int` (non-zero is true), `Text` "true"/"false" (any case) |
//! | `String`      | every variant, in display form                               |
//!
//! Anything else is a recoverable [`DataError::Conversion`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Key type of the data store.
pub type Tag = i32;

/// Dynamically typed value held in a [`DataStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Errors from typed data store reads. Always recoverable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("No value stored under tag {tag}")]
    Missing { tag: Tag },

    #[error("Value under tag {tag} is {found} and cannot be read as {expected}")]
    Conversion {
        tag: Tag,
        expected: &'static str,
        found: &'static str,
    },
}

/// Conversion from a stored [`Value`] into a concrete type.
pub trait FromValue: Sized {
    /// Name of the target type, used in conversion errors.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Float(v) => {
            if v.is_finite() && v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64
            {
                Some(*v as i64)
            } else {
                None
            }
        }
        Value::Bool(v) => Some(i64::from(*v)),
        Value::Text(v) => v.trim().parse().ok(),
    }
}

macro_rules! impl_integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_value(value: &Value) -> Option<Self> {
                    integer_from_value(value).and_then(|v| <$ty>::try_from(v).ok())
                }
            }
        )*
    };
}

impl_integer_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Text(v) => v.trim().parse().ok(),
        }
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::Float(_) => None,
            Value::Text(v) => {
                let v = v.trim();
                if v.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if v.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Tag-keyed store used by actions to share transient state.
///
/// # Example
///
/// ```rust
/// use action_machine::core::DataStore;
///
/// let mut store = DataStore::new();
/// store.set(1, "abc");
///
/// assert_eq!(store.get_as::<i32>(1), None);
/// assert_eq!(store.get_or_default::<i32>(1), 0);
/// assert_eq!(store.get_as::<String>(1), Some("abc".to_string()));
/// assert!(store.remove(1));
/// assert_eq!(store.get(1), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataStore {
    values: HashMap<Tag, Value>,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert or replace the value under `tag`.
    pub fn set(&mut self, tag: Tag, value: impl Into<Value>) {
        self.values.insert(tag, value.into());
    }

    pub fn get(&self, tag: Tag) -> Option<&Value> {
        self.values.get(&tag)
    }

    /// Typed read that distinguishes a missing tag from a failed conversion.
    pub fn try_get<T: FromValue>(&self, tag: Tag) -> Result<T, DataError> {
        let value = self.values.get(&tag).ok_or(DataError::Missing { tag })?;
        T::from_value(value).ok_or(DataError::Conversion {
            tag,
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    /// Typed read. `None` if the tag is absent or the value does not convert.
    pub fn get_as<T: FromValue>(&self, tag: Tag) -> Option<T> {
        self.try_get(tag).ok()
    }

    pub fn get_or<T: FromValue>(&self, tag: Tag, default: T) -> T {
        self.get_as(tag).unwrap_or(default)
    }

    pub fn get_or_default<T: FromValue + Default>(&self, tag: Tag) -> T {
        self.get_as(tag).unwrap_or_default()
    }

    /// Returns `true` if a value existed and was removed.
    pub fn remove(&mut self, tag: Tag) -> bool {
        self.values.remove(&tag).is_some()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.values.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
