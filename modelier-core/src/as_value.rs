use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use std::{any, borrow::Cow};

/// Conversion between native Rust types and the dynamically typed [`Value`] that backs
/// conditions, payloads and raw rows.
///
/// Integer types all map onto `Value::Int64` and floating point types onto
/// `Value::Float64`. Going back, `try_from_value` range checks integers and parses text so
/// that ids stored as text can still be read as numbers.
///
/// ```rust
/// use modelier_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int64(Some(42)));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The empty (NULL) variant for this type, which is also its type tag.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} `{}` into {}",
        value.type_name(),
        truncate_long(&value.to_string()),
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($($source:ty),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    Value::Int64(None)
                }
                fn as_value(self) -> Value {
                    Value::Int64(Some(self as i64))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Int64(Some(v)) => <$source>::try_from(v).map_err(|_| {
                            Error::msg(format!(
                                "Value {v}: i64 is out of range for {}",
                                any::type_name::<Self>()
                            ))
                        }),
                        Value::Varchar(Some(v)) => v.trim().parse::<$source>().with_context(|| {
                            format!(
                                "Cannot parse `{}` as {}",
                                truncate_long(&v),
                                any::type_name::<Self>()
                            )
                        }),
                        v => Err(mismatch::<Self>(&v)),
                    }
                }
            }
        )+
    };
}
impl_as_value_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_as_value_float {
    ($($source:ty),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    Value::Float64(None)
                }
                fn as_value(self) -> Value {
                    Value::Float64(Some(self as f64))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Float64(Some(v)) => Ok(v as _),
                        Value::Int64(Some(v)) => Ok(v as _),
                        Value::Varchar(Some(v)) => v.trim().parse::<$source>().with_context(|| {
                            format!(
                                "Cannot parse `{}` as {}",
                                truncate_long(&v),
                                any::type_name::<Self>()
                            )
                        }),
                        v => Err(mismatch::<Self>(&v)),
                    }
                }
            }
        )+
    };
}
impl_as_value_float!(f32, f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int64(Some(v)) => Ok(v != 0),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            v if !v.is_null() => Ok(v.to_string()),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl AsValue for Cow<'static, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
