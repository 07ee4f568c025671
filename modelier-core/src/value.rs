use crate::{Error, Result};
use std::fmt::{self, Display};

/// Dynamically typed scalar carried by conditions, payloads and raw rows.
///
/// A variant holding `None` doubles as a type tag: `Value::Varchar(None)` is how an attribute
/// declares that it stores text, and it is also how a NULL text column is represented.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// True for `Value::Null` and for any variant without a payload.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
        }
    }

    /// Null or the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Varchar(Some(v)) => v.is_empty(),
            v => v.is_null(),
        }
    }

    /// The type tag of this value (same variant, no payload).
    pub fn as_type(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int64(..) => Value::Int64(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Varchar(..) => Value::Varchar(None),
        }
    }

    /// Human readable name of the type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(..) => "boolean",
            Value::Int64(..) => "integer",
            Value::Float64(..) => "number",
            Value::Varchar(..) => "text",
        }
    }

    /// Convert this value into the type described by `ty`.
    ///
    /// Null stays null (as the empty variant of `ty`). Numbers and booleans render to text,
    /// text parses back into numbers and booleans.
    pub fn cast(&self, ty: &Value) -> Result<Value> {
        if self.is_null() {
            return Ok(ty.as_type());
        }
        if self.same_type(ty) || ty == &Value::Null {
            return Ok(self.clone());
        }
        let error = || {
            Error::msg(format!(
                "Cannot convert {} `{}` into {}",
                self.type_name(),
                self,
                ty.type_name()
            ))
        };
        Ok(match (self, ty) {
            (_, Value::Varchar(..)) => Value::Varchar(Some(self.to_string())),
            (Value::Varchar(Some(v)), Value::Int64(..)) => {
                Value::Int64(Some(v.trim().parse().map_err(|_| error())?))
            }
            // `i64::MIN` is exact as a float, `i64::MAX` rounds up to 2^63
            (Value::Float64(Some(v)), Value::Int64(..))
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Value::Int64(Some(*v as i64))
            }
            (Value::Varchar(Some(v)), Value::Float64(..)) => {
                Value::Float64(Some(v.trim().parse().map_err(|_| error())?))
            }
            (Value::Int64(Some(v)), Value::Float64(..)) => Value::Float64(Some(*v as f64)),
            (Value::Varchar(Some(v)), Value::Boolean(..)) => match v.as_str() {
                "true" => Value::Boolean(Some(true)),
                "false" => Value::Boolean(Some(false)),
                _ => return Err(error()),
            },
            (Value::Int64(Some(v)), Value::Boolean(..)) if *v == 0 || *v == 1 => {
                Value::Boolean(Some(*v == 1))
            }
            _ => return Err(error()),
        })
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => f.write_str(v),
            _ => f.write_str("NULL"),
        }
    }
}
