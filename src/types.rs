//! Core value types shared by the object graph and the mimics

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// netCDF element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Signed 8-bit integer (`byte`)
    I8 = 0,
    /// Unsigned 8-bit integer (`ubyte`)
    U8 = 1,
    /// Signed 16-bit integer (`short`)
    I16 = 2,
    /// Unsigned 16-bit integer (`ushort`)
    U16 = 3,
    /// Signed 32-bit integer (`int`)
    I32 = 4,
    /// Unsigned 32-bit integer (`uint`)
    U32 = 5,
    /// Signed 64-bit integer (`int64`)
    I64 = 6,
    /// Unsigned 64-bit integer (`uint64`)
    U64 = 7,
    /// 32-bit floating point (`float`)
    F32 = 8,
    /// 64-bit floating point (`double`)
    F64 = 9,
    /// Variable-length string (`string`)
    Str = 10,
}

impl DataType {
    /// Size in bytes of one element, `None` for variable-length strings
    pub fn size_in_bytes(&self) -> Option<usize> {
        match self {
            DataType::I8 | DataType::U8 => Some(1),
            DataType::I16 | DataType::U16 => Some(2),
            DataType::I32 | DataType::U32 | DataType::F32 => Some(4),
            DataType::I64 | DataType::U64 | DataType::F64 => Some(8),
            DataType::Str => None,
        }
    }

    /// Check if this is a floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Check if this is an integer type
    pub fn is_integer(&self) -> bool {
        !self.is_float() && *self != DataType::Str
    }

    /// The CDL type name (`float`, `int64`, ...)
    pub fn nc_name(&self) -> &'static str {
        match self {
            DataType::I8 => "byte",
            DataType::U8 => "ubyte",
            DataType::I16 => "short",
            DataType::U16 => "ushort",
            DataType::I32 => "int",
            DataType::U32 => "uint",
            DataType::I64 => "int64",
            DataType::U64 => "uint64",
            DataType::F32 => "float",
            DataType::F64 => "double",
            DataType::Str => "string",
        }
    }

    /// Short dtype code as used by array libraries (`f4`, `i8`, ...)
    pub fn dtype_code(&self) -> &'static str {
        match self {
            DataType::I8 => "i1",
            DataType::U8 => "u1",
            DataType::I16 => "i2",
            DataType::U16 => "u2",
            DataType::I32 => "i4",
            DataType::U32 => "u4",
            DataType::I64 => "i8",
            DataType::U64 => "u8",
            DataType::F32 => "f4",
            DataType::F64 => "f8",
            DataType::Str => "str",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nc_name())
    }
}

/// A single element value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn dtype(&self) -> DataType {
        match self {
            Scalar::I8(_) => DataType::I8,
            Scalar::U8(_) => DataType::U8,
            Scalar::I16(_) => DataType::I16,
            Scalar::U16(_) => DataType::U16,
            Scalar::I32(_) => DataType::I32,
            Scalar::U32(_) => DataType::U32,
            Scalar::I64(_) => DataType::I64,
            Scalar::U64(_) => DataType::U64,
            Scalar::F32(_) => DataType::F32,
            Scalar::F64(_) => DataType::F64,
            Scalar::Str(_) => DataType::Str,
        }
    }

    /// Numeric value widened to f64, `None` for strings
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Scalar::I8(v) => v.to_f64(),
            Scalar::U8(v) => v.to_f64(),
            Scalar::I16(v) => v.to_f64(),
            Scalar::U16(v) => v.to_f64(),
            Scalar::I32(v) => v.to_f64(),
            Scalar::U32(v) => v.to_f64(),
            Scalar::I64(v) => v.to_f64(),
            Scalar::U64(v) => v.to_f64(),
            Scalar::F32(v) => v.to_f64(),
            Scalar::F64(v) => Some(*v),
            Scalar::Str(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Str(v) => write!(f, "{:?}", v),
        }
    }
}

/// Value stored in a netCDF attribute
///
/// Numeric attributes are always vectors (a scalar attribute is a vector of
/// length one); text attributes hold a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(#[serde(with = "crate::float_serde::vec")] Vec<f32>),
    F64(#[serde(with = "crate::float_serde::vec")] Vec<f64>),
}

impl AttrValue {
    pub fn dtype(&self) -> DataType {
        match self {
            AttrValue::Text(_) => DataType::Str,
            AttrValue::I8(_) => DataType::I8,
            AttrValue::U8(_) => DataType::U8,
            AttrValue::I16(_) => DataType::I16,
            AttrValue::U16(_) => DataType::U16,
            AttrValue::I32(_) => DataType::I32,
            AttrValue::U32(_) => DataType::U32,
            AttrValue::I64(_) => DataType::I64,
            AttrValue::U64(_) => DataType::U64,
            AttrValue::F32(_) => DataType::F32,
            AttrValue::F64(_) => DataType::F64,
        }
    }

    /// Number of values; a text attribute counts as one
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Text(_) => 1,
            AttrValue::I8(v) => v.len(),
            AttrValue::U8(v) => v.len(),
            AttrValue::I16(v) => v.len(),
            AttrValue::U16(v) => v.len(),
            AttrValue::I32(v) => v.len(),
            AttrValue::U32(v) => v.len(),
            AttrValue::I64(v) => v.len(),
            AttrValue::U64(v) => v.len(),
            AttrValue::F32(v) => v.len(),
            AttrValue::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric values widened to f64, `None` for text
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        fn widen<T: ToPrimitive>(values: &[T]) -> Option<Vec<f64>> {
            values.iter().map(|v| v.to_f64()).collect()
        }

        match self {
            AttrValue::Text(_) => None,
            AttrValue::I8(v) => widen(v),
            AttrValue::U8(v) => widen(v),
            AttrValue::I16(v) => widen(v),
            AttrValue::U16(v) => widen(v),
            AttrValue::I32(v) => widen(v),
            AttrValue::U32(v) => widen(v),
            AttrValue::I64(v) => widen(v),
            AttrValue::U64(v) => widen(v),
            AttrValue::F32(v) => widen(v),
            AttrValue::F64(v) => Some(v.clone()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

macro_rules! impl_attr_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::$variant(vec![value])
                }
            }

            impl From<Vec<$ty>> for AttrValue {
                fn from(values: Vec<$ty>) -> Self {
                    AttrValue::$variant(values)
                }
            }

            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

impl_attr_from!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);
