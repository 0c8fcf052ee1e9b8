//! Variable data arrays
//!
//! Variables in the object graph do not hold a concrete array type. They hold
//! an [`ArraySource`], which describes element type and shape up front and
//! only produces values when a selection is read. [`NcArray`] is the in-memory
//! implementation; [`DeferredArray`] wraps a loader closure so data can be
//! produced section by section on request.

use crate::error::Result;
use crate::types::{DataType, Scalar};
use crate::utils::{format_shape, full_selection, normalize_selection};
use ndarray::{ArrayD, IxDyn, SliceInfoElem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Array-like data backing a variable
pub trait ArraySource: fmt::Debug {
    /// Element type
    fn dtype(&self) -> DataType;

    /// Length of each axis
    fn shape(&self) -> Vec<usize>;

    /// Number of axes
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements
    fn size(&self) -> usize {
        self.shape().iter().product()
    }

    /// Read the elements picked out by `selection`
    fn read(&self, selection: &[SliceInfoElem]) -> Result<NcArray>;
}

/// An owned n-dimensional array of any netCDF element type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NcArray {
    I8(ArrayD<i8>),
    U8(ArrayD<u8>),
    I16(ArrayD<i16>),
    U16(ArrayD<u16>),
    I32(ArrayD<i32>),
    U32(ArrayD<u32>),
    I64(ArrayD<i64>),
    U64(ArrayD<u64>),
    F32(#[serde(with = "crate::float_serde::array")] ArrayD<f32>),
    F64(#[serde(with = "crate::float_serde::array")] ArrayD<f64>),
    Str(ArrayD<String>),
}

macro_rules! each_array {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            NcArray::I8($arr) => $body,
            NcArray::U8($arr) => $body,
            NcArray::I16($arr) => $body,
            NcArray::U16($arr) => $body,
            NcArray::I32($arr) => $body,
            NcArray::U32($arr) => $body,
            NcArray::I64($arr) => $body,
            NcArray::U64($arr) => $body,
            NcArray::F32($arr) => $body,
            NcArray::F64($arr) => $body,
            NcArray::Str($arr) => $body,
        }
    };
}

macro_rules! map_array {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            NcArray::I8($arr) => NcArray::I8($body),
            NcArray::U8($arr) => NcArray::U8($body),
            NcArray::I16($arr) => NcArray::I16($body),
            NcArray::U16($arr) => NcArray::U16($body),
            NcArray::I32($arr) => NcArray::I32($body),
            NcArray::U32($arr) => NcArray::U32($body),
            NcArray::I64($arr) => NcArray::I64($body),
            NcArray::U64($arr) => NcArray::U64($body),
            NcArray::F32($arr) => NcArray::F32($body),
            NcArray::F64($arr) => NcArray::F64($body),
            NcArray::Str($arr) => NcArray::Str($body),
        }
    };
}

impl NcArray {
    /// Build an array from a flat vector in row-major order
    pub fn from_shape_vec<T>(shape: &[usize], values: Vec<T>) -> Result<Self>
    where
        ArrayD<T>: Into<NcArray>,
    {
        Ok(ArrayD::from_shape_vec(IxDyn(shape), values)?.into())
    }

    /// Zero-dimensional array holding a single value
    pub fn scalar(value: Scalar) -> Self {
        let shape = IxDyn(&[]);
        match value {
            Scalar::I8(v) => NcArray::I8(ArrayD::from_elem(shape, v)),
            Scalar::U8(v) => NcArray::U8(ArrayD::from_elem(shape, v)),
            Scalar::I16(v) => NcArray::I16(ArrayD::from_elem(shape, v)),
            Scalar::U16(v) => NcArray::U16(ArrayD::from_elem(shape, v)),
            Scalar::I32(v) => NcArray::I32(ArrayD::from_elem(shape, v)),
            Scalar::U32(v) => NcArray::U32(ArrayD::from_elem(shape, v)),
            Scalar::I64(v) => NcArray::I64(ArrayD::from_elem(shape, v)),
            Scalar::U64(v) => NcArray::U64(ArrayD::from_elem(shape, v)),
            Scalar::F32(v) => NcArray::F32(ArrayD::from_elem(shape, v)),
            Scalar::F64(v) => NcArray::F64(ArrayD::from_elem(shape, v)),
            Scalar::Str(v) => NcArray::Str(ArrayD::from_elem(shape, v)),
        }
    }

    pub fn dtype(&self) -> DataType {
        match self {
            NcArray::I8(_) => DataType::I8,
            NcArray::U8(_) => DataType::U8,
            NcArray::I16(_) => DataType::I16,
            NcArray::U16(_) => DataType::U16,
            NcArray::I32(_) => DataType::I32,
            NcArray::U32(_) => DataType::U32,
            NcArray::I64(_) => DataType::I64,
            NcArray::U64(_) => DataType::U64,
            NcArray::F32(_) => DataType::F32,
            NcArray::F64(_) => DataType::F64,
            NcArray::Str(_) => DataType::Str,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        each_array!(self, a => a.shape().to_vec())
    }

    pub fn ndim(&self) -> usize {
        each_array!(self, a => a.ndim())
    }

    pub fn len(&self) -> usize {
        each_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First element in row-major order
    pub fn first(&self) -> Option<Scalar> {
        match self {
            NcArray::I8(a) => a.first().map(|v| Scalar::I8(*v)),
            NcArray::U8(a) => a.first().map(|v| Scalar::U8(*v)),
            NcArray::I16(a) => a.first().map(|v| Scalar::I16(*v)),
            NcArray::U16(a) => a.first().map(|v| Scalar::U16(*v)),
            NcArray::I32(a) => a.first().map(|v| Scalar::I32(*v)),
            NcArray::U32(a) => a.first().map(|v| Scalar::U32(*v)),
            NcArray::I64(a) => a.first().map(|v| Scalar::I64(*v)),
            NcArray::U64(a) => a.first().map(|v| Scalar::U64(*v)),
            NcArray::F32(a) => a.first().map(|v| Scalar::F32(*v)),
            NcArray::F64(a) => a.first().map(|v| Scalar::F64(*v)),
            NcArray::Str(a) => a.first().map(|v| Scalar::Str(v.clone())),
        }
    }

    /// Copy out the elements picked out by `selection`
    pub fn slice(&self, selection: &[SliceInfoElem]) -> Result<NcArray> {
        let resolved = normalize_selection(selection, &self.shape())?;
        Ok(map_array!(self, a => a.slice(resolved.as_slice()).to_owned()))
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            NcArray::F64(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            NcArray::F32(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&ArrayD<i32>> {
        match self {
            NcArray::I32(a) => Some(a),
            _ => None,
        }
    }
}

impl ArraySource for NcArray {
    fn dtype(&self) -> DataType {
        NcArray::dtype(self)
    }

    fn shape(&self) -> Vec<usize> {
        NcArray::shape(self)
    }

    fn read(&self, selection: &[SliceInfoElem]) -> Result<NcArray> {
        self.slice(selection)
    }
}

macro_rules! impl_array_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for NcArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    NcArray::$variant(array)
                }
            }
        )*
    };
}

impl_array_from!(
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
    String => Str,
);

type Loader = Box<dyn Fn(&[SliceInfoElem]) -> Result<NcArray>>;

/// Array whose values are produced by a loader on each read
///
/// The loader receives a selection already resolved against the declared
/// shape: one entry per axis (plus any new axes), non-negative bounds.
pub struct DeferredArray {
    dtype: DataType,
    shape: Vec<usize>,
    loader: Loader,
}

impl DeferredArray {
    pub fn new<F>(dtype: DataType, shape: Vec<usize>, loader: F) -> Self
    where
        F: Fn(&[SliceInfoElem]) -> Result<NcArray> + 'static,
    {
        Self {
            dtype,
            shape,
            loader: Box::new(loader),
        }
    }

    /// Deferred view over an in-memory array; each read slices a fresh copy
    pub fn over(array: NcArray) -> Self {
        let dtype = array.dtype();
        let shape = array.shape();
        Self::new(dtype, shape, move |selection| array.slice(selection))
    }
}

impl fmt::Debug for DeferredArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredArray")
            .field("dtype", &self.dtype)
            .field("shape", &format_shape(&self.shape))
            .finish_non_exhaustive()
    }
}

impl ArraySource for DeferredArray {
    fn dtype(&self) -> DataType {
        self.dtype
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn read(&self, selection: &[SliceInfoElem]) -> Result<NcArray> {
        let resolved = normalize_selection(selection, &self.shape)?;
        (self.loader)(&resolved)
    }
}

/// Read every element of a source
pub fn read_all(source: &dyn ArraySource) -> Result<NcArray> {
    source.read(&full_selection(source.ndim()))
}
