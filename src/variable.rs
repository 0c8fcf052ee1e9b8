//! Variable mimic

use crate::array::{read_all, ArraySource, NcArray};
use crate::component::{AttributeProvider, Component};
use crate::error::{MimicError, Result};
use crate::group::GroupMimic;
use crate::ncobj::{Attributes, Variable};
use crate::types::{DataType, Scalar};
use ndarray::SliceInfoElem;
use std::fmt;
use std::rc::{Rc, Weak};

/// Result of reading a variable
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// Value of a zero-dimensional variable
    Scalar(Scalar),
    /// Selected section of an n-dimensional variable
    Array(NcArray),
}

impl Values {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Values::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Values::Scalar(s) => Some(s),
            Values::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&NcArray> {
        match self {
            Values::Scalar(_) => None,
            Values::Array(a) => Some(a),
        }
    }

    /// Values as an array; a scalar becomes a zero-dimensional array
    pub fn into_array(self) -> NcArray {
        match self {
            Values::Scalar(s) => NcArray::scalar(s),
            Values::Array(a) => a,
        }
    }
}

/// A variable presented the way an open dataset reports it
///
/// Data-dependent accessors go through the variable's [`ArraySource`] on
/// every call, so a variable declared without data only fails when one of
/// them is used.
pub struct VariableMimic<'a> {
    ncobj: &'a Variable,
    parent: Weak<GroupMimic<'a>>,
}

impl<'a> VariableMimic<'a> {
    pub(crate) fn new(ncobj: &'a Variable, parent: Weak<GroupMimic<'a>>) -> Self {
        Self { ncobj, parent }
    }

    /// The wrapped variable
    pub fn ncobj(&self) -> &'a Variable {
        self.ncobj
    }

    fn data(&self) -> Result<&'a dyn ArraySource> {
        self.ncobj
            .data
            .as_deref()
            .ok_or_else(|| MimicError::MissingData(self.ncobj.name.clone()))
    }

    pub fn dtype(&self) -> Result<DataType> {
        Ok(self.data()?.dtype())
    }

    pub fn datatype(&self) -> Result<DataType> {
        self.dtype()
    }

    /// Dimension names, in order
    pub fn dimensions(&self) -> Vec<&'a str> {
        self.ncobj.dimension_names().collect()
    }

    pub fn shape(&self) -> Result<Vec<usize>> {
        Ok(self.data()?.shape())
    }

    pub fn ndim(&self) -> Result<usize> {
        Ok(self.data()?.ndim())
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.data()?.size())
    }

    /// Read a section of the variable.
    ///
    /// A zero-dimensional variable yields its single value whatever the
    /// selection. Otherwise the selection is passed to the backing source,
    /// which decides when the data is actually produced.
    pub fn read(&self, selection: &[SliceInfoElem]) -> Result<Values> {
        let data = self.data()?;
        if data.ndim() == 0 {
            let value = data
                .read(&[])?
                .first()
                .ok_or_else(|| MimicError::MissingData(self.ncobj.name.clone()))?;
            return Ok(Values::Scalar(value));
        }
        Ok(Values::Array(data.read(selection)?))
    }

    /// Read every element
    pub fn read_all(&self) -> Result<Values> {
        let data = self.data()?;
        if data.ndim() == 0 {
            return self.read(&[]);
        }
        Ok(Values::Array(read_all(data)?))
    }
}

impl<'a> Component<'a> for VariableMimic<'a> {
    fn name(&self) -> &'a str {
        &self.ncobj.name
    }

    fn group(&self) -> Option<Rc<GroupMimic<'a>>> {
        self.parent.upgrade()
    }
}

impl AttributeProvider for VariableMimic<'_> {
    fn attributes(&self) -> &Attributes {
        &self.ncobj.attributes
    }
}

impl PartialEq for VariableMimic<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ncobj, other.ncobj)
    }
}

impl fmt::Debug for VariableMimic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableMimic")
            .field("name", &self.ncobj.name)
            .field("dimensions", &self.dimensions())
            .finish_non_exhaustive()
    }
}
