//! Dimension mimic

use crate::component::Component;
use crate::group::GroupMimic;
use crate::ncobj::Dimension;
use std::fmt;
use std::rc::{Rc, Weak};

/// A dimension presented the way an open dataset reports it
pub struct DimensionMimic<'a> {
    ncobj: &'a Dimension,
    parent: Weak<GroupMimic<'a>>,
}

impl<'a> DimensionMimic<'a> {
    pub(crate) fn new(ncobj: &'a Dimension, parent: Weak<GroupMimic<'a>>) -> Self {
        Self { ncobj, parent }
    }

    /// The wrapped dimension
    pub fn ncobj(&self) -> &'a Dimension {
        self.ncobj
    }

    /// Current size; unlimited dimensions report 0
    pub fn size(&self) -> usize {
        if self.is_unlimited() {
            0
        } else {
            self.ncobj.length
        }
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Marked unlimited, or declared with zero length
    pub fn is_unlimited(&self) -> bool {
        self.ncobj.unlimited || self.ncobj.length == 0
    }
}

impl<'a> Component<'a> for DimensionMimic<'a> {
    fn name(&self) -> &'a str {
        &self.ncobj.name
    }

    fn group(&self) -> Option<Rc<GroupMimic<'a>>> {
        self.parent.upgrade()
    }
}

impl PartialEq for DimensionMimic<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ncobj, other.ncobj)
    }
}

impl fmt::Debug for DimensionMimic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionMimic")
            .field("name", &self.ncobj.name)
            .field("size", &self.size())
            .field("unlimited", &self.is_unlimited())
            .finish()
    }
}
