//! Capabilities shared by every mimic

use crate::error::{MimicError, Result};
use crate::group::GroupMimic;
use crate::ncobj::Attributes;
use crate::types::AttrValue;
use std::rc::Rc;

/// A wrapped node of the object graph
pub trait Component<'a> {
    /// Name of the wrapped node
    fn name(&self) -> &'a str;

    /// Enclosing group mimic, `None` for the root
    fn group(&self) -> Option<Rc<GroupMimic<'a>>>;
}

/// Attribute access in the netCDF dataset style
pub trait AttributeProvider {
    /// Underlying attribute storage
    fn attributes(&self) -> &Attributes;

    /// Attribute value by name, `None` if absent
    fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes().get(name).map(|a| &a.value)
    }

    /// Attribute names, in declaration order
    fn ncattrs(&self) -> Vec<&str> {
        self.attributes().names().collect()
    }

    /// Attribute value by name
    fn getncattr(&self, name: &str) -> Result<&AttrValue> {
        self.get(name)
            .ok_or_else(|| MimicError::AttributeNotFound(name.to_string()))
    }
}
