//! Generic in-memory netCDF object graph
//!
//! A [`Group`] owns its dimensions, variables, attributes and subgroups, each
//! kept in declaration order. The graph is independent of any file encoding;
//! the mimic types in this crate present it as an open dataset.

use crate::array::ArraySource;
use crate::component::AttributeProvider;
use crate::types::AttrValue;

/// A named attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attributes of a variable or group, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing the value in place if the name exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let attribute = Attribute::new(name, value);
        match self.items.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => existing.value = attribute.value,
            None => self.items.push(attribute),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.items.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let index = self.items.iter().position(|a| a.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A netCDF dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    /// Declared length (current length for unlimited dimensions)
    pub length: usize,
    pub unlimited: bool,
}

impl Dimension {
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
            unlimited: false,
        }
    }

    /// An unlimited (record) dimension with its current length
    pub fn new_unlimited(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
            unlimited: true,
        }
    }
}

/// Reference from a variable to one of its dimensions
///
/// Variables may name their dimensions directly or carry the dimension
/// object itself; either way only the name is used for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionRef {
    Name(String),
    Dimension(Dimension),
}

impl DimensionRef {
    pub fn name(&self) -> &str {
        match self {
            DimensionRef::Name(name) => name,
            DimensionRef::Dimension(dim) => &dim.name,
        }
    }
}

impl From<&str> for DimensionRef {
    fn from(name: &str) -> Self {
        DimensionRef::Name(name.to_string())
    }
}

impl From<String> for DimensionRef {
    fn from(name: String) -> Self {
        DimensionRef::Name(name)
    }
}

impl From<Dimension> for DimensionRef {
    fn from(dim: Dimension) -> Self {
        DimensionRef::Dimension(dim)
    }
}

impl From<&Dimension> for DimensionRef {
    fn from(dim: &Dimension) -> Self {
        DimensionRef::Dimension(dim.clone())
    }
}

/// A netCDF variable
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub dimensions: Vec<DimensionRef>,
    /// Backing data; a variable declared without data is allowed but any
    /// data-dependent query on it fails
    pub data: Option<Box<dyn ArraySource>>,
    pub attributes: Attributes,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
            data: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_dimensions<I, D>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DimensionRef>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_data(mut self, data: impl ArraySource + 'static) -> Self {
        self.data = Some(Box::new(data));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Names of the dimensions, in order
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(DimensionRef::name)
    }
}

impl AttributeProvider for Variable {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A netCDF group; the root group of a dataset is also a `Group`
#[derive(Debug, Default)]
pub struct Group {
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub groups: Vec<Group>,
    pub attributes: Attributes,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn add_dimension(&mut self, dimension: Dimension) {
        self.dimensions.push(dimension);
    }

    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl AttributeProvider for Group {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
