//! Group mimic and its ordered child maps

use crate::component::{AttributeProvider, Component};
use crate::dimension::DimensionMimic;
use crate::ncobj::{Attributes, Group};
use crate::variable::VariableMimic;
use std::fmt;
use std::rc::{Rc, Weak};

/// Name-to-value map that keeps insertion order
///
/// Lookups return the first entry with a matching name.
#[derive(Debug, Clone)]
pub struct NamedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> NamedMap<V> {
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> FromIterator<(String, V)> for NamedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A group presented the way an open dataset reports it
///
/// All child mimics are built when the group mimic is built. Each child holds
/// a weak reference back to this group, so dropping the root releases the
/// whole tree.
pub struct GroupMimic<'a> {
    ncobj: &'a Group,
    parent: Weak<GroupMimic<'a>>,
    dimensions: NamedMap<DimensionMimic<'a>>,
    variables: NamedMap<VariableMimic<'a>>,
    groups: NamedMap<Rc<GroupMimic<'a>>>,
}

impl<'a> GroupMimic<'a> {
    /// Wrap `group` as a root group
    pub fn new(group: &'a Group) -> Rc<Self> {
        Self::build(group, Weak::new())
    }

    fn build(group: &'a Group, parent: Weak<GroupMimic<'a>>) -> Rc<Self> {
        Rc::new_cyclic(|this| {
            let dimensions = group
                .dimensions
                .iter()
                .map(|dim| (dim.name.clone(), DimensionMimic::new(dim, this.clone())))
                .collect();

            let variables = group
                .variables
                .iter()
                .map(|var| (var.name.clone(), VariableMimic::new(var, this.clone())))
                .collect();

            let groups = group
                .groups
                .iter()
                .map(|child| (child.name.clone(), Self::build(child, this.clone())))
                .collect();

            GroupMimic {
                ncobj: group,
                parent,
                dimensions,
                variables,
                groups,
            }
        })
    }

    /// The wrapped group
    pub fn ncobj(&self) -> &'a Group {
        self.ncobj
    }

    pub fn dimensions(&self) -> &NamedMap<DimensionMimic<'a>> {
        &self.dimensions
    }

    pub fn variables(&self) -> &NamedMap<VariableMimic<'a>> {
        &self.variables
    }

    pub fn groups(&self) -> &NamedMap<Rc<GroupMimic<'a>>> {
        &self.groups
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionMimic<'a>> {
        self.dimensions.get(name)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableMimic<'a>> {
        self.variables.get(name)
    }

    pub fn subgroup(&self, name: &str) -> Option<&Rc<GroupMimic<'a>>> {
        self.groups.get(name)
    }

    /// Enclosing group, `None` for the root
    pub fn parent(&self) -> Option<Rc<GroupMimic<'a>>> {
        self.parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.parent.upgrade().is_none()
    }

    /// Absolute path, `/` for the root and `/a/b` below it
    pub fn path(&self) -> String {
        match self.parent() {
            None => "/".to_string(),
            Some(parent) if parent.is_root() => format!("/{}", self.ncobj.name),
            Some(parent) => format!("{}/{}", parent.path(), self.ncobj.name),
        }
    }
}

impl<'a> Component<'a> for GroupMimic<'a> {
    fn name(&self) -> &'a str {
        &self.ncobj.name
    }

    fn group(&self) -> Option<Rc<GroupMimic<'a>>> {
        self.parent()
    }
}

impl AttributeProvider for GroupMimic<'_> {
    fn attributes(&self) -> &Attributes {
        &self.ncobj.attributes
    }
}

impl PartialEq for GroupMimic<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ncobj, other.ncobj)
    }
}

impl fmt::Debug for GroupMimic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupMimic")
            .field("name", &self.ncobj.name)
            .field("dimensions", &self.dimensions.keys().collect::<Vec<_>>())
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .finish()
    }
}
