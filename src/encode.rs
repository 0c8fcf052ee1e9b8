//! Encoders that serialize an object graph into an open output handle

use crate::array::{read_all, NcArray};
use crate::error::{MimicError, Result};
use crate::ncobj::{Attributes, Dimension, Group, Variable};
use crate::types::AttrValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Output formats available for writing a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EncoderKind {
    /// Compact JSON
    Json = 0,
    /// Indented JSON
    JsonPretty = 1,
    /// bincode binary snapshot
    Bincode = 2,
}

impl EncoderKind {
    /// Get the kind from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(EncoderKind::Json),
            1 => Some(EncoderKind::JsonPretty),
            2 => Some(EncoderKind::Bincode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderKind::Json => "json",
            EncoderKind::JsonPretty => "json-pretty",
            EncoderKind::Bincode => "bincode",
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderKind {
    type Err = MimicError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(EncoderKind::Json),
            "json-pretty" => Ok(EncoderKind::JsonPretty),
            "bincode" => Ok(EncoderKind::Bincode),
            other => Err(MimicError::Encode(format!("Unknown encoder: {}", other))),
        }
    }
}

/// Trait for writing a whole object graph to an output handle
pub trait Encoder {
    /// Serialize `root` and everything below it into `out`
    fn encode(&self, out: &mut dyn Write, root: &Group) -> Result<()>;

    /// Get the encoder kind
    fn kind(&self) -> EncoderKind;
}

/// JSON encoder
#[derive(Debug, Default)]
pub struct JsonEncoder {
    pub pretty: bool,
}

impl Encoder for JsonEncoder {
    fn encode(&self, out: &mut dyn Write, root: &Group) -> Result<()> {
        let snapshot = GroupSnapshot::capture(root)?;
        if self.pretty {
            serde_json::to_writer_pretty(out, &snapshot)?;
        } else {
            serde_json::to_writer(out, &snapshot)?;
        }
        Ok(())
    }

    fn kind(&self) -> EncoderKind {
        if self.pretty {
            EncoderKind::JsonPretty
        } else {
            EncoderKind::Json
        }
    }
}

/// bincode encoder
#[derive(Debug, Default)]
pub struct BincodeEncoder;

impl Encoder for BincodeEncoder {
    fn encode(&self, out: &mut dyn Write, root: &Group) -> Result<()> {
        let snapshot = GroupSnapshot::capture(root)?;
        bincode::serialize_into(out, &snapshot)?;
        Ok(())
    }

    fn kind(&self) -> EncoderKind {
        EncoderKind::Bincode
    }
}

/// Get an encoder for a given kind
pub fn get_encoder(kind: EncoderKind) -> Box<dyn Encoder> {
    match kind {
        EncoderKind::Json => Box::new(JsonEncoder { pretty: false }),
        EncoderKind::JsonPretty => Box::new(JsonEncoder { pretty: true }),
        EncoderKind::Bincode => Box::new(BincodeEncoder),
    }
}

/// Owned, serializable copy of a group with all variable data read in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub attributes: Vec<AttributeSnapshot>,
    pub dimensions: Vec<DimensionSnapshot>,
    pub variables: Vec<VariableSnapshot>,
    pub groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    pub name: String,
    pub length: usize,
    pub unlimited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSnapshot {
    pub name: String,
    pub dimensions: Vec<String>,
    pub attributes: Vec<AttributeSnapshot>,
    pub data: Option<NcArray>,
}

fn capture_attributes(attributes: &Attributes) -> Vec<AttributeSnapshot> {
    attributes
        .iter()
        .map(|a| AttributeSnapshot {
            name: a.name.clone(),
            value: a.value.clone(),
        })
        .collect()
}

fn restore_attributes(attributes: Vec<AttributeSnapshot>) -> Attributes {
    let mut restored = Attributes::new();
    for attribute in attributes {
        restored.set(attribute.name, attribute.value);
    }
    restored
}

impl GroupSnapshot {
    /// Copy `group` recursively, reading every variable's data
    pub fn capture(group: &Group) -> Result<Self> {
        Ok(Self {
            name: group.name.clone(),
            attributes: capture_attributes(&group.attributes),
            dimensions: group
                .dimensions
                .iter()
                .map(|d| DimensionSnapshot {
                    name: d.name.clone(),
                    length: d.length,
                    unlimited: d.unlimited,
                })
                .collect(),
            variables: group
                .variables
                .iter()
                .map(VariableSnapshot::capture)
                .collect::<Result<_>>()?,
            groups: group
                .groups
                .iter()
                .map(GroupSnapshot::capture)
                .collect::<Result<_>>()?,
        })
    }

    /// Rebuild an object graph with in-memory data
    pub fn into_group(self) -> Group {
        Group {
            name: self.name,
            attributes: restore_attributes(self.attributes),
            dimensions: self
                .dimensions
                .into_iter()
                .map(|d| Dimension {
                    name: d.name,
                    length: d.length,
                    unlimited: d.unlimited,
                })
                .collect(),
            variables: self.variables.into_iter().map(VariableSnapshot::into_variable).collect(),
            groups: self.groups.into_iter().map(GroupSnapshot::into_group).collect(),
        }
    }

    /// Read a snapshot written by [`JsonEncoder`]
    pub fn from_json(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a snapshot written by [`BincodeEncoder`]
    pub fn from_bincode(reader: impl Read) -> Result<Self> {
        Ok(bincode::deserialize_from(reader)?)
    }
}

impl VariableSnapshot {
    pub fn capture(variable: &Variable) -> Result<Self> {
        let data = match variable.data.as_deref() {
            Some(source) => Some(read_all(source)?),
            None => None,
        };
        Ok(Self {
            name: variable.name.clone(),
            dimensions: variable.dimension_names().map(str::to_string).collect(),
            attributes: capture_attributes(&variable.attributes),
            data,
        })
    }

    pub fn into_variable(self) -> Variable {
        let mut variable = Variable::new(self.name).with_dimensions(self.dimensions);
        variable.attributes = restore_attributes(self.attributes);
        if let Some(data) = self.data {
            variable = variable.with_data(data);
        }
        variable
    }
}
