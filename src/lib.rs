//! ncmimic - netCDF dataset mimic for in-memory object graphs
//!
//! Wraps a generic, in-memory netCDF object graph ([`ncobj::Group`]) so it can
//! be read through the same surface as an open netCDF dataset, and written out
//! when the dataset is closed.
//!
//! # Features
//!
//! - Dimensions, variables, subgroups and attributes in declaration order
//! - netCDF-style accessors: `ncattrs`, `getncattr`, `shape`, `dtype`, ...
//! - Variable data read on demand through [`ArraySource`], so sections can be
//!   produced lazily by [`DeferredArray`]
//! - Write-on-close through a pluggable [`Encoder`] (JSON or bincode)
//!
//! # Example
//!
//! ```rust
//! use ncmimic::ncobj::{Dimension, Group, Variable};
//! use ncmimic::{AttributeProvider, Dataset, NcArray};
//!
//! # fn main() -> ncmimic::Result<()> {
//! let data = NcArray::from_shape_vec(&[3], vec![271.5f32, 272.0, 273.1])?;
//! let group = Group::new("root")
//!     .with_dimension(Dimension::new("station", 3))
//!     .with_variable(
//!         Variable::new("tas")
//!             .with_dimensions(["station"])
//!             .with_data(data)
//!             .with_attribute("units", "K"),
//!     );
//!
//! let ds = Dataset::readable(&group);
//! let tas = ds.variable("tas").unwrap();
//! assert_eq!(tas.shape()?, vec![3]);
//! assert_eq!(tas.getncattr("units")?.as_str(), Some("K"));
//! ds.close()?;
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod component;
pub mod dataset;
pub mod dimension;
pub mod encode;
pub mod error;
mod float_serde;
pub mod group;
pub mod ncobj;
pub mod types;
pub mod utils;
pub mod variable;

// Re-exports
pub use array::{ArraySource, DeferredArray, NcArray};
pub use component::{AttributeProvider, Component};
pub use dataset::{Dataset, FileMode};
pub use dimension::DimensionMimic;
pub use encode::{BincodeEncoder, Encoder, EncoderKind, GroupSnapshot, JsonEncoder};
pub use error::{MimicError, Result};
pub use group::{GroupMimic, NamedMap};
pub use types::{AttrValue, DataType, Scalar};
pub use variable::{Values, VariableMimic};

/// Version of the ncmimic crate
pub const NCMIMIC_VERSION: &str = env!("CARGO_PKG_VERSION");
