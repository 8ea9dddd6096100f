//! Value nodes and schema building blocks.
//!
//! - Leaves: integers, booleans, enums, bitmasks, timestamps, addresses,
//!   fixed and length-prefixed strings and blobs
//! - Containers: fixed-count arrays (optionally sentinel-terminated) and
//!   count-prefixed lists
//! - Compounds: named fields resolved from a [`Context`](crate::Context)
//! - Builders: one function per node type, for writing schemas

pub mod addr;
pub mod builder;
pub mod bytes;
pub mod compound;
pub mod container;
pub mod int;
pub mod named;
pub mod node;

pub use addr::{Ip4, Ip6, Mac};
pub use bytes::{Data, FixedString, Padding, PayloadKind, Prefixed};
pub use compound::{Compound, Definition, Field, FieldSpec, Renderer};
pub use container::{Array, List, Sentinel};
pub use int::{Bool, Int, Timestamp, Width};
pub use named::{Bitmask, Enum, Names};
pub use node::{Leaf, Node, Style};
