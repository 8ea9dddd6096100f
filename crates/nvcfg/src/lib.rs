//! nvcfg: schema-driven codec for cable modem non-volatile settings.
//!
//! Broadcom-based cable modems and residential gateways keep their settings
//! in "nonvol" groups: tagged, versioned binary records whose layout depends
//! on the storage format (permanent or dynamic), the group version and the
//! device model. This crate decodes those records into editable value trees
//! and encodes them back byte for byte.
//!
//! # Quick Start
//!
//! ```rust
//! use nvcfg::{Context, Format, Version};
//!
//! let ctx = Context::new(Format::Dynamic).with_version(Version::new(0, 2));
//! let mut bfc = nvcfg::registry::global().get("bfc").unwrap();
//! bfc.decode(&[0, 0, 0, 1, 0, 0, 0, 0], 0, &ctx).unwrap();
//! assert_eq!(bfc.get("serial_console_mode").unwrap().to_pretty_string(), "ro");
//!
//! bfc.set("serial_console_mode", "rw").unwrap();
//! assert_eq!(bfc.encode().unwrap(), [0, 0, 0, 2, 0, 0, 0, 0]);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Value nodes, compounds and containers
//! - [`group`]: Group descriptors and framed records
//! - [`registry`]: Lookup by tag or alias, and the built-in registry
//! - [`schema`]: Built-in group declarations
//! - [`context`]: Format, version, capability flags and device options
//! - [`codec`]: Big-endian byte reader and writer
//! - [`error`]: Error types
//! - [`limits`]: Wire-format limits
//!
//! # Wire Format
//!
//! All multi-byte integers are big-endian. A framed record is
//! `u16 size | magic[4] | u8 major | u8 minor | body`; the body layout is
//! resolved from the group's definition for the decode [`Context`].

pub mod codec;
pub mod context;
pub mod error;
pub mod group;
pub mod limits;
pub mod model;
pub mod registry;
pub mod schema;
pub mod util;

// Re-export commonly used types at crate root
pub use context::{flags, options, Context, Format, Version};
pub use error::{Error, ErrorCode, Result};
pub use group::{Group, GroupDef, Layout, Magic, RecordHeader};
pub use model::{Node, Style};
pub use registry::{global, Registry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decodes the group named `name` (alias or tag) from `buf` at `offset`
/// using the built-in registry. Returns the group and the bytes consumed.
pub fn decode(name: &str, buf: &[u8], offset: usize, ctx: &Context) -> Result<(Group, usize)> {
    global().decode(name, buf, offset, ctx)
}

/// Decodes one framed record at `offset` using the built-in registry.
/// Returns the group and the record size.
pub fn decode_record(buf: &[u8], offset: usize, ctx: &Context) -> Result<(Group, usize)> {
    global().decode_record(buf, offset, ctx)
}
