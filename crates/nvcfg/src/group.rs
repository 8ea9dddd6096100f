//! Settings groups: tagged, versioned top-level records.
//!
//! A [`Group`] pairs a magic tag and alias with a [`Layout`] (one field-list
//! definition per format variant) and holds the value tree decoded for a
//! particular [`Context`].
//!
//! # Records
//!
//! On flash each group is stored as a framed record:
//!
//! ```text
//! u16 size | magic[4] | u8 major | u8 minor | body
//! ```
//!
//! `size` counts the 8-byte header. Bytes inside the record that the layout
//! does not cover are kept as opaque trailing data so re-encoding is lossless.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::primitives::{Reader, Writer};
use crate::context::{Context, Format, Version};
use crate::error::{Error, Result};
use crate::limits::{MAX_P16_LEN, RECORD_HEADER_SIZE};
use crate::model::compound::{Compound, Definition, FieldSpec};
use crate::model::node::{Node, Style};

// =============================================================================
// MAGIC
// =============================================================================

/// Four-byte group tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Magic(pub [u8; 4]);

impl Magic {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Magic(*bytes)
    }

    /// Tag from its big-endian numeric form.
    pub const fn from_u32(tag: u32) -> Self {
        Magic(tag.to_be_bytes())
    }

    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    fn is_printable(&self) -> bool {
        self.0.iter().all(|b| (0x20..=0x7e).contains(b))
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            self.0.iter().try_for_each(|b| write!(f, "{}", *b as char))
        } else {
            write!(f, "0x{:08x}", self.as_u32())
        }
    }
}

impl FromStr for Magic {
    type Err = Error;

    /// Accepts a 4-character tag or a `0x`-prefixed 32-bit number.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(hex) = s.strip_prefix("0x") {
            if let Ok(tag) = u32::from_str_radix(hex, 16) {
                return Ok(Magic::from_u32(tag));
            }
        }
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| Error::invalid(s, "expected a 4-character tag or 0x-prefixed number"))?;
        Ok(Magic(bytes))
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Field-list definitions per format variant.
#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// One definition for both formats.
    Shared(Definition),
    /// Separate definitions; a missing side is unsupported.
    Split {
        permanent: Option<Definition>,
        dynamic: Option<Definition>,
    },
}

impl Layout {
    pub fn for_format(&self, format: Format) -> Option<Definition> {
        match (self, format) {
            (Layout::Shared(def), _) => Some(*def),
            (Layout::Split { permanent, .. }, Format::Permanent) => *permanent,
            (Layout::Split { dynamic, .. }, Format::Dynamic) => *dynamic,
        }
    }

    /// True if the format has a definition.
    pub fn supports(&self, format: Format) -> bool {
        self.for_format(format).is_some()
    }
}

/// Static description of a group.
#[derive(Debug)]
pub struct GroupDef {
    pub magic: Magic,
    pub alias: &'static str,
    pub layout: Layout,
}

// =============================================================================
// GROUP
// =============================================================================

/// A group descriptor together with its current value tree.
///
/// Cloning a group deep-copies the tree; the descriptor is shared.
#[derive(Debug, Clone)]
pub struct Group {
    def: Arc<GroupDef>,
    ctx: Context,
    body: Node,
    extra: Vec<u8>,
}

impl Group {
    /// Creates a group with an empty, unresolved tree. Call [`Group::init`]
    /// or [`Group::decode`] before use.
    pub fn new(magic: Magic, alias: &'static str, layout: Layout) -> Self {
        let def = GroupDef {
            magic,
            alias,
            layout,
        };
        Self::from_def(Arc::new(def))
    }

    pub fn from_def(def: Arc<GroupDef>) -> Self {
        let body = Node::Compound(Compound::new(def.alias, empty));
        Self {
            def,
            ctx: Context::default(),
            body,
            extra: Vec::new(),
        }
    }

    pub fn magic(&self) -> Magic {
        self.def.magic
    }

    pub fn alias(&self) -> &'static str {
        self.def.alias
    }

    pub fn layout(&self) -> Layout {
        self.def.layout
    }

    /// Context the current tree was built for.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn unsupported(&self, format: Format) -> Error {
        Error::UnsupportedVariant {
            group: self.def.alias.to_string(),
            format,
        }
    }

    fn root(&self, ctx: &Context) -> Result<Node> {
        let def = self
            .def
            .layout
            .for_format(ctx.format)
            .ok_or_else(|| self.unsupported(ctx.format))?;
        Ok(Node::Compound(Compound::new(self.def.alias, def)))
    }

    /// Top-level field list for `ctx`, conditional fields included as
    /// declared.
    pub fn definition(&self, ctx: &Context) -> Result<Vec<FieldSpec>> {
        let def = self
            .def
            .layout
            .for_format(ctx.format)
            .ok_or_else(|| self.unsupported(ctx.format))?;
        Ok(def(ctx))
    }

    /// Encoded size of a default tree for `ctx`.
    pub fn resolved_size(&self, ctx: &Context) -> Result<usize> {
        let mut root = self.root(ctx)?;
        root.layout(ctx);
        Ok(root.size())
    }

    /// Replaces the tree with default values laid out for `ctx`.
    pub fn init(&mut self, ctx: &Context) -> Result<()> {
        let mut root = self.root(ctx)?;
        root.layout(ctx);
        self.body = root;
        self.ctx = ctx.clone();
        self.extra.clear();
        Ok(())
    }

    /// Decodes the group from `buf` starting at `offset` and returns the
    /// number of bytes consumed.
    ///
    /// Error offsets are absolute positions in `buf`. On failure the group is
    /// left unchanged.
    pub fn decode(&mut self, buf: &[u8], offset: usize, ctx: &Context) -> Result<usize> {
        let mut root = self.root(ctx)?;
        let mut reader = Reader::at(buf, offset);
        root.decode(&mut reader, ctx)?;
        let consumed = reader.position() - offset;

        debug!(
            group = self.def.alias,
            format = %ctx.format,
            version = %ctx.version,
            consumed,
            "decoded group"
        );

        self.body = root;
        self.ctx = ctx.clone();
        self.extra.clear();
        Ok(consumed)
    }

    /// Encodes the tree, followed by any opaque trailing bytes.
    ///
    /// Nothing is returned unless every field encodes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::with_capacity(self.size());
        self.body.encode(&mut writer)?;
        writer.write_bytes(&self.extra);
        debug!(group = self.def.alias, size = writer.position(), "encoded group");
        Ok(writer.into_bytes())
    }

    /// Encoded size of the current tree, trailing bytes included.
    pub fn size(&self) -> usize {
        self.body.size() + self.extra.len()
    }

    /// Root node of the tree.
    pub fn body(&self) -> &Node {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Node {
        &mut self.body
    }

    /// Record bytes not covered by the layout.
    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    pub fn get(&self, path: &str) -> Result<&Node> {
        self.body.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Result<&mut Node> {
        self.body.get_mut(path)
    }

    /// Assigns the leaf at `path` from text.
    pub fn set(&mut self, path: &str, text: &str) -> Result<()> {
        self.body
            .get_mut(path)?
            .set_str(text)
            .map_err(|e| e.in_field(path))
    }

    pub fn to_raw_string(&self) -> String {
        format!("{}={}", self.def.alias, self.body.render(Style::Raw, 0))
    }

    pub fn to_pretty_string(&self) -> String {
        format!("{} = {}", self.def.alias, self.body.render(Style::Pretty, 0))
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    /// Decodes the body of a record whose header has already been read,
    /// keeping unclaimed bytes up to the end of the record.
    pub(crate) fn decode_record_body(
        &mut self,
        buf: &[u8],
        header: &RecordHeader,
        offset: usize,
        ctx: &Context,
    ) -> Result<()> {
        let record = offset
            .checked_add(header.size)
            .and_then(|end| buf.get(..end))
            .ok_or(Error::TruncatedInput {
                field: self.def.alias.to_string(),
                offset,
                needed: header.size,
                available: buf.len().saturating_sub(offset),
            })?;
        let body_start = offset + RECORD_HEADER_SIZE;
        let consumed = self
            .decode(record, body_start, ctx)
            .map_err(|e| e.in_field(self.def.alias))?;

        let extra = &record[body_start + consumed..];
        if !extra.is_empty() {
            warn!(
                group = self.def.alias,
                bytes = extra.len(),
                "record has trailing data not covered by the layout"
            );
        }
        self.extra = extra.to_vec();
        Ok(())
    }

    /// Encodes the group as a framed record, recomputing the size field.
    pub fn encode_record(&self) -> Result<Vec<u8>> {
        let size = RECORD_HEADER_SIZE + self.size();
        if size > MAX_P16_LEN {
            return Err(Error::ListTooLong {
                field: self.def.alias.to_string(),
                offset: 0,
                len: size,
                max: MAX_P16_LEN,
            });
        }
        let mut writer = Writer::with_capacity(size);
        writer.write_u16(0);
        writer.write_bytes(&self.def.magic.0);
        writer.write_u8(self.ctx.version.major());
        writer.write_u8(self.ctx.version.minor());
        self.body.encode(&mut writer)?;
        writer.write_bytes(&self.extra);
        writer.patch_u16(0, writer.position() as u16);
        Ok(writer.into_bytes())
    }
}

fn empty(_ctx: &Context) -> Vec<FieldSpec> {
    Vec::new()
}

/// Header of a framed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Total record size, header included.
    pub size: usize,
    pub magic: Magic,
    pub version: Version,
}

impl RecordHeader {
    pub fn read(buf: &[u8], offset: usize) -> Result<Self> {
        let mut reader = Reader::at(buf, offset);
        let size = reader.read_u16()? as usize;
        let magic = Magic(reader.read_array()?);
        let major = reader.read_u8()?;
        let minor = reader.read_u8()?;
        if size < RECORD_HEADER_SIZE {
            return Err(Error::BadRecordHeader { offset, size });
        }
        Ok(Self {
            size,
            magic,
            version: Version::new(major, minor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::*;

    fn perm(_ctx: &Context) -> Vec<FieldSpec> {
        vec![field("enabled", boolean()), field("port", u16_range(1, 0xffff))]
    }

    fn versioned(ctx: &Context) -> Vec<FieldSpec> {
        vec![
            field("a", u8()),
            field("x", u16()).when(ctx.version >= Version::new(0, 2)),
        ]
    }

    fn test_group() -> Group {
        Group::new(
            Magic::new(b"TEST"),
            "test",
            Layout::Split {
                permanent: Some(perm),
                dynamic: None,
            },
        )
    }

    #[test]
    fn test_magic_display() {
        assert_eq!(Magic::new(b"CMAp").to_string(), "CMAp");
        assert_eq!(Magic::from_u32(0xf2a1f61f).to_string(), "0xf2a1f61f");
        assert_eq!("RG..".parse::<Magic>().unwrap(), Magic::new(b"RG.."));
        assert_eq!("0xd0c20100".parse::<Magic>().unwrap().as_u32(), 0xd0c20100);
        assert!("toolong".parse::<Magic>().is_err());
    }

    #[test]
    fn test_decode_and_encode() {
        let mut group = test_group();
        let ctx = Context::new(Format::Permanent);
        let buf = [0xee, 0x01, 0x1f, 0x90];
        assert_eq!(group.decode(&buf, 1, &ctx).unwrap(), 3);
        assert_eq!(group.get("port").unwrap().as_int(), Some(8080));
        assert_eq!(group.encode().unwrap(), &buf[1..]);
        assert_eq!(group.to_raw_string(), "test={enabled=true,port=8080}");
        assert_eq!(
            group.to_pretty_string(),
            "test = {\n  enabled = true\n  port = 8080\n}"
        );
    }

    #[test]
    fn test_unsupported_variant() {
        let mut group = test_group();
        let ctx = Context::new(Format::Dynamic);
        let err = group.decode(&[0; 8], 0, &ctx).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedVariant {
                group: "test".into(),
                format: Format::Dynamic,
            }
        );
        assert!(group.resolved_size(&ctx).is_err());
    }

    #[test]
    fn test_failed_decode_keeps_tree() {
        let mut group = test_group();
        let ctx = Context::default();
        group.decode(&[1, 0, 5], 0, &ctx).unwrap();
        let err = group.decode(&[0, 0], 0, &ctx).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput { ref field, offset: 1, .. } if field == "port"
        ));
        assert_eq!(group.get("port").unwrap().as_int(), Some(5));
    }

    #[test]
    fn test_decode_past_end_of_buffer() {
        fn empty_first(_ctx: &Context) -> Vec<FieldSpec> {
            vec![field("pad", data(0)), field("a", u8())]
        }
        let mut group = Group::new(Magic::new(b"PAST"), "past", Layout::Shared(empty_first));
        let err = group.decode(&[1, 2], 10, &Context::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput { ref field, offset: 10, needed: 0, available: 0 } if field == "pad"
        ));
        assert_eq!(group.decode(&[1, 2], 1, &Context::default()).unwrap(), 1);
        assert_eq!(group.get("a").unwrap().as_int(), Some(2));
    }

    #[test]
    fn test_encode_range_error() {
        let mut group = test_group();
        group.init(&Context::default()).unwrap();
        assert_eq!(group.get("port").unwrap().as_int(), Some(1));
        group.set("port", "0").unwrap();
        let err = group.encode().unwrap_err();
        assert!(matches!(
            err,
            Error::ValueOutOfRange { ref field, offset: 1, value: 0, .. } if field == "port"
        ));
    }

    #[test]
    fn test_version_gating() {
        let group = Group::new(Magic::new(b"VERS"), "vers", Layout::Shared(versioned));
        let v1 = Context::default().with_version(Version::from_num(0x0001));
        let v2 = Context::default().with_version(Version::from_num(0x0002));
        assert_eq!(group.resolved_size(&v1).unwrap(), 1);
        assert_eq!(group.resolved_size(&v2).unwrap(), 3);
        assert_eq!(group.resolved_size(&v2).unwrap(), 3);

        let mut old = group.clone();
        old.decode(&[7, 1, 2], 0, &v1).unwrap();
        assert!(matches!(old.get("x"), Err(Error::FieldNotFound { .. })));
        assert_eq!(old.size(), 1);
    }

    #[test]
    fn test_record_header() {
        let buf = [0x00, 0x0b, b'T', b'E', b'S', b'T', 0x00, 0x02, 1, 0, 80];
        let header = RecordHeader::read(&buf, 0).unwrap();
        assert_eq!(header.size, 11);
        assert_eq!(header.magic, Magic::new(b"TEST"));
        assert_eq!(header.version, Version::new(0, 2));

        let bad = [0x00, 0x04, b'T', b'E', b'S', b'T', 0, 0];
        assert_eq!(
            RecordHeader::read(&bad, 0),
            Err(Error::BadRecordHeader { offset: 0, size: 4 })
        );
    }

    #[test]
    fn test_record_roundtrip_keeps_trailing_bytes() {
        let buf = [
            0x00, 0x0d, b'T', b'E', b'S', b'T', 0x00, 0x02, 1, 0, 80, 0xaa, 0xbb,
        ];
        let header = RecordHeader::read(&buf, 0).unwrap();
        let mut group = test_group();
        let ctx = Context::default().with_version(header.version);
        group.decode_record_body(&buf, &header, 0, &ctx).unwrap();
        assert_eq!(group.extra(), &[0xaa, 0xbb]);
        assert_eq!(group.size(), 5);
        assert_eq!(group.encode_record().unwrap(), buf.to_vec());
    }
}
