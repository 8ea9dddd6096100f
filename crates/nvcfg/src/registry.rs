//! Group registry: lookup by tag or alias.
//!
//! The built-in registry is created on first use and never changes
//! afterwards; [`global`] hands out shared read-only access. Callers that
//! need additional groups build their own [`Registry`].

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::group::{Group, Magic, RecordHeader};
use crate::limits::RECORD_HEADER_SIZE;
use crate::schema;

/// Append-only set of groups, indexed by magic and alias.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: Vec<Group>,
    by_magic: FxHashMap<Magic, usize>,
    by_alias: FxHashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group. Fails if its magic or alias is already taken.
    pub fn register(&mut self, group: Group) -> Result<()> {
        let magic = group.magic();
        let alias = group.alias();
        if self.by_magic.contains_key(&magic) {
            return Err(Error::DuplicateGroup {
                name: magic.to_string(),
            });
        }
        if self.by_alias.contains_key(alias) {
            return Err(Error::DuplicateGroup {
                name: alias.to_string(),
            });
        }
        debug!(%magic, alias, "registered group");
        let index = self.groups.len();
        self.by_magic.insert(magic, index);
        self.by_alias.insert(alias, index);
        self.groups.push(group);
        Ok(())
    }

    fn find(&self, name: &str) -> Option<&Group> {
        let index = self.by_alias.get(name).copied().or_else(|| {
            let magic = name.parse::<Magic>().ok()?;
            self.by_magic.get(&magic).copied()
        })?;
        self.groups.get(index)
    }

    /// Looks a group up by alias, 4-character tag or `0x` hex tag and
    /// returns an independent copy.
    pub fn get(&self, name: &str) -> Result<Group> {
        self.find(name).cloned().ok_or_else(|| Error::UnknownGroup {
            name: name.to_string(),
        })
    }

    pub fn by_magic(&self, magic: Magic) -> Option<Group> {
        let index = *self.by_magic.get(&magic)?;
        self.groups.get(index).cloned()
    }

    /// Registered groups in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Decodes the named group from `buf` at `offset`, returning the group
    /// and the number of bytes consumed.
    pub fn decode(&self, name: &str, buf: &[u8], offset: usize, ctx: &Context) -> Result<(Group, usize)> {
        let mut group = self.get(name)?;
        let consumed = group.decode(buf, offset, ctx)?;
        Ok((group, consumed))
    }

    /// Decodes one framed record at `offset`.
    ///
    /// The record's version overrides `ctx.version`. Returns the group and
    /// the full record size.
    pub fn decode_record(&self, buf: &[u8], offset: usize, ctx: &Context) -> Result<(Group, usize)> {
        let header = RecordHeader::read(buf, offset)?;
        let mut group = self.by_magic(header.magic).ok_or_else(|| Error::UnknownGroup {
            name: header.magic.to_string(),
        })?;
        let ctx = ctx.clone().with_version(header.version);
        group.decode_record_body(buf, &header, offset, &ctx)?;
        Ok((group, header.size))
    }

    /// Decodes consecutive records from `offset` until the buffer ends or an
    /// erased header (size `0x0000` or `0xffff`) is reached.
    pub fn decode_records(&self, buf: &[u8], offset: usize, ctx: &Context) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        let mut pos = offset;
        while buf.len().saturating_sub(pos) >= RECORD_HEADER_SIZE {
            let size = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
            if size == 0 || size == 0xffff {
                debug!(offset = pos, "end of records");
                break;
            }
            let (group, size) = self.decode_record(buf, pos, ctx)?;
            trace!(offset = pos, size, group = group.alias(), "decoded record");
            groups.push(group);
            pos += size;
        }
        Ok(groups)
    }
}

lazy_static! {
    static ref GLOBAL: Registry = {
        let mut registry = Registry::new();
        schema::register_builtin(&mut registry);
        registry
    };
}

/// The built-in registry.
pub fn global() -> &'static Registry {
    &GLOBAL
}
