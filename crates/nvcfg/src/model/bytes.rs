//! Byte blobs and strings, fixed-size and length-prefixed.
//!
//! All of these keep the exact bytes read from the wire so that encoding a
//! decoded value reproduces the input, including whatever follows the NUL
//! terminator of a fixed-width string.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::limits::{MAX_P16_LEN, MAX_P8_LEN};
use crate::model::int::Width;
use crate::model::node::Leaf;
use crate::util::text::{quote, unquote};

// =============================================================================
// DATA
// =============================================================================

/// Fixed-size opaque bytes, shown as hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    bytes: Vec<u8>,
}

impl Data {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl Leaf for Data {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        let len = self.bytes.len();
        self.bytes = reader.read_bytes(len)?.to_vec();
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bytes(&self.bytes);
        Ok(())
    }

    fn raw(&self) -> String {
        hex::encode(&self.bytes)
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let bytes = hex::decode(text.trim()).map_err(|_| Error::invalid(text, "expected hex bytes"))?;
        if bytes.len() != self.bytes.len() {
            return Err(Error::invalid(text, "wrong number of bytes"));
        }
        self.bytes = bytes;
        Ok(())
    }
}

// =============================================================================
// FIXED-WIDTH STRING
// =============================================================================

/// Fill byte after the content of a fixed-width string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    Zero,
    Space,
}

impl Padding {
    fn byte(self) -> u8 {
        match self {
            Padding::Zero => 0,
            Padding::Space => b' ',
        }
    }
}

/// String stored in a fixed number of bytes.
///
/// The value is everything up to the first NUL, minus trailing padding. With
/// `require_nul` the last byte is reserved for the terminator, so at most
/// `len - 1` characters fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedString {
    require_nul: bool,
    padding: Padding,
    raw: Vec<u8>,
}

impl FixedString {
    pub fn new(len: usize, require_nul: bool) -> Self {
        Self {
            require_nul,
            padding: Padding::Zero,
            raw: vec![0; len],
        }
    }

    /// Space-padded string without a terminator.
    pub fn space_padded(len: usize) -> Self {
        Self {
            require_nul: false,
            padding: Padding::Space,
            raw: vec![b' '; len],
        }
    }

    /// Same width, padding and terminator rule.
    pub fn same_format(&self, other: &FixedString) -> bool {
        self.require_nul == other.require_nul
            && self.padding == other.padding
            && self.raw.len() == other.raw.len()
    }

    /// Longest value that can be assigned.
    pub fn capacity(&self) -> usize {
        if self.require_nul {
            self.raw.len().saturating_sub(1)
        } else {
            self.raw.len()
        }
    }

    /// Bytes up to the first NUL, without trailing padding.
    pub fn content(&self) -> &[u8] {
        let mut end = self.raw.iter().position(|b| *b == 0).unwrap_or(self.raw.len());
        if self.padding == Padding::Space {
            while end > 0 && self.raw[end - 1] == b' ' {
                end -= 1;
            }
        }
        &self.raw[..end]
    }

    /// Replaces the value and pads it to the full width.
    pub fn set(&mut self, content: &[u8]) -> Result<()> {
        let value = String::from_utf8_lossy(content);
        if content.contains(&0) {
            return Err(Error::invalid(&value, "embedded NUL"));
        }
        if content.len() > self.capacity() {
            return Err(Error::invalid(&value, "string too long"));
        }
        let len = self.raw.len();
        self.raw.clear();
        self.raw.extend_from_slice(content);
        self.raw.resize(len, self.padding.byte());
        Ok(())
    }
}

impl Leaf for FixedString {
    fn size(&self) -> usize {
        self.raw.len()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        let len = self.raw.len();
        self.raw = reader.read_bytes(len)?.to_vec();
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bytes(&self.raw);
        Ok(())
    }

    fn raw(&self) -> String {
        quote(self.content())
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let content = unquote(text).map_err(|reason| Error::invalid(text, reason))?;
        self.set(&content).map_err(|e| match e {
            Error::InvalidValue { reason, .. } => Error::invalid(text, reason),
            other => other,
        })
    }
}

// =============================================================================
// LENGTH-PREFIXED STRING / DATA
// =============================================================================

/// How a prefixed payload is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Data,
}

/// Bytes preceded by an 8- or 16-bit length.
///
/// `inclusive` means the length counts the prefix itself. `nul` means the
/// payload carries a trailing NUL that is counted in the length but not shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixed {
    width: Width,
    inclusive: bool,
    nul: bool,
    kind: PayloadKind,
    max: Option<usize>,
    payload: Vec<u8>,
    // Inclusive length read from the wire that was smaller than the prefix
    // itself (erased flash reads as 0); written back as-is while unedited.
    short_len: Option<usize>,
}

impl Prefixed {
    pub fn new(width: Width, kind: PayloadKind) -> Self {
        Self {
            width,
            inclusive: false,
            nul: false,
            kind,
            max: None,
            payload: Vec::new(),
            short_len: None,
        }
    }

    /// Length counts the prefix bytes.
    pub fn inclusive(mut self) -> Self {
        self.inclusive = true;
        self
    }

    /// Payload ends in a NUL terminator.
    pub fn nul_terminated(mut self) -> Self {
        self.nul = true;
        self
    }

    /// Caps the length accepted when assigning a value.
    pub fn max_len(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Same prefix, length rules and payload kind.
    pub fn same_format(&self, other: &Prefixed) -> bool {
        self.width == other.width
            && self.inclusive == other.inclusive
            && self.nul == other.nul
            && self.kind == other.kind
            && self.max == other.max
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    fn prefix_max(&self) -> usize {
        match self.width {
            Width::W8 => MAX_P8_LEN,
            _ => MAX_P16_LEN,
        }
    }

    /// Payload exactly as stored, terminator included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload without the terminator.
    pub fn content(&self) -> &[u8] {
        match self.payload.split_last() {
            Some((0, rest)) if self.nul => rest,
            _ => &self.payload,
        }
    }

    /// Replaces the value, appending a terminator when required.
    pub fn set(&mut self, content: &[u8]) -> Result<()> {
        let value = || String::from_utf8_lossy(content).into_owned();
        if let Some(max) = self.max {
            if content.len() > max {
                return Err(Error::invalid(&value(), "value too long"));
            }
        }
        let mut payload = content.to_vec();
        if self.nul {
            payload.push(0);
        }
        let prefix = if self.inclusive { self.width.bytes() } else { 0 };
        if payload.len() + prefix > self.prefix_max() {
            return Err(Error::invalid(&value(), "value too long for length prefix"));
        }
        self.payload = payload;
        self.short_len = None;
        Ok(())
    }
}

impl Leaf for Prefixed {
    fn size(&self) -> usize {
        self.width.bytes() + self.payload.len()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        let declared = self.width.read(reader, false)? as usize;
        self.short_len = None;
        let len = if self.inclusive {
            if declared < self.width.bytes() {
                self.short_len = Some(declared);
            }
            declared.saturating_sub(self.width.bytes())
        } else {
            declared
        };
        self.payload = reader.read_bytes(len)?.to_vec();
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        let declared = match self.short_len {
            Some(len) => len,
            None if self.inclusive => self.payload.len() + self.width.bytes(),
            None => self.payload.len(),
        };
        let max = self.prefix_max();
        if declared > max {
            return Err(Error::ListTooLong {
                field: String::new(),
                offset: writer.position(),
                len: declared,
                max,
            });
        }
        self.width.write(writer, declared as i64);
        writer.write_bytes(&self.payload);
        Ok(())
    }

    fn raw(&self) -> String {
        match self.kind {
            PayloadKind::Text => quote(self.content()),
            PayloadKind::Data => hex::encode(self.content()),
        }
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let content = match self.kind {
            PayloadKind::Text => unquote(text).map_err(|reason| Error::invalid(text, reason))?,
            PayloadKind::Data => {
                hex::decode(text.trim()).map_err(|_| Error::invalid(text, "expected hex bytes"))?
            }
        };
        self.set(&content).map_err(|e| match e {
            Error::InvalidValue { reason, .. } => Error::invalid(text, reason),
            other => other,
        })
    }
}
