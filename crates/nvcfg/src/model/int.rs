//! Integer, boolean and timestamp leaves.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::node::Leaf;
use crate::util::datetime::{format_timestamp, parse_timestamp};

/// On-wire width of an integer-backed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    /// Number of bytes on the wire.
    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
        }
    }

    /// Inclusive value bounds representable at this width.
    pub const fn bounds(self, signed: bool) -> (i64, i64) {
        match (self, signed) {
            (Width::W8, false) => (0, u8::MAX as i64),
            (Width::W16, false) => (0, u16::MAX as i64),
            (Width::W32, false) => (0, u32::MAX as i64),
            (Width::W8, true) => (i8::MIN as i64, i8::MAX as i64),
            (Width::W16, true) => (i16::MIN as i64, i16::MAX as i64),
            (Width::W32, true) => (i32::MIN as i64, i32::MAX as i64),
        }
    }

    pub(crate) fn read(self, reader: &mut Reader<'_>, signed: bool) -> Result<i64> {
        Ok(match (self, signed) {
            (Width::W8, false) => reader.read_u8()? as i64,
            (Width::W16, false) => reader.read_u16()? as i64,
            (Width::W32, false) => reader.read_u32()? as i64,
            (Width::W8, true) => reader.read_u8()? as i8 as i64,
            (Width::W16, true) => reader.read_u16()? as i16 as i64,
            (Width::W32, true) => reader.read_u32()? as i32 as i64,
        })
    }

    /// Writes the low bits of `value`; callers check bounds first.
    pub(crate) fn write(self, writer: &mut Writer, value: i64) {
        match self {
            Width::W8 => writer.write_u8(value as u8),
            Width::W16 => writer.write_u16(value as u16),
            Width::W32 => writer.write_u32(value as u32),
        }
    }

    /// Fails with `ValueOutOfRange` unless `min <= value <= max`.
    pub(crate) fn check(value: i64, (min, max): (i64, i64), writer: &Writer) -> Result<()> {
        if value < min || value > max {
            return Err(Error::ValueOutOfRange {
                field: String::new(),
                offset: writer.position(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
pub(crate) fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// INTEGER
// =============================================================================

/// Fixed-width integer with an optional inclusive range.
///
/// Decoding trusts the wire; the range (and the width itself) is enforced only
/// when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Int {
    width: Width,
    signed: bool,
    range: Option<(i64, i64)>,
    value: i64,
}

impl Int {
    /// Creates an integer initialised to zero, or to the lower range bound
    /// when zero is outside the range.
    pub fn new(width: Width, signed: bool, range: Option<(i64, i64)>) -> Self {
        let value = match range {
            Some((min, max)) if !(min..=max).contains(&0) => min,
            _ => 0,
        };
        Self {
            width,
            signed,
            range,
            value,
        }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Same wire width, signedness and range.
    pub fn same_format(&self, other: &Int) -> bool {
        self.width == other.width && self.signed == other.signed && self.range == other.range
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Declared range, if any.
    pub fn range(&self) -> Option<(i64, i64)> {
        self.range
    }

    /// Effective bounds: the declared range clipped to the width.
    pub fn bounds(&self) -> (i64, i64) {
        let (wmin, wmax) = self.width.bounds(self.signed);
        match self.range {
            Some((min, max)) => (min.max(wmin), max.min(wmax)),
            None => (wmin, wmax),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Assigns a value without validation; see [`Int`].
    pub fn set(&mut self, value: i64) {
        self.value = value;
    }
}

impl Leaf for Int {
    fn size(&self) -> usize {
        self.width.bytes()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.value = self.width.read(reader, self.signed)?;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        Width::check(self.value, self.bounds(), writer)?;
        self.width.write(writer, self.value);
        Ok(())
    }

    fn raw(&self) -> String {
        self.value.to_string()
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        self.value = parse_i64(text).ok_or_else(|| Error::invalid(text, "expected an integer"))?;
        Ok(())
    }
}

// =============================================================================
// BOOLEAN
// =============================================================================

/// One-byte boolean. Values other than 0 and 1 are kept and shown as numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bool {
    value: u8,
}

impl Bool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_value(&self) -> u8 {
        self.value
    }

    pub fn get(&self) -> bool {
        self.value != 0
    }

    pub fn set(&mut self, value: bool) {
        self.value = value as u8;
    }
}

impl Leaf for Bool {
    fn size(&self) -> usize {
        1
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.value = reader.read_u8()?;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(self.value);
        Ok(())
    }

    fn raw(&self) -> String {
        match self.value {
            0 => "false".to_string(),
            1 => "true".to_string(),
            n => n.to_string(),
        }
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        self.value = match text.trim() {
            "true" | "yes" | "on" => 1,
            "false" | "no" | "off" => 0,
            other => parse_i64(other)
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| Error::invalid(text, "expected a boolean"))?,
        };
        Ok(())
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// 32-bit epoch seconds, shown as a calendar string.
///
/// The display offset is taken from the context when the node is laid out or
/// decoded. Without a `tz_offset` option it is zero, so the calendar string is
/// UTC rather than the host's local time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timestamp {
    secs: u32,
    offset_min: i32,
}

impl Timestamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn secs(&self) -> u32 {
        self.secs
    }

    pub fn set(&mut self, secs: u32) {
        self.secs = secs;
    }
}

impl Leaf for Timestamp {
    fn size(&self) -> usize {
        4
    }

    fn layout(&mut self, ctx: &Context) {
        self.offset_min = ctx.tz_offset_min();
    }

    fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()> {
        self.layout(ctx);
        self.secs = reader.read_u32()?;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u32(self.secs);
        Ok(())
    }

    fn raw(&self) -> String {
        self.secs.to_string()
    }

    fn pretty(&self) -> String {
        format_timestamp(self.secs, self.offset_min)
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        self.secs = match text.parse::<u32>() {
            Ok(secs) => secs,
            Err(_) => parse_timestamp(text, self.offset_min)
                .map_err(|_| Error::invalid(text, "expected epoch seconds or 'YYYY-MM-DD HH:MM'"))?,
        };
        Ok(())
    }
}
