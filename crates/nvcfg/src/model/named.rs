//! Enumerations and bitmasks with symbolic names.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::int::{parse_i64, Width};
use crate::model::node::Leaf;

/// Symbolic names attached to integer values or bits.
///
/// For enumerations `Seq` names values `0, 1, 2, ...`; for bitmasks it names
/// bits `0, 1, 2, ...`. `Map` lists explicit value (or mask) to name pairs.
/// Empty names are placeholders and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Names {
    Seq(&'static [&'static str]),
    Map(&'static [(i64, &'static str)]),
}

impl Names {
    /// Iterates `(key, name)` pairs, skipping placeholders.
    fn entries(&self) -> Vec<(i64, &'static str)> {
        let mut out: Vec<(i64, &'static str)> = match self {
            Names::Seq(names) => names
                .iter()
                .enumerate()
                .map(|(i, name)| (i as i64, *name))
                .collect(),
            Names::Map(pairs) => pairs.to_vec(),
        };
        out.retain(|(_, name)| !name.is_empty());
        out
    }

    fn value_name(&self, value: i64) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == value)
            .map(|(_, name)| name)
    }

    fn name_value(&self, name: &str) -> Option<i64> {
        self.entries()
            .into_iter()
            .find(|(_, n)| *n == name)
            .map(|(key, _)| key)
    }

    /// Bit masks in ascending order, each with its name.
    fn masks(&self) -> Vec<(u32, &'static str)> {
        let mut out: Vec<(u32, &'static str)> = match self {
            Names::Seq(_) => self
                .entries()
                .into_iter()
                .filter(|(bit, _)| *bit < 32)
                .map(|(bit, name)| (1u32 << bit, name))
                .collect(),
            Names::Map(_) => self
                .entries()
                .into_iter()
                .map(|(mask, name)| (mask as u32, name))
                .filter(|(mask, _)| *mask != 0)
                .collect(),
        };
        out.sort_by_key(|(mask, _)| *mask);
        out
    }
}

// =============================================================================
// ENUM
// =============================================================================

/// Integer shown by name when one is defined for its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    width: Width,
    signed: bool,
    names: Names,
    value: i64,
}

impl Enum {
    pub fn new(width: Width, signed: bool, names: Names) -> Self {
        Self {
            width,
            signed,
            names,
            value: 0,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
    }

    pub fn same_format(&self, other: &Enum) -> bool {
        self.width == other.width && self.signed == other.signed && self.names == other.names
    }

    /// Name of the current value, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        self.names.value_name(self.value)
    }
}

impl Leaf for Enum {
    fn size(&self) -> usize {
        self.width.bytes()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.value = self.width.read(reader, self.signed)?;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        Width::check(self.value, self.width.bounds(self.signed), writer)?;
        self.width.write(writer, self.value);
        Ok(())
    }

    fn raw(&self) -> String {
        self.value.to_string()
    }

    fn pretty(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.value.to_string(),
        }
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        self.value = self
            .names
            .name_value(text)
            .or_else(|| parse_i64(text))
            .ok_or_else(|| Error::invalid(text, "unknown name"))?;
        Ok(())
    }
}

// =============================================================================
// BITMASK
// =============================================================================

/// Unsigned integer shown as the list of its named bits.
///
/// Bits without a name are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmask {
    width: Width,
    names: Names,
    value: u32,
}

impl Bitmask {
    pub fn new(width: Width, names: Names) -> Self {
        Self {
            width,
            names,
            value: 0,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, value: u32) {
        self.value = value;
    }

    pub fn same_format(&self, other: &Bitmask) -> bool {
        self.width == other.width && self.names == other.names
    }

    /// Names whose bits are all set, in ascending bit order.
    pub fn set_names(&self) -> Vec<&'static str> {
        self.names
            .masks()
            .into_iter()
            .filter(|(mask, _)| self.value & mask == *mask)
            .map(|(_, name)| name)
            .collect()
    }
}

impl Leaf for Bitmask {
    fn size(&self) -> usize {
        self.width.bytes()
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.value = self.width.read(reader, false)? as u32;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        Width::check(self.value as i64, self.width.bounds(false), writer)?;
        self.width.write(writer, self.value as i64);
        Ok(())
    }

    fn raw(&self) -> String {
        format!("0x{:0width$x}", self.value, width = self.width.bytes() * 2)
    }

    fn pretty(&self) -> String {
        let names = self.set_names();
        if names.is_empty() {
            if self.value == 0 {
                String::new()
            } else {
                format!("0x{:x}", self.value)
            }
        } else {
            names.join(", ")
        }
    }

    /// Accepts a number, or a list of bit names separated by commas or
    /// whitespace. Named input keeps the current unnamed bits.
    fn parse(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if let Some(n) = parse_i64(text) {
            self.value = u32::try_from(n).map_err(|_| Error::invalid(text, "negative bitmask"))?;
            return Ok(());
        }

        let masks = self.names.masks();
        let known = masks.iter().fold(0u32, |acc, (mask, _)| acc | mask);
        let mut value = self.value & !known;
        for token in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let (mask, _) = masks
                .iter()
                .find(|(_, name)| *name == token)
                .ok_or_else(|| Error::invalid(text, "unknown bit name"))?;
            value |= mask;
        }
        self.value = value;
        Ok(())
    }
}
