//! The value-node tree.
//!
//! A settings group is a tree of [`Node`]s: compounds and containers on the
//! inside, fixed-layout leaves at the bottom. Every node knows its encoded
//! size, how to decode itself from a [`Reader`] and encode into a [`Writer`],
//! and how to render itself as text in two styles.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::addr::{Ip4, Ip6, Mac};
use crate::model::bytes::{Data, FixedString, PayloadKind, Prefixed};
use crate::model::compound::Compound;
use crate::model::container::{Array, List};
use crate::model::int::{Bool, Int, Timestamp, Width};
use crate::model::named::{Bitmask, Enum};

/// Text rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Compact, machine-oriented form.
    Raw,
    /// Human-oriented form: enum names, indented blocks, calendar dates.
    Pretty,
}

/// Behaviour shared by every fixed-shape leaf value.
pub trait Leaf {
    /// Encoded size in bytes.
    fn size(&self) -> usize;

    /// Picks up context-dependent presentation settings.
    fn layout(&mut self, _ctx: &Context) {}

    fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()>;

    fn encode(&self, writer: &mut Writer) -> Result<()>;

    /// Raw text form.
    fn raw(&self) -> String;

    /// Pretty text form; defaults to the raw form.
    fn pretty(&self) -> String {
        self.raw()
    }

    /// Assigns the value from text accepted in either rendering style.
    fn parse(&mut self, text: &str) -> Result<()>;
}

/// A value node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Int(Int),
    Bool(Bool),
    Enum(Enum),
    Bitmask(Bitmask),
    Timestamp(Timestamp),
    Mac(Mac),
    Ip4(Ip4),
    Ip6(Ip6),
    Data(Data),
    FixedString(FixedString),
    Prefixed(Prefixed),
    Array(Array),
    List(List),
    Compound(Compound),
}

impl Node {
    fn leaf(&self) -> Option<&dyn Leaf> {
        let leaf: &dyn Leaf = match self {
            Node::Int(v) => v,
            Node::Bool(v) => v,
            Node::Enum(v) => v,
            Node::Bitmask(v) => v,
            Node::Timestamp(v) => v,
            Node::Mac(v) => v,
            Node::Ip4(v) => v,
            Node::Ip6(v) => v,
            Node::Data(v) => v,
            Node::FixedString(v) => v,
            Node::Prefixed(v) => v,
            Node::Array(_) | Node::List(_) | Node::Compound(_) => return None,
        };
        Some(leaf)
    }

    fn leaf_mut(&mut self) -> Option<&mut dyn Leaf> {
        let leaf: &mut dyn Leaf = match self {
            Node::Int(v) => v,
            Node::Bool(v) => v,
            Node::Enum(v) => v,
            Node::Bitmask(v) => v,
            Node::Timestamp(v) => v,
            Node::Mac(v) => v,
            Node::Ip4(v) => v,
            Node::Ip6(v) => v,
            Node::Data(v) => v,
            Node::FixedString(v) => v,
            Node::Prefixed(v) => v,
            Node::Array(_) | Node::List(_) | Node::Compound(_) => return None,
        };
        Some(leaf)
    }

    /// True for nodes without children.
    pub fn is_leaf(&self) -> bool {
        self.leaf().is_some()
    }

    /// Short type name used in listings and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Int(v) => match (v.width(), v.is_signed()) {
                (Width::W8, false) => "u8",
                (Width::W16, false) => "u16",
                (Width::W32, false) => "u32",
                (Width::W8, true) => "i8",
                (Width::W16, true) => "i16",
                (Width::W32, true) => "i32",
            },
            Node::Bool(_) => "bool",
            Node::Enum(_) => "enum",
            Node::Bitmask(_) => "bitmask",
            Node::Timestamp(_) => "time",
            Node::Mac(_) => "mac",
            Node::Ip4(_) => "ip4",
            Node::Ip6(_) => "ip6",
            Node::Data(_) => "data",
            Node::FixedString(_) => "fstring",
            Node::Prefixed(v) => match v.kind() {
                PayloadKind::Text => "pstring",
                PayloadKind::Data => "pdata",
            },
            Node::Array(_) => "array",
            Node::List(_) => "list",
            Node::Compound(v) => v.type_name(),
        }
    }

    /// Encoded size in bytes for the current value.
    pub fn size(&self) -> usize {
        match self {
            Node::Array(v) => v.size(),
            Node::List(v) => v.size(),
            Node::Compound(v) => v.size(),
            leaf => leaf.leaf().map_or(0, |leaf| leaf.size()),
        }
    }

    /// Resolves every compound below this node against `ctx` and resets
    /// the tree to default values.
    pub fn layout(&mut self, ctx: &Context) {
        match self {
            Node::Array(v) => v.layout(ctx),
            Node::List(v) => v.layout(ctx),
            Node::Compound(v) => v.layout(ctx),
            leaf => {
                if let Some(leaf) = leaf.leaf_mut() {
                    leaf.layout(ctx);
                }
            }
        }
    }

    pub fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()> {
        match self {
            Node::Array(v) => v.decode(reader, ctx),
            Node::List(v) => v.decode(reader, ctx),
            Node::Compound(v) => v.decode(reader, ctx),
            leaf => match leaf.leaf_mut() {
                Some(leaf) => leaf.decode(reader, ctx),
                None => Ok(()),
            },
        }
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Node::Array(v) => v.encode(writer),
            Node::List(v) => v.encode(writer),
            Node::Compound(v) => v.encode(writer),
            leaf => match leaf.leaf() {
                Some(leaf) => leaf.encode(writer),
                None => Ok(()),
            },
        }
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    pub(crate) fn render(&self, style: Style, level: usize) -> String {
        match self {
            Node::Array(v) => v.render(style, level),
            Node::List(v) => v.render(style, level),
            Node::Compound(v) => v.render(style, level),
            leaf => match (leaf.leaf(), style) {
                (Some(leaf), Style::Raw) => leaf.raw(),
                (Some(leaf), Style::Pretty) => leaf.pretty(),
                (None, _) => String::new(),
            },
        }
    }

    /// Compact single-line text.
    pub fn to_raw_string(&self) -> String {
        self.render(Style::Raw, 0)
    }

    /// Indented, human-oriented text.
    pub fn to_pretty_string(&self) -> String {
        self.render(Style::Pretty, 0)
    }

    // =========================================================================
    // PATH ACCESS
    // =========================================================================

    fn child(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Compound(v) => v.field(segment),
            Node::Array(v) => v.items().get(segment.parse::<usize>().ok()?),
            Node::List(v) => v.items().get(segment.parse::<usize>().ok()?),
            _ => None,
        }
    }

    fn child_mut(&mut self, segment: &str) -> Option<&mut Node> {
        match self {
            Node::Compound(v) => v.field_mut(segment),
            Node::Array(v) => v.items_mut().get_mut(segment.parse::<usize>().ok()?),
            Node::List(v) => v.items_mut().get_mut(segment.parse::<usize>().ok()?),
            _ => None,
        }
    }

    /// Looks up a descendant by dotted path, e.g. `port_forwards.3.dest`.
    ///
    /// Container elements are addressed by index. Anonymous and disabled
    /// fields are not addressable.
    pub fn get(&self, path: &str) -> Result<&Node> {
        let mut node = self;
        for segment in path.split('.') {
            node = node.child(segment).ok_or_else(|| not_found(path, segment))?;
        }
        Ok(node)
    }

    /// Mutable variant of [`Node::get`].
    pub fn get_mut(&mut self, path: &str) -> Result<&mut Node> {
        let mut node = self;
        for segment in path.split('.') {
            node = node.child_mut(segment).ok_or_else(|| not_found(path, segment))?;
        }
        Ok(node)
    }

    /// True if `self` has the wire layout of `template`, so that decoding
    /// its encoding with `template` yields `self` again. Values may differ.
    pub fn matches_shape(&self, template: &Node) -> bool {
        match (self, template) {
            (Node::Int(a), Node::Int(b)) => a.same_format(b),
            (Node::Enum(a), Node::Enum(b)) => a.same_format(b),
            (Node::Bitmask(a), Node::Bitmask(b)) => a.same_format(b),
            (Node::FixedString(a), Node::FixedString(b)) => a.same_format(b),
            (Node::Prefixed(a), Node::Prefixed(b)) => a.same_format(b),
            (Node::Data(a), Node::Data(b)) => a.bytes().len() == b.bytes().len(),
            (Node::Bool(_), Node::Bool(_))
            | (Node::Timestamp(_), Node::Timestamp(_))
            | (Node::Mac(_), Node::Mac(_))
            | (Node::Ip4(_), Node::Ip4(_))
            | (Node::Ip6(_), Node::Ip6(_)) => true,
            (Node::Array(a), Node::Array(b)) => {
                a.count() == b.count()
                    && a.elem().matches_shape(b.elem())
                    && a.items().iter().all(|item| item.matches_shape(b.elem()))
            }
            (Node::List(a), Node::List(b)) => {
                a.width() == b.width()
                    && a.elem().matches_shape(b.elem())
                    && a.items().iter().all(|item| item.matches_shape(b.elem()))
            }
            (Node::Compound(a), Node::Compound(b)) => {
                a.type_name() == b.type_name()
                    && a.fields().len() == b.fields().len()
                    && a.fields().iter().zip(b.fields()).all(|(x, y)| {
                        x.name() == y.name()
                            && x.is_disabled() == y.is_disabled()
                            && x.node().matches_shape(y.node())
                    })
            }
            _ => false,
        }
    }

    // =========================================================================
    // VALUE ACCESS
    // =========================================================================

    /// Assigns a leaf value from text.
    pub fn set_str(&mut self, text: &str) -> Result<()> {
        match self.leaf_mut() {
            Some(leaf) => leaf.parse(text),
            None => Err(Error::invalid(text, "cannot assign text to a container")),
        }
    }

    /// Numeric value of integer-like leaves.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(v) => Some(v.value()),
            Node::Enum(v) => Some(v.value()),
            Node::Bool(v) => Some(v.raw_value() as i64),
            Node::Bitmask(v) => Some(v.value() as i64),
            Node::Timestamp(v) => Some(v.secs() as i64),
            _ => None,
        }
    }

    /// Assigns an integer-like leaf. Range checks happen at encode time.
    pub fn set_int(&mut self, value: i64) -> Result<()> {
        let bad = |reason| Error::invalid(&value.to_string(), reason);
        match self {
            Node::Int(v) => v.set(value),
            Node::Enum(v) => v.set(value),
            Node::Bool(v) => v.set(value != 0),
            Node::Bitmask(v) => v.set(u32::try_from(value).map_err(|_| bad("negative bitmask"))?),
            Node::Timestamp(v) => v.set(u32::try_from(value).map_err(|_| bad("timestamp out of range"))?),
            _ => return Err(bad("not an integer value")),
        }
        Ok(())
    }

    /// Stored bytes of byte-like leaves, without padding or terminators.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Node::Mac(v) => Some(&v.0),
            Node::Data(v) => Some(v.bytes()),
            Node::FixedString(v) => Some(v.content()),
            Node::Prefixed(v) => Some(v.content()),
            _ => None,
        }
    }

    /// String content of text leaves.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Node::FixedString(v) => Some(String::from_utf8_lossy(v.content()).into_owned()),
            Node::Prefixed(v) if v.kind() == PayloadKind::Text => {
                Some(String::from_utf8_lossy(v.content()).into_owned())
            }
            _ => None,
        }
    }

    /// True for "nothing here" values: zero numbers and addresses, empty
    /// strings, and containers made only of such values.
    ///
    /// Usable directly as an array sentinel.
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Mac(v) => v.is_zero(),
            Node::Ip4(v) => v.0.is_unspecified(),
            Node::Ip6(v) => v.0.is_unspecified(),
            Node::Data(v) => v.is_zero(),
            Node::FixedString(_) | Node::Prefixed(_) => self.as_bytes().is_some_and(<[u8]>::is_empty),
            Node::Array(v) => v.items().iter().all(Node::is_blank),
            Node::List(v) => v.is_empty(),
            Node::Compound(v) => v.fields().iter().all(|f| f.node().is_blank()),
            other => other.as_int() == Some(0),
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Node::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Node::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Node::List(v) => Some(v),
            _ => None,
        }
    }
}

fn not_found(path: &str, segment: &str) -> Error {
    Error::FieldNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}

const INDENT: &str = "  ";

/// Renders labelled children as a `{ ... }` block.
///
/// Pretty output puts one `label = value` per line, indented one step past
/// `level`; raw output is `open label=value,... close` on one line, with the
/// label omitted when empty.
pub(crate) fn render_block(
    entries: Vec<(String, String)>,
    style: Style,
    level: usize,
    (open, close): (char, char),
) -> String {
    match style {
        Style::Raw => {
            let body: Vec<String> = entries
                .into_iter()
                .map(|(label, value)| {
                    if label.is_empty() {
                        value
                    } else {
                        format!("{label}={value}")
                    }
                })
                .collect();
            format!("{open}{}{close}", body.join(","))
        }
        Style::Pretty => {
            if entries.is_empty() {
                return "{}".to_string();
            }
            let mut out = String::from("{\n");
            for (label, value) in entries {
                out.push_str(&INDENT.repeat(level + 1));
                out.push_str(&label);
                out.push_str(" = ");
                out.push_str(&value);
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(level));
            out.push('}');
            out
        }
    }
}

impl From<Int> for Node {
    fn from(v: Int) -> Self {
        Node::Int(v)
    }
}

impl From<Compound> for Node {
    fn from(v: Compound) -> Self {
        Node::Compound(v)
    }
}

impl From<Array> for Node {
    fn from(v: Array) -> Self {
        Node::Array(v)
    }
}

impl From<List> for Node {
    fn from(v: List) -> Self {
        Node::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::*;
    use crate::model::compound::FieldSpec;

    fn entry_def(_ctx: &Context) -> Vec<FieldSpec> {
        vec![field("port", u16()), field("host", ip4()), reserved(u8())]
    }

    fn root_def(_ctx: &Context) -> Vec<FieldSpec> {
        vec![
            field("enabled", boolean()),
            field("entries", array(compound("entry", entry_def), 2)),
            field("old", u8()).disabled(),
        ]
    }

    fn laid_out() -> Node {
        let mut node = compound("root", root_def);
        node.layout(&Context::default());
        node
    }

    #[test]
    fn test_layout_size() {
        let node = laid_out();
        // 1 + 2 * (2 + 4 + 1) + 1
        assert_eq!(node.size(), 16);
    }

    #[test]
    fn test_path_access() {
        let mut node = laid_out();
        node.get_mut("entries.1.port").unwrap().set_str("8080").unwrap();
        assert_eq!(node.get("entries.1.port").unwrap().as_int(), Some(8080));
        assert_eq!(node.get("entries.1").unwrap().type_name(), "entry");

        let err = node.get("entries.5.port").unwrap_err();
        assert_eq!(
            err,
            Error::FieldNotFound {
                path: "entries.5.port".into(),
                segment: "5".into(),
            }
        );
        assert!(node.get("old").is_err());
        assert!(node.get("enabled.x").is_err());
    }

    #[test]
    fn test_set_str_on_container_fails() {
        let mut node = laid_out();
        let err = node.get_mut("entries").unwrap().set_str("1").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidValue);
    }

    #[test]
    fn test_render_styles() {
        let mut node = laid_out();
        node.get_mut("enabled").unwrap().set_str("true").unwrap();
        node.get_mut("entries.0.host").unwrap().set_str("10.0.0.1").unwrap();
        assert_eq!(
            node.to_raw_string(),
            "{enabled=true,entries=[{port=0,host=10.0.0.1},{port=0,host=0.0.0.0}]}"
        );
        let pretty = node.to_pretty_string();
        assert!(pretty.starts_with("{\n  enabled = true\n  entries = {\n    [0] = {\n"));
        assert!(pretty.contains("      host = 10.0.0.1\n"));
        assert!(pretty.ends_with("\n}"));
    }

    #[test]
    fn test_is_blank() {
        let mut node = laid_out();
        assert!(node.is_blank());
        node.get_mut("entries.1.port").unwrap().set_int(1).unwrap();
        assert!(!node.is_blank());
        assert!(node.get("entries.0").unwrap().is_blank());
    }
}
