//! Constructors for declaring schemas.
//!
//! Each function returns a default-valued [`Node`] that serves as a
//! prototype in a field list.
//!
//! # Example
//!
//! ```rust
//! use nvcfg::model::builder::*;
//! use nvcfg::model::FieldSpec;
//! use nvcfg::Context;
//!
//! fn forward(_ctx: &Context) -> Vec<FieldSpec> {
//!     vec![
//!         field("start", ip4()),
//!         field("port", u16_range(1, 0xffff)),
//!         reserved(u8()),
//!     ]
//! }
//!
//! let mut node = array(compound("forward", forward), 4);
//! node.layout(&Context::default());
//! assert_eq!(node.size(), 4 * 7);
//! ```

use crate::model::addr::{Ip4, Ip6, Mac};
use crate::model::bytes::{Data, FixedString, PayloadKind, Prefixed};
use crate::model::compound::{Compound, Definition, FieldSpec, Renderer};
use crate::model::container::{Array, List, Sentinel};
use crate::model::int::{Bool, Int, Timestamp, Width};
use crate::model::named::{Bitmask, Enum, Names};
use crate::model::node::Node;

// =============================================================================
// FIELDS
// =============================================================================

/// Named field.
pub fn field(name: &'static str, node: Node) -> FieldSpec {
    FieldSpec::new(name, node)
}

/// Anonymous field: encoded and decoded, never shown or addressable.
pub fn reserved(node: Node) -> FieldSpec {
    FieldSpec::new("", node)
}

// =============================================================================
// INTEGERS
// =============================================================================

fn int(width: Width, signed: bool, range: Option<(i64, i64)>) -> Node {
    Node::Int(Int::new(width, signed, range))
}

pub fn u8() -> Node {
    int(Width::W8, false, None)
}

pub fn u16() -> Node {
    int(Width::W16, false, None)
}

pub fn u32() -> Node {
    int(Width::W32, false, None)
}

pub fn i8() -> Node {
    int(Width::W8, true, None)
}

pub fn i16() -> Node {
    int(Width::W16, true, None)
}

pub fn i32() -> Node {
    int(Width::W32, true, None)
}

/// `u8` limited to `0..=max`.
pub fn u8_max(max: i64) -> Node {
    int(Width::W8, false, Some((0, max)))
}

pub fn u8_range(min: i64, max: i64) -> Node {
    int(Width::W8, false, Some((min, max)))
}

/// `u16` limited to `0..=max`.
pub fn u16_max(max: i64) -> Node {
    int(Width::W16, false, Some((0, max)))
}

pub fn u16_range(min: i64, max: i64) -> Node {
    int(Width::W16, false, Some((min, max)))
}

/// `u32` limited to `0..=max`.
pub fn u32_max(max: i64) -> Node {
    int(Width::W32, false, Some((0, max)))
}

pub fn i8_range(min: i64, max: i64) -> Node {
    int(Width::W8, true, Some((min, max)))
}

pub fn i32_range(min: i64, max: i64) -> Node {
    int(Width::W32, true, Some((min, max)))
}

pub fn boolean() -> Node {
    Node::Bool(Bool::new())
}

pub fn timestamp() -> Node {
    Node::Timestamp(Timestamp::new())
}

pub fn enumeration(width: Width, names: Names) -> Node {
    Node::Enum(Enum::new(width, false, names))
}

pub fn signed_enumeration(width: Width, names: Names) -> Node {
    Node::Enum(Enum::new(width, true, names))
}

pub fn bitmask(width: Width, names: Names) -> Node {
    Node::Bitmask(Bitmask::new(width, names))
}

// =============================================================================
// ADDRESSES AND BYTES
// =============================================================================

pub fn mac() -> Node {
    Node::Mac(Mac::new())
}

pub fn ip4() -> Node {
    Node::Ip4(Ip4::new())
}

pub fn ip6() -> Node {
    Node::Ip6(Ip6::new())
}

/// `len` opaque bytes.
pub fn data(len: usize) -> Node {
    Node::Data(Data::new(len))
}

/// Fixed-width string that always keeps a NUL terminator.
pub fn zstring(len: usize) -> Node {
    Node::FixedString(FixedString::new(len, true))
}

/// Fixed-width string that may use every byte.
pub fn fstring(len: usize) -> Node {
    Node::FixedString(FixedString::new(len, false))
}

/// Fixed-width string padded with spaces.
pub fn sstring(len: usize) -> Node {
    Node::FixedString(FixedString::space_padded(len))
}

fn prefixed(width: Width, kind: PayloadKind) -> Prefixed {
    Prefixed::new(width, kind)
}

pub fn p8string() -> Node {
    Node::Prefixed(prefixed(Width::W8, PayloadKind::Text))
}

pub fn p16string() -> Node {
    Node::Prefixed(prefixed(Width::W16, PayloadKind::Text))
}

/// 16-bit-prefixed string of at most `max` bytes.
pub fn p16string_max(max: usize) -> Node {
    Node::Prefixed(prefixed(Width::W16, PayloadKind::Text).max_len(max))
}

/// 8-bit-prefixed string whose length counts a trailing NUL.
pub fn p8zstring() -> Node {
    Node::Prefixed(prefixed(Width::W8, PayloadKind::Text).nul_terminated())
}

pub fn p16zstring() -> Node {
    Node::Prefixed(prefixed(Width::W16, PayloadKind::Text).nul_terminated())
}

/// 8-bit-prefixed string whose length counts the prefix byte.
pub fn p8istring() -> Node {
    Node::Prefixed(prefixed(Width::W8, PayloadKind::Text).inclusive())
}

/// 16-bit-prefixed string whose length counts the prefix bytes.
pub fn p16istring() -> Node {
    Node::Prefixed(prefixed(Width::W16, PayloadKind::Text).inclusive())
}

pub fn p8data() -> Node {
    Node::Prefixed(prefixed(Width::W8, PayloadKind::Data))
}

pub fn p16data() -> Node {
    Node::Prefixed(prefixed(Width::W16, PayloadKind::Data))
}

// =============================================================================
// CONTAINERS AND COMPOUNDS
// =============================================================================

/// Exactly `count` elements.
pub fn array(elem: Node, count: usize) -> Node {
    Node::Array(Array::new(elem, count))
}

/// Exactly `count` elements; trailing ones matching `sentinel` are unused.
pub fn array_until(elem: Node, count: usize, sentinel: Sentinel) -> Node {
    Node::Array(Array::new(elem, count).with_sentinel(sentinel))
}

/// Elements preceded by an 8-bit count.
pub fn p8list(elem: Node) -> Node {
    Node::List(List::new(elem, Width::W8))
}

/// Elements preceded by a 16-bit count.
pub fn p16list(elem: Node) -> Node {
    Node::List(List::new(elem, Width::W16))
}

pub fn compound(type_name: &'static str, definition: Definition) -> Node {
    Node::Compound(Compound::new(type_name, definition))
}

/// Compound with a custom text form.
pub fn compound_with(type_name: &'static str, definition: Definition, renderer: Renderer) -> Node {
    Node::Compound(Compound::new(type_name, definition).with_renderer(renderer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_sizes() {
        let ctx = Context::default();
        let cases: Vec<(Node, usize)> = vec![
            (u8(), 1),
            (i16(), 2),
            (u32_max(100), 4),
            (boolean(), 1),
            (timestamp(), 4),
            (mac(), 6),
            (ip4(), 4),
            (ip6(), 16),
            (data(112), 112),
            (zstring(33), 33),
            (p8string(), 1),
            (p16istring(), 2),
            (p16list(u8()), 2),
            (array(u16(), 3), 6),
        ];
        for (mut node, size) in cases {
            node.layout(&ctx);
            assert_eq!(node.size(), size, "size of {}", node.type_name());
        }
    }

    #[test]
    fn test_range_default_value() {
        assert_eq!(u16_range(20, 1024).as_int(), Some(20));
        assert_eq!(u8_max(5).as_int(), Some(0));
    }
}
