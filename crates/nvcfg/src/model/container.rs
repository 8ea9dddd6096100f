//! Homogeneous containers: fixed-count arrays and length-prefixed lists.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::limits::{MAX_P16_LEN, MAX_P8_LEN};
use crate::model::int::Width;
use crate::model::node::{render_block, Node, Style};

/// Predicate marking an element as unused.
pub type Sentinel = fn(&Node) -> bool;

fn decode_items(
    template: &Node,
    count: usize,
    reader: &mut Reader<'_>,
    ctx: &Context,
) -> Result<Vec<Node>> {
    let mut items = Vec::with_capacity(count.min(reader.remaining_len()));
    for i in 0..count {
        let mut item = template.clone();
        item.decode(reader, ctx).map_err(|e| e.in_field(&i.to_string()))?;
        items.push(item);
    }
    Ok(items)
}

fn encode_items(items: &[Node], writer: &mut Writer) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        item.encode(writer).map_err(|e| e.in_field(&i.to_string()))?;
    }
    Ok(())
}

fn indexed_entries(items: &[Node], style: Style, level: usize) -> Vec<(String, String)> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let label = match style {
                Style::Raw => String::new(),
                Style::Pretty => format!("[{i}]"),
            };
            (label, item.render(style, level + 1))
        })
        .collect()
}

// =============================================================================
// ARRAY
// =============================================================================

/// Exactly `count` elements of one element type, no prefix.
///
/// With a sentinel, trailing elements matching it are unused: pretty output
/// omits them, but they are still decoded, encoded and counted in the size.
#[derive(Debug, Clone)]
pub struct Array {
    elem: Box<Node>,
    count: usize,
    sentinel: Option<Sentinel>,
    items: Vec<Node>,
}

impl Array {
    pub fn new(elem: Node, count: usize) -> Self {
        let items = vec![elem.clone(); count];
        Self {
            elem: Box::new(elem),
            count,
            sentinel: None,
            items,
        }
    }

    pub fn with_sentinel(mut self, sentinel: Sentinel) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Declared element count.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Element prototype.
    pub fn elem(&self) -> &Node {
        &self.elem
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Node] {
        &mut self.items
    }

    /// Number of elements before the trailing run of sentinel matches.
    pub fn used_len(&self) -> usize {
        match self.sentinel {
            Some(is_unused) => self
                .items
                .iter()
                .rposition(|item| !is_unused(item))
                .map_or(0, |i| i + 1),
            None => self.items.len(),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.items.iter().map(Node::size).sum()
    }

    pub(crate) fn layout(&mut self, ctx: &Context) {
        self.elem.layout(ctx);
        self.items = vec![(*self.elem).clone(); self.count];
    }

    pub(crate) fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()> {
        let mut template = (*self.elem).clone();
        template.layout(ctx);
        self.items = decode_items(&template, self.count, reader, ctx)?;
        self.elem = Box::new(template);
        Ok(())
    }

    pub(crate) fn encode(&self, writer: &mut Writer) -> Result<()> {
        encode_items(&self.items, writer)
    }

    pub(crate) fn render(&self, style: Style, level: usize) -> String {
        let shown = match style {
            Style::Raw => &self.items[..],
            Style::Pretty => &self.items[..self.used_len()],
        };
        render_block(indexed_entries(shown, style, level), style, level, ('[', ']'))
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.items == other.items
    }
}

// =============================================================================
// LIST
// =============================================================================

/// Elements preceded by an 8- or 16-bit count.
#[derive(Debug, Clone)]
pub struct List {
    elem: Box<Node>,
    width: Width,
    items: Vec<Node>,
}

impl List {
    pub fn new(elem: Node, width: Width) -> Self {
        Self {
            elem: Box::new(elem),
            width,
            items: Vec::new(),
        }
    }

    /// Largest count the prefix can carry.
    pub fn max_len(&self) -> usize {
        match self.width {
            Width::W8 => MAX_P8_LEN,
            _ => MAX_P16_LEN,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Element prototype.
    pub fn elem(&self) -> &Node {
        &self.elem
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Node] {
        &mut self.items
    }

    fn check_room(&self) -> Result<()> {
        if self.items.len() >= self.max_len() {
            return Err(Error::ListTooLong {
                field: String::new(),
                offset: 0,
                len: self.items.len() + 1,
                max: self.max_len(),
            });
        }
        Ok(())
    }

    /// Appends a default element and returns it for editing.
    pub fn push_default(&mut self) -> Result<&mut Node> {
        self.check_room()?;
        self.items.push((*self.elem).clone());
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    /// Appends an element. It must have the layout of the list's element
    /// type, otherwise it would not decode back from the encoded list.
    pub fn push(&mut self, item: Node) -> Result<()> {
        if !item.matches_shape(&self.elem) {
            return Err(Error::invalid(
                &item.to_raw_string(),
                "element does not match the list element type",
            ));
        }
        self.check_room()?;
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Node> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn size(&self) -> usize {
        self.width.bytes() + self.items.iter().map(Node::size).sum::<usize>()
    }

    pub(crate) fn layout(&mut self, ctx: &Context) {
        self.elem.layout(ctx);
        self.items.clear();
    }

    pub(crate) fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()> {
        let count = self.width.read(reader, false)? as usize;
        let mut template = (*self.elem).clone();
        template.layout(ctx);
        self.items = decode_items(&template, count, reader, ctx)?;
        self.elem = Box::new(template);
        Ok(())
    }

    pub(crate) fn encode(&self, writer: &mut Writer) -> Result<()> {
        let max = self.max_len();
        if self.items.len() > max {
            return Err(Error::ListTooLong {
                field: String::new(),
                offset: writer.position(),
                len: self.items.len(),
                max,
            });
        }
        self.width.write(writer, self.items.len() as i64);
        encode_items(&self.items, writer)
    }

    pub(crate) fn render(&self, style: Style, level: usize) -> String {
        render_block(indexed_entries(&self.items, style, level), style, level, ('[', ']'))
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.items == other.items
    }
}
