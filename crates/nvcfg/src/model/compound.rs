//! Compounds: ordered named fields whose list depends on the context.
//!
//! A compound does not carry a fixed field list. It carries a [`Definition`],
//! a function from [`Context`] to field specs, and resolves it every time it
//! is laid out or decoded. This is how one schema covers every firmware
//! version and format variant of a group.

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::Result;
use crate::model::node::{render_block, Node, Style};

/// Computes the field list for a context.
pub type Definition = fn(&Context) -> Vec<FieldSpec>;

/// Custom text form for a compound. Returning `None` falls back to the
/// default block rendering.
pub type Renderer = fn(&Compound, Style) -> Option<String>;

/// A field as declared by a [`Definition`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    disabled: bool,
    present: bool,
    node: Node,
}

impl FieldSpec {
    /// Declares a field. An empty name makes it anonymous.
    pub fn new(name: &'static str, node: Node) -> Self {
        Self {
            name,
            disabled: false,
            present: true,
            node,
        }
    }

    /// Keeps the bytes but hides the field from paths and text output.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Drops the field from the layout unless `cond` holds.
    pub fn when(mut self, cond: bool) -> Self {
        self.present &= cond;
        self
    }

    /// Changes the field name.
    pub fn renamed(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_present(&self) -> bool {
        self.present
    }
}

/// A resolved field of a compound.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: &'static str,
    disabled: bool,
    node: Node,
}

impl Field {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Named and enabled.
    pub fn is_visible(&self) -> bool {
        !self.name.is_empty() && !self.disabled
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn label(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("_{index}")
        } else {
            self.name.to_string()
        }
    }
}

impl From<FieldSpec> for Field {
    fn from(spec: FieldSpec) -> Self {
        Self {
            name: spec.name,
            disabled: spec.disabled,
            node: spec.node,
        }
    }
}

/// Ordered fields resolved from a [`Definition`].
#[derive(Debug, Clone)]
pub struct Compound {
    type_name: &'static str,
    definition: Definition,
    renderer: Option<Renderer>,
    fields: Vec<Field>,
}

impl Compound {
    /// Creates an unresolved compound; it has no fields until laid out or
    /// decoded.
    pub fn new(type_name: &'static str, definition: Definition) -> Self {
        Self {
            type_name,
            definition,
            renderer: None,
            fields: Vec::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn definition(&self) -> Definition {
        self.definition
    }

    /// Field list for `ctx`, with default values and conditional fields
    /// removed. Nested compounds are not yet resolved.
    pub fn resolve(&self, ctx: &Context) -> Vec<Field> {
        (self.definition)(ctx)
            .into_iter()
            .filter(FieldSpec::is_present)
            .map(Field::from)
            .collect()
    }

    /// All resolved fields, including anonymous and disabled ones.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Named, enabled fields in order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_visible())
    }

    pub fn field(&self, name: &str) -> Option<&Node> {
        self.fields
            .iter()
            .find(|f| f.is_visible() && f.name == name)
            .map(Field::node)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields
            .iter_mut()
            .find(|f| f.is_visible() && f.name == name)
            .map(Field::node_mut)
    }

    pub(crate) fn size(&self) -> usize {
        self.fields.iter().map(|f| f.node.size()).sum()
    }

    pub(crate) fn layout(&mut self, ctx: &Context) {
        let mut fields = self.resolve(ctx);
        for field in &mut fields {
            field.node.layout(ctx);
        }
        self.fields = fields;
    }

    /// Decodes into a freshly resolved field list. On failure the compound
    /// keeps its previous fields.
    pub(crate) fn decode(&mut self, reader: &mut Reader<'_>, ctx: &Context) -> Result<()> {
        let mut fields = self.resolve(ctx);
        for (i, field) in fields.iter_mut().enumerate() {
            let label = field.label(i);
            field
                .node
                .decode(reader, ctx)
                .map_err(|e| e.in_field(&label))?;
        }
        self.fields = fields;
        Ok(())
    }

    pub(crate) fn encode(&self, writer: &mut Writer) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            field
                .node
                .encode(writer)
                .map_err(|e| e.in_field(&field.label(i)))?;
        }
        Ok(())
    }

    pub(crate) fn render(&self, style: Style, level: usize) -> String {
        if let Some(text) = self.renderer.and_then(|render| render(self, style)) {
            return text;
        }
        let entries = self
            .visible_fields()
            .map(|f| (f.name.to_string(), f.node.render(style, level + 1)))
            .collect();
        render_block(entries, style, level, ('{', '}'))
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Format, Version};
    use crate::error::Error;
    use crate::model::builder::*;

    fn versioned(ctx: &Context) -> Vec<FieldSpec> {
        vec![
            field("a", u8()),
            field("b", u16()).when(ctx.version > Version::new(0, 0x16)),
            field("c", u8()),
        ]
    }

    fn period(_ctx: &Context) -> Vec<FieldSpec> {
        vec![field("hour", u8()), field("min", u8())]
    }

    fn render_period(c: &Compound, style: Style) -> Option<String> {
        let hour = c.field("hour")?.as_int()?;
        let min = c.field("min")?.as_int()?;
        match style {
            Style::Pretty => Some(format!("{hour:02}:{min:02}")),
            Style::Raw => None,
        }
    }

    #[test]
    fn test_version_gated_field() {
        let old = Context::new(Format::Dynamic).with_version(Version::new(0, 0x16));
        let new = old.clone().with_version(Version::new(0, 0x17));

        let mut node = compound("v", versioned);
        node.layout(&old);
        assert_eq!(node.size(), 2);
        assert!(matches!(node.get("b"), Err(Error::FieldNotFound { .. })));

        node.layout(&new);
        assert_eq!(node.size(), 4);
        assert!(node.get("b").is_ok());
    }

    #[test]
    fn test_decode_is_atomic() {
        let ctx = Context::default().with_version(Version::new(0, 0x17));
        let mut node = compound("v", versioned);
        node.decode(&mut Reader::new(&[1, 0, 2, 3]), &ctx).unwrap();
        assert_eq!(node.get("c").unwrap().as_int(), Some(3));

        let err = node.decode(&mut Reader::new(&[9, 0]), &ctx).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { ref field, .. } if field == "b"));
        assert_eq!(node.get("a").unwrap().as_int(), Some(1));
    }

    #[test]
    fn test_anonymous_field_error_label() {
        fn def(_ctx: &Context) -> Vec<FieldSpec> {
            vec![field("x", u8()), reserved(data(4))]
        }
        let mut node = compound("r", def);
        let err = node
            .decode(&mut Reader::new(&[1, 2]), &Context::default())
            .unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { ref field, .. } if field == "_1"));
    }

    #[test]
    fn test_renamed_per_format() {
        fn counter() -> FieldSpec {
            field("count", u16())
        }
        fn by_format(ctx: &Context) -> Vec<FieldSpec> {
            let name = match ctx.format {
                Format::Permanent => "boot_count",
                Format::Dynamic => "reset_count",
            };
            vec![field("flags", u8()), counter().renamed(name)]
        }

        let data = [0x01, 0x00, 0x2a];
        let mut node = compound("counters", by_format);
        node.decode(&mut Reader::new(&data), &Context::new(Format::Permanent))
            .unwrap();
        assert_eq!(node.get("boot_count").unwrap().as_int(), Some(42));
        assert_eq!(
            node.get("count").unwrap_err(),
            Error::FieldNotFound {
                path: "count".into(),
                segment: "count".into()
            }
        );
        assert!(node.get("reset_count").is_err());

        node.decode(&mut Reader::new(&data), &Context::new(Format::Dynamic))
            .unwrap();
        assert_eq!(node.get("reset_count").unwrap().as_int(), Some(42));
        assert!(matches!(node.get("boot_count"), Err(Error::FieldNotFound { .. })));
        assert_eq!(node.to_raw_string(), "{flags=1,reset_count=42}");
    }

    #[test]
    fn test_custom_renderer() {
        let mut node = Node::Compound(Compound::new("period", period).with_renderer(render_period));
        node.decode(&mut Reader::new(&[7, 5]), &Context::default()).unwrap();
        assert_eq!(node.to_pretty_string(), "07:05");
        assert_eq!(node.to_raw_string(), "{hour=7,min=5}");
    }
}
