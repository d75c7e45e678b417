/// A single `name="value"` pair as written on a start tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parser-side view of the element currently being opened.
///
/// `attributes` returns `None` when the parser has no attribute list for the
/// element; lookups then report every attribute as absent.
pub trait OpenElement {
    fn attributes(&self) -> Option<&[Attribute]>;
}

impl OpenElement for [Attribute] {
    fn attributes(&self) -> Option<&[Attribute]> {
        Some(self)
    }
}

impl OpenElement for Vec<Attribute> {
    fn attributes(&self) -> Option<&[Attribute]> {
        Some(self.as_slice())
    }
}

/// An element with no attribute list at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAttributes;

impl OpenElement for NoAttributes {
    fn attributes(&self) -> Option<&[Attribute]> {
        None
    }
}

/// Case-sensitive lookup of `name` on the element being opened.
pub fn get_attribute<'a, E>(element: &'a E, name: &str) -> Option<&'a str>
where
    E: OpenElement + ?Sized,
{
    let Some(attrs) = element.attributes() else {
        tracing::warn!(attribute = name, "element exposes no attribute list");
        return None;
    };
    attrs
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}
