//! Handling for tags the base walker does not know, and the `<kFont>` tag.

use crate::attributes::{get_attribute, OpenElement};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::spanned::{ClickListener, ClickableSpan, SpanKind, StyledText};
use crate::style::{parse_size, parse_style, FontStyle, SizeUnit, TextSize};

/// Receives every tag the walker does not handle itself.
///
/// `element` is only meaningful on opening events; on closing events it
/// carries no attributes.
pub trait TagHandler {
    fn handle_tag(
        &mut self,
        opening: bool,
        tag: &str,
        output: &mut StyledText,
        element: &dyn OpenElement,
    ) -> Result<()>;
}

/// Ignores every unknown tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreTags;

impl TagHandler for IgnoreTags {
    fn handle_tag(
        &mut self,
        _opening: bool,
        _tag: &str,
        _output: &mut StyledText,
        _element: &dyn OpenElement,
    ) -> Result<()> {
        Ok(())
    }
}

pub const TAG_K_FONT: &str = "kFont";

/// Styling captured from an open `<kFont>`, waiting for its closing tag.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDescriptor {
    pub start: usize,
    pub font_style: FontStyle,
    pub underline: bool,
    pub size: TextSize,
    pub color: Option<Color>,
    pub click_flag: Option<String>,
}

impl StyleDescriptor {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            font_style: FontStyle::Normal,
            underline: false,
            size: TextSize {
                value: 0,
                unit: SizeUnit::Scaled,
            },
            color: None,
            click_flag: None,
        }
    }

    /// Read `style`, `clickable`, `size` and `color` from the element being opened.
    pub fn read<E>(start: usize, element: &E) -> Result<Self>
    where
        E: OpenElement + ?Sized,
    {
        let mut desc = Self::new(start);

        if let Some(style) = non_empty(get_attribute(element, "style")) {
            let flags = parse_style(style);
            desc.font_style = flags.font_style;
            desc.underline = flags.underline;
        }
        if let Some(flag) = non_empty(get_attribute(element, "clickable")) {
            desc.click_flag = Some(flag.to_string());
        }
        if let Some(size) = non_empty(get_attribute(element, "size")) {
            desc.size = parse_size(size)?;
        }
        if let Some(color) = non_empty(get_attribute(element, "color")) {
            desc.color = Some(Color::parse(color)?);
        }
        Ok(desc)
    }

    /// Span kinds this descriptor produces, in emission order.
    pub fn span_kinds(&self, listener: Option<&ClickListener>) -> Vec<SpanKind> {
        let mut kinds = Vec::new();
        if let Some(flag) = &self.click_flag {
            kinds.push(SpanKind::Clickable(ClickableSpan::new(
                flag.clone(),
                listener.cloned(),
            )));
        }
        if let Some(color) = self.color {
            kinds.push(SpanKind::ForegroundColor(color));
        }
        if self.size.is_set() {
            kinds.push(SpanKind::AbsoluteSize(self.size));
        }
        if self.font_style != FontStyle::Normal {
            kinds.push(SpanKind::Style(self.font_style));
        }
        if self.underline {
            kinds.push(SpanKind::Underline);
        }
        kinds
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Tag handler for `<kFont style=".." size=".." color=".." clickable="..">`.
///
/// One instance per conversion. `<kFont>` does not nest: opening a second one
/// before the first closes is an error.
#[derive(Debug, Default)]
pub struct KFontHandler {
    listener: Option<ClickListener>,
    current: Option<StyleDescriptor>,
}

impl KFontHandler {
    pub fn new(listener: Option<ClickListener>) -> Self {
        Self {
            listener,
            current: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn on_open<E>(&mut self, tag: &str, output_len: usize, element: &E) -> Result<()>
    where
        E: OpenElement + ?Sized,
    {
        if !tag.eq_ignore_ascii_case(TAG_K_FONT) {
            return Ok(());
        }
        if self.current.is_some() {
            return Err(Error::NestedTag { offset: output_len });
        }
        let desc = StyleDescriptor::read(output_len, element)?;
        tracing::debug!(start = output_len, ?desc, "kFont open");
        self.current = Some(desc);
        Ok(())
    }

    pub fn on_close(&mut self, tag: &str, output: &mut StyledText) -> Result<()> {
        if !tag.eq_ignore_ascii_case(TAG_K_FONT) {
            return Ok(());
        }
        let Some(desc) = self.current.take() else {
            tracing::warn!(offset = output.len(), "stray </kFont> ignored");
            return Ok(());
        };
        emit(&desc, output.len(), self.listener.as_ref(), output)
    }
}

/// Apply the spans for `desc` over `desc.start..end`.
pub fn emit(
    desc: &StyleDescriptor,
    end: usize,
    listener: Option<&ClickListener>,
    output: &mut StyledText,
) -> Result<()> {
    let kinds = desc.span_kinds(listener);
    tracing::debug!(start = desc.start, end, spans = kinds.len(), "kFont close");
    for kind in kinds {
        output.set_span(kind, desc.start, end)?;
    }
    Ok(())
}

impl TagHandler for KFontHandler {
    fn handle_tag(
        &mut self,
        opening: bool,
        tag: &str,
        output: &mut StyledText,
        element: &dyn OpenElement,
    ) -> Result<()> {
        if opening {
            self.on_open(tag, output.len(), element)
        } else {
            self.on_close(tag, output)
        }
    }
}
