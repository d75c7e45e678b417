//! Styled text: a string plus range-tagged style annotations.
//!
//! Offsets are UTF-8 byte offsets into the text. Every span uses
//! exclusive-exclusive boundaries: text inserted exactly at a span's start or
//! end is never absorbed into it.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::style::{FontStyle, TextSize};

/// Per-conversion click callback. Receives the `clickable` flag verbatim.
#[derive(Clone)]
pub struct ClickListener(Rc<dyn Fn(&str)>);

impl ClickListener {
    pub fn new(f: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, flag: &str) {
        (self.0)(flag)
    }
}

impl fmt::Debug for ClickListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickListener(..)")
    }
}

/// A range that forwards activation to the listener. It has no visual effect.
#[derive(Clone, Debug)]
pub struct ClickableSpan {
    pub flag: String,
    listener: Option<ClickListener>,
}

impl ClickableSpan {
    pub fn new(flag: impl Into<String>, listener: Option<ClickListener>) -> Self {
        Self {
            flag: flag.into(),
            listener,
        }
    }

    pub fn on_click(&self) {
        if let Some(listener) = &self.listener {
            listener.call(&self.flag);
        }
    }
}

// Listeners have no identity worth comparing.
impl PartialEq for ClickableSpan {
    fn eq(&self, other: &Self) -> bool {
        self.flag == other.flag
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SpanKind {
    Clickable(ClickableSpan),
    ForegroundColor(Color),
    AbsoluteSize(TextSize),
    RelativeSize(f32),
    Style(FontStyle),
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Monospace,
    Quote,
    Url(String),
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Clickable(c) => write!(f, "clickable({})", c.flag),
            SpanKind::ForegroundColor(c) => write!(f, "color({c})"),
            SpanKind::AbsoluteSize(s) => write!(f, "size({s})"),
            SpanKind::RelativeSize(r) => write!(f, "relative-size({r})"),
            SpanKind::Style(s) => write!(f, "style({s})"),
            SpanKind::Underline => f.write_str("underline"),
            SpanKind::Strikethrough => f.write_str("strikethrough"),
            SpanKind::Superscript => f.write_str("superscript"),
            SpanKind::Subscript => f.write_str("subscript"),
            SpanKind::Monospace => f.write_str("monospace"),
            SpanKind::Quote => f.write_str("quote"),
            SpanKind::Url(u) => write!(f, "url({u})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    spans: Vec<Span>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Spans in the order they were set.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Spans that cover `offset`.
    pub fn spans_at(&self, offset: usize) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.contains(offset))
    }

    /// Spans whose range equals `range` exactly.
    pub fn spans_of(&self, range: Range<usize>) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.range() == range)
    }

    /// Append at the end. Closed spans never widen, since an end boundary is exclusive.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn ends_with(&self, c: char) -> bool {
        self.text.ends_with(c)
    }

    pub fn set_span(&mut self, kind: SpanKind, start: usize, end: usize) -> Result<()> {
        let len = self.text.len();
        if start > end
            || end > len
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return Err(Error::InvalidRange { start, end, len });
        }
        self.spans.push(Span { start, end, kind });
        Ok(())
    }

    /// Insert `s` at `offset`, keeping every span's boundaries exclusive.
    pub fn insert(&mut self, offset: usize, s: &str) -> Result<()> {
        let len = self.text.len();
        if offset > len || !self.text.is_char_boundary(offset) {
            return Err(Error::InvalidRange {
                start: offset,
                end: offset,
                len,
            });
        }
        self.text.insert_str(offset, s);
        let n = s.len();
        for span in &mut self.spans {
            if span.start >= offset {
                span.start += n;
                span.end += n;
            } else if span.end > offset {
                span.end += n;
            }
        }
        Ok(())
    }

    /// Activate every clickable span covering `offset`. Returns how many fired.
    pub fn click(&self, offset: usize) -> usize {
        let mut fired = 0;
        for span in self.spans_at(offset) {
            if let SpanKind::Clickable(c) = &span.kind {
                c.on_click();
                fired += 1;
            }
        }
        fired
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.text)?;
        for span in &self.spans {
            writeln!(
                f,
                "  {}..{} {} {:?}",
                span.start,
                span.end,
                span.kind,
                &self.text[span.start..span.end]
            )?;
        }
        Ok(())
    }
}
