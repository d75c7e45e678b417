// src/html.rs
//
// Markup walker: HTML subset -> StyledText.
//
// - Text runs: entities decoded, whitespace runs collapsed to one space; a
//   collapsed space is dropped at the start of output and after a line break.
// - Comments, <!DOCTYPE ..> and <? ..> are skipped. RAW-TEXT tags (script,
//   style, title) have their content skipped.
// - A '<' that cannot start markup is literal text; an unterminated tag is
//   literal text to the end of input.
// - Known tags become spans when they close. BLOCK tags pad with two line
//   breaks on both sides, <li> with one.
// - Every other tag goes to the TagHandler. <x/> is an open then a close.
// - At end of input, still-open elements are closed innermost-first.

use memchr::memchr;

use crate::attributes::{get_attribute, Attribute, NoAttributes};
use crate::color::Color;
use crate::error::Result;
use crate::handler::TagHandler;
use crate::scan::{
    decode_entities, find_tag_end, is_ws, parse_tag, skip_comment, skip_raw_text, starts_markup,
    Tag,
};
use crate::spanned::{SpanKind, StyledText};
use crate::style::FontStyle;

/* =============================== Core sets =============================== */

fn matches_ignore_ascii_case(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}

fn is_raw_text(name: &str) -> bool {
    matches_ignore_ascii_case(name, &["script", "style", "title"])
}

fn is_transparent(name: &str) -> bool {
    matches_ignore_ascii_case(name, &["html", "head", "body", "span", "ul", "ol"])
}

fn is_void(name: &str) -> bool {
    matches_ignore_ascii_case(name, &["br", "img", "hr", "meta", "link", "input", "wbr"])
}

/// What a known element does to the text it wraps.
#[derive(Clone, Debug, PartialEq)]
enum Markup {
    Spans(Vec<SpanKind>),
    Block(Vec<SpanKind>),
    ListItem,
}

fn heading_scale(level: u8) -> f32 {
    const SCALES: [f32; 6] = [1.5, 1.4, 1.3, 1.2, 1.1, 1.0];
    SCALES[usize::from(level.clamp(1, 6)) - 1]
}

fn heading_level(name: &str) -> Option<u8> {
    let b = name.as_bytes();
    if b.len() == 2 && (b[0] == b'h' || b[0] == b'H') && (b'1'..=b'6').contains(&b[1]) {
        Some(b[1] - b'0')
    } else {
        None
    }
}

/// Markup for a known start tag, or `None` if the tag belongs to the handler.
fn known_markup(name: &str, attrs: &[Attribute]) -> Option<Markup> {
    let lower = name.to_ascii_lowercase();
    let spans = match lower.as_str() {
        "b" | "strong" => vec![SpanKind::Style(FontStyle::Bold)],
        "i" | "em" | "cite" | "dfn" => vec![SpanKind::Style(FontStyle::Italic)],
        "u" | "ins" => vec![SpanKind::Underline],
        "s" | "strike" | "del" => vec![SpanKind::Strikethrough],
        "big" => vec![SpanKind::RelativeSize(1.25)],
        "small" => vec![SpanKind::RelativeSize(0.8)],
        "sup" => vec![SpanKind::Superscript],
        "sub" => vec![SpanKind::Subscript],
        "tt" => vec![SpanKind::Monospace],
        "a" => get_attribute(attrs, "href")
            .map(|href| vec![SpanKind::Url(href.to_string())])
            .unwrap_or_default(),
        "font" => font_spans(attrs),
        "p" | "div" => return Some(Markup::Block(Vec::new())),
        "blockquote" => return Some(Markup::Block(vec![SpanKind::Quote])),
        "li" => return Some(Markup::ListItem),
        _ => {
            let level = heading_level(&lower)?;
            return Some(Markup::Block(vec![
                SpanKind::RelativeSize(heading_scale(level)),
                SpanKind::Style(FontStyle::Bold),
            ]));
        }
    };
    Some(Markup::Spans(spans))
}

// The base converter drops a color it cannot read instead of failing.
fn font_spans(attrs: &[Attribute]) -> Vec<SpanKind> {
    let Some(value) = get_attribute(attrs, "color").filter(|v| !v.is_empty()) else {
        return Vec::new();
    };
    match Color::parse(value) {
        Ok(color) => vec![SpanKind::ForegroundColor(color)],
        Err(err) => {
            tracing::debug!(%err, "ignoring <font> color");
            Vec::new()
        }
    }
}

/* ============================ Output helpers ============================= */

fn trailing_newlines(out: &StyledText) -> usize {
    out.as_str().bytes().rev().take_while(|&b| b == b'\n').count()
}

/// Pad `out` to end with `count` line breaks, unless it is empty.
fn ensure_newlines(out: &mut StyledText, count: usize) {
    if out.is_empty() {
        return;
    }
    for _ in trailing_newlines(out)..count {
        out.push('\n');
    }
}

/// Append a text run: decode entities, collapse whitespace.
fn push_text(out: &mut StyledText, raw: &[u8]) {
    let text = decode_entities(&String::from_utf8_lossy(raw));
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_ascii() && is_ws(c as u8) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    if pending_space && !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
        out.push(' ');
    }
}

/* ================================ Walker ================================= */

/// An element opened and not yet closed.
#[derive(Debug)]
struct OpenMark {
    name: String,
    start: usize,
    markup: Option<Markup>,
}

struct Walker<'h, H: TagHandler + ?Sized> {
    handler: &'h mut H,
    out: StyledText,
    stack: Vec<OpenMark>,
}

impl<'h, H: TagHandler + ?Sized> Walker<'h, H> {
    fn start_tag(&mut self, tag: Tag) -> Result<()> {
        if tag.name.eq_ignore_ascii_case("br") {
            self.out.push('\n');
            return Ok(());
        }
        if tag.name.eq_ignore_ascii_case("img") {
            self.out.push('\u{FFFC}');
            return Ok(());
        }
        if is_transparent(&tag.name) || is_void(&tag.name) {
            return Ok(());
        }

        let markup = known_markup(&tag.name, &tag.attrs);
        match &markup {
            Some(Markup::Block(_)) => ensure_newlines(&mut self.out, 2),
            Some(Markup::ListItem) => ensure_newlines(&mut self.out, 1),
            Some(Markup::Spans(_)) => {}
            None => {
                tracing::trace!(tag = %tag.name, "delegating start tag");
                self.handler
                    .handle_tag(true, &tag.name, &mut self.out, &tag.attrs)?;
                if tag.self_closing {
                    return self.delegate_end(&tag.name);
                }
            }
        }
        let self_closing = tag.self_closing;
        self.stack.push(OpenMark {
            name: tag.name,
            start: self.out.len(),
            markup,
        });
        if self_closing {
            // <p/> pads like <p></p>.
            return self.close_top();
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) -> Result<()> {
        if is_transparent(name) || is_void(name) {
            return Ok(());
        }
        match self
            .stack
            .iter()
            .rposition(|m| m.name.eq_ignore_ascii_case(name))
        {
            Some(pos) => {
                // Closing an outer element closes everything opened inside it.
                while self.stack.len() > pos {
                    self.close_top()?;
                }
                Ok(())
            }
            None if known_markup(name, &[]).is_some() => Ok(()),
            None => self.delegate_end(name),
        }
    }

    fn delegate_end(&mut self, name: &str) -> Result<()> {
        tracing::trace!(tag = %name, "delegating end tag");
        self.handler
            .handle_tag(false, name, &mut self.out, &NoAttributes)
    }

    fn close_top(&mut self) -> Result<()> {
        let Some(mark) = self.stack.pop() else {
            return Ok(());
        };
        let end = self.out.len();
        match mark.markup {
            None => self.delegate_end(&mark.name)?,
            Some(Markup::Spans(kinds)) => {
                for kind in kinds {
                    self.out.set_span(kind, mark.start, end)?;
                }
            }
            Some(Markup::Block(kinds)) => {
                for kind in kinds {
                    self.out.set_span(kind, mark.start, end)?;
                }
                ensure_newlines(&mut self.out, 2);
            }
            Some(Markup::ListItem) => ensure_newlines(&mut self.out, 1),
        }
        Ok(())
    }

    fn walk(mut self, src: &[u8]) -> Result<StyledText> {
        let n = src.len();
        let mut i = 0usize;

        while i < n {
            // Comments
            if src[i..].starts_with(b"<!--") {
                i = skip_comment(src, i);
                continue;
            }

            // Tags
            if src[i] == b'<' && starts_markup(src, i) {
                let Some(j) = find_tag_end(src, i) else {
                    push_text(&mut self.out, &src[i..]);
                    break;
                };
                if src[i + 1] == b'!' || src[i + 1] == b'?' {
                    i = j + 1;
                    continue;
                }
                let tag = parse_tag(&src[i..=j]);
                i = j + 1;
                if tag.name.is_empty() {
                    continue;
                }

                if tag.is_end {
                    self.end_tag(&tag.name)?;
                } else if is_raw_text(&tag.name) && !tag.self_closing {
                    i = skip_raw_text(src, i, &tag.name);
                } else {
                    self.start_tag(tag)?;
                }
                continue;
            }

            // Text run; a literal '<' belongs to it.
            let from = if src[i] == b'<' { i + 1 } else { i };
            let next_lt = memchr(b'<', &src[from..])
                .map(|off| from + off)
                .unwrap_or(n);
            push_text(&mut self.out, &src[i..next_lt]);
            i = next_lt;
        }

        while !self.stack.is_empty() {
            self.close_top()?;
        }
        Ok(self.out)
    }
}

/// Convert `source` to styled text, passing unknown tags to `handler`.
pub fn from_html<H>(source: &str, handler: &mut H) -> Result<StyledText>
where
    H: TagHandler + ?Sized,
{
    let walker = Walker {
        handler,
        out: StyledText::new(),
        stack: Vec::new(),
    };
    walker.walk(source.as_bytes())
}
