//! HTML subset to styled text, extended with a `<kFont>` tag.
//!
//! ```text
//! <kFont style="b_u" size="18sp" color="#FF0000" clickable="more">Read more</kFont>
//! ```
//!
//! * `style`: `_`-joined `b`/`bold`, `i`/`italic`, `u`/`underline`, any order.
//! * `size`: integer with an optional `sp` (scaled, the default) or `px` suffix.
//! * `color`: `#RRGGBB`, `#AARRGGBB` or a color name. A bad color fails the conversion.
//! * `clickable`: flag passed to the click listener when the range is activated.

mod attributes;
mod color;
mod error;
mod handler;
mod html;
mod loader;
mod scan;
mod spanned;
mod style;

pub use attributes::{get_attribute, Attribute, NoAttributes, OpenElement};
pub use color::Color;
pub use error::{Error, Result};
pub use handler::{emit, IgnoreTags, KFontHandler, StyleDescriptor, TagHandler, TAG_K_FONT};
pub use html::from_html;
pub use loader::{format, load, wrap_root};
pub use spanned::{ClickListener, ClickableSpan, Span, SpanKind, StyledText};
pub use style::{parse_size, parse_style, FontStyle, SizeUnit, StyleFlags, TextSize, FALLBACK_SIZE};
