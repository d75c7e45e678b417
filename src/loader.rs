use std::io::BufRead;

use crate::error::Result;
use crate::handler::KFontHandler;
use crate::html::from_html;
use crate::spanned::{ClickListener, StyledText};

const LINE_BREAK: &str = "<br/>";

/// Wrap `source` in a root element unless it already has one.
pub fn wrap_root(source: &str) -> String {
    if source.starts_with("<html>") {
        source.to_string()
    } else {
        format!("<html>{source}</html>")
    }
}

fn convert(source: &str, listener: Option<ClickListener>) -> Result<StyledText> {
    let mut handler = KFontHandler::new(listener);
    from_html(&wrap_root(source), &mut handler)
}

/// Convert markup that may contain `<kFont>`. Each `\n` becomes a line break.
///
/// `listener` receives the `clickable` flag whenever a clickable range of the
/// result is activated.
pub fn format(source: &str, listener: Option<ClickListener>) -> Result<StyledText> {
    convert(&source.replace('\n', LINE_BREAK), listener)
}

/// Read UTF-8 lines from `reader`, end each with a line break, and convert.
pub fn load<R: BufRead>(reader: R, listener: Option<ClickListener>) -> Result<StyledText> {
    let mut source = String::new();
    for line in reader.lines() {
        source.push_str(&line?);
        source.push_str(LINE_BREAK);
    }
    tracing::debug!(bytes = source.len(), "loaded markup");
    convert(&source, listener)
}
