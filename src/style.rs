// Attribute value grammars for <kFont>.
//
// style: '_'-joined tokens, any order, ASCII case-insensitive, each at most once:
//     b | bold         -> bold
//     i | italic       -> italic
//     u | underline    -> underline
//   Anything else (unknown token, empty token, repeated token) is unrecognized
//   and yields Normal without underline.
//
// size:  <int>sp | <int>px | <int>
//   A bare value that is not an integer falls back to 20sp. A suffixed value
//   whose body is not an integer is an error. No whitespace is trimmed.

use std::fmt;

use crate::error::{Error, Result};

/// Weight/slant of a run of text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn from_flags(bold: bool, italic: bool) -> FontStyle {
        match (bold, italic) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Normal,
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FontStyle::Normal => "normal",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bold-italic",
        };
        f.write_str(s)
    }
}

/// Result of reading a `style` attribute.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StyleFlags {
    pub font_style: FontStyle,
    pub underline: bool,
}

#[derive(Clone, Copy)]
enum Token {
    Bold,
    Italic,
    Underline,
}

fn token(word: &str) -> Option<Token> {
    const TABLE: &[(&str, Token)] = &[
        ("b", Token::Bold),
        ("bold", Token::Bold),
        ("i", Token::Italic),
        ("italic", Token::Italic),
        ("u", Token::Underline),
        ("underline", Token::Underline),
    ];
    TABLE
        .iter()
        .find(|(name, _)| word.eq_ignore_ascii_case(name))
        .map(|&(_, t)| t)
}

/// Parse a `style` value. Unrecognized values map to the neutral default.
pub fn parse_style(value: &str) -> StyleFlags {
    let mut bold = false;
    let mut italic = false;
    let mut underline = false;

    for word in value.split('_') {
        let seen = match token(word) {
            Some(Token::Bold) => &mut bold,
            Some(Token::Italic) => &mut italic,
            Some(Token::Underline) => &mut underline,
            None => return StyleFlags::default(),
        };
        if *seen {
            return StyleFlags::default();
        }
        *seen = true;
    }

    StyleFlags {
        font_style: FontStyle::from_flags(bold, italic),
        underline,
    }
}

/// Size when the `size` attribute is present but not a number.
pub const FALLBACK_SIZE: i32 = 20;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SizeUnit {
    /// Scales with the user's text-size preference ("sp").
    #[default]
    Scaled,
    /// Fixed device pixels ("px").
    Pixels,
}

impl SizeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Scaled => "sp",
            SizeUnit::Pixels => "px",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TextSize {
    pub value: i32,
    pub unit: SizeUnit,
}

impl TextSize {
    /// A size only has an effect when strictly positive.
    pub fn is_set(self) -> bool {
        self.value > 0
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

fn strip_suffix_ignore_ascii_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Parse a `size` value; see the grammar at the top of this file.
pub fn parse_size(value: &str) -> Result<TextSize> {
    let suffixed = |number: &str, unit| {
        number
            .parse::<i32>()
            .map(|value| TextSize { value, unit })
            .map_err(|_| Error::InvalidSize(value.to_string()))
    };
    if let Some(n) = strip_suffix_ignore_ascii_case(value, "sp") {
        return suffixed(n, SizeUnit::Scaled);
    }
    if let Some(n) = strip_suffix_ignore_ascii_case(value, "px") {
        return suffixed(n, SizeUnit::Pixels);
    }
    Ok(TextSize {
        value: value.parse::<i32>().unwrap_or(FALLBACK_SIZE),
        unit: SizeUnit::Scaled,
    })
}
