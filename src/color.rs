// Color strings accepted by the `color` attribute.
//
// Grammar:
//   #RRGGBB    opaque
//   #AARRGGBB  with alpha
//   name       ASCII case-insensitive, from the fixed palette below
//
// Anything else is an error; callers decide whether that is fatal.

use std::fmt;

use crate::error::{Error, Result};

/// An ARGB8888 color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFFFF_0000);

    pub fn argb(self) -> u32 {
        self.0
    }

    pub fn parse(s: &str) -> Result<Color> {
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::UnknownColor(s.to_string()));
        }
        named(s).ok_or_else(|| Error::UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    // from_str_radix tolerates a leading '+', which is not a hex digit here.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(|rgb| Color(0xFF00_0000 | rgb)),
        8 => u32::from_str_radix(hex, 16).ok().map(Color),
        _ => None,
    }
}

fn named(name: &str) -> Option<Color> {
    let argb = match name.to_ascii_lowercase().as_str() {
        "black" => 0xFF00_0000,
        "darkgray" | "darkgrey" => 0xFF44_4444,
        "gray" | "grey" => 0xFF88_8888,
        "lightgray" | "lightgrey" => 0xFFCC_CCCC,
        "white" => 0xFFFF_FFFF,
        "red" => 0xFFFF_0000,
        "green" | "lime" => 0xFF00_FF00,
        "blue" => 0xFF00_00FF,
        "yellow" => 0xFFFF_FF00,
        "cyan" | "aqua" => 0xFF00_FFFF,
        "magenta" | "fuchsia" => 0xFFFF_00FF,
        "maroon" => 0xFF80_0000,
        "navy" => 0xFF00_0080,
        "olive" => 0xFF80_8000,
        "purple" => 0xFF80_0080,
        "silver" => 0xFFC0_C0C0,
        "teal" => 0xFF00_8080,
        _ => return None,
    };
    Some(Color(argb))
}
