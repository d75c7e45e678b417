// Byte-level tag scanning.
//
// - '<' starts a tag only when followed by a name character, '/', '!' or '?'.
// - The closing '>' is found quote-aware, so '>' inside attribute values is fine.
// - Attributes: name ( '=' value )?, value quoted ('"' or '\'') or unquoted.
//   Entities in values are decoded. Names keep their original case.
// - Comments run to the first "-->"; unterminated ones swallow the rest.

use memchr::{memchr, memmem};

use crate::attributes::Attribute;

/* ============================ Utility predicates ========================= */

#[inline]
pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
pub(crate) fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'\x0c'
}

/// Does `s[i] == '<'` open markup, as opposed to a literal '<'?
pub(crate) fn starts_markup(s: &[u8], i: usize) -> bool {
    match s.get(i + 1) {
        Some(&b) => b.is_ascii_alphabetic() || b == b'/' || b == b'!' || b == b'?',
        None => false,
    }
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Tag {
    pub name: String,
    pub is_end: bool,
    pub self_closing: bool,
    pub attrs: Vec<Attribute>,
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
pub(crate) fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Parse raw `<...>` bytes into name, flags and attributes.
pub(crate) fn parse_tag(tag: &[u8]) -> Tag {
    let n = tag.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && tag[i] == b'/' {
        is_end = true;
        i += 1;
    }
    while i < n && is_ws(tag[i]) {
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(tag[i]) {
        i += 1;
    }
    let name = String::from_utf8_lossy(&tag[start..i]).into_owned();

    // self-closing? check before '>'
    let mut j = n - 1;
    while j > 0 && is_ws(tag[j - 1]) {
        j -= 1;
    }
    let self_closing = !is_end && j >= 2 && tag[j - 1] == b'/';

    let attrs = if is_end {
        Vec::new()
    } else {
        parse_attributes(&tag[i..n - 1])
    };

    Tag {
        name,
        is_end,
        self_closing,
        attrs,
    }
}

/// Scan `name ( '=' value )?` pairs from the bytes after the tag name.
fn parse_attributes(s: &[u8]) -> Vec<Attribute> {
    let len = s.len();
    let mut attrs = Vec::new();
    let mut i = 0usize;

    while i < len {
        // skip whitespace and slashes
        while i < len && (is_ws(s[i]) || s[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        // attribute name
        if !is_name_char(s[i]) {
            // Not a valid name start; advance to avoid infinite loops.
            i += 1;
            continue;
        }
        let name_start = i;
        i += 1;
        while i < len && is_name_char(s[i]) {
            i += 1;
        }
        let name = String::from_utf8_lossy(&s[name_start..i]).into_owned();

        let mut k = i;
        while k < len && is_ws(s[k]) {
            k += 1;
        }

        // optional "= value"
        let mut value = String::new();
        if k < len && s[k] == b'=' {
            i = k + 1;
            while i < len && is_ws(s[i]) {
                i += 1;
            }
            if i < len && (s[i] == b'"' || s[i] == b'\'') {
                let q = s[i];
                i += 1;
                let v_start = i;
                while i < len && s[i] != q {
                    i += 1;
                }
                value = decode_entities(&String::from_utf8_lossy(&s[v_start..i]));
                if i < len {
                    i += 1;
                }
            } else {
                let v_start = i;
                while i < len && !is_ws(s[i]) {
                    i += 1;
                }
                value = decode_entities(&String::from_utf8_lossy(&s[v_start..i]));
            }
        }

        attrs.push(Attribute { name, value });
    }
    attrs
}

/* ========================== Comments / raw text ========================== */

/// Index just past the "-->" closing the comment at `i`, or `s.len()` if unterminated.
pub(crate) fn skip_comment(s: &[u8], i: usize) -> usize {
    memmem::find(&s[i + 4..], b"-->")
        .map(|p| i + 4 + p + 3)
        .unwrap_or(s.len())
}

/// Skip raw text until the matching `</name>`. Returns the index after it,
/// or `s.len()` when the element is never closed.
pub(crate) fn skip_raw_text(s: &[u8], i: usize, name: &str) -> usize {
    let n = s.len();
    let mut j = i;
    while j < n {
        let Some(pos) = memchr(b'<', &s[j..]).map(|off| j + off) else {
            return n;
        };
        if pos + 1 < n && s[pos + 1] == b'/' {
            if let Some(end) = find_tag_end(s, pos) {
                let tag = parse_tag(&s[pos..=end]);
                if tag.name.eq_ignore_ascii_case(name) {
                    return end + 1;
                }
                j = end + 1;
                continue;
            }
            return n;
        }
        j = pos + 1;
    }
    n
}

/* ================================ Entities =============================== */

/// Decode the character references the converter understands. Unknown or
/// malformed references are left as written.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    })
}
