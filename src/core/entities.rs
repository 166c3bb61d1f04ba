//! HTML Entity Decoding
//!
//! Handles decoding of character references found in HTML text and attributes:
//! - Markup entities: &lt; &gt; &amp; &quot; &apos;
//! - Common named entities of financial pages: &nbsp; &euro; &auml; ...
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Longest named entity we try to match (without `&` and `;`)
const MAX_ENTITY_LEN: usize = 10;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
///
/// Unknown or unterminated references are kept verbatim, as browsers do.
pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp_pos) = memchr(b'&', &input[pos..]) else {
            result.extend_from_slice(&input[pos..]);
            break;
        };

        result.extend_from_slice(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        let window_end = (pos + MAX_ENTITY_LEN + 2).min(input.len());
        let decoded = memchr(b';', &input[pos..window_end])
            .and_then(|semi| decode_entity(&input[pos + 1..pos + semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                let mut buf = [0u8; 4];
                result.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                pos += semi + 1;
            }
            None => {
                result.push(b'&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    if entity.is_empty() {
        return None;
    }

    if entity[0] == b'#' {
        return decode_numeric_entity(&entity[1..]);
    }

    let c = match entity {
        b"lt" => '<',
        b"gt" => '>',
        b"amp" => '&',
        b"quot" => '"',
        b"apos" => '\'',
        b"nbsp" => '\u{00A0}',
        b"shy" => '\u{00AD}',
        b"euro" => '\u{20AC}',
        b"pound" => '\u{00A3}',
        b"yen" => '\u{00A5}',
        b"cent" => '\u{00A2}',
        b"sect" => '\u{00A7}',
        b"deg" => '\u{00B0}',
        b"percnt" => '%',
        b"minus" => '\u{2212}',
        b"times" => '\u{00D7}',
        b"middot" => '\u{00B7}',
        b"copy" => '\u{00A9}',
        b"reg" => '\u{00AE}',
        b"trade" => '\u{2122}',
        b"mdash" => '\u{2014}',
        b"ndash" => '\u{2013}',
        b"lsquo" => '\u{2018}',
        b"rsquo" => '\u{2019}',
        b"ldquo" => '\u{201C}',
        b"rdquo" => '\u{201D}',
        b"bdquo" => '\u{201E}',
        b"hellip" => '\u{2026}',
        b"auml" => 'ä',
        b"ouml" => 'ö',
        b"uuml" => 'ü',
        b"Auml" => 'Ä',
        b"Ouml" => 'Ö',
        b"Uuml" => 'Ü',
        b"szlig" => 'ß',
        b"eacute" => 'é',
        b"egrave" => 'è',
        b"agrave" => 'à',
        b"ccedil" => 'ç',
        _ => return None,
    };
    Some(c)
}

/// Decode a numeric character reference (after the `#`)
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    if entity.is_empty() {
        return None;
    }

    let codepoint = if entity[0] == b'x' || entity[0] == b'X' {
        let hex = std::str::from_utf8(&entity[1..]).ok()?;
        u32::from_str_radix(hex, 16).ok()?
    } else {
        let dec = std::str::from_utf8(entity).ok()?;
        dec.parse::<u32>().ok()?
    };

    char::from_u32(codepoint)
}
