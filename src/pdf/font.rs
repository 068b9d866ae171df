//! Helvetica with WinAnsiEncoding: the only font the exporter uses.
//!
//! Standard-14 fonts need no embedding, so the encoder only has to map each
//! `char` to its single WinAnsi byte and know the glyph advance for line
//! wrapping. Characters outside WinAnsi have no glyph and are reported back
//! to the caller.

/// PDF base font name.
pub const BASE_FONT: &str = "Helvetica";

/// PDF encoding name matching [`encode_char`].
pub const ENCODING: &str = "WinAnsiEncoding";

/// Resource name the content streams refer to.
pub const RESOURCE_NAME: &str = "F1";

/// Advance used for glyphs outside printable ASCII.
const DEFAULT_ADVANCE: u16 = 556;

/// Helvetica advances for 0x20..=0x7E, in 1/1000 em.
const ASCII_ADVANCES: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// The 0x80..=0x9F block of WinAnsi, where it departs from Latin-1.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Map one character to its WinAnsi code, if the font has a glyph for it.
pub fn encode_char(ch: char) -> Option<u8> {
    match ch as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(ch as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, code)| *code),
    }
}

/// Encode a whole line.
///
/// Control characters never fail: `'\r'` is dropped, a tab becomes four
/// spaces, and any other C0/C1 control or DEL becomes one space.
///
/// Returns the first character without a glyph on failure.
pub fn encode_line(line: &str) -> Result<Vec<u8>, char> {
    let mut out = Vec::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\r' => {}
            '\t' => out.extend_from_slice(b"    "),
            c if c.is_control() => out.push(b' '),
            c => out.push(encode_char(c).ok_or(c)?),
        }
    }
    Ok(out)
}

/// Advance of an encoded byte in 1/1000 em.
pub fn advance(code: u8) -> u16 {
    match code {
        0x20..=0x7E => ASCII_ADVANCES[(code - 0x20) as usize],
        _ => DEFAULT_ADVANCE,
    }
}

/// Decode WinAnsi bytes back to text. Used to read exported PDFs.
pub fn decode_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            WIN_ANSI_HIGH
                .iter()
                .find(|(_, code)| *code == b)
                .map(|(c, _)| *c)
                .unwrap_or(b as char)
        })
        .collect()
}
