//! CP850 encoding utilities for Portuguese thermal printers
//!
//! The supported printers run the single-byte DOS Latin-1 code page
//! (CP850), which covers Portuguese accented characters. This module
//! provides:
//! - Encoding UTF-8 text to CP850 bytes
//! - Decoding CP850 bytes back to text
//! - Sanitizing text so every character survives the printer code page
//!
//! The table below is the only state shared between compile calls and it
//! is read-only.

/// Byte emitted for characters the code page cannot represent.
pub const SUBSTITUTE: u8 = b'?';

/// CP850 upper half: byte `0x80 + i` decodes to `CP850_HIGH[i]`.
const CP850_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
    // 0xD0
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
    // 0xE0
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
    // 0xF0
    '\u{00AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}',
];

/// Encode a string as CP850 bytes.
///
/// ASCII passes through unchanged; characters outside the code page are
/// replaced with `?`.
pub fn encode(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> u8 {
    if (c as u32) < 0x80 {
        c as u8
    } else {
        CP850_HIGH
            .iter()
            .position(|&m| m == c)
            .map(|i| 0x80 + i as u8)
            .unwrap_or(SUBSTITUTE)
    }
}

/// Decode CP850 bytes back to a string.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b < 0x80 {
                b as char
            } else {
                CP850_HIGH[(b - 0x80) as usize]
            }
        })
        .collect()
}

/// Trim and round-trip text through the printer code page.
///
/// Characters CP850 cannot represent come back as `?`; the line itself
/// is never dropped.
pub fn sanitize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    decode(&encode(trimmed))
}
