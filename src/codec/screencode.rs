// Screen-code text codec.
//
// Screen codes 0x00-0x1F hold '@', 'A'-'Z' and a handful of symbols; they
// display as ASCII 0x40-0x5F. Codes 0x20-0x3F match ASCII directly. The
// rest (graphics and reverse video) have no text form.

/// Rendered for bytes with no ASCII equivalent.
pub const PLACEHOLDER: char = '~';

/// Screen codes below 0x20 whose shifted ASCII form does not match the
/// glyph on screen (pound sign, up arrow, left arrow).
const NON_ASCII_GLYPHS: [u8; 3] = [0x1C, 0x1E, 0x1F];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScreenCodeError {
    #[error("invalid screen-code character: {0:?}")]
    InvalidCharacter(char),
}

/// Display character for one screen code.
#[inline]
pub fn decode_byte(b: u8) -> char {
    match b {
        _ if NON_ASCII_GLYPHS.contains(&b) => PLACEHOLDER,
        0x00..=0x1F => char::from(b'@' + b),
        0x20..=0x3F => char::from(b),
        _ => PLACEHOLDER,
    }
}

/// Decode screen codes to text, appending to `out`.
pub fn decode_into(bytes: &[u8], out: &mut String) {
    out.extend(bytes.iter().map(|&b| decode_byte(b)));
}

/// Decode screen codes to text.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

/// Screen code for one character. Inverse of [`decode_byte`] on every
/// character it can produce except the placeholder.
pub fn encode_char(c: char) -> Result<u8, ScreenCodeError> {
    match c {
        '@'..='[' | ']' => Ok(c as u8 - b'@'),
        ' '..='?' => Ok(c as u8),
        _ => Err(ScreenCodeError::InvalidCharacter(c)),
    }
}

/// Encode text as screen codes.
pub fn encode(text: &str) -> Result<Vec<u8>, ScreenCodeError> {
    text.chars().map(encode_char).collect()
}
