// Packed base-40 text codec.
//
// Three characters from a 40-symbol alphabet are packed into one 16-bit
// little-endian word: word = v1 * 1600 + v2 * 40 + v3, most-significant
// character first. Two bytes on the wire carry three characters of text.
//
// The standard alphabet:
//   0      space
//   1-26   'A'-'Z'
//   27-35  '1'-'9'
//   36-39  '.' ',' '-' '\''
//
// Encoding also accepts NUL and the middle dot as spaces, and digit '0' as
// an alias for letter 'O' (the two share a value, so '0' never survives
// a decode).

/// Number of symbols in the alphabet.
pub const RADIX: u16 = 40;

/// Characters packed into one word.
pub const CHARS_PER_UNIT: usize = 3;

/// Bytes occupied by one packed word.
pub const BYTES_PER_UNIT: usize = 2;

/// Largest word the encoder can produce (`"'''"`).
pub const MAX_WORD: u16 = RADIX * RADIX * RADIX - 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Base40Error {
    /// Text length is not a multiple of 3, or byte length is not even.
    #[error("input length {len} is not a multiple of {unit}")]
    InvalidInputLength { len: usize, unit: usize },
    /// Character outside the alphabet (encode).
    #[error("invalid character to encode: {0:?}")]
    InvalidCharacter(char),
    /// Digit outside 0..40 (decode).
    #[error("invalid character value to decode: {0}")]
    InvalidCharacterValue(u8),
    /// Alias mapped to a value outside 0..40 (alphabet construction).
    #[error("alias {alias:?} maps to out-of-range value {value}")]
    InvalidAliasValue { alias: char, value: u8 },
}

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// A bijection between character values `0..40` and display characters,
/// plus encode-only aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    symbols: [char; RADIX as usize],
    aliases: &'static [(char, u8)],
}

const STANDARD_ALIASES: &[(char, u8)] = &[('\0', 0), ('\u{B7}', 0), ('0', 15)];

impl Alphabet {
    /// The standard alphabet used by the overlays and the CLI.
    pub const STANDARD: Alphabet = Alphabet {
        symbols: [
            ' ', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
            'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '1', '2', '3', '4', '5', '6', '7',
            '8', '9', '.', ',', '-', '\'',
        ],
        aliases: STANDARD_ALIASES,
    };

    /// Build an alphabet from an explicit symbol table and alias list.
    /// Every alias value must be below [`RADIX`].
    pub const fn new(
        symbols: [char; RADIX as usize],
        aliases: &'static [(char, u8)],
    ) -> Result<Self, Base40Error> {
        let mut i = 0;
        while i < aliases.len() {
            let (alias, value) = aliases[i];
            if value as u16 >= RADIX {
                return Err(Base40Error::InvalidAliasValue { alias, value });
            }
            i += 1;
        }
        Ok(Self { symbols, aliases })
    }

    /// Map a character to its value in `0..40`.
    pub fn encode_char(&self, c: char) -> Result<u8, Base40Error> {
        if let Some(&(_, value)) = self.aliases.iter().find(|(alias, _)| *alias == c) {
            return Ok(value);
        }
        self.symbols
            .iter()
            .position(|&s| s == c)
            .map(|i| i as u8)
            .ok_or(Base40Error::InvalidCharacter(c))
    }

    /// Map a value in `0..40` to its character.
    pub fn decode_char(&self, value: u8) -> Result<char, Base40Error> {
        self.symbols
            .get(value as usize)
            .copied()
            .ok_or(Base40Error::InvalidCharacterValue(value))
    }

    /// Pack three characters into one word.
    pub fn encode_unit(&self, chars: [char; CHARS_PER_UNIT]) -> Result<u16, Base40Error> {
        let mut word = 0u16;
        for c in chars {
            word = word * RADIX + u16::from(self.encode_char(c)?);
        }
        Ok(word)
    }

    /// Unpack one word into three characters.
    ///
    /// Words above [`MAX_WORD`] wrap in the leading digit (`word / 1600 % 40`),
    /// so they decode but do not re-encode to the same word.
    pub fn decode_word(&self, word: u16) -> Result<[char; CHARS_PER_UNIT], Base40Error> {
        let d1 = (word / (RADIX * RADIX) % RADIX) as u8;
        let d2 = (word / RADIX % RADIX) as u8;
        let d3 = (word % RADIX) as u8;
        Ok([
            self.decode_char(d1)?,
            self.decode_char(d2)?,
            self.decode_char(d3)?,
        ])
    }

    /// Encode text whose character count is a multiple of 3.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, Base40Error> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() % CHARS_PER_UNIT != 0 {
            return Err(Base40Error::InvalidInputLength {
                len: chars.len(),
                unit: CHARS_PER_UNIT,
            });
        }
        let mut out = Vec::with_capacity(chars.len() / CHARS_PER_UNIT * BYTES_PER_UNIT);
        for unit in chars.chunks_exact(CHARS_PER_UNIT) {
            let word = self.encode_unit([unit[0], unit[1], unit[2]])?;
            out.extend_from_slice(&word.to_le_bytes());
        }
        Ok(out)
    }

    /// Decode an even number of bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, Base40Error> {
        let mut out = String::with_capacity(bytes.len() / BYTES_PER_UNIT * CHARS_PER_UNIT);
        self.decode_into(bytes, &mut out)?;
        Ok(out)
    }

    /// Decode an even number of bytes, appending to `out`.
    ///
    /// On error `out` is left unchanged.
    pub fn decode_into(&self, bytes: &[u8], out: &mut String) -> Result<(), Base40Error> {
        if bytes.len() % BYTES_PER_UNIT != 0 {
            return Err(Base40Error::InvalidInputLength {
                len: bytes.len(),
                unit: BYTES_PER_UNIT,
            });
        }
        let start = out.len();
        for pair in bytes.chunks_exact(BYTES_PER_UNIT) {
            match self.decode_word(u16::from_le_bytes([pair[0], pair[1]])) {
                Ok(chars) => out.extend(chars),
                Err(e) => {
                    out.truncate(start);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Standard-alphabet shorthands
// ---------------------------------------------------------------------------

/// Encode `text` with the standard alphabet.
pub fn encode(text: &str) -> Result<Vec<u8>, Base40Error> {
    Alphabet::STANDARD.encode(text)
}

/// Decode `bytes` with the standard alphabet.
pub fn decode(bytes: &[u8]) -> Result<String, Base40Error> {
    Alphabet::STANDARD.decode(bytes)
}

/// Standard-alphabet value of `c`.
pub fn encode_char(c: char) -> Result<u8, Base40Error> {
    Alphabet::STANDARD.encode_char(c)
}

/// Standard-alphabet character for `value`.
pub fn decode_char(value: u8) -> Result<char, Base40Error> {
    Alphabet::STANDARD.decode_char(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CROCODILE_ENCODED: [u8; 10] = [0x9F, 0x15, 0x1C, 0x15, 0x25, 0x3A, 0, 0, 0, 0];
    const CROCODILE_DECODED: &str = "CROCODILE      ";

    const SINGLE_A: &[(&str, [u8; 2])] = &[
        ("A  ", [0x40, 0x06]),
        (" A ", [0x28, 0x00]),
        ("  A", [0x01, 0x00]),
    ];

    #[test]
    fn encode_crocodile() {
        assert_eq!(encode(CROCODILE_DECODED).unwrap(), CROCODILE_ENCODED);
    }

    #[test]
    fn decode_crocodile() {
        assert_eq!(decode(&CROCODILE_ENCODED).unwrap(), CROCODILE_DECODED);
    }

    #[test]
    fn single_letter_positions() {
        for (text, bytes) in SINGLE_A {
            assert_eq!(encode(text).unwrap(), bytes, "encode {text:?}");
            assert_eq!(decode(bytes).unwrap(), *text, "decode {bytes:02X?}");
        }
    }

    #[test]
    fn river_valley() {
        let bytes = [0xFE, 0x71, 0x10, 0x22, 0xB4, 0x89, 0xE1, 0x4B];
        assert_eq!(decode(&bytes).unwrap(), "RIVER VALLEY");
        assert_eq!(encode("RIVER VALLEY").unwrap(), bytes);
    }

    #[test]
    fn encode_chars() {
        let cases = [
            (' ', 0),
            ('A', 1),
            ('B', 2),
            ('C', 3),
            ('Z', 26),
            ('1', 27),
            ('5', 31),
            ('9', 35),
            ('.', 36),
            (',', 37),
            ('-', 38),
            ('\'', 39),
        ];
        for (c, v) in cases {
            assert_eq!(encode_char(c).unwrap(), v, "encode_char({c:?})");
            assert_eq!(decode_char(v).unwrap(), c, "decode_char({v})");
        }
    }

    #[test]
    fn space_synonyms() {
        assert_eq!(encode_char('\0').unwrap(), 0);
        assert_eq!(encode_char('\u{B7}').unwrap(), 0);
        assert_eq!(encode("\0\u{B7} ").unwrap(), [0, 0]);
    }

    #[test]
    fn zero_aliases_letter_o() {
        assert_eq!(encode_char('0').unwrap(), encode_char('O').unwrap());
        let packed = encode("100").unwrap();
        assert_eq!(decode(&packed).unwrap(), "1OO");
    }

    #[test]
    fn encode_rejects_bad_length() {
        assert_eq!(
            encode("AB"),
            Err(Base40Error::InvalidInputLength { len: 2, unit: 3 })
        );
        // Length counts characters, not UTF-8 bytes.
        assert!(encode("\u{B7}AB").is_ok());
    }

    #[test]
    fn encode_rejects_bad_character() {
        assert_eq!(encode("AB!"), Err(Base40Error::InvalidCharacter('!')));
        assert_eq!(encode("abc"), Err(Base40Error::InvalidCharacter('a')));
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(
            decode(&[0x01, 0x00, 0x02]),
            Err(Base40Error::InvalidInputLength { len: 3, unit: 2 })
        );
    }

    #[test]
    fn decode_char_out_of_range() {
        assert_eq!(decode_char(40), Err(Base40Error::InvalidCharacterValue(40)));
    }

    #[test]
    fn max_word_is_all_apostrophes() {
        assert_eq!(encode("'''").unwrap(), MAX_WORD.to_le_bytes());
        assert_eq!(MAX_WORD, 63999);
    }

    #[test]
    fn words_above_max_wrap_leading_digit() {
        // 64000 = 40 * 1600; the leading digit wraps to 0.
        let bytes = 64000u16.to_le_bytes();
        assert_eq!(decode(&bytes).unwrap(), "   ");
        assert_eq!(decode(&u16::MAX.to_le_bytes()).unwrap(), " -O");
    }

    #[test]
    fn decode_into_appends() {
        let mut out = String::from(">");
        Alphabet::STANDARD
            .decode_into(&[0x01, 0x00], &mut out)
            .unwrap();
        assert_eq!(out, ">  A");
        assert!(Alphabet::STANDARD.decode_into(&[0x01], &mut out).is_err());
        assert_eq!(out, ">  A");
    }

    #[test]
    fn custom_alphabet() {
        let mut symbols = Alphabet::STANDARD.symbols;
        symbols[0] = '_';
        let alphabet = Alphabet::new(symbols, &[]).unwrap();
        assert_eq!(alphabet.decode(&[0x01, 0x00]).unwrap(), "__A");
        assert_eq!(alphabet.encode_char(' '), Err(Base40Error::InvalidCharacter(' ')));
        assert_eq!(alphabet.encode("__A").unwrap(), [0x01, 0x00]);
    }

    #[test]
    fn alias_values_must_be_in_range() {
        let symbols = Alphabet::STANDARD.symbols;
        assert_eq!(
            Alphabet::new(symbols, &[('a', 1), ('!', 40)]),
            Err(Base40Error::InvalidAliasValue {
                alias: '!',
                value: 40
            })
        );
        assert!(Alphabet::new(symbols, &[('~', 39)]).is_ok());

        let lower = Alphabet::new(symbols, &[('a', 1), ('z', 26)]).unwrap();
        assert_eq!(lower.encode("za ").unwrap(), encode("ZA ").unwrap());
    }
}
