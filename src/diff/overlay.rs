// Text overlays rendered after the hex columns of a diff line.
//
// Each overlay turns the valid bytes of one window into text. The renderer
// walks a list of `Overlay` trait objects built from the `Overlays` flags;
// adding an overlay means adding an implementation, not a branch.

use crate::codec::base40::{self, Alphabet};
use crate::codec::screencode;

use super::options::Overlays;

/// Substituted for a packed-text unit that cannot be decoded.
pub const ERROR_MARKER: &str = "<E>";

/// Substituted for a byte with no printable ASCII form.
pub const NON_PRINTABLE: char = '~';

// ---------------------------------------------------------------------------
// Overlay trait
// ---------------------------------------------------------------------------

/// A textual rendering of one window's bytes.
///
/// Implementations must not keep references to `window`; the engine
/// overwrites the buffer on the next read.
pub trait Overlay: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Append the rendering of `window` (valid bytes only) to `out`.
    fn render(&self, window: &[u8], out: &mut String);
}

/// Build the overlay list for `selection`, in display order.
pub fn overlays_for(selection: Overlays) -> Vec<Box<dyn Overlay>> {
    let mut list: Vec<Box<dyn Overlay>> = Vec::new();
    if selection.contains(Overlays::C64TEXT) {
        list.push(Box::new(ScreenCodeOverlay));
    }
    if selection.contains(Overlays::BASE40) {
        list.push(Box::new(Base40Overlay::default()));
    }
    if selection.contains(Overlays::BASE40_ODD) {
        list.push(Box::new(Base40OddOverlay::default()));
    }
    if selection.contains(Overlays::ASCII) {
        list.push(Box::new(AsciiOverlay));
    }
    list
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// Screen codes as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenCodeOverlay;

impl Overlay for ScreenCodeOverlay {
    fn name(&self) -> &'static str {
        "c64text"
    }

    fn render(&self, window: &[u8], out: &mut String) {
        screencode::decode_into(window, out);
    }
}

/// Packed base-40 text starting at the first byte of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base40Overlay {
    pub alphabet: Alphabet,
}

impl Overlay for Base40Overlay {
    fn name(&self) -> &'static str {
        "base40"
    }

    fn render(&self, window: &[u8], out: &mut String) {
        render_base40(&self.alphabet, window, out);
    }
}

/// Packed base-40 text starting one byte into the window, for strings
/// stored at odd offsets. The first and last bytes are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base40OddOverlay {
    pub alphabet: Alphabet,
}

impl Overlay for Base40OddOverlay {
    fn name(&self) -> &'static str {
        "base40-odd"
    }

    fn render(&self, window: &[u8], out: &mut String) {
        if window.len() < 2 {
            return;
        }
        render_base40(&self.alphabet, &window[1..window.len() - 1], out);
    }
}

/// Printable ASCII with bit 7 stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiOverlay;

impl Overlay for AsciiOverlay {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn render(&self, window: &[u8], out: &mut String) {
        out.extend(window.iter().map(|&b| ascii_char(b)));
    }
}

/// ASCII rendering of one byte, ignoring the high bit.
#[inline]
pub fn ascii_char(b: u8) -> char {
    let c = b & 0x7F;
    if (0x20..0x7F).contains(&c) {
        char::from(c)
    } else {
        NON_PRINTABLE
    }
}

/// Decode 2-byte units independently. A unit that fails to decode (in
/// practice only a trailing odd byte) renders as [`ERROR_MARKER`].
fn render_base40(alphabet: &Alphabet, bytes: &[u8], out: &mut String) {
    for unit in bytes.chunks(base40::BYTES_PER_UNIT) {
        if let Err(e) = alphabet.decode_into(unit, out) {
            log::trace!("base40 overlay: {e}");
            out.push_str(ERROR_MARKER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(overlay: &dyn Overlay, window: &[u8]) -> String {
        let mut out = String::new();
        overlay.render(window, &mut out);
        out
    }

    #[test]
    fn ascii_strips_high_bit() {
        assert_eq!(render(&AsciiOverlay, b"Hi!\x00\x7F"), "Hi!~~");
        assert_eq!(render(&AsciiOverlay, &[0xC8, 0xC9, 0xA0]), "HI ");
    }

    #[test]
    fn screencode_overlay() {
        assert_eq!(render(&ScreenCodeOverlay, &[0x08, 0x09, 0x20, 0x80]), "HI ~");
    }

    #[test]
    fn base40_even() {
        let bytes = [0x9F, 0x15, 0x1C, 0x15];
        assert_eq!(render(&Base40Overlay::default(), &bytes), "CROCOD");
    }

    #[test]
    fn base40_trailing_odd_byte_gets_marker() {
        let bytes = [0x9F, 0x15, 0x1C];
        assert_eq!(render(&Base40Overlay::default(), &bytes), "CRO<E>");
    }

    #[test]
    fn base40_odd_skips_first_and_last() {
        let bytes = [0xFF, 0x9F, 0x15, 0xFF];
        assert_eq!(render(&Base40OddOverlay::default(), &bytes), "CRO");
        assert_eq!(render(&Base40OddOverlay::default(), &[0x01]), "");
        assert_eq!(render(&Base40OddOverlay::default(), &[0x01, 0x02]), "");
        assert_eq!(render(&Base40OddOverlay::default(), &[0x00, 0x01, 0x00]), "<E>");
    }

    #[test]
    fn overlay_order_is_fixed() {
        let names: Vec<_> = overlays_for(Overlays::all())
            .iter()
            .map(|o| o.name())
            .collect();
        assert_eq!(names, ["c64text", "base40", "base40-odd", "ascii"]);
        assert!(overlays_for(Overlays::empty()).is_empty());
    }
}
