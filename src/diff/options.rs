// Diff configuration: block size, offset column width, enabled overlays.

use bitflags::bitflags;

/// Default bytes per block (one rendered line).
pub const DEFAULT_LINE_LENGTH: usize = 32;

/// Default width of the hex offset column.
pub const DEFAULT_OFFSET_WIDTH: usize = 6;

/// Widest offset column accepted (enough for any `u64`).
pub const MAX_OFFSET_WIDTH: usize = 16;

bitflags! {
    /// Text overlays appended after the hex columns, rendered in this order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Overlays: u8 {
        /// Screen-code text.
        const C64TEXT = 1 << 0;
        /// Packed base-40 text from even offsets.
        const BASE40 = 1 << 1;
        /// Packed base-40 text shifted by one byte.
        const BASE40_ODD = 1 << 2;
        /// Printable ASCII, bit 7 ignored.
        const ASCII = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("line length must be at least 1, got {0}")]
    LineLength(usize),
    #[error("offset width must be between 1 and {max}, got {0}", max = MAX_OFFSET_WIDTH)]
    OffsetWidth(usize),
}

/// Configuration fixed at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Bytes compared and rendered per line.
    pub line_length: usize,
    /// Hex digits in the offset column.
    pub offset_width: usize,
    /// Enabled overlays.
    pub overlays: Overlays,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            line_length: DEFAULT_LINE_LENGTH,
            offset_width: DEFAULT_OFFSET_WIDTH,
            overlays: Overlays::empty(),
        }
    }
}

impl DiffOptions {
    pub fn with_overlays(mut self, overlays: Overlays) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.line_length == 0 {
            return Err(OptionsError::LineLength(self.line_length));
        }
        if self.offset_width == 0 || self.offset_width > MAX_OFFSET_WIDTH {
            return Err(OptionsError::OffsetWidth(self.offset_width));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = DiffOptions::default();
        assert_eq!(opts.line_length, 32);
        assert_eq!(opts.offset_width, 6);
        assert!(opts.overlays.is_empty());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validate_bounds() {
        let zero_line = DiffOptions {
            line_length: 0,
            ..Default::default()
        };
        assert_eq!(zero_line.validate(), Err(OptionsError::LineLength(0)));

        for width in [0, 17] {
            let opts = DiffOptions {
                offset_width: width,
                ..Default::default()
            };
            assert_eq!(opts.validate(), Err(OptionsError::OffsetWidth(width)));
        }

        let odd = DiffOptions {
            line_length: 5,
            offset_width: 16,
            ..Default::default()
        };
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn with_overlays_replaces_selection() {
        let opts = DiffOptions::default().with_overlays(Overlays::ASCII | Overlays::BASE40);
        assert!(opts.overlays.contains(Overlays::ASCII));
        assert!(!opts.overlays.contains(Overlays::C64TEXT));
    }
}
