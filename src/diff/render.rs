// Diff line rendering.
//
// Line layout for an 8-byte window at offset 0x40 with positions 2-3
// differing and the ASCII overlay enabled:
//
//   000040:   41 42(43 44)45 46 47 48   ABCDEFGH
//
// An extra space precedes every 8th position and another every 16th.
// A difference run opens with '(' in place of the separator before its first
// byte and closes with ')' in place of the separator after its last byte.
// Grouping spaces are emitted after a ')' and before a '('. One trailing
// column holds either the ')' of a run reaching the last position or a space,
// so every line of a run has the same width.

use std::fmt::Write as _;

use super::options::DiffOptions;
use super::overlay::{Overlay, overlays_for};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Rendered for positions past the end of a short window.
pub const MISSING_BYTE: &str = "--";

/// Renders one window per line.
pub struct LineRenderer {
    capacity: usize,
    offset_width: usize,
    overlays: Vec<Box<dyn Overlay>>,
}

impl LineRenderer {
    /// Build a renderer for `opts`. The options are assumed validated.
    pub fn new(opts: &DiffOptions) -> Self {
        Self {
            capacity: opts.line_length,
            offset_width: opts.offset_width,
            overlays: overlays_for(opts.overlays),
        }
    }

    /// Build a renderer with an explicit overlay list.
    pub fn with_overlays(opts: &DiffOptions, overlays: Vec<Box<dyn Overlay>>) -> Self {
        Self {
            capacity: opts.line_length,
            offset_width: opts.offset_width,
            overlays,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Render one diff line (no trailing newline).
    ///
    /// `window` holds the valid bytes (at most `capacity`); `mask` has
    /// exactly `capacity` entries.
    pub fn render_line(&self, offset: u64, window: &[u8], mask: &[bool]) -> String {
        let mut out = String::new();
        self.render_into(offset, window, mask, &mut out);
        out
    }

    /// Append one diff line (no trailing newline) to `out`.
    pub fn render_into(&self, offset: u64, window: &[u8], mask: &[bool], out: &mut String) {
        debug_assert!(window.len() <= self.capacity);
        self.render_cells(
            offset,
            |i| window.get(i).copied(),
            MISSING_BYTE,
            mask,
            window,
            out,
        );
    }

    /// Shared column layout. `cell(i)` yields the byte at position `i`, or
    /// `None` to print `placeholder`; overlays render `overlay_bytes`.
    pub(crate) fn render_cells<F>(
        &self,
        offset: u64,
        cell: F,
        placeholder: &str,
        mask: &[bool],
        overlay_bytes: &[u8],
        out: &mut String,
    ) where
        F: Fn(usize) -> Option<u8>,
    {
        debug_assert_eq!(mask.len(), self.capacity);
        let _ = write!(out, "{offset:0width$X}:", width = self.offset_width);

        for i in 0..self.capacity {
            let prev = i > 0 && mask[i - 1];
            let open = mask[i] && !prev;
            let close = !mask[i] && prev;

            if close {
                out.push(')');
            }
            if i % 8 == 0 {
                out.push(' ');
            }
            if i % 16 == 0 {
                out.push(' ');
            }
            if open {
                out.push('(');
            } else if !close {
                out.push(' ');
            }

            match cell(i) {
                Some(b) => {
                    out.push(HEX_DIGITS[usize::from(b >> 4)] as char);
                    out.push(HEX_DIGITS[usize::from(b & 0x0F)] as char);
                }
                None => out.push_str(placeholder),
            }
        }

        out.push(if mask.last().copied().unwrap_or(false) {
            ')'
        } else {
            ' '
        });

        for overlay in &self.overlays {
            out.push_str("  ");
            overlay.render(overlay_bytes, out);
        }
    }
}

impl std::fmt::Debug for LineRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRenderer")
            .field("capacity", &self.capacity)
            .field("offset_width", &self.offset_width)
            .field(
                "overlays",
                &self.overlays.iter().map(|o| o.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
