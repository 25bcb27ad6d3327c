// Single-file block dump.
//
// Renders an inclusive byte range of one buffer with the same column layout
// and overlays as a diff line, minus the brackets. Lines are aligned to
// multiples of the line length; positions outside the range are blank.

use std::io::Write;

use crate::diff::{DiffError, DiffOptions, LineRenderer};

/// Rendered for positions outside the dumped range.
const BLANK_BYTE: &str = "  ";

/// Dump `content[begin..=end]` (`end` defaults to the last byte and is
/// clamped to it). Returns the number of lines written.
pub fn dump<W: Write>(
    content: &[u8],
    begin: usize,
    end: Option<usize>,
    opts: &DiffOptions,
    mut out: W,
) -> Result<u64, DiffError> {
    opts.validate()?;
    let Some(last_byte) = content.len().checked_sub(1) else {
        return Ok(0);
    };
    let last = end.map_or(last_byte, |e| e.min(last_byte));
    if begin > last {
        return Ok(0);
    }

    let cap = opts.line_length;
    let renderer = LineRenderer::new(opts);
    let mask = vec![false; cap];
    let mut line = String::new();
    let mut lines = 0u64;
    let mut base = begin - begin % cap;

    while base <= last {
        let lo = begin.max(base);
        let hi = last.min(base + cap - 1);
        line.clear();
        renderer.render_cells(
            base as u64,
            |i| {
                let pos = base + i;
                (lo..=hi).contains(&pos).then(|| content[pos])
            },
            BLANK_BYTE,
            &mask,
            &content[lo..=hi],
            &mut line,
        );
        line.push('\n');
        out.write_all(line.as_bytes())?;
        lines += 1;
        base += cap;
    }

    log::debug!("dumped {lines} lines ({begin:#X}..={last:#X})");
    Ok(lines)
}
