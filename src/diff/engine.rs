// Block diff engine.
//
// Reads both inputs in lock-step, one `line_length` block at a time, and
// writes a pair of rendered lines for every block where the inputs differ.
// Differing blocks are preceded by a blank line, or by a connector row of
// dots when the previous block also differed.
//
// The two window buffers, the mask and the line buffer belong to the engine
// and are overwritten on every block. Overlays and renderers see borrowed
// slices only for the duration of one block.

use std::io::{self, Read, Write};

use super::mask::DiffMask;
use super::options::{DiffOptions, OptionsError};
use super::render::LineRenderer;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),
    #[error("renderer capacity {renderer} does not match line length {line_length}")]
    RendererCapacity { renderer: usize, line_length: usize },
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Blocks compared.
    pub blocks: u64,
    /// Blocks with at least one differing position.
    pub differing_blocks: u64,
    /// Differing positions across all blocks, length mismatch included.
    pub differing_bytes: u64,
    /// Bytes read from the left input.
    pub left_len: u64,
    /// Bytes read from the right input.
    pub right_len: u64,
}

impl DiffStats {
    pub fn identical(&self) -> bool {
        self.differing_blocks == 0
    }
}

// ---------------------------------------------------------------------------
// DiffEngine
// ---------------------------------------------------------------------------

/// Positional block diff of two byte streams.
#[derive(Debug)]
pub struct DiffEngine {
    opts: DiffOptions,
    renderer: LineRenderer,
    lft: Vec<u8>,
    rgt: Vec<u8>,
    mask: DiffMask,
    line: String,
    connector: String,
}

impl DiffEngine {
    pub fn new(opts: DiffOptions) -> Result<Self, DiffError> {
        opts.validate()?;
        Self::with_renderer(opts, LineRenderer::new(&opts))
    }

    /// Build an engine around a custom renderer (e.g. extra overlays).
    /// The renderer's capacity must equal `opts.line_length`.
    pub fn with_renderer(opts: DiffOptions, renderer: LineRenderer) -> Result<Self, DiffError> {
        opts.validate()?;
        if renderer.capacity() != opts.line_length {
            return Err(DiffError::RendererCapacity {
                renderer: renderer.capacity(),
                line_length: opts.line_length,
            });
        }
        Ok(Self {
            renderer,
            lft: vec![0; opts.line_length],
            rgt: vec![0; opts.line_length],
            mask: DiffMask::new(opts.line_length),
            line: String::new(),
            connector: ".".repeat(opts.offset_width),
            opts,
        })
    }

    pub fn options(&self) -> &DiffOptions {
        &self.opts
    }

    /// Diff `left` against `right` until both are exhausted, writing the
    /// rendered output to `out`.
    pub fn run<L: Read, R: Read, W: Write>(
        &mut self,
        mut left: L,
        mut right: R,
        mut out: W,
    ) -> Result<DiffStats, DiffError> {
        let capacity = self.opts.line_length as u64;
        let mut stats = DiffStats::default();
        let mut line_offset = 0u64;
        let mut prev_different = false;

        loop {
            let lft_len = read_block(&mut left, &mut self.lft)?;
            let rgt_len = read_block(&mut right, &mut self.rgt)?;
            if lft_len == 0 && rgt_len == 0 {
                break;
            }
            stats.blocks += 1;
            stats.left_len += lft_len as u64;
            stats.right_len += rgt_len as u64;

            let lft = &self.lft[..lft_len];
            let rgt = &self.rgt[..rgt_len];
            let different = self.mask.compute(lft, rgt);

            if different {
                let count = self.mask.count();
                log::debug!(
                    "block {line_offset:#X}: {count} differing positions (left {lft_len}, right {rgt_len})"
                );
                log::trace!(
                    "block {line_offset:#X}: runs {:?}",
                    self.mask.runs().collect::<Vec<_>>()
                );
                stats.differing_blocks += 1;
                stats.differing_bytes += count as u64;

                self.line.clear();
                if prev_different {
                    self.line.push_str(&self.connector);
                }
                self.line.push('\n');
                self.renderer
                    .render_into(line_offset, lft, self.mask.as_slice(), &mut self.line);
                self.line.push('\n');
                self.renderer
                    .render_into(line_offset, rgt, self.mask.as_slice(), &mut self.line);
                self.line.push('\n');
                out.write_all(self.line.as_bytes())?;
            }

            prev_different = different;
            line_offset += capacity;
        }

        log::debug!(
            "diff complete: {} blocks, {} differing, {} differing bytes",
            stats.blocks,
            stats.differing_blocks,
            stats.differing_bytes
        );
        Ok(stats)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes read (0 at end of stream).
///
/// Short reads are retried so block boundaries stay at multiples of the
/// buffer length even for pipes and sockets.
pub fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// ---------------------------------------------------------------------------
// Convenience function
// ---------------------------------------------------------------------------

/// Diff two in-memory buffers and return the rendered text.
pub fn diff_all(left: &[u8], right: &[u8], opts: DiffOptions) -> Result<String, DiffError> {
    let mut engine = DiffEngine::new(opts)?;
    let mut out = Vec::new();
    engine.run(left, right, &mut out)?;
    String::from_utf8(out).map_err(|e| DiffError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
