// File-level helpers for diffing and dumping.
//
// Provides `diff_files()` and `dump_file()`, which wrap the engine and the
// dumper with buffered I/O. Optionally computes streaming SHA-256 digests of
// both diff inputs (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::diff::{DiffEngine, DiffError, DiffOptions, DiffStats};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_files()`.
#[derive(Debug, Clone)]
pub struct DiffFileStats {
    /// Engine counters.
    pub diff: DiffStats,
    /// SHA-256 of the left input (if `file-io` feature is enabled).
    pub left_sha256: Option<[u8; 32]>,
    /// SHA-256 of the right input (if `file-io` feature is enabled).
    pub right_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Opening or creating a file failed.
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Read or write failure after the files were opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Engine failure.
    #[error(transparent)]
    Diff(#[from] DiffError),
}

impl IoError {
    fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

fn open_input(path: &Path) -> Result<BufReader<File>, IoError> {
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    Ok(BufReader::with_capacity(BUF_SIZE, file))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, IoError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| IoError::open(path, e))?;
            Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, file)))
        }
        None => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// diff_files
// ---------------------------------------------------------------------------

/// Diff two files block by block, writing the rendered diff to `output`
/// (stdout when `None`).
///
/// Both inputs are streamed through `BufReader`s; memory use is bounded by
/// the buffers regardless of file size. When the `file-io` feature is
/// enabled, SHA-256 digests of both inputs are computed while reading.
pub fn diff_files(
    left_path: &Path,
    right_path: &Path,
    output: Option<&Path>,
    opts: DiffOptions,
) -> Result<DiffFileStats, IoError> {
    let mut engine = DiffEngine::new(opts)?;
    let left = open_input(left_path)?;
    let right = open_input(right_path)?;
    let mut writer = open_output(output)?;

    #[cfg(feature = "file-io")]
    let (diff, left_sha256, right_sha256) = {
        let mut left = HashingReader::new(left);
        let mut right = HashingReader::new(right);
        let diff = engine.run(&mut left, &mut right, &mut writer)?;
        (diff, Some(left.finalize()), Some(right.finalize()))
    };

    #[cfg(not(feature = "file-io"))]
    let (diff, left_sha256, right_sha256) =
        (engine.run(left, right, &mut writer)?, None, None);

    writer.flush()?;

    Ok(DiffFileStats {
        diff,
        left_sha256,
        right_sha256,
    })
}

// ---------------------------------------------------------------------------
// dump_file
// ---------------------------------------------------------------------------

/// Dump the inclusive byte range `begin..=end` of a file to `output`
/// (stdout when `None`). Returns the number of lines written.
///
/// The file is read fully into memory.
pub fn dump_file(
    path: &Path,
    begin: usize,
    end: Option<usize>,
    output: Option<&Path>,
    opts: &DiffOptions,
) -> Result<u64, IoError> {
    let mut content = Vec::new();
    open_input(path)?.read_to_end(&mut content)?;
    let mut writer = open_output(output)?;
    let lines = crate::dump::dump(&content, begin, end, opts, &mut writer)?;
    writer.flush()?;
    Ok(lines)
}

// ---------------------------------------------------------------------------
// Hashing reader (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingReader<R: Read> {
    inner: R,
    hasher: sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: sha2::Sha256::new(),
        }
    }

    fn finalize(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }
}

#[cfg(feature = "file-io")]
impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Lowercase hex rendering of a digest.
pub fn hex_digest(digest: &[u8]) -> String {
    use std::fmt::Write as _;
    digest.iter().fold(String::with_capacity(digest.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
