// Command-line interface for blockdiff.
//
// Subcommands cover the block diff, a single-file dump in the same layout,
// and one-shot base-40 / screen-code conversions.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::codec::{base40, screencode};
use crate::diff::options::{DEFAULT_LINE_LENGTH, DEFAULT_OFFSET_WIDTH, MAX_OFFSET_WIDTH};
use crate::diff::{DiffOptions, Overlays};
use crate::io::{diff_files, dump_file, hex_digest};

// ---------------------------------------------------------------------------
// Argument value parsing
// ---------------------------------------------------------------------------

/// Parse a hex offset, with or without a `0x` prefix.
fn parse_hex_offset(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err("empty offset".into());
    }
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex offset '{s}': {e}"))
}

/// Join hex arguments into bytes. Whitespace is ignored and an odd digit
/// count is padded with a leading zero.
fn parse_hex_bytes(parts: &[String]) -> Result<Vec<u8>, String> {
    let mut digits: String = parts
        .iter()
        .flat_map(|p| p.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    if !digits.is_ascii() {
        return Err(format!("invalid hex string '{digits}'"));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| format!("invalid hex byte '{}': {e}", &digits[i..i + 2]))
        })
        .collect()
}

fn format_hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X} ")).collect()
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Block-by-block binary diff with text overlays.
#[derive(Parser, Debug)]
#[command(
    name = "blockdiff",
    version,
    about = "Block-by-block binary diff with text overlays",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compare two files block by block.
    Diff(DiffArgs),
    /// Dump a byte range of one file in diff layout.
    Dump(DumpArgs),
    /// Packed base-40 text conversion.
    Base40 {
        #[command(subcommand)]
        action: CodecAction,
    },
    /// Screen-code text conversion.
    Screencode {
        #[command(subcommand)]
        action: CodecAction,
    },
    /// Print build/configuration details.
    Config,
}

#[derive(Subcommand, Debug)]
enum CodecAction {
    /// Encode text, printing hex bytes.
    Encode {
        /// Text to encode.
        text: String,
    },
    /// Decode hex bytes, printing text.
    Decode {
        /// Hex bytes; arguments are joined and spaces ignored.
        #[arg(required = true, num_args = 1..)]
        hex: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct OverlayArgs {
    /// Append a printable-ASCII overlay.
    #[arg(short = 'a', long)]
    ascii: bool,

    /// Append a screen-code text overlay.
    #[arg(short = 'c', long)]
    c64text: bool,

    /// Append a packed base-40 overlay.
    #[arg(short = 'b', long)]
    base40: bool,

    /// Append a packed base-40 overlay shifted by one byte.
    #[arg(short = 'o', long = "base40-odd")]
    base40_odd: bool,
}

#[derive(Args, Debug, Clone, Copy)]
struct LayoutArgs {
    /// Bytes per line.
    #[arg(long = "line-length", value_parser = clap::value_parser!(u64).range(1..=4096u64), default_value_t = DEFAULT_LINE_LENGTH as u64)]
    line_length: u64,

    /// Hex digits in the offset column.
    #[arg(long = "offset-width", value_parser = clap::value_parser!(u64).range(1..=MAX_OFFSET_WIDTH as u64), default_value_t = DEFAULT_OFFSET_WIDTH as u64)]
    offset_width: u64,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Left input file.
    #[arg(value_hint = ValueHint::FilePath)]
    left: PathBuf,

    /// Right input file.
    #[arg(value_hint = ValueHint::FilePath)]
    right: PathBuf,

    /// Output file (default: stdout; `-` also selects stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    #[command(flatten)]
    overlays: OverlayArgs,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// First offset to dump, in hex.
    #[arg(value_parser = parse_hex_offset)]
    begin: Option<u64>,

    /// Last offset to dump (inclusive), in hex.
    #[arg(value_parser = parse_hex_offset)]
    end: Option<u64>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    #[command(flatten)]
    overlays: OverlayArgs,

    #[command(flatten)]
    layout: LayoutArgs,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

struct GlobalOptions {
    force: bool,
    quiet: bool,
    json_output: bool,
}

fn resolve_overlays(args: OverlayArgs) -> Overlays {
    let mut overlays = Overlays::empty();
    overlays.set(Overlays::ASCII, args.ascii);
    overlays.set(Overlays::C64TEXT, args.c64text);
    overlays.set(Overlays::BASE40, args.base40);
    overlays.set(Overlays::BASE40_ODD, args.base40_odd);
    overlays
}

fn resolve_diff_options(overlays: OverlayArgs, layout: LayoutArgs) -> DiffOptions {
    DiffOptions {
        line_length: layout.line_length as usize,
        offset_width: layout.offset_width as usize,
        overlays: resolve_overlays(overlays),
    }
}

/// `None` for stdout.
fn resolve_output(output: Option<PathBuf>) -> Option<PathBuf> {
    output.filter(|p| p.as_os_str() != "-")
}

fn check_overwrite(path: Option<&Path>, force: bool) -> Result<(), String> {
    match path {
        Some(path) if path.exists() && !force => Err(format!(
            "output file exists, use -f to overwrite: {}",
            path.display()
        )),
        _ => Ok(()),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("blockdiff".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        match cli.command {
            Cmd::Diff(args) => {
                let _ = resolve_diff_options(args.overlays, args.layout).validate();
            }
            Cmd::Dump(args) => {
                let _ = resolve_diff_options(args.overlays, args.layout).validate();
            }
            Cmd::Base40 { action } | Cmd::Screencode { action } => {
                if let CodecAction::Decode { hex } = action {
                    let _ = parse_hex_bytes(&hex);
                }
            }
            Cmd::Config => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("blockdiff version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;

    eprintln!("FILE_IO={file_io}");
    eprintln!("DEFAULT_LINE_LENGTH={DEFAULT_LINE_LENGTH}");
    eprintln!("DEFAULT_OFFSET_WIDTH={DEFAULT_OFFSET_WIDTH}");
    eprintln!("MAX_OFFSET_WIDTH={MAX_OFFSET_WIDTH}");
    eprintln!("BASE40_MAX_WORD={}", base40::MAX_WORD);

    0
}

// ---------------------------------------------------------------------------
// Diff command
// ---------------------------------------------------------------------------

fn cmd_diff(global: &GlobalOptions, args: DiffArgs) -> i32 {
    let opts = resolve_diff_options(args.overlays, args.layout);
    let output = resolve_output(args.output);
    if let Err(msg) = check_overwrite(output.as_deref(), global.force) {
        eprintln!("blockdiff: {msg}");
        return 1;
    }

    let stats = match diff_files(&args.left, &args.right, output.as_deref(), opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("blockdiff: {e}");
            return 1;
        }
    };

    if !global.quiet {
        log::info!(
            "diff: {} blocks compared, {} differ ({} bytes); left {} bytes, right {} bytes",
            stats.diff.blocks,
            stats.diff.differing_blocks,
            stats.diff.differing_bytes,
            stats.diff.left_len,
            stats.diff.right_len
        );
    }

    if global.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "blocks": stats.diff.blocks,
            "differing_blocks": stats.diff.differing_blocks,
            "differing_bytes": stats.diff.differing_bytes,
            "left_size": stats.diff.left_len,
            "right_size": stats.diff.right_len,
            "left_sha256": stats.left_sha256.map(|d| hex_digest(&d)),
            "right_sha256": stats.right_sha256.map(|d| hex_digest(&d)),
            "line_length": opts.line_length,
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn cmd_dump(global: &GlobalOptions, args: DumpArgs) -> i32 {
    let opts = resolve_diff_options(args.overlays, args.layout);
    let output = resolve_output(args.output);
    if let Err(msg) = check_overwrite(output.as_deref(), global.force) {
        eprintln!("blockdiff: {msg}");
        return 1;
    }

    let to_usize = |v: u64| usize::try_from(v).unwrap_or(usize::MAX);
    let begin = args.begin.map_or(0, to_usize);
    let end = args.end.map(to_usize);

    match dump_file(&args.input, begin, end, output.as_deref(), &opts) {
        Ok(lines) => {
            if global.json_output {
                let json = serde_json::json!({
                    "command": "dump",
                    "lines": lines,
                    "begin": begin,
                    "end": end,
                });
                eprintln!("{json:#}");
            }
            0
        }
        Err(e) => {
            eprintln!("blockdiff: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Codec commands
// ---------------------------------------------------------------------------

fn cmd_base40(action: CodecAction) -> i32 {
    match action {
        CodecAction::Encode { text } => match base40::encode(&text) {
            Ok(bytes) => {
                println!("{}", format_hex_bytes(&bytes));
                0
            }
            Err(e) => {
                eprintln!("blockdiff: base40 encode: {e}");
                1
            }
        },
        CodecAction::Decode { hex } => {
            let bytes = match parse_hex_bytes(&hex) {
                Ok(b) => b,
                Err(msg) => {
                    eprintln!("blockdiff: {msg}");
                    return 1;
                }
            };
            match base40::decode(&bytes) {
                Ok(text) => {
                    println!("{text}");
                    0
                }
                Err(e) => {
                    eprintln!("blockdiff: base40 decode: {e}");
                    1
                }
            }
        }
    }
}

fn cmd_screencode(action: CodecAction) -> i32 {
    match action {
        CodecAction::Encode { text } => match screencode::encode(&text) {
            Ok(bytes) => {
                println!("{}", format_hex_bytes(&bytes));
                0
            }
            Err(e) => {
                eprintln!("blockdiff: screencode encode: {e}");
                1
            }
        },
        CodecAction::Decode { hex } => match parse_hex_bytes(&hex) {
            Ok(bytes) => {
                println!("{}", screencode::decode(&bytes));
                0
            }
            Err(msg) => {
                eprintln!("blockdiff: {msg}");
                1
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn default_log_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn run() -> ! {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.quiet, cli.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let global = GlobalOptions {
        force: cli.force,
        quiet: cli.quiet,
        json_output: cli.json_output,
    };

    let exit_code = match cli.command {
        Cmd::Diff(args) => cmd_diff(&global, args),
        Cmd::Dump(args) => cmd_dump(&global, args),
        Cmd::Base40 { action } => cmd_base40(action),
        Cmd::Screencode { action } => cmd_screencode(action),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv: Vec<String> = std::iter::once("blockdiff".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).expect("cli parse failed")
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_hex_offset_forms() {
        assert_eq!(parse_hex_offset("60").unwrap(), 0x60);
        assert_eq!(parse_hex_offset("0x1F").unwrap(), 0x1F);
        assert_eq!(parse_hex_offset("FFFFFF").unwrap(), 0xFF_FFFF);
        assert!(parse_hex_offset("").is_err());
        assert!(parse_hex_offset("0x").is_err());
        assert!(parse_hex_offset("xyz").is_err());
    }

    #[test]
    fn parse_hex_bytes_joins_and_pads() {
        assert_eq!(
            parse_hex_bytes(&strings(&["9F 15", "1C15"])).unwrap(),
            [0x9F, 0x15, 0x1C, 0x15]
        );
        assert_eq!(parse_hex_bytes(&strings(&["123"])).unwrap(), [0x01, 0x23]);
        assert!(parse_hex_bytes(&strings(&["GG"])).is_err());
        assert!(parse_hex_bytes(&strings(&["\u{e9}1"])).is_err());
    }

    #[test]
    fn format_hex_bytes_trailing_space() {
        assert_eq!(format_hex_bytes(&[0x40, 0x06]), "40 06 ");
    }

    #[test]
    fn diff_defaults() {
        let cli = parse(&["diff", "a.bin", "b.bin"]);
        let Cmd::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.output, None);
        let opts = resolve_diff_options(args.overlays, args.layout);
        assert_eq!(opts, DiffOptions::default());
    }

    #[test]
    fn diff_overlay_flags() {
        let cli = parse(&["diff", "-a", "-c", "-b", "-o", "a.bin", "b.bin", "out.txt"]);
        let Cmd::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.output.as_deref(), Some(Path::new("out.txt")));
        let opts = resolve_diff_options(args.overlays, args.layout);
        assert_eq!(opts.overlays, Overlays::all());
    }

    #[test]
    fn diff_layout_flags() {
        let cli = parse(&[
            "diff",
            "--line-length",
            "16",
            "--offset-width",
            "8",
            "a.bin",
            "b.bin",
        ]);
        let Cmd::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        let opts = resolve_diff_options(args.overlays, args.layout);
        assert_eq!(opts.line_length, 16);
        assert_eq!(opts.offset_width, 8);
    }

    #[test]
    fn layout_bounds_rejected() {
        for args in [
            &["diff", "--line-length", "0", "a", "b"][..],
            &["diff", "--offset-width", "17", "a", "b"][..],
        ] {
            let argv = std::iter::once("blockdiff").chain(args.iter().copied());
            assert!(Cli::try_parse_from(argv).is_err(), "{args:?}");
        }
    }

    #[test]
    fn layout_bounds_inclusive() {
        let cli = parse(&[
            "diff",
            "--line-length",
            "4096",
            "--offset-width",
            "16",
            "a",
            "b",
        ]);
        let Cmd::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        let opts = resolve_diff_options(args.overlays, args.layout);
        assert_eq!(opts.line_length, 4096);
        assert_eq!(opts.offset_width, MAX_OFFSET_WIDTH);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn dash_output_means_stdout() {
        assert_eq!(resolve_output(Some(PathBuf::from("-"))), None);
        assert_eq!(
            resolve_output(Some(PathBuf::from("x.txt"))),
            Some(PathBuf::from("x.txt"))
        );
    }

    #[test]
    fn dump_offsets() {
        let cli = parse(&["dump", "disk.d64", "0x100", "1FF", "-a"]);
        let Cmd::Dump(args) = cli.command else {
            panic!("expected dump");
        };
        assert_eq!(args.begin, Some(0x100));
        assert_eq!(args.end, Some(0x1FF));
        assert!(args.overlays.ascii);
    }

    #[test]
    fn codec_subcommands() {
        let cli = parse(&["base40", "encode", "CROCODILE"]);
        assert!(matches!(
            cli.command,
            Cmd::Base40 {
                action: CodecAction::Encode { .. }
            }
        ));
        let cli = parse(&["screencode", "decode", "08", "09"]);
        let Cmd::Screencode {
            action: CodecAction::Decode { hex },
        } = cli.command
        else {
            panic!("expected screencode decode");
        };
        assert_eq!(hex, ["08", "09"]);
    }

    #[test]
    fn global_flags() {
        let cli = parse(&["-f", "-vv", "--json", "diff", "a", "b"]);
        assert!(cli.force);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_output);
        assert!(Cli::try_parse_from(["blockdiff", "-q", "-v", "config"]).is_err());
    }

    #[test]
    fn log_filter_levels() {
        assert_eq!(default_log_filter(true, 0), "error");
        assert_eq!(default_log_filter(false, 0), "warn");
        assert_eq!(default_log_filter(false, 1), "info");
        assert_eq!(default_log_filter(false, 5), "debug");
    }

    #[test]
    fn check_overwrite_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("exists.txt");
        std::fs::write(&existing, b"").unwrap();
        assert!(check_overwrite(Some(&existing), false).is_err());
        assert!(check_overwrite(Some(&existing), true).is_ok());
        assert!(check_overwrite(Some(&dir.path().join("new.txt")), false).is_ok());
        assert!(check_overwrite(None, false).is_ok());
    }

    #[test]
    fn fuzz_hook_never_panics() {
        fuzz_try_parse_args(&strings(&["base40", "decode", "zz"]));
        fuzz_try_parse_args(&strings(&["diff", "--line-length"]));
        fuzz_try_parse_args(&strings(&[]));
    }
}
