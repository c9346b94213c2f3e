// Command-line driver for lzss-trace.
//
// Loads a bit sequence from the selected source, decodes it, and prints
// the token trace. Decoding a truncated stream is not a failure: the
// trace ends in `Unexpected EOF` and the exit status is still 0.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::bits::Bits;
use crate::io::{BitSource, HexReader, HexText, InputError, RawReader, Sample};
use crate::lzss::format::{
    END_OF_STREAM_BITS, HISTORY_INDEX_BITS, HISTORY_SIZE, LITERAL_TOKEN_BITS, MATCH_LENGTH_BITS,
    MAX_DISTANCE, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, REFERENCE_TOKEN_BITS,
};
use crate::lzss::{Decoded, Termination, Token, decode};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Diagnostic decoder for ZUN-style LZSS bitstreams.
#[derive(Parser, Debug)]
#[command(
    name = "lzss-trace",
    version,
    about = "Print the token trace of an LZSS bitstream",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress warnings and non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output decode stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a stream and print its token trace.
    Trace(TraceArgs),
    /// Print the expanded bit sequence of the input.
    Bits(BitsArgs),
    /// Print the stream format parameters.
    Format,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Hex text to decode (whitespace is ignored).
    #[arg(long, value_name = "HEX", conflicts_with_all = ["sample", "input", "raw"])]
    hex: Option<String>,

    /// Use the built-in sample stream.
    #[arg(long, conflicts_with_all = ["input", "raw"])]
    sample: bool,

    /// Read the input as raw binary instead of hex text.
    #[arg(long)]
    raw: bool,

    /// Input file (default: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TraceArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print one token per line, prefixed with its starting bit offset.
    #[arg(long)]
    offsets: bool,
}

#[derive(Args, Debug)]
struct BitsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Insert a space every N bits (0 = no grouping).
    #[arg(long, value_name = "N", default_value_t = 0)]
    group: usize,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Trace,
    Bits,
    Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSpec {
    Sample,
    Hex(String),
    HexFile(PathBuf),
    RawFile(PathBuf),
    HexStdin,
    RawStdin,
}

impl InputSpec {
    fn describe(&self) -> String {
        match self {
            InputSpec::Sample => "sample".to_string(),
            InputSpec::Hex(_) => "--hex".to_string(),
            InputSpec::HexFile(path) | InputSpec::RawFile(path) => path.display().to_string(),
            InputSpec::HexStdin | InputSpec::RawStdin => "stdin".to_string(),
        }
    }
}

struct Options {
    command: Command,
    input: InputSpec,
    offsets: bool,
    group: usize,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_input(args: InputArgs) -> InputSpec {
    if let Some(hex) = args.hex {
        return InputSpec::Hex(hex);
    }
    if args.sample {
        return InputSpec::Sample;
    }
    match (args.input, args.raw) {
        (Some(path), true) => InputSpec::RawFile(path),
        (Some(path), false) => InputSpec::HexFile(path),
        (None, true) => InputSpec::RawStdin,
        (None, false) => InputSpec::HexStdin,
    }
}

fn resolve_options(cli: Cli) -> Options {
    let quiet = cli.quiet;
    let verbose = cli.verbose.min(2);
    let json_output = cli.json_output;

    match cli.command {
        Cmd::Trace(args) => Options {
            command: Command::Trace,
            input: resolve_input(args.input),
            offsets: args.offsets,
            group: 0,
            quiet,
            verbose,
            json_output,
        },
        Cmd::Bits(args) => Options {
            command: Command::Bits,
            input: resolve_input(args.input),
            offsets: false,
            group: args.group,
            quiet,
            verbose,
            json_output,
        },
        Cmd::Format => Options {
            command: Command::Format,
            input: InputSpec::Sample,
            offsets: false,
            group: 0,
            quiet,
            verbose,
            json_output,
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("lzss-trace".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Input loading
// ---------------------------------------------------------------------------

fn load_input(spec: &InputSpec) -> Result<Bits, InputError> {
    match spec {
        InputSpec::Sample => Sample.load_bits(),
        InputSpec::Hex(text) => HexText(text).load_bits(),
        InputSpec::HexFile(path) => crate::io::load_hex_file(path),
        InputSpec::RawFile(path) => crate::io::load_raw_file(path),
        InputSpec::HexStdin => HexReader(io::stdin().lock()).load_bits(),
        InputSpec::RawStdin => RawReader(io::stdin().lock()).load_bits(),
    }
}

// ---------------------------------------------------------------------------
// Trace command
// ---------------------------------------------------------------------------

/// Decode `bits` and write the trace to `out`.
fn write_trace<W: Write>(out: &mut W, bits: &Bits, offsets: bool) -> io::Result<Decoded> {
    let decoded = decode(bits);
    if offsets {
        for (start, token) in decoded.with_offsets() {
            writeln!(out, "{start}\t{token}")?;
        }
    } else {
        writeln!(out, "{}", decoded.trace())?;
    }
    Ok(decoded)
}

fn summary_json(input: &InputSpec, decoded: &Decoded) -> serde_json::Value {
    let summary = &decoded.summary;
    let truncated_field = match summary.termination {
        Some(Termination::Truncated(field)) => Some(field.as_str()),
        _ => None,
    };
    serde_json::json!({
        "command": "trace",
        "input": input.describe(),
        "total_bits": summary.total_bits,
        "bits_consumed": summary.bits_consumed,
        "literals": summary.literals,
        "back_references": summary.back_references,
        "termination": summary.termination.map(|t| t.as_str()),
        "truncated_field": truncated_field,
        "last_token": decoded.tokens.last().map(Token::kind),
    })
}

fn cmd_trace(opts: &Options) -> i32 {
    let bits = match load_input(&opts.input) {
        Ok(bits) => bits,
        Err(e) => {
            eprintln!("lzss-trace: {}: {e}", opts.input.describe());
            return 1;
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let decoded = match write_trace(&mut out, &bits, opts.offsets) {
        Ok(decoded) => decoded,
        Err(e) => {
            eprintln!("lzss-trace: write error: {e}");
            return 1;
        }
    };
    if let Err(e) = out.flush() {
        eprintln!("lzss-trace: write flush error: {e}");
        return 1;
    }

    let summary = &decoded.summary;
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "lzss-trace: {} bits, {} consumed, {} literals, {} back-references",
            summary.total_bits, summary.bits_consumed, summary.literals, summary.back_references
        );
    }

    if opts.json_output {
        eprintln!("{:#}", summary_json(&opts.input, &decoded));
    }

    0
}

// ---------------------------------------------------------------------------
// Bits command
// ---------------------------------------------------------------------------

fn group_bits(bits: &Bits, group: usize) -> String {
    if group == 0 {
        return bits.to_bit_string();
    }
    let mut out = String::with_capacity(bits.len() + bits.len() / group);
    for (i, bit) in bits.iter().enumerate() {
        if i > 0 && i % group == 0 {
            out.push(' ');
        }
        out.push(if bit { '1' } else { '0' });
    }
    out
}

fn cmd_bits(opts: &Options) -> i32 {
    let bits = match load_input(&opts.input) {
        Ok(bits) => bits,
        Err(e) => {
            eprintln!("lzss-trace: {}: {e}", opts.input.describe());
            return 1;
        }
    };

    println!("{}", group_bits(&bits, opts.group));

    if opts.json_output {
        let json = serde_json::json!({
            "command": "bits",
            "input": opts.input.describe(),
            "total_bits": bits.len(),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Format command
// ---------------------------------------------------------------------------

fn cmd_format() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    println!("lzss-trace version {version}");
    println!("HISTORY_INDEX_BITS={HISTORY_INDEX_BITS}");
    println!("HISTORY_SIZE={HISTORY_SIZE}");
    println!("MATCH_LENGTH_BITS={MATCH_LENGTH_BITS}");
    println!("MIN_MATCH_LENGTH={MIN_MATCH_LENGTH}");
    println!("MAX_MATCH_LENGTH={MAX_MATCH_LENGTH}");
    println!("MAX_DISTANCE={MAX_DISTANCE}");
    println!("LITERAL_TOKEN_BITS={LITERAL_TOKEN_BITS}");
    println!("REFERENCE_TOKEN_BITS={REFERENCE_TOKEN_BITS}");
    println!("END_OF_STREAM_BITS={END_OF_STREAM_BITS}");
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(opts.quiet, opts.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let exit_code = match opts.command {
        Command::Trace => cmd_trace(&opts),
        Command::Bits => cmd_bits(&opts),
        Command::Format => cmd_format(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
