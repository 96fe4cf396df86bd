/// Replay command-line tool: locate, inspect, validate, and summarise the
/// packet stream inside a `.wrpl` replay file.
///
/// # Command overview
///
/// ```text
/// wrpl <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print every decoded packet (log or minimal text, or JSON)
///   validate   Decode the whole stream and report how it ended
///   stats      Print per-type packet counts and timing
///   locate     Print where the compressed stream starts
///   chat       Print the chat transcript
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder details to stderr (same as RUST_LOG=debug)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                               |
/// |------|-------------------------------------------------------|
/// | 0    | Success                                               |
/// | 1    | Error (I/O failure, no stream found, failed validate) |
///
/// Errors and logs go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod cmd_chat;
mod cmd_inspect;
mod cmd_locate;
mod cmd_stats;
mod cmd_validate;
mod json;
mod locate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The replay packet-stream tool.
#[derive(Parser)]
#[command(name = "wrpl", version, about = "Replay packet stream decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log per-packet decoder details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print every decoded packet.
    Inspect(InspectArgs),
    /// Decode the whole stream and report whether it ended cleanly.
    Validate(FileArgs),
    /// Print per-type packet counts, sizes and timing.
    Stats(FileArgs),
    /// Print the offset of the compressed stream inside the file.
    Locate(FileArgs),
    /// Print the chat transcript.
    Chat(FileArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `wrpl inspect`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                               │
/// ├───────────────┼──────────────────────────────────────────────────────┤
/// │ --mode        │ log (default) | minimal                              │
/// │ --max-hex N   │ payload bytes shown in hex previews (default 64)     │
/// │ --include     │ comma-separated packet types to show (e.g. chat,mpi) │
/// │ --limit N     │ stop after N shown packets                           │
/// │ --json        │ emit one JSON document instead of text               │
/// └───────────────┴──────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the replay file.
    pub file: PathBuf,

    /// Output format: `log` or `minimal`.
    #[arg(long, default_value = "log")]
    pub mode: String,

    /// Maximum payload bytes shown per hex preview.
    #[arg(long, default_value_t = wrpl_driver::config::DEFAULT_MAX_HEX_BYTES)]
    pub max_hex: usize,

    /// Comma-separated packet types to show (e.g. `chat,mpi` or `unknown(12)`).
    #[arg(long)]
    pub include: Option<String>,

    /// Stop decoding after this many shown packets.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for commands that take only a replay file.
#[derive(clap::Args)]
pub struct FileArgs {
    /// Path to the replay file.
    pub file: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
        Commands::Locate(args) => cmd_locate::run(&args),
        Commands::Chat(args) => cmd_chat::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
