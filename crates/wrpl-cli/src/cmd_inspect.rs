/// Implementation of `wrpl inspect`.
///
/// Locates the compressed stream, decodes it packet by packet, and renders
/// each packet as it is decoded, so arbitrarily large replays stream
/// through in constant memory (except with `--json`, which builds one
/// document).
///
/// # Example output (`--mode minimal --include chat`)
///
/// ```text
/// #14 t=61250ms chat len=19 "pilot_one" (channel 1, ally): "gl hf"
/// #97 t=95210ms chat len=15 "red_five" (channel 2, enemy): "o7"
/// -- 412 packets, 88310 bytes decompressed, stopped: clean end of stream
/// ```
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, anyhow};
use wrpl_decoder::PacketStream;
use wrpl_driver::{DefaultDriver, DriverConfig, OutputMode, ReplayDriver};
use wrpl_types::PacketType;

use crate::InspectArgs;
use crate::json::{PacketView, ReplayView, SummaryView};
use crate::locate;

/// Run the `wrpl inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no zlib stream,
/// a flag value is not recognised, or stdout cannot be written.
pub fn run(args: &InspectArgs) -> Result<()> {
    let config = DriverConfig {
        mode: parse_output_mode(&args.mode)?,
        max_hex_bytes: args.max_hex,
        include_types: args.include.as_deref().map(parse_include_types).transpose()?,
    };

    let replay = locate::load(&args.file)?;
    let mut stream = PacketStream::with_base_offset(replay.stream(), replay.base_offset());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.json {
        let mut packets = Vec::new();
        for record in stream.by_ref() {
            if !config.includes(record.packet_type()) {
                continue;
            }
            packets.push(PacketView::from(&record));
            if args.limit.is_some_and(|limit| packets.len() >= limit) {
                break;
            }
        }
        let (summary, reason) = stream.into_parts();
        let view = ReplayView {
            stream_offset: replay.stream_offset,
            packets,
            summary: SummaryView::new(&summary, &reason),
        };
        serde_json::to_writer_pretty(&mut out, &view).context("cannot write JSON to stdout")?;
        writeln!(out).context("cannot write to stdout")?;
        return out.flush().context("cannot write to stdout");
    }

    if config.mode == OutputMode::Log {
        writeln!(out, "Read {} bytes from {}", replay.bytes.len(), args.file.display())?;
        writeln!(
            out,
            "Found zlib stream at offset {}. Size: {} bytes",
            replay.stream_offset,
            replay.stream().len()
        )?;
    }

    let driver = DefaultDriver;
    let mut shown = 0;
    for record in stream.by_ref() {
        if driver
            .render_packet(&mut out, &record, &config)
            .context("cannot write to stdout")?
        {
            shown += 1;
        }
        if args.limit.is_some_and(|limit| shown >= limit) {
            break;
        }
    }

    let (summary, reason) = stream.into_parts();
    driver
        .render_footer(&mut out, &summary, &reason, &config)
        .context("cannot write to stdout")?;
    out.flush().context("cannot write to stdout")
}

// ── Flag parsers ──────────────────────────────────────────────────────────────

/// Parses the `--mode` string to an [`OutputMode`].
fn parse_output_mode(s: &str) -> Result<OutputMode> {
    match s.to_lowercase().as_str() {
        "log" => Ok(OutputMode::Log),
        "minimal" => Ok(OutputMode::Minimal),
        _ => Err(anyhow!("unknown mode {s:?}, expected log|minimal")),
    }
}

/// Parses a comma-separated `--include` string to a list of [`PacketType`]s.
fn parse_include_types(s: &str) -> Result<Vec<PacketType>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            PacketType::from_name(&token.to_lowercase())
                .ok_or_else(|| anyhow!("unknown packet type {token:?}"))
        })
        .collect()
}
