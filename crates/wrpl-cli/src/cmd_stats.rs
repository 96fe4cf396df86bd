/// Implementation of `wrpl stats`.
///
/// Decodes the whole stream and prints a per-type packet table plus
/// timing, chat and MPI totals.
///
/// # Example output
///
/// ```text
/// File:     match.wrpl  (48213 bytes)
/// Stream:   offset 1184, 47029 compressed bytes
/// Packets:  412 total, 88310 bytes decompressed
/// Time:     00:00.000 .. 20:34.567
///
/// Type                  Count     Bytes
/// ──────────────────────────────────────
/// start_marker              1        12
/// chat                     14       301
/// mpi                     396     87997
/// ──────────────────────────────────────
/// Total                   411     88310
///
/// Chat messages:  14
/// MPI messages:   396 (37 objects)
/// Empty packets:  1
/// Body failures:  0
/// Warnings:       0
/// Stopped:        clean end of stream
/// ```
use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use wrpl_decoder::PacketStream;
use wrpl_types::{PacketBody, PacketType};

use crate::FileArgs;
use crate::cmd_chat::format_timestamp;
use crate::locate;

const RULE: &str = "──────────────────────────────────────";

/// Running totals gathered while streaming.
#[derive(Default)]
struct Tally {
    by_type: BTreeMap<u8, (usize, u64)>,
    first_ms: Option<u32>,
    last_ms: Option<u32>,
    chats: usize,
    mpis: usize,
    mpi_objects: BTreeSet<u16>,
    empty: usize,
    body_failures: usize,
    warnings: usize,
}

/// Run the `wrpl stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no zlib stream.
pub fn run(args: &FileArgs) -> Result<()> {
    let replay = locate::load(&args.file)?;
    let mut stream = PacketStream::with_base_offset(replay.stream(), replay.base_offset());

    let mut tally = Tally::default();
    for record in stream.by_ref() {
        tally.warnings += record.diagnostics.len();
        let Some(header) = record.header else {
            tally.empty += 1;
            continue;
        };

        let entry = tally.by_type.entry(header.packet_type).or_default();
        entry.0 += 1;
        entry.1 += record.received_len as u64;

        tally.first_ms.get_or_insert(header.timestamp_ms);
        tally.last_ms = Some(header.timestamp_ms);

        match &record.body {
            Ok(PacketBody::Chat(_)) => tally.chats += 1,
            Ok(PacketBody::Mpi(mpi)) => {
                tally.mpis += 1;
                tally.mpi_objects.insert(mpi.object_id);
            }
            Ok(PacketBody::Generic(_)) => {}
            Err(_) => tally.body_failures += 1,
        }
    }
    let (summary, reason) = stream.into_parts();

    println!(
        "File:     {}  ({} bytes)",
        args.file.display(),
        replay.bytes.len()
    );
    println!(
        "Stream:   offset {}, {} compressed bytes",
        replay.stream_offset,
        replay.stream().len()
    );
    println!(
        "Packets:  {} total, {} bytes decompressed",
        summary.packets, summary.decompressed_bytes
    );
    if let (Some(first), Some(last)) = (tally.first_ms, tally.last_ms) {
        println!(
            "Time:     {} .. {}",
            format_timestamp(first),
            format_timestamp(last)
        );
    }

    println!();
    println!("{:<20} {:>7} {:>9}", "Type", "Count", "Bytes");
    println!("{RULE}");
    let mut total = (0usize, 0u64);
    for (&id, &(count, bytes)) in &tally.by_type {
        let name = PacketType::from_wire_id(id).to_string();
        println!("{name:<20} {count:>7} {bytes:>9}");
        total.0 += count;
        total.1 += bytes;
    }
    println!("{RULE}");
    println!("{:<20} {:>7} {:>9}", "Total", total.0, total.1);

    println!();
    println!("Chat messages:  {}", tally.chats);
    println!(
        "MPI messages:   {} ({} objects)",
        tally.mpis,
        tally.mpi_objects.len()
    );
    println!("Empty packets:  {}", tally.empty);
    println!("Body failures:  {}", tally.body_failures);
    println!("Warnings:       {}", tally.warnings);
    println!("Stopped:        {reason}");
    Ok(())
}
