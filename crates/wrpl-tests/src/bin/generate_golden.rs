//! Golden fixture generator for the conformance tests.
//!
//! Writes every replay file under `tests/golden/`. Rerun it after changing
//! a fixture in the `wrpl_tests` library; snapshots are then reviewed with
//! `cargo insta review`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p wrpl-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                  | Contents                                         |
//! |-----------------------|--------------------------------------------------|
//! | basic_match.wrpl      | markers, header info, MPI, two chats, ECS, unknown |
//! | truncated_packet.wrpl | MPI, then a packet cut short by the stream's end |
//!
//! Both files are a 16-byte stand-in host header followed by a stored
//! (level 0) zlib stream.

#![allow(clippy::pedantic)]

use std::path::Path;

use wrpl_tests::{basic_match, truncated_packet};

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    write_file(&golden_dir.join("basic_match.wrpl"), &basic_match().host_file());
    write_file(
        &golden_dir.join("truncated_packet.wrpl"),
        &truncated_packet().host_file(),
    );

    println!("All golden fixtures written to {}", golden_dir.display());
}

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}
