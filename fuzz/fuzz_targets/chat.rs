#![no_main]

use libfuzzer_sys::fuzz_target;
use wrpl_types::ChatPacket;

// Fuzz target: bit-packed chat payload deserialization.
//
// Catches bugs in:
// - Compressed length overflow
// - Field lengths running past the payload
// - Optional trailing channel / enemy bits
fuzz_target!(|data: &[u8]| {
    if let Ok(chat) = ChatPacket::decode_body(data) {
        assert!(chat.bits_read as usize <= data.len() * 8);
    }
});
