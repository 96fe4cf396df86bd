#![no_main]

use libfuzzer_sys::fuzz_target;
use wrpl_wire::packet_header::decode_packet_header;
use wrpl_wire::{ByteCursor, TimestampForm};

// Fuzz target: packet header decoding.
//
// Catches bugs in:
// - Continuation flag handling
// - Absolute timestamps cut short by the end of the packet
// - header_len disagreeing with the bytes consumed
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    match decode_packet_header(&mut cursor, 1234) {
        None => assert!(data.is_empty()),
        Some(header) => {
            if header.form == TimestampForm::Truncated {
                assert_eq!(cursor.position(), data.len());
            } else {
                assert_eq!(header.header_len, cursor.position());
            }
        }
    }
});
