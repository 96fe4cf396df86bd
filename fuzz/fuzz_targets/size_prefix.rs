#![no_main]

use libfuzzer_sys::fuzz_target;
use wrpl_wire::size_prefix::{decode_size_prefix, MAX_SIZE_PREFIX_LEN};
use wrpl_wire::ByteCursor;

// Fuzz target: size prefix decoding.
//
// The decoder must never read past the buffer, and a decoded prefix must
// account for exactly the bytes the cursor advanced over.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    if let Some(prefix) = decode_size_prefix(&mut cursor) {
        assert_eq!(prefix.prefix_len, cursor.position());
        assert!(prefix.prefix_len <= MAX_SIZE_PREFIX_LEN);
        assert!(prefix.payload_size >= -1);
    }
});
