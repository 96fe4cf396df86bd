#![no_main]

use libfuzzer_sys::fuzz_target;
use wrpl_wire::size_prefix::decode_size_prefix;
use wrpl_wire::ByteCursor;

// Fuzz target: encode_size_prefix → decode_size_prefix roundtrip.
//
// Every u32 must come back unchanged and consume exactly the encoded bytes.
fuzz_target!(|len: u32| {
    let encoded = wrpl_tests::encode_size_prefix(len);
    let mut cursor = ByteCursor::new(&encoded);
    let prefix = decode_size_prefix(&mut cursor).expect("encoded prefix must decode");

    assert_eq!(prefix.payload_size, i64::from(len));
    assert_eq!(prefix.prefix_len, encoded.len());
    assert!(cursor.is_empty());
});
