#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full decoder entry point on arbitrary compressed bytes.
//
// Nearly every input fails zlib header or deflate validation, which must
// surface as a stop reason, never a panic.
fuzz_target!(|data: &[u8]| {
    let decoded = wrpl_decoder::ReplayDecoder::decode_slice(data);
    assert_eq!(decoded.packets.len(), decoded.summary.packets);
});
