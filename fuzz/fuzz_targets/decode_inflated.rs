#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: packet framing on arbitrary decompressed bytes.
//
// The input is compressed first so the fuzzer reaches the size prefix,
// header and body decoders instead of stalling on deflate validation.
fuzz_target!(|data: &[u8]| {
    let stream = wrpl_tests::zlib(data, flate2::Compression::fast());
    let decoded = wrpl_decoder::ReplayDecoder::decode_slice(&stream);

    let consumed: usize = decoded
        .packets
        .iter()
        .map(|p| p.prefix_len + p.received_len)
        .sum();
    assert!(consumed <= data.len());
    assert!(!decoded.stop_reason.is_fatal());
});
