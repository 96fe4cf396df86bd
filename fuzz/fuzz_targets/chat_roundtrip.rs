#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wrpl_types::ChatPacket;

#[derive(Debug, Arbitrary)]
struct ChatInput {
    sender: Vec<u8>,
    message: Vec<u8>,
    channel_id: u8,
    is_enemy: bool,
}

// Fuzz target: chat_payload → ChatPacket::decode_body roundtrip.
fuzz_target!(|input: ChatInput| {
    let limit = usize::from(u16::MAX);
    if input.sender.len() > limit || input.message.len() > limit {
        return;
    }
    let payload =
        wrpl_tests::chat_payload(&input.sender, &input.message, input.channel_id, input.is_enemy);
    let chat = ChatPacket::decode_body(&payload).expect("built payload must decode");

    assert_eq!(chat.sender_name, input.sender);
    assert_eq!(chat.message, input.message);
    assert_eq!(chat.channel_id, input.channel_id);
    assert_eq!(chat.is_enemy, input.is_enemy);
});
