#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_wire::protocol::message::HandshakeMessage;

fuzz_target!(|data: &[u8]| {
    // Fuzz handshake message decoding
    if data.len() < 8 {
        return;
    }

    if let Ok(msg) = HandshakeMessage::from_bytes(data) {
        // If decoding succeeds, the canonical encoding must decode to the same message
        if let Ok(encoded) = msg.to_bytes() {
            assert_eq!(HandshakeMessage::from_bytes(&encoded).ok(), Some(msg));
        }
    }
});
