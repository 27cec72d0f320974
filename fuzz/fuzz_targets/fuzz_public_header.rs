#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_wire::core::public_header::PublicHeader;

fuzz_target!(|data: &[u8]| {
    let mut cursor = data;
    if let Ok(header) = PublicHeader::parse(&mut cursor) {
        // A decoded header re-encodes to the bytes it was read from
        let version = header.version_number.unwrap_or_default();
        if let Ok(bytes) = header.to_bytes(version) {
            let consumed = data.len() - cursor.len();
            if !header.reset_flag {
                assert_eq!(&bytes[1..], &data[1..consumed]);
            }
        }
    }
});
