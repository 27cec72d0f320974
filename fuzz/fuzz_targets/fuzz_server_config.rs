#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_wire::protocol::server_config::ServerConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = ServerConfig::parse(data) {
        let _ = config.is_expired();
        let _ = config.to_message().to_bytes();
    }
});
