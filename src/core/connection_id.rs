//! Connection identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit identifier routing packets to a connection independently of the
/// network path. Zero is reserved and never valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// Draw a random, non-zero connection ID
    pub fn generate() -> Self {
        loop {
            let id = rand::random::<u64>();
            if id != 0 {
                return ConnectionId(id);
            }
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Little-endian wire bytes
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl From<u64> for ConnectionId {
    fn from(id: u64) -> Self {
        ConnectionId(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl fmt::LowerHex for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_nonzero_and_varies() {
        let ids: Vec<ConnectionId> = (0..32).map(|_| ConnectionId::generate()).collect();
        assert!(ids.iter().all(|id| !id.is_zero()));
        assert!(ids.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_display() {
        let id = ConnectionId(0x4cfa9f9b668619f6);
        assert_eq!(id.to_string(), "0x4cfa9f9b668619f6");
        assert_eq!(format!("{id:x}"), "4cfa9f9b668619f6");
        assert_eq!(id.to_bytes(), [0xf6, 0x19, 0x86, 0x66, 0x9b, 0x9f, 0xfa, 0x4c]);
    }
}
