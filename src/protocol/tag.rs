//! Four-byte handshake tags.
//!
//! A tag is transmitted as four bytes and compared as the little-endian `u32`
//! those bytes form. For the ASCII tags used by the handshake this means the
//! wire bytes read like the tag's name (`SCFG` is `53 43 46 47`), while the
//! numeric value orders the entries of an encoded message.

use std::fmt;

/// Opaque four-byte identifier for handshake messages and their fields.
///
/// Unknown tags are representable; the known ones are associated constants so
/// the validation layer can address them by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    /// Client hello
    pub const CHLO: Tag = Tag::from_bytes(*b"CHLO");
    /// Server hello
    pub const SHLO: Tag = Tag::from_bytes(*b"SHLO");
    /// Server config
    pub const SCFG: Tag = Tag::from_bytes(*b"SCFG");
    /// Rejection
    pub const REJ: Tag = Tag::from_bytes(*b"REJ\0");
    /// Public reset
    pub const PRST: Tag = Tag::from_bytes(*b"PRST");

    /// Server config ID
    pub const SCID: Tag = Tag::from_bytes(*b"SCID");
    /// Key exchange algorithms
    pub const KEXS: Tag = Tag::from_bytes(*b"KEXS");
    /// AEAD algorithms
    pub const AEAD: Tag = Tag::from_bytes(*b"AEAD");
    /// Public values
    pub const PUBS: Tag = Tag::from_bytes(*b"PUBS");
    /// Orbit
    pub const OBIT: Tag = Tag::from_bytes(*b"OBIT");
    /// Expiry
    pub const EXPY: Tag = Tag::from_bytes(*b"EXPY");

    /// Version
    pub const VER: Tag = Tag::from_bytes(*b"VER\0");
    /// Server name indication
    pub const SNI: Tag = Tag::from_bytes(*b"SNI\0");
    /// Proof demand
    pub const PDMD: Tag = Tag::from_bytes(*b"PDMD");
    /// Client nonce
    pub const NONC: Tag = Tag::from_bytes(*b"NONC");
    /// Source-address token
    pub const STK: Tag = Tag::from_bytes(*b"STK\0");

    /// Curve25519 key exchange
    pub const C255: Tag = Tag::from_bytes(*b"C255");
    /// P-256 key exchange
    pub const P256: Tag = Tag::from_bytes(*b"P256");
    /// AES-128-GCM with 12-byte tags
    pub const AESG: Tag = Tag::from_bytes(*b"AESG");
    /// Salsa20 with Poly1305
    pub const S20P: Tag = Tag::from_bytes(*b"S20P");

    /// Build a tag from its four wire bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Tag(u32::from_le_bytes(bytes))
    }

    /// Build a tag from its numeric value.
    pub const fn from_u32(value: u32) -> Self {
        Tag(value)
    }

    /// The four bytes this tag is transmitted as.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Numeric value, which defines the serialization order.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Tag::from_bytes(bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let name = &bytes[..end];

        if !name.is_empty() && name.iter().all(|b| b.is_ascii_graphic()) {
            // Checked ASCII above
            f.write_str(std::str::from_utf8(name).map_err(|_| fmt::Error)?)
        } else {
            write!(f, "{:#010x}", self.0)
        }
    }
}
