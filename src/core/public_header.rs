//! # Public Header
//!
//! Per-packet framing that precedes every (encrypted) packet payload.
//!
//! ## Wire Format
//! ```text
//! [Flags(1)] [ConnectionID(8)?] [Version(4)?] [DiversificationNonce(32)?] [PacketNumber(1|2|4|6)?]
//! ```
//! Multi-byte integers are little-endian.
//!
//! ## Flag Byte
//! ```text
//! bit 0      version flag
//! bit 1      public reset flag
//! bit 2      diversification nonce present
//! bit 3      connection ID present
//! bits 4-5   packet number length: 00 -> 1, 01 -> 2, 10 -> 4, 11 -> 6 bytes
//! bits 6-7   unused
//! ```
//!
//! Public reset packets end after the connection ID. A server's version
//! negotiation packet (version flag set, no concrete version) carries neither
//! version tag nor packet number.

use crate::config::VersionConfig;
use crate::core::connection_id::ConnectionId;
use crate::error::{ProtocolError, Result};
use crate::protocol::version::{Version, SUPPORTED_VERSIONS};
use bytes::{Buf, BufMut};
use tracing::{debug, instrument, trace};

pub const FLAG_VERSION: u8 = 0x01;
pub const FLAG_RESET: u8 = 0x02;
pub const FLAG_DIVERSIFICATION_NONCE: u8 = 0x04;
pub const FLAG_CONNECTION_ID: u8 = 0x08;
pub const PACKET_NUMBER_LEN_MASK: u8 = 0x30;
const PACKET_NUMBER_LEN_SHIFT: u8 = 4;

pub const CONNECTION_ID_LEN: usize = 8;
pub const VERSION_TAG_LEN: usize = 4;
pub const DIVERSIFICATION_NONCE_LEN: usize = 32;

pub type PacketNumber = u64;

/// Server-supplied randomness mixed into early key derivation
pub type DiversificationNonce = [u8; DIVERSIFICATION_NONCE_LEN];

/// Number of bytes the packet number occupies on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketNumberLen {
    One = 1,
    Two = 2,
    Four = 4,
    Six = 6,
}

impl PacketNumberLen {
    /// All lengths, shortest first
    pub const ALL: [PacketNumberLen; 4] = [
        PacketNumberLen::One,
        PacketNumberLen::Two,
        PacketNumberLen::Four,
        PacketNumberLen::Six,
    ];

    pub const fn len(self) -> usize {
        self as usize
    }

    /// Keep only the bytes that fit in this length
    pub const fn truncate(self, packet_number: PacketNumber) -> PacketNumber {
        packet_number & ((1u64 << (8 * self.len())) - 1)
    }

    fn from_flags(flags: u8) -> Self {
        match (flags & PACKET_NUMBER_LEN_MASK) >> PACKET_NUMBER_LEN_SHIFT {
            0b00 => PacketNumberLen::One,
            0b01 => PacketNumberLen::Two,
            0b10 => PacketNumberLen::Four,
            _ => PacketNumberLen::Six,
        }
    }

    fn flag_bits(self) -> u8 {
        let selector = match self {
            PacketNumberLen::One => 0b00,
            PacketNumberLen::Two => 0b01,
            PacketNumberLen::Four => 0b10,
            PacketNumberLen::Six => 0b11,
        };
        selector << PACKET_NUMBER_LEN_SHIFT
    }
}

/// Framing metadata of a single packet.
///
/// Build one per outgoing packet, or obtain it from [`PublicHeader::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublicHeader {
    pub version_flag: bool,
    pub reset_flag: bool,
    pub connection_id: ConnectionId,
    /// Omit the connection ID; the peer knows it from context
    pub truncate_connection_id: bool,
    /// Version read from the wire. Writing uses the active version instead.
    pub version_number: Option<Version>,
    pub packet_number: PacketNumber,
    pub packet_number_len: Option<PacketNumberLen>,
    pub diversification_nonce: Option<DiversificationNonce>,
}

impl PublicHeader {
    /// Decode a header accepting only [`SUPPORTED_VERSIONS`].
    ///
    /// Consumes exactly the header bytes; the packet payload stays in `buf`.
    pub fn parse<B: Buf>(buf: &mut B) -> Result<Self> {
        Self::parse_with_versions(buf, &SUPPORTED_VERSIONS)
    }

    /// Decode a header, accepting the versions a [`VersionConfig`] lists
    pub fn parse_with_config<B: Buf>(buf: &mut B, config: &VersionConfig) -> Result<Self> {
        Self::parse_with_versions(buf, &config.supported)
    }

    /// Decode a header, accepting the versions in `supported`.
    ///
    /// # Errors
    /// - `ProtocolError::UnexpectedEof` if a field is cut short
    /// - `ProtocolError::TruncatedConnectionId` if the connection ID is omitted
    /// - `ProtocolError::InvalidConnectionId` if the connection ID is zero
    /// - `ProtocolError::ResetAndVersionFlagSet` if both flags are present
    /// - `ProtocolError::InvalidVersionTag` if the version tag is malformed
    /// - `ProtocolError::UnsupportedVersion` if the version is well-formed but not
    ///   in `supported`; the caller answers with version negotiation
    #[instrument(level = "trace", skip_all)]
    pub fn parse_with_versions<B: Buf>(buf: &mut B, supported: &[Version]) -> Result<Self> {
        ensure_remaining(buf, 1)?;
        let flags = buf.get_u8();

        let mut header = PublicHeader {
            version_flag: flags & FLAG_VERSION != 0,
            reset_flag: flags & FLAG_RESET != 0,
            ..Default::default()
        };

        if header.version_flag && header.reset_flag {
            return Err(ProtocolError::ResetAndVersionFlagSet);
        }

        if flags & FLAG_CONNECTION_ID == 0 {
            debug!(flags, "Header without connection ID");
            return Err(ProtocolError::TruncatedConnectionId);
        }

        ensure_remaining(buf, CONNECTION_ID_LEN)?;
        header.connection_id = ConnectionId(buf.get_u64_le());
        if header.connection_id.is_zero() {
            return Err(ProtocolError::InvalidConnectionId);
        }

        if header.reset_flag {
            trace!(connection_id = %header.connection_id, "Parsed public reset header");
            return Ok(header);
        }

        if header.version_flag {
            ensure_remaining(buf, VERSION_TAG_LEN)?;
            let mut tag = [0u8; VERSION_TAG_LEN];
            buf.copy_to_slice(&mut tag);

            let version = Version::from_tag(tag)?;
            if !supported.contains(&version) {
                debug!(%version, connection_id = %header.connection_id, "Unsupported version");
                return Err(ProtocolError::UnsupportedVersion(version));
            }
            header.version_number = Some(version);
        }

        if flags & FLAG_DIVERSIFICATION_NONCE != 0 {
            ensure_remaining(buf, DIVERSIFICATION_NONCE_LEN)?;
            let mut nonce = [0u8; DIVERSIFICATION_NONCE_LEN];
            buf.copy_to_slice(&mut nonce);
            header.diversification_nonce = Some(nonce);
        }

        let packet_number_len = PacketNumberLen::from_flags(flags);
        ensure_remaining(buf, packet_number_len.len())?;
        header.packet_number = buf.get_uint_le(packet_number_len.len());
        header.packet_number_len = Some(packet_number_len);

        trace!(
            connection_id = %header.connection_id,
            packet_number = header.packet_number,
            "Parsed public header"
        );
        Ok(header)
    }

    /// Decode a header that must span all of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let header = Self::parse(&mut cursor)?;
        if cursor.has_remaining() {
            return Err(ProtocolError::TrailingBytes(cursor.remaining()));
        }
        Ok(header)
    }

    /// Whether this header is followed by a packet number when written
    /// against `version`
    pub fn carries_packet_number(&self, version: Version) -> bool {
        !self.reset_flag && !(self.version_flag && version.is_unspecified())
    }

    /// Serialize the header.
    ///
    /// The version tag is written when the version flag is set and `version`
    /// is concrete. All checks run before the first byte is written.
    ///
    /// # Errors
    /// - `ProtocolError::ResetAndVersionFlagSet` if both flags are set
    /// - `ProtocolError::PacketNumberLenNotSet` if a packet number is due but has no length
    /// - `ProtocolError::UnsupportedVersion` if `version` has no wire tag
    pub fn write<B: BufMut>(&self, buf: &mut B, version: Version) -> Result<()> {
        if self.version_flag && self.reset_flag {
            return Err(ProtocolError::ResetAndVersionFlagSet);
        }

        let packet_number_len = if self.carries_packet_number(version) {
            Some(
                self.packet_number_len
                    .ok_or(ProtocolError::PacketNumberLenNotSet)?,
            )
        } else {
            None
        };

        let version_tag = if self.version_flag && !version.is_unspecified() {
            Some(
                version
                    .to_tag()
                    .ok_or(ProtocolError::UnsupportedVersion(version))?,
            )
        } else {
            None
        };

        let mut flags = 0u8;
        if self.version_flag {
            flags |= FLAG_VERSION;
        }
        if self.reset_flag {
            flags |= FLAG_RESET;
        }
        if self.diversification_nonce.is_some() {
            flags |= FLAG_DIVERSIFICATION_NONCE;
        }
        if !self.truncate_connection_id {
            flags |= FLAG_CONNECTION_ID;
        }
        if let Some(len) = packet_number_len {
            flags |= len.flag_bits();
        }

        buf.put_u8(flags);
        if !self.truncate_connection_id {
            buf.put_u64_le(self.connection_id.0);
        }
        if let Some(tag) = version_tag {
            buf.put_slice(&tag);
        }
        if let Some(nonce) = &self.diversification_nonce {
            buf.put_slice(nonce);
        }
        if let Some(len) = packet_number_len {
            buf.put_slice(&self.packet_number.to_le_bytes()[..len.len()]);
        }

        Ok(())
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self, version: Version) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(1 + CONNECTION_ID_LEN + VERSION_TAG_LEN + 6);
        self.write(&mut out, version)?;
        Ok(out)
    }

    /// Length of a regular packet's header, for sizing buffers.
    ///
    /// # Errors
    /// - `ProtocolError::LengthOnlyForRegularPackets` for version or reset packets
    /// - `ProtocolError::PacketNumberLenNotSet` if the packet number length is unset
    pub fn length(&self) -> Result<usize> {
        if self.version_flag || self.reset_flag {
            return Err(ProtocolError::LengthOnlyForRegularPackets);
        }

        let packet_number_len = self
            .packet_number_len
            .ok_or(ProtocolError::PacketNumberLenNotSet)?;

        let mut length = 1;
        if !self.truncate_connection_id {
            length += CONNECTION_ID_LEN;
        }
        if self.diversification_nonce.is_some() {
            length += DIVERSIFICATION_NONCE_LEN;
        }
        Ok(length + packet_number_len.len())
    }
}

#[inline]
fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ProtocolError::UnexpectedEof);
    }
    Ok(())
}
