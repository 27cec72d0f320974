//! # Server Config
//!
//! Client-side view of a server config (SCFG) message: the parameters a server
//! publishes so clients can pick the key exchange and AEAD for a connection.
//!
//! ## Required Fields
//! | Tag  | Content                                   |
//! |------|-------------------------------------------|
//! | SCID | 16-byte config ID                         |
//! | KEXS | list of 4-byte key exchange tags (`C255`) |
//! | AEAD | list of 4-byte AEAD tags (`AESG`)         |
//! | PUBS | 35-byte public value                      |
//! | OBIT | 8-byte orbit                              |
//! | EXPY | 8-byte little-endian UNIX expiry          |
//!
//! Fields are checked in the order above and the first failure is returned.
//! Algorithm lists are walked in 4-byte steps; the first entry we support wins.

use crate::error::{ProtocolError, Result};
use crate::protocol::message::HandshakeMessage;
use crate::protocol::tag::Tag;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

pub const SERVER_CONFIG_ID_LEN: usize = 16;
pub const PUBLIC_VALUE_LEN: usize = 35;
pub const ORBIT_LEN: usize = 8;
pub const EXPIRY_LEN: usize = 8;

/// An algorithm that is offered as a 4-byte tag inside a list value
pub trait NegotiatedAlgorithm: Sized + Copy {
    /// The tag this algorithm is offered under
    fn tag(self) -> Tag;

    /// Map an offered tag to an algorithm we implement
    fn from_tag(tag: Tag) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeAlgorithm {
    Curve25519,
}

impl NegotiatedAlgorithm for KeyExchangeAlgorithm {
    fn tag(self) -> Tag {
        match self {
            KeyExchangeAlgorithm::Curve25519 => Tag::C255,
        }
    }

    fn from_tag(tag: Tag) -> Option<Self> {
        (tag == Tag::C255).then_some(KeyExchangeAlgorithm::Curve25519)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    AesGcm,
}

impl NegotiatedAlgorithm for AeadAlgorithm {
    fn tag(self) -> Tag {
        match self {
            AeadAlgorithm::AesGcm => Tag::AESG,
        }
    }

    fn from_tag(tag: Tag) -> Option<Self> {
        (tag == Tag::AESG).then_some(AeadAlgorithm::AesGcm)
    }
}

/// Negotiated parameters of one server config.
///
/// Only constructible through validation, so every field is known to be
/// present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    id: [u8; SERVER_CONFIG_ID_LEN],
    key_exchange: KeyExchangeAlgorithm,
    aead: AeadAlgorithm,
    public_value: [u8; PUBLIC_VALUE_LEN],
    orbit: [u8; ORBIT_LEN],
    expiry: DateTime<Utc>,
}

impl ServerConfig {
    /// Decode and validate a serialized SCFG message.
    ///
    /// # Errors
    /// - any handshake message decoding error
    /// - `ProtocolError::MessageNotServerConfig` if the message tag is not SCFG
    /// - the field errors of [`ServerConfig::from_tag_map`]
    #[instrument(level = "trace", skip_all)]
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let message = HandshakeMessage::from_bytes(bytes)?;
        Self::from_message(&message)
    }

    /// Validate an already decoded message
    pub fn from_message(message: &HandshakeMessage) -> Result<Self> {
        if message.tag != Tag::SCFG {
            debug!(tag = %message.tag, "Expected a server config message");
            return Err(ProtocolError::MessageNotServerConfig);
        }
        Self::from_tag_map(&message.data)
    }

    /// Validate the fields of a server config.
    ///
    /// # Errors
    /// For the first offending tag, in SCID, KEXS, AEAD, PUBS, OBIT, EXPY order:
    /// - `ProtocolError::ParameterNotFound` if the tag is absent
    /// - `ProtocolError::InvalidValueLength` if the value has the wrong size
    /// - `ProtocolError::NoSupport` if no offered algorithm is supported
    pub fn from_tag_map(data: &BTreeMap<Tag, Vec<u8>>) -> Result<Self> {
        let id = fixed::<SERVER_CONFIG_ID_LEN>(data, Tag::SCID)?;
        let key_exchange = negotiate::<KeyExchangeAlgorithm>(data, Tag::KEXS)?;
        let aead = negotiate::<AeadAlgorithm>(data, Tag::AEAD)?;
        let public_value = fixed::<PUBLIC_VALUE_LEN>(data, Tag::PUBS)?;
        let orbit = fixed::<ORBIT_LEN>(data, Tag::OBIT)?;
        let expiry = expiry_from_secs(u64::from_le_bytes(fixed::<EXPIRY_LEN>(data, Tag::EXPY)?));

        debug!(?key_exchange, ?aead, %expiry, "Parsed server config");

        Ok(Self {
            id,
            key_exchange,
            aead,
            public_value,
            orbit,
            expiry,
        })
    }

    /// Encode these parameters as an SCFG message
    pub fn to_message(&self) -> HandshakeMessage {
        let mut message = HandshakeMessage::new(Tag::SCFG);
        message.insert(Tag::SCID, self.id.to_vec());
        message.insert(Tag::KEXS, self.key_exchange.tag().to_bytes().to_vec());
        message.insert(Tag::AEAD, self.aead.tag().to_bytes().to_vec());
        message.insert(Tag::PUBS, self.public_value.to_vec());
        message.insert(Tag::OBIT, self.orbit.to_vec());
        // Pre-epoch expiries never come out of parsing
        let secs = u64::try_from(self.expiry.timestamp()).unwrap_or(0);
        message.insert(Tag::EXPY, secs.to_le_bytes().to_vec());
        message
    }

    pub fn id(&self) -> &[u8; SERVER_CONFIG_ID_LEN] {
        &self.id
    }

    pub fn key_exchange(&self) -> KeyExchangeAlgorithm {
        self.key_exchange
    }

    pub fn aead(&self) -> AeadAlgorithm {
        self.aead
    }

    pub fn public_value(&self) -> &[u8; PUBLIC_VALUE_LEN] {
        &self.public_value
    }

    pub fn orbit(&self) -> &[u8; ORBIT_LEN] {
        &self.orbit
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Whether the config is no longer valid at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

fn required(data: &BTreeMap<Tag, Vec<u8>>, tag: Tag) -> Result<&[u8]> {
    data.get(&tag).map(Vec::as_slice).ok_or_else(|| {
        debug!(%tag, "Server config parameter missing");
        ProtocolError::ParameterNotFound(tag)
    })
}

fn fixed<const N: usize>(data: &BTreeMap<Tag, Vec<u8>>, tag: Tag) -> Result<[u8; N]> {
    let value = required(data, tag)?;
    value.try_into().map_err(|_| {
        debug!(%tag, len = value.len(), expected = N, "Server config value has wrong length");
        ProtocolError::InvalidValueLength(tag)
    })
}

/// Walk a list of 4-byte algorithm tags and return the first one we support
fn negotiate<A: NegotiatedAlgorithm>(data: &BTreeMap<Tag, Vec<u8>>, tag: Tag) -> Result<A> {
    let value = required(data, tag)?;
    if value.len() % 4 != 0 {
        debug!(%tag, len = value.len(), "Algorithm list is not a multiple of 4 bytes");
        return Err(ProtocolError::InvalidValueLength(tag));
    }

    value
        .chunks_exact(4)
        .map(|chunk| Tag::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .find_map(A::from_tag)
        .ok_or_else(|| {
            warn!(%tag, "No supported algorithm offered");
            ProtocolError::NoSupport(tag)
        })
}

fn expiry_from_secs(secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
