//! # quic-wire
//!
//! Wire-format core of a gQUIC-style transport: the per-packet Public Header,
//! the tag/value Handshake Message, and the Server Config (`SCFG`) a server
//! publishes during the crypto handshake.
//!
//! ## Modules
//! - [`core`]: public header codec, connection IDs, stream framing
//! - [`protocol`]: tags, versions, handshake messages, server config
//! - [`config`]: decoding limits, supported versions and logging settings
//! - [`error`]: the [`ProtocolError`] type shared by every operation
//! - [`utils`]: logging setup
//!
//! Every decoder takes untrusted input and either returns a fully validated
//! value or an error; encoders check their preconditions before writing.
//!
//! ## Example
//! ```rust
//! use quic_wire::{ConnectionId, PacketNumberLen, PublicHeader, Version};
//!
//! let header = PublicHeader {
//!     connection_id: ConnectionId(0x4cfa9f9b668619f6),
//!     packet_number: 1,
//!     packet_number_len: Some(PacketNumberLen::One),
//!     ..Default::default()
//! };
//! let bytes = header.to_bytes(Version::Q036)?;
//! assert_eq!(PublicHeader::from_bytes(&bytes)?, header);
//! # Ok::<(), quic_wire::ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::config::{HandshakeConfig, WireConfig};
pub use crate::core::codec::HandshakeCodec;
pub use crate::core::connection_id::ConnectionId;
pub use crate::core::public_header::{PacketNumber, PacketNumberLen, PublicHeader};
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::message::HandshakeMessage;
pub use crate::protocol::server_config::{AeadAlgorithm, KeyExchangeAlgorithm, ServerConfig};
pub use crate::protocol::tag::Tag;
pub use crate::protocol::version::Version;
