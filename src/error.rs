//! # Error Types
//!
//! Comprehensive error handling for the wire codecs.
//!
//! This module defines every variant that can occur while decoding or encoding
//! public headers, handshake messages and server configs. None of them are fatal
//! to the process: callers reject the offending packet or message and decide
//! for themselves whether the connection survives.
//!
//! ## Error Categories
//! - **Structural Errors**: Truncated input, trailing bytes, inconsistent offset tables
//! - **Header Errors**: Connection ID, flag and packet number length violations, versions
//! - **Crypto Parameter Errors**: Missing, wrongly sized or unsupported server config fields
//! - **Configuration Errors**: Invalid or unreadable configuration
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use quic_wire::core::public_header::PublicHeader;
//! use quic_wire::error::ProtocolError;
//! use tracing::warn;
//!
//! match PublicHeader::from_bytes(&[0x00, 0x01]) {
//!     Err(ProtocolError::TruncatedConnectionId) => {}
//!     Err(e) => warn!(error = %e, "Dropping packet"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use crate::protocol::tag::Tag;
use crate::protocol::version::Version;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Handshake message structure
    pub const ERR_OFFSETS_DECREASING: &str = "value end offsets are not monotonic";

    /// Configuration
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging
    pub const ERR_LOG_FILTER: &str = "Invalid log filter directive";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected EOF")]
    UnexpectedEof,

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    #[error("PublicHeader: Received truncated connection ID")]
    TruncatedConnectionId,

    #[error("PublicHeader: connection ID cannot be 0")]
    InvalidConnectionId,

    #[error("PublicHeader: Reset Flag and Version Flag should not be set at the same time")]
    ResetAndVersionFlagSet,

    #[error("PublicHeader: PacketNumberLen not set")]
    PacketNumberLenNotSet,

    #[error("PublicHeader: GetLength can only be called for regular packets")]
    LengthOnlyForRegularPackets,

    #[error("Invalid version tag: {0:02x?}")]
    InvalidVersionTag([u8; 4]),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(Version),

    #[error("ServerConfig must have TagSCFG")]
    MessageNotServerConfig,

    #[error("CryptoTooManyEntries: {0}")]
    TooManyEntries(usize),

    #[error("CryptoInvalidValueLength: {tag} value too long ({len} bytes)")]
    ValueTooLong { tag: Tag, len: usize },

    #[error("Malformed handshake message: {0}")]
    MalformedMessage(&'static str),

    #[error("Duplicate tag in handshake message: {0}")]
    DuplicateTag(Tag),

    #[error("Handshake message too large to encode: {0} bytes of values")]
    MessageTooLarge(usize),

    #[error("CryptoMessageParameterNotFound: {0}")]
    ParameterNotFound(Tag),

    #[error("CryptoInvalidValueLength: {0}")]
    InvalidValueLength(Tag),

    #[error("CryptoNoSupport: {0}")]
    NoSupport(Tag),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
