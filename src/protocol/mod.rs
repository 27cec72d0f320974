//! # Handshake Protocol
//!
//! Tag/value handshake messages and the server config they carry.
//!
//! ## Components
//! - **Tag**: four-byte message and field identifiers
//! - **Version**: protocol version tags and negotiation
//! - **Message**: the tag/value handshake message codec
//! - **Server Config**: validation of the `SCFG` message
//!
//! ## Wire Format
//! ```text
//! [Tag(4)] [Count(2)] [Pad(2)] [Count x (Tag(4) EndOffset(4))] [Values]
//! ```

pub mod message;
pub mod server_config;
pub mod tag;
pub mod version;
