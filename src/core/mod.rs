//! # Core Wire Components
//!
//! Per-packet framing and stream framing.
//!
//! ## Components
//! - **Public Header**: flag byte, connection ID, version, nonce and packet number
//! - **Connection ID**: 64-bit connection identifier
//! - **Codec**: Tokio codec for reading handshake messages off a byte stream
//!
//! ## Wire Format
//! ```text
//! [Flags(1)] [ConnectionID(8)?] [Version(4)?] [DiversificationNonce(32)?] [PacketNumber(1|2|4|6)?]
//! ```
//!
//! ## Security
//! - Zero connection IDs are rejected
//! - Every field is length-checked before it is read

pub mod codec;
pub mod connection_id;
pub mod public_header;
