//! Stream framing for handshake messages.
//!
//! Handshake messages are exchanged back to back on the crypto stream with no
//! outer length prefix; a message's own index tells how long it is. This codec
//! lets that stream be driven through `FramedRead`/`FramedWrite`.

use crate::config::HandshakeConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::message::HandshakeMessage;
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct HandshakeCodec {
    limits: HandshakeConfig,
}

impl HandshakeCodec {
    pub fn new(limits: HandshakeConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &HandshakeConfig {
        &self.limits
    }
}

impl Decoder for HandshakeCodec {
    type Item = HandshakeMessage;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let Some(frame_len) = HandshakeMessage::frame_len(src, &self.limits)? else {
            return Ok(None);
        };

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(frame_len).freeze();
        let message = HandshakeMessage::parse_with_limits(&mut frame, &self.limits)?;
        trace!(tag = %message.tag, frame_len, "Decoded handshake frame");
        Ok(Some(message))
    }
}

impl Encoder<HandshakeMessage> for HandshakeCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: HandshakeMessage, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&HandshakeMessage>::encode(self, &item, dst)
    }
}

impl Encoder<&HandshakeMessage> for HandshakeCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &HandshakeMessage, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(item.encoded_len());
        item.write(dst)
    }
}
