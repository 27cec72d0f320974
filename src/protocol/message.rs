//! # Handshake Messages
//!
//! Every handshake exchange (CHLO, REJ, SHLO, SCFG, ...) uses the same envelope:
//! a message tag followed by a dictionary from [`Tag`] to opaque bytes.
//!
//! ## Wire Format
//! ```text
//! [MessageTag(4)] [Count(2)] [Padding(2)]
//! [Tag(4)] [EndOffset(4)]   x Count, ascending by tag value
//! [Value bytes...]          concatenated in index order
//! ```
//! All integers are little-endian. End offsets are cumulative and relative to
//! the start of the value area, so a reader can locate any value with one pass
//! over the index.
//!
//! ## Security
//! - Entry count and per-value length are bounded before anything is allocated
//! - Offsets must be monotonic; duplicate tags are rejected
//! - Decoded values are copied out, so a message never borrows the receive buffer

use crate::config::HandshakeConfig;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::tag::Tag;
use bytes::{Buf, BufMut};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Length of the message tag, entry count and padding.
pub const MESSAGE_HEADER_LEN: usize = 8;

/// Length of one index entry (tag + end offset).
pub const INDEX_ENTRY_LEN: usize = 8;

/// A decoded handshake message.
///
/// The map is ordered by tag value, which is exactly the order the wire format
/// requires, so encoding never has to sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    pub tag: Tag,
    pub data: BTreeMap<Tag, Vec<u8>>,
}

impl HandshakeMessage {
    /// Create an empty message with the given tag
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            data: BTreeMap::new(),
        }
    }

    /// Create a message from an existing tag map
    pub fn with_data(tag: Tag, data: BTreeMap<Tag, Vec<u8>>) -> Self {
        Self { tag, data }
    }

    /// Set a value, returning the previous one for this tag if any
    pub fn insert(&mut self, tag: Tag, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.data.insert(tag, value.into())
    }

    pub fn get(&self, tag: Tag) -> Option<&[u8]> {
        self.data.get(&tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes [`write`](Self::write) will emit
    pub fn encoded_len(&self) -> usize {
        MESSAGE_HEADER_LEN
            + self.data.len() * INDEX_ENTRY_LEN
            + self.data.values().map(Vec::len).sum::<usize>()
    }

    /// Serialize into `buf`.
    ///
    /// Nothing is written if the message cannot be represented.
    ///
    /// # Errors
    /// - `ProtocolError::TooManyEntries` if the count does not fit 16 bits
    /// - `ProtocolError::MessageTooLarge` if the offsets do not fit 32 bits
    pub fn write<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let count = self.data.len();
        let count_field = u16::try_from(count).map_err(|_| ProtocolError::TooManyEntries(count))?;

        let values_len: usize = self.data.values().map(Vec::len).sum();
        if u32::try_from(values_len).is_err() {
            return Err(ProtocolError::MessageTooLarge(values_len));
        }

        buf.put_u32_le(self.tag.as_u32());
        buf.put_u16_le(count_field);
        buf.put_u16_le(0);

        let mut end = 0u32;
        for (tag, value) in &self.data {
            // Sum fits u32, so every prefix does too
            end += value.len() as u32;
            buf.put_u32_le(tag.as_u32());
            buf.put_u32_le(end);
        }

        for value in self.data.values() {
            buf.put_slice(value);
        }

        Ok(())
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out)?;
        Ok(out)
    }

    /// Decode a message using the default limits.
    ///
    /// Consumes exactly one message from `buf`; anything after it is left alone.
    pub fn parse<B: Buf>(buf: &mut B) -> Result<Self> {
        Self::parse_with_limits(buf, &HandshakeConfig::default())
    }

    /// Decode a message, enforcing the entry count and value length limits.
    ///
    /// # Errors
    /// - `ProtocolError::UnexpectedEof` if the input ends early
    /// - `ProtocolError::TooManyEntries` / `ProtocolError::ValueTooLong` on limit violations
    /// - `ProtocolError::MalformedMessage` if the end offsets decrease
    /// - `ProtocolError::DuplicateTag` if a tag appears twice
    #[instrument(level = "trace", skip_all)]
    pub fn parse_with_limits<B: Buf>(buf: &mut B, limits: &HandshakeConfig) -> Result<Self> {
        ensure_remaining(buf, MESSAGE_HEADER_LEN)?;
        let tag = Tag::from_u32(buf.get_u32_le());
        let count = buf.get_u16_le() as usize;
        buf.advance(2);

        if count > limits.max_entries {
            debug!(%tag, count, "Handshake message has too many entries");
            return Err(ProtocolError::TooManyEntries(count));
        }

        ensure_remaining(buf, count * INDEX_ENTRY_LEN)?;
        let index: Vec<(Tag, u32)> = (0..count)
            .map(|_| (Tag::from_u32(buf.get_u32_le()), buf.get_u32_le()))
            .collect();

        let mut data = BTreeMap::new();
        let mut start = 0usize;
        for (entry, end) in index {
            let end = end as usize;
            let len = value_len(entry, start, end, limits)?;
            ensure_remaining(buf, len)?;

            let mut value = vec![0u8; len];
            buf.copy_to_slice(&mut value);
            if data.insert(entry, value).is_some() {
                return Err(ProtocolError::DuplicateTag(entry));
            }
            start = end;
        }

        debug!(%tag, entries = data.len(), "Parsed handshake message");
        Ok(Self { tag, data })
    }

    /// Decode a message that must span all of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let message = Self::parse(&mut cursor)?;
        if cursor.has_remaining() {
            return Err(ProtocolError::TrailingBytes(cursor.remaining()));
        }
        Ok(message)
    }

    /// Total length of the message starting at `bytes[0]`, if enough of it is
    /// buffered to tell.
    ///
    /// Returns `Ok(None)` while the header or index is still incomplete. The
    /// index is validated against `limits` so an oversized message is refused
    /// before its values are buffered.
    pub fn frame_len(bytes: &[u8], limits: &HandshakeConfig) -> Result<Option<usize>> {
        if bytes.len() < MESSAGE_HEADER_LEN {
            return Ok(None);
        }

        let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
        if count > limits.max_entries {
            return Err(ProtocolError::TooManyEntries(count));
        }

        let index_end = MESSAGE_HEADER_LEN + count * INDEX_ENTRY_LEN;
        let Some(index) = bytes.get(MESSAGE_HEADER_LEN..index_end) else {
            return Ok(None);
        };

        let mut start = 0usize;
        for entry in index.chunks_exact(INDEX_ENTRY_LEN) {
            let tag = Tag::from_bytes([entry[0], entry[1], entry[2], entry[3]]);
            let end = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]) as usize;
            value_len(tag, start, end, limits)?;
            start = end;
        }

        Ok(Some(index_end + start))
    }
}

/// Length of the value spanning `start..end`, checked against the limits
fn value_len(tag: Tag, start: usize, end: usize, limits: &HandshakeConfig) -> Result<usize> {
    let len = end
        .checked_sub(start)
        .ok_or(ProtocolError::MalformedMessage(constants::ERR_OFFSETS_DECREASING))?;
    if len > limits.max_value_length {
        debug!(%tag, len, "Handshake value exceeds length limit");
        return Err(ProtocolError::ValueTooLong { tag, len });
    }
    Ok(len)
}

#[inline]
fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ProtocolError::UnexpectedEof);
    }
    Ok(())
}
