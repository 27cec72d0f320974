//! Protocol versions and their four-byte wire tags.
//!
//! Versions travel as `Q0` followed by two ASCII digits (`Q034` is version 34).
//! A tag that does not follow this pattern is structurally invalid, which is a
//! different failure from a well-formed tag naming a version we don't speak.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A protocol version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u32);

/// Versions this implementation speaks, oldest first.
pub const SUPPORTED_VERSIONS: [Version; 3] = [Version::Q034, Version::Q035, Version::Q036];

impl Version {
    /// Sentinel for "no particular version": headers written against it carry
    /// no version tag.
    pub const UNSPECIFIED: Version = Version(0);

    pub const Q034: Version = Version(34);
    pub const Q035: Version = Version(35);
    pub const Q036: Version = Version(36);

    /// Wrap a raw version number.
    pub const fn new(number: u32) -> Self {
        Version(number)
    }

    pub const fn number(self) -> u32 {
        self.0
    }

    pub fn is_unspecified(self) -> bool {
        self == Version::UNSPECIFIED
    }

    /// Whether this version is in [`SUPPORTED_VERSIONS`].
    pub fn is_supported(self) -> bool {
        SUPPORTED_VERSIONS.contains(&self)
    }

    /// Decode a wire tag of the form `Q0` + two ASCII digits.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidVersionTag` for anything else, including
    /// `Q000`, which would collide with [`Version::UNSPECIFIED`].
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        match tag {
            [b'Q', b'0', hi, lo] if hi.is_ascii_digit() && lo.is_ascii_digit() => {
                let number = u32::from(hi - b'0') * 10 + u32::from(lo - b'0');
                if number == 0 {
                    return Err(ProtocolError::InvalidVersionTag(tag));
                }
                Ok(Version(number))
            }
            _ => Err(ProtocolError::InvalidVersionTag(tag)),
        }
    }

    /// Encode as a wire tag.
    ///
    /// Only numbers below 100 have a tag; others yield `None`, as does
    /// [`Version::UNSPECIFIED`].
    pub fn to_tag(self) -> Option<[u8; 4]> {
        if self.is_unspecified() || self.0 > 99 {
            return None;
        }
        // Both digits are < 10, the casts cannot truncate
        let hi = (self.0 / 10) as u8;
        let lo = (self.0 % 10) as u8;
        Some([b'Q', b'0', b'0' + hi, b'0' + lo])
    }
}

/// Pick the highest version present in both lists.
///
/// Used during version negotiation to answer a peer's offer.
pub fn choose_supported(ours: &[Version], theirs: &[Version]) -> Option<Version> {
    ours.iter()
        .copied()
        .filter(|v| !v.is_unspecified() && theirs.contains(v))
        .max()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_tag() {
            Some(tag) => tag.iter().try_for_each(|&b| write!(f, "{}", b as char)),
            None if self.is_unspecified() => f.write_str("unspecified"),
            None => write!(f, "#{}", self.0),
        }
    }
}

impl FromStr for Version {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 4] = s
            .trim()
            .as_bytes()
            .try_into()
            .map_err(|_| ProtocolError::ConfigError(format!("Invalid version: '{s}'")))?;
        Version::from_tag(bytes)
    }
}
