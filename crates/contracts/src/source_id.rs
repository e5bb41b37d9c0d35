//! SourceId - sensor node identifier
//!
//! A small positive integer distinguishing one sensor node's stream from
//! another. Copy-cheap, ordered, usable as a map key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of one physical sensor node's data stream.
///
/// # Examples
/// ```
/// use contracts::SourceId;
///
/// let id = SourceId::new(1);
/// assert_eq!(id.get(), 1);
/// assert_eq!(id.to_string(), "1");
/// assert_eq!("2".parse::<SourceId>().unwrap(), SourceId::new(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(u16);

impl SourceId {
    /// Create a new SourceId.
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the underlying integer.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Log file name for this source (`source-<id>.jsonl`).
    pub fn log_file_name(self) -> String {
        format!("source-{}.jsonl", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SourceId {
    #[inline]
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl FromStr for SourceId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>().map(Self)
    }
}
