//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `ts` is milliseconds since the Unix epoch (i64), stamped at ingestion when
//!   the producer does not supply one
//! - Timestamps are not enforced monotonic; out-of-order arrival is tolerated

mod blueprint;
mod error;
mod record;
mod sink;
mod source_id;

pub use blueprint::*;
pub use error::*;
pub use record::*;
pub use sink::*;
pub use source_id::SourceId;
