//! Common types used throughout naocoin.

pub mod casino;

/// Opaque platform identifier of a user.
pub type UserId = u64;

/// Opaque platform identifier of a channel (direct-message channels included).
pub type ChannelId = u64;
