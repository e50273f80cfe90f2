//! Entity types extracted from raw API records
//!
//! The crawler holds no long-lived entity store: values of these types are
//! built from a raw JSON record, handed to the graph store, and dropped.
//! Identity is the platform-assigned identifier; every other field is a
//! mutable snapshot with last-write-wins semantics.

pub(crate) mod extract;

pub use extract::{extract_comment, extract_post, extract_user, post_author_id, SchemaError};

/// Fallback value for a comment whose client label is absent
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A platform user profile snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable platform-assigned identifier
    pub id: String,

    /// Display name
    pub screen_name: String,

    /// Free-form location string
    pub location: String,

    /// Profile description
    pub description: String,

    /// Follower count at crawl time
    pub followers_count: u64,

    /// Friend (following) count at crawl time
    pub friends_count: u64,

    /// Platform gender tag
    pub gender: String,
}

/// A post, possibly itself a repost of another post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Stable platform-assigned identifier
    pub id: String,

    /// Raw post text
    pub text_raw: String,

    /// Creation timestamp as reported by the platform
    pub created_at: String,
}

/// A comment, attached to exactly one post and authored by exactly one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Stable platform-assigned identifier
    pub id: String,

    /// Raw comment text
    pub text_raw: String,

    /// Source/client label, [`UNKNOWN_SOURCE`] when absent
    pub source: String,

    /// Creation timestamp as reported by the platform
    pub created_at: String,
}
