//! Graph store trait
//!
//! The traversal engine writes through this interface one entity or edge at
//! a time. Implementations must be upserts: calling any operation again with
//! an identifier already present updates fields in place and never creates
//! duplicate nodes or edges.

use crate::graph::GraphResult;
use crate::model::{Comment, Post, User};
use async_trait::async_trait;

/// Trait for graph store backends
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates or updates a user node; non-identity fields are
    /// last-write-wins snapshots
    async fn upsert_user(&self, user: &User) -> GraphResult<()>;

    /// Creates or updates a post node and its `AUTHORED` edge from the
    /// authoring user
    ///
    /// The author is expected to have been upserted already; the edge is
    /// merged in the same operation.
    async fn upsert_post(&self, post: &Post, author_id: &str) -> GraphResult<()>;

    /// Creates or updates a comment node, its `AUTHORED` edge from the
    /// commenting user, and its `COMMENTS_ON` edge to the post
    async fn upsert_comment(
        &self,
        comment: &Comment,
        author_id: &str,
        post_id: &str,
    ) -> GraphResult<()>;

    /// Records that `repost_id` is a repost of `original_id`, authored by
    /// `author_id`
    async fn link_repost(
        &self,
        author_id: &str,
        repost_id: &str,
        original_id: &str,
    ) -> GraphResult<()>;

    /// Records that `user_id` likes `post_id`
    async fn link_like(&self, user_id: &str, post_id: &str) -> GraphResult<()>;
}
