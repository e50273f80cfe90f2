//! In-memory graph store
//!
//! Backend used by the test suite to assert on materialized graph state
//! without a database. Upsert semantics match the Neo4j backend: nodes are
//! keyed by identifier with last-write-wins fields, edges live in sets so
//! repeated writes cannot duplicate them.

use crate::graph::{GraphResult, GraphStore};
use crate::model::{Comment, Post, User};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryGraphInner {
    users: HashMap<String, User>,
    posts: HashMap<String, Post>,
    comments: HashMap<String, Comment>,
    /// First-upsert order of post ids
    post_order: Vec<String>,
    /// (user_id, entity_id)
    authored: HashSet<(String, String)>,
    /// (repost_id, original_id)
    repost_of: HashSet<(String, String)>,
    /// (user_id, post_id)
    likes: HashSet<(String, String)>,
    /// (comment_id, post_id)
    comments_on: HashSet<(String, String)>,
}

/// Graph store keeping everything in process memory
#[derive(Debug, Default)]
pub struct MemoryGraph {
    inner: Mutex<MemoryGraphInner>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.inner.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.inner.lock().unwrap().comments.len()
    }

    /// Returns the stored snapshot of a user, if present
    pub fn user(&self, id: &str) -> Option<User> {
        self.inner.lock().unwrap().users.get(id).cloned()
    }

    /// Returns the stored snapshot of a post, if present
    pub fn post(&self, id: &str) -> Option<Post> {
        self.inner.lock().unwrap().posts.get(id).cloned()
    }

    /// Post ids in the order their nodes were first upserted
    pub fn post_order(&self) -> Vec<String> {
        self.inner.lock().unwrap().post_order.clone()
    }

    pub fn has_authored_edge(&self, user_id: &str, entity_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .authored
            .contains(&(user_id.to_string(), entity_id.to_string()))
    }

    pub fn has_repost_edge(&self, repost_id: &str, original_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .repost_of
            .contains(&(repost_id.to_string(), original_id.to_string()))
    }

    pub fn has_like_edge(&self, user_id: &str, post_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .likes
            .contains(&(user_id.to_string(), post_id.to_string()))
    }

    pub fn has_comment_edge(&self, comment_id: &str, post_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .comments_on
            .contains(&(comment_id.to_string(), post_id.to_string()))
    }

    pub fn like_edge_count(&self) -> usize {
        self.inner.lock().unwrap().likes.len()
    }

    pub fn repost_edge_count(&self) -> usize {
        self.inner.lock().unwrap().repost_of.len()
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn upsert_user(&self, user: &User) -> GraphResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn upsert_post(&self, post: &Post, author_id: &str) -> GraphResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.posts.contains_key(&post.id) {
            inner.post_order.push(post.id.clone());
        }
        inner.posts.insert(post.id.clone(), post.clone());
        inner
            .authored
            .insert((author_id.to_string(), post.id.clone()));
        Ok(())
    }

    async fn upsert_comment(
        &self,
        comment: &Comment,
        author_id: &str,
        post_id: &str,
    ) -> GraphResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.comments.insert(comment.id.clone(), comment.clone());
        inner
            .authored
            .insert((author_id.to_string(), comment.id.clone()));
        inner
            .comments_on
            .insert((comment.id.clone(), post_id.to_string()));
        Ok(())
    }

    async fn link_repost(
        &self,
        author_id: &str,
        repost_id: &str,
        original_id: &str,
    ) -> GraphResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .authored
            .insert((author_id.to_string(), repost_id.to_string()));
        inner
            .repost_of
            .insert((repost_id.to_string(), original_id.to_string()));
        Ok(())
    }

    async fn link_like(&self, user_id: &str, post_id: &str) -> GraphResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .likes
            .insert((user_id.to_string(), post_id.to_string()));
        Ok(())
    }
}
