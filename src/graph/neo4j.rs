//! Neo4j-backed graph store
//!
//! Writes go through Cypher `MERGE` statements keyed on stable identifiers,
//! so every operation is an upsert. Nodes are stamped with `first_seen` on
//! creation and `last_crawled` on every write, making the last-write-wins
//! snapshots auditable.

use crate::config::GraphConfig;
use crate::graph::{GraphError, GraphResult, GraphStore};
use crate::model::{Comment, Post, User};
use async_trait::async_trait;
use chrono::Utc;
use neo4rs::{query, ConfigBuilder, Graph};

/// Graph store backed by a Neo4j bolt connection
pub struct Neo4jGraph {
    graph: Graph,
}

impl Neo4jGraph {
    /// Connects to the graph database with the configured credentials
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        let db_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .fetch_size(500)
            .max_connections(4)
            .build()
            .map_err(|e| GraphError::Settings(e.to_string()))?;

        let graph = Graph::connect(db_config)
            .await
            .map_err(|source| GraphError::Connect {
                uri: config.uri.clone(),
                source,
            })?;

        Ok(Self { graph })
    }

    /// Ensures uniqueness constraints on entity identifiers exist
    ///
    /// Safe to call on every startup; constraints are created only if
    /// missing.
    pub async fn ensure_constraints(&self) -> GraphResult<()> {
        for cypher in [
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
            "CREATE CONSTRAINT post_id IF NOT EXISTS FOR (p:Post) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT comment_id IF NOT EXISTS FOR (c:Comment) REQUIRE c.id IS UNIQUE",
        ] {
            self.graph.run(query(cypher)).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for Neo4jGraph {
    async fn upsert_user(&self, user: &User) -> GraphResult<()> {
        let q = query(
            "MERGE (u:User {id: $id})
             ON CREATE SET u.first_seen = datetime($ts)
             SET u.screen_name = $screen_name,
                 u.location = $location,
                 u.description = $description,
                 u.followers_count = $followers_count,
                 u.friends_count = $friends_count,
                 u.gender = $gender,
                 u.last_crawled = datetime($ts)",
        )
        .param("id", user.id.as_str())
        .param("screen_name", user.screen_name.as_str())
        .param("location", user.location.as_str())
        .param("description", user.description.as_str())
        .param("followers_count", user.followers_count as i64)
        .param("friends_count", user.friends_count as i64)
        .param("gender", user.gender.as_str())
        .param("ts", Utc::now().to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn upsert_post(&self, post: &Post, author_id: &str) -> GraphResult<()> {
        let q = query(
            "MERGE (p:Post {id: $id})
             ON CREATE SET p.first_seen = datetime($ts)
             SET p.text_raw = $text_raw,
                 p.created_at = $created_at,
                 p.last_crawled = datetime($ts)
             MERGE (u:User {id: $author_id})
             MERGE (u)-[:AUTHORED]->(p)",
        )
        .param("id", post.id.as_str())
        .param("text_raw", post.text_raw.as_str())
        .param("created_at", post.created_at.as_str())
        .param("author_id", author_id)
        .param("ts", Utc::now().to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn upsert_comment(
        &self,
        comment: &Comment,
        author_id: &str,
        post_id: &str,
    ) -> GraphResult<()> {
        let q = query(
            "MERGE (c:Comment {id: $id})
             ON CREATE SET c.first_seen = datetime($ts)
             SET c.text_raw = $text_raw,
                 c.source = $source,
                 c.created_at = $created_at,
                 c.last_crawled = datetime($ts)
             MERGE (u:User {id: $author_id})
             MERGE (p:Post {id: $post_id})
             MERGE (u)-[:AUTHORED]->(c)
             MERGE (c)-[:COMMENTS_ON]->(p)",
        )
        .param("id", comment.id.as_str())
        .param("text_raw", comment.text_raw.as_str())
        .param("source", comment.source.as_str())
        .param("created_at", comment.created_at.as_str())
        .param("author_id", author_id)
        .param("post_id", post_id)
        .param("ts", Utc::now().to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn link_repost(
        &self,
        author_id: &str,
        repost_id: &str,
        original_id: &str,
    ) -> GraphResult<()> {
        let q = query(
            "MERGE (r:Post {id: $repost_id})
             MERGE (o:Post {id: $original_id})
             MERGE (u:User {id: $author_id})
             MERGE (u)-[:AUTHORED]->(r)
             MERGE (r)-[:REPOST_OF]->(o)",
        )
        .param("repost_id", repost_id)
        .param("original_id", original_id)
        .param("author_id", author_id);

        self.graph.run(q).await?;
        Ok(())
    }

    async fn link_like(&self, user_id: &str, post_id: &str) -> GraphResult<()> {
        let q = query(
            "MERGE (u:User {id: $user_id})
             MERGE (p:Post {id: $post_id})
             MERGE (u)-[:LIKES]->(p)",
        )
        .param("user_id", user_id)
        .param("post_id", post_id);

        self.graph.run(q).await?;
        Ok(())
    }
}
