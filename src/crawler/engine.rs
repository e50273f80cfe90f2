//! Frontier traversal engine - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop that:
//! - Drains the frontier queue of pending post identifiers
//! - Expands each post: detail + author, then reposts, likes, comments
//! - Materializes every discovered entity and edge through the graph store
//! - Feeds newly discovered repost identifiers back into the frontier
//!
//! A failed expansion is logged and skipped so one bad post cannot stop the
//! traversal of the remaining queue. All fetching is strictly sequential;
//! the fixed inter-request delays and the declared-total accounting of the
//! pager both depend on that.

use crate::api::{drain_by_page, drain_by_token, ApiClient};
use crate::config::{ApiConfig, Config};
use crate::crawler::frontier::Frontier;
use crate::crawler::user_cache::UserCache;
use crate::graph::GraphStore;
use crate::model::{extract, extract_comment, extract_post, extract_user, post_author_id};
use crate::model::{Comment, Post, User};
use crate::Result;
use std::time::{Duration, Instant};

/// Fixed inter-request delays observed during a crawl
#[derive(Debug, Clone, Copy)]
struct Throttle {
    /// Between successive page fetches of one paged endpoint
    page_delay: Duration,

    /// After each repost's detail fetch within a page
    item_delay: Duration,

    /// Between a post detail fetch and its author profile fetch
    detail_delay: Duration,
}

impl Throttle {
    fn from_config(config: &ApiConfig) -> Self {
        Self {
            page_delay: Duration::from_millis(config.page_delay_ms),
            item_delay: Duration::from_millis(config.item_delay_ms),
            detail_delay: Duration::from_millis(config.detail_delay_ms),
        }
    }
}

/// Counters accumulated over one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Frontier items fully expanded
    pub posts_expanded: u64,

    /// Frontier items whose expansion failed and was skipped
    pub posts_failed: u64,

    /// Reposts materialized
    pub reposts: u64,

    /// Like edges materialized
    pub likes: u64,

    /// Comments materialized
    pub comments: u64,
}

/// Everything produced by expanding one frontier item
struct Expansion {
    /// Repost identifiers to enqueue for their own expansion
    discovered: Vec<String>,
    reposts: u64,
    likes: u64,
    comments: u64,
}

/// Breadth-first traversal engine over the post/repost graph
///
/// Generic over the graph store backend so tests can crawl into memory.
pub struct Engine<G> {
    api: ApiClient,
    graph: G,
    users: UserCache,
    frontier: Frontier,
    throttle: Throttle,
    stats: CrawlStats,
}

impl<G: GraphStore> Engine<G> {
    /// Creates an engine from the loaded configuration and a graph store
    ///
    /// The user cache is created here and lives for exactly one run.
    pub fn new(config: &Config, graph: G) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            api,
            graph,
            users: UserCache::new(),
            frontier: Frontier::new(),
            throttle: Throttle::from_config(&config.api),
            stats: CrawlStats::default(),
        })
    }

    /// Returns the graph store backend
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Consumes the engine and returns the graph store backend
    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Runs the traversal to completion from the given seed identifiers
    ///
    /// Terminates when the frontier drains. Expansion failures are counted
    /// and skipped; only setup errors abort the run.
    pub async fn run(&mut self, seeds: Vec<String>) -> Result<CrawlStats> {
        for seed in seeds {
            self.frontier.enqueue(seed);
        }

        let start = Instant::now();

        while let Some(id) = self.frontier.next() {
            tracing::info!("Expanding post ID: {}", id);

            match self.expand(&id).await {
                Ok(expansion) => {
                    self.stats.posts_expanded += 1;
                    self.stats.reposts += expansion.reposts;
                    self.stats.likes += expansion.likes;
                    self.stats.comments += expansion.comments;

                    let found = expansion.discovered.len();
                    for repost_id in expansion.discovered {
                        self.frontier.enqueue(repost_id);
                    }

                    tracing::info!(
                        "Finished post ID: {} ({} reposts discovered, {} pending)",
                        id,
                        found,
                        self.frontier.len()
                    );
                }
                Err(e) => {
                    self.stats.posts_failed += 1;
                    tracing::error!("Failed to expand post {}: {}", id, e);
                }
            }
        }

        tracing::info!(
            "Crawl complete: {} posts expanded ({} failed), {} reposts, {} likes, {} comments, {} users fetched in {:?}",
            self.stats.posts_expanded,
            self.stats.posts_failed,
            self.stats.reposts,
            self.stats.likes,
            self.stats.comments,
            self.users.len(),
            start.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Expands one post: author, reposts, likes, comments
    ///
    /// Returns the repost identifiers discovered along the way; the caller
    /// enqueues them so siblings are expanded strictly after this post.
    async fn expand(&self, lookup_id: &str) -> Result<Expansion> {
        let api = &self.api;
        let users = &self.users;
        let throttle = self.throttle;

        // The post itself and its author
        let (author, post) = fetch_post(api, users, throttle, lookup_id).await?;
        self.graph.upsert_user(&author).await?;
        self.graph.upsert_post(&post, &author.id).await?;

        let post_id: &str = &post.id;

        // Reposts: each one is fetched in full, materialized, and queued for
        // its own future expansion. A failed detail fetch skips that repost
        // only.
        tracing::info!("Fetching reposts for post ID: {}", post_id);
        let reposts: Vec<(String, User, Post)> = drain_by_page(
            1,
            throttle.page_delay,
            move |page| api.repost_page(post_id, page),
            move |item| async move {
                let mblogid = extract::id_field(&item, "repost", "mblogid")?;
                let (repost_author, repost) = fetch_post(api, users, throttle, &mblogid).await?;
                tokio::time::sleep(throttle.item_delay).await;
                Ok((mblogid, repost_author, repost))
            },
        )
        .await?;

        let mut discovered = Vec::with_capacity(reposts.len());
        let repost_count = reposts.len() as u64;
        for (mblogid, repost_author, repost) in reposts {
            self.graph.upsert_user(&repost_author).await?;
            self.graph.upsert_post(&repost, &repost_author.id).await?;
            self.graph
                .link_repost(&repost_author.id, &repost.id, post_id)
                .await?;
            discovered.push(mblogid);
        }

        // Likers
        tracing::info!("Fetching likes for post ID: {}", post_id);
        let likers: Vec<User> = drain_by_page(
            1,
            throttle.page_delay,
            move |page| api.like_page(post_id, page),
            move |item| async move {
                let raw = extract::field(&item, "like", "user")?;
                Ok(extract_user(raw)?)
            },
        )
        .await?;

        for liker in &likers {
            self.graph.upsert_user(liker).await?;
            self.graph.link_like(&liker.id, post_id).await?;
        }

        // Comments
        tracing::info!("Fetching comments for post ID: {}", post_id);
        let comments: Vec<(User, Comment)> = drain_by_token(
            String::new(),
            throttle.page_delay,
            move |max_id| async move { api.comment_page(post_id, &max_id).await },
            move |item| async move {
                let commenter = extract_user(extract::field(&item, "comment", "user")?)?;
                let comment = extract_comment(&item)?;
                Ok((commenter, comment))
            },
        )
        .await?;

        for (commenter, comment) in &comments {
            self.graph.upsert_user(commenter).await?;
            self.graph
                .upsert_comment(comment, &commenter.id, post_id)
                .await?;
        }

        Ok(Expansion {
            discovered,
            reposts: repost_count,
            likes: likers.len() as u64,
            comments: comments.len() as u64,
        })
    }
}

/// Fetches a post's detail record and resolves its author through the cache
async fn fetch_post(
    api: &ApiClient,
    users: &UserCache,
    throttle: Throttle,
    id: &str,
) -> Result<(User, Post)> {
    tracing::info!("Fetching post details for post ID: {}", id);
    let raw = api.post_detail(id).await?;
    let post = extract_post(&raw)?;
    let author_id = post_author_id(&raw)?;

    tokio::time::sleep(throttle.detail_delay).await;
    let author = users.resolve(api, &author_id).await?;

    Ok((author, post))
}
