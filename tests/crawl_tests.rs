//! Integration tests for the crawler
//!
//! These tests use wiremock to mock the remote API surface and an in-memory
//! graph store to assert on materialized graph state end-to-end.

use ripplemap::config::{ApiConfig, Config, GraphConfig};
use ripplemap::graph::MemoryGraph;
use ripplemap::Engine;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn test_config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            user_agent: "test-agent".to_string(),
            page_size: 10,
            page_delay_ms: 0, // No throttling in tests
            item_delay_ms: 0,
            detail_delay_ms: 0,
            request_timeout_secs: 5,
        },
        graph: GraphConfig {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
        },
    }
}

fn user_record(uid: &str, screen_name: &str) -> Value {
    json!({
        "id": uid,
        "screen_name": screen_name,
        "location": "somewhere",
        "description": "",
        "followers_count": 10,
        "friends_count": 5,
        "gender": "f"
    })
}

fn post_body(id: &str, author_uid: &str) -> Value {
    json!({
        "id": id,
        "text_raw": format!("post {}", id),
        "created_at": "Thu Sep 01 12:00:00 +0800 2022",
        "user": { "id": author_uid }
    })
}

async fn mount_show(server: &MockServer, id: &str, author_uid: &str) {
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/show"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_body(id, author_uid)))
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, uid: &str, screen_name: &str) {
    Mock::given(method("GET"))
        .and(path("/ajax/profile/info"))
        .and(query_param("uid", uid))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "user": user_record(uid, screen_name) } })),
        )
        .mount(server)
        .await;
}

async fn mount_reposts(server: &MockServer, id: &str, mblogids: &[&str]) {
    let items: Vec<Value> = mblogids.iter().map(|m| json!({ "mblogid": m })).collect();
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/repostTimeline"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": items,
            "total_number": mblogids.len()
        })))
        .mount(server)
        .await;
}

async fn mount_likes(server: &MockServer, id: &str, likers: &[Value]) {
    let items: Vec<Value> = likers.iter().map(|u| json!({ "user": u })).collect();
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/likeShow"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": items,
            "total_number": likers.len()
        })))
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, id: &str, comments: &[Value]) {
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/buildComments"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": comments,
            "total_number": comments.len(),
            "max_id": 0
        })))
        .mount(server)
        .await;
}

/// Mocks a post with no reposts, likes or comments
async fn mount_no_children(server: &MockServer, id: &str) {
    mount_reposts(server, id, &[]).await;
    mount_likes(server, id, &[]).await;
    mount_comments(server, id, &[]).await;
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = MockServer::start().await;

    // Post 123 by user 1: one repost (456 by user 2), two likers (3, 4),
    // one comment (by user 5)
    mount_show(&server, "123", "1").await;
    mount_show(&server, "456", "2").await;
    mount_profile(&server, "1", "author").await;
    mount_profile(&server, "2", "reposter").await;

    mount_reposts(&server, "123", &["456"]).await;
    mount_likes(
        &server,
        "123",
        &[user_record("3", "liker one"), user_record("4", "liker two")],
    )
    .await;
    mount_comments(
        &server,
        "123",
        &[json!({
            "id": "900",
            "text_raw": "nice",
            "source": "mobile web",
            "created_at": "Thu Sep 01 13:00:00 +0800 2022",
            "user": user_record("5", "commenter")
        })],
    )
    .await;

    mount_no_children(&server, "456").await;

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["123".to_string()]).await.unwrap();

    let graph = engine.graph();
    assert_eq!(graph.user_count(), 5);
    assert_eq!(graph.post_count(), 2);
    assert_eq!(graph.comment_count(), 1);
    assert_eq!(graph.post("123").unwrap().text_raw, "post 123");
    assert_eq!(graph.user("1").unwrap().screen_name, "author");

    assert!(graph.has_repost_edge("456", "123"));
    assert!(graph.has_like_edge("3", "123"));
    assert!(graph.has_like_edge("4", "123"));
    assert!(graph.has_comment_edge("900", "123"));
    assert!(graph.has_authored_edge("1", "123"));
    assert!(graph.has_authored_edge("2", "456"));
    assert!(graph.has_authored_edge("5", "900"));

    assert_eq!(stats.posts_expanded, 2);
    assert_eq!(stats.posts_failed, 0);
    assert_eq!(stats.reposts, 1);
    assert_eq!(stats.likes, 2);
    assert_eq!(stats.comments, 1);
}

#[tokio::test]
async fn test_breadth_first_expansion_order() {
    let server = MockServer::start().await;

    // 100 reposts to 200 and 300; 200 reposts to 400. Breadth-first means
    // both of 100's children are expanded before 200's child.
    for id in ["100", "200", "300", "400"] {
        mount_show(&server, id, "1").await;
        mount_likes(&server, id, &[]).await;
        mount_comments(&server, id, &[]).await;
    }
    mount_profile(&server, "1", "author").await;

    mount_reposts(&server, "100", &["200", "300"]).await;
    mount_reposts(&server, "200", &["400"]).await;
    mount_reposts(&server, "300", &[]).await;
    mount_reposts(&server, "400", &[]).await;

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    assert_eq!(stats.posts_expanded, 4);

    // The order in which repost timelines were requested is the expansion
    // order.
    let requests = server.received_requests().await.unwrap();
    let expansion_order: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == "/ajax/statuses/repostTimeline")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "id")
                .map(|(_, v)| v.into_owned())
        })
        .collect();

    assert_eq!(expansion_order, vec!["100", "200", "300", "400"]);

    // First-upsert order of post nodes matches the traversal order
    assert_eq!(
        engine.graph().post_order(),
        vec!["100", "200", "300", "400"]
    );
}

#[tokio::test]
async fn test_one_bad_repost_does_not_abort_the_batch() {
    let server = MockServer::start().await;

    mount_show(&server, "100", "1").await;
    mount_profile(&server, "1", "author").await;

    // Five reposts; the detail fetch for r3 fails with a server error
    mount_reposts(&server, "100", &["r1", "r2", "r3", "r4", "r5"]).await;
    mount_likes(&server, "100", &[]).await;
    mount_comments(&server, "100", &[]).await;

    for id in ["r1", "r2", "r4", "r5"] {
        mount_show(&server, id, "1").await;
        mount_no_children(&server, id).await;
    }
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/show"))
        .and(query_param("id", "r3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    let graph = engine.graph();

    // The four healthy reposts were materialized and expanded; r3 was
    // skipped without failing anything
    assert_eq!(graph.post_count(), 5);
    assert_eq!(graph.repost_edge_count(), 4);
    assert!(graph.has_repost_edge("r1", "100"));
    assert!(!graph.has_repost_edge("r3", "100"));
    assert_eq!(stats.posts_expanded, 5);
    assert_eq!(stats.posts_failed, 0);
    assert_eq!(stats.reposts, 4);
}

#[tokio::test]
async fn test_pagination_drains_declared_total() {
    let server = MockServer::start().await;

    mount_show(&server, "100", "1").await;
    mount_profile(&server, "1", "author").await;
    mount_reposts(&server, "100", &[]).await;
    mount_comments(&server, "100", &[]).await;

    // 25 likers over three pages of 10; exactly ceil(25/10) fetches
    let likers: Vec<Value> = (0..25)
        .map(|i| user_record(&format!("10{:02}", i), &format!("liker {}", i)))
        .collect();

    for (page, chunk) in likers.chunks(10).enumerate() {
        let items: Vec<Value> = chunk.iter().map(|u| json!({ "user": u })).collect();
        Mock::given(method("GET"))
            .and(path("/ajax/statuses/likeShow"))
            .and(query_param("id", "100"))
            .and(query_param("page", (page + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": items,
                "total_number": 25
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    assert_eq!(stats.likes, 25);
    assert_eq!(engine.graph().like_edge_count(), 25);
    // Mock expectations verify the fetch count when the server drops
}

#[tokio::test]
async fn test_empty_page_ends_pagination_early() {
    let server = MockServer::start().await;

    mount_show(&server, "100", "1").await;
    mount_profile(&server, "1", "author").await;
    mount_reposts(&server, "100", &[]).await;
    mount_comments(&server, "100", &[]).await;

    // The server declares 10 likers but only ever returns 3; the empty
    // second page ends the drain cleanly rather than erroring
    let items: Vec<Value> = (0..3)
        .map(|i| json!({ "user": user_record(&format!("200{}", i), "liker") }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/ajax/statuses/likeShow"))
        .and(query_param("id", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": items,
            "total_number": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ajax/statuses/likeShow"))
        .and(query_param("id", "100"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "total_number": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    assert_eq!(stats.likes, 3);
    assert_eq!(stats.posts_failed, 0);
}

#[tokio::test]
async fn test_repost_cycle_is_expanded_once() {
    let server = MockServer::start().await;

    // 100 and 200 repost each other; each is expanded exactly once
    mount_show(&server, "100", "1").await;
    mount_show(&server, "200", "2").await;
    mount_profile(&server, "1", "first").await;
    mount_profile(&server, "2", "second").await;

    mount_reposts(&server, "100", &["200"]).await;
    mount_reposts(&server, "200", &["100"]).await;
    for id in ["100", "200"] {
        mount_likes(&server, id, &[]).await;
        mount_comments(&server, id, &[]).await;
    }

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    assert_eq!(stats.posts_expanded, 2);
    assert!(engine.graph().has_repost_edge("200", "100"));
    assert!(engine.graph().has_repost_edge("100", "200"));

    // Each repost timeline was drained exactly once despite the cycle
    let requests = server.received_requests().await.unwrap();
    let timeline_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/ajax/statuses/repostTimeline")
        .count();
    assert_eq!(timeline_calls, 2);
}

#[tokio::test]
async fn test_failed_seed_does_not_stop_the_run() {
    let server = MockServer::start().await;

    // First seed's detail fetch fails outright; the second seed still
    // gets crawled
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/show"))
        .and(query_param("id", "bad"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    mount_show(&server, "100", "1").await;
    mount_profile(&server, "1", "author").await;
    mount_no_children(&server, "100").await;

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine
        .run(vec!["bad".to_string(), "100".to_string()])
        .await
        .unwrap();

    assert_eq!(stats.posts_failed, 1);
    assert_eq!(stats.posts_expanded, 1);
    assert_eq!(engine.graph().post_count(), 1);
}

#[tokio::test]
async fn test_users_are_fetched_once_per_run() {
    let server = MockServer::start().await;

    // Both posts share one author; the profile is fetched exactly once
    mount_show(&server, "100", "1").await;
    mount_show(&server, "200", "1").await;

    Mock::given(method("GET"))
        .and(path("/ajax/profile/info"))
        .and(query_param("uid", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "user": user_record("1", "author") } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_reposts(&server, "100", &["200"]).await;
    mount_reposts(&server, "200", &[]).await;
    for id in ["100", "200"] {
        mount_likes(&server, id, &[]).await;
        mount_comments(&server, id, &[]).await;
    }

    let mut engine = Engine::new(&test_config(&server.uri()), MemoryGraph::new()).unwrap();
    let stats = engine.run(vec!["100".to_string()]).await.unwrap();

    assert_eq!(stats.posts_expanded, 2);
    assert_eq!(engine.graph().user_count(), 1);
    // The expect(1) on the profile mock verifies memoization
}

#[tokio::test]
async fn test_reexpanded_entity_converges() {
    let server = MockServer::start().await;

    // Crawling the same seed in two separate runs against one store must
    // not duplicate nodes or edges
    mount_show(&server, "100", "1").await;
    mount_profile(&server, "1", "author").await;
    mount_reposts(&server, "100", &[]).await;
    mount_likes(&server, "100", &[user_record("3", "liker")]).await;
    mount_comments(&server, "100", &[]).await;

    let graph = MemoryGraph::new();
    let config = test_config(&server.uri());

    let mut first = Engine::new(&config, graph).unwrap();
    first.run(vec!["100".to_string()]).await.unwrap();

    // Reuse the same store for a second run
    let mut second = Engine::new(&config, first.into_graph()).unwrap();
    second.run(vec!["100".to_string()]).await.unwrap();

    let graph = second.graph();
    assert_eq!(graph.user_count(), 2);
    assert_eq!(graph.post_count(), 1);
    assert_eq!(graph.like_edge_count(), 1);
}
