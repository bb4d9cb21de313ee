//! Integration Tests: GraphQL schema
//!
//! Executes queries and mutations against the schema over in-memory stores.

mod common;

use async_graphql::{Request, Variables};
use common::Harness;
use discussion_service::schema::{AppSchema, PageSizeLimits};
use serde_json::{json, Value};

async fn execute(schema: &AppSchema, query: &str, variables: Value) -> Value {
    let request = Request::new(query).variables(Variables::from_json(variables));
    let response = schema.execute(request).await;
    serde_json::to_value(&response).expect("response serializes")
}

fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

async fn create_post(schema: &AppSchema, title: &str, allow_comments: bool) -> String {
    let response = execute(
        schema,
        r#"mutation($title: String!, $allow: Boolean!) {
            createPost(title: $title, content: "body", author: "alice", allowComments: $allow) { id }
        }"#,
        json!({ "title": title, "allow": allow_comments }),
    )
    .await;
    response["data"]["createPost"]["id"]
        .as_str()
        .expect("post id")
        .to_string()
}

async fn create_comment(
    schema: &AppSchema,
    post_id: &str,
    parent_id: Option<&str>,
    text: &str,
) -> Value {
    execute(
        schema,
        r#"mutation($postId: String!, $parentId: String, $text: String!) {
            createComment(postId: $postId, parentId: $parentId, text: $text, author: "bob") {
                id postId parentId text author repliesCount
            }
        }"#,
        json!({ "postId": post_id, "parentId": parent_id, "text": text }),
    )
    .await
}

#[tokio::test]
async fn test_create_and_fetch_post() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    let id = create_post(&schema, "Hello", true).await;

    let response = execute(
        &schema,
        r#"query($id: String!) { post(id: $id) { id title author allowComments createdAt } }"#,
        json!({ "id": id }),
    )
    .await;

    assert!(response.get("errors").is_none(), "{}", response);
    assert_eq!(response["data"]["post"]["title"], "Hello");
    assert_eq!(response["data"]["post"]["allowComments"], true);
}

#[tokio::test]
async fn test_missing_post_reports_not_found() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    let response = execute(&schema, r#"{ post(id: "missing") { id } }"#, json!({})).await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_posts_default_newest_first() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    for title in ["first", "second", "third"] {
        create_post(&schema, title, true).await;
    }

    let response = execute(&schema, "{ posts { title } }", json!({})).await;
    let titles: Vec<&str> = response["data"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    let response = execute(
        &schema,
        "{ posts(first: 2, sortOrder: ASC) { title } }",
        json!({}),
    )
    .await;
    assert_eq!(response["data"]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(response["data"]["posts"][0]["title"], "first");
}

#[tokio::test]
async fn test_comment_connection_pages_through_level() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    let post_id = create_post(&schema, "P1", true).await;

    let mut ids = Vec::new();
    for text in ["A", "B", "C"] {
        let response = create_comment(&schema, &post_id, None, text).await;
        ids.push(response["data"]["createComment"]["id"].as_str().unwrap().to_string());
    }
    create_comment(&schema, &post_id, Some(&ids[0]), "D").await;

    let query = r#"query($postId: String!, $after: String) {
        comments(postId: $postId, first: 2, after: $after) {
            edges { cursor node { id text repliesCount } }
            pageInfo { hasNextPage hasPreviousPage endCursor }
            totalCount
        }
    }"#;

    let first = execute(&schema, query, json!({ "postId": post_id })).await;
    let conn = &first["data"]["comments"];
    assert_eq!(conn["totalCount"], 3);
    assert_eq!(conn["edges"][0]["node"]["text"], "A");
    assert_eq!(conn["edges"][0]["node"]["repliesCount"], 1);
    assert_eq!(conn["edges"][1]["cursor"], ids[1].as_str());
    assert_eq!(conn["pageInfo"]["hasNextPage"], true);
    assert_eq!(conn["pageInfo"]["hasPreviousPage"], false);
    assert_eq!(conn["pageInfo"]["endCursor"], ids[1].as_str());

    let second = execute(
        &schema,
        query,
        json!({ "postId": post_id, "after": conn["pageInfo"]["endCursor"] }),
    )
    .await;
    let conn = &second["data"]["comments"];
    assert_eq!(conn["edges"].as_array().unwrap().len(), 1);
    assert_eq!(conn["edges"][0]["node"]["text"], "C");
    assert_eq!(conn["pageInfo"]["hasNextPage"], false);
    assert_eq!(conn["pageInfo"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn test_comment_errors_carry_codes() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    let open = create_post(&schema, "open", true).await;
    let closed = create_post(&schema, "closed", false).await;
    let other = create_post(&schema, "other", true).await;

    let disabled = create_comment(&schema, &closed, None, "hi").await;
    assert_eq!(error_code(&disabled), Some("COMMENTS_DISABLED"));

    let long_text = "x".repeat(2001);
    let too_long = create_comment(&schema, &open, None, &long_text).await;
    assert_eq!(error_code(&too_long), Some("TEXT_TOO_LONG"));

    let orphan = create_comment(&schema, &open, Some("ghost"), "hi").await;
    assert_eq!(error_code(&orphan), Some("PARENT_NOT_FOUND"));

    let root = create_comment(&schema, &open, None, "root").await;
    let root_id = root["data"]["createComment"]["id"].as_str().unwrap();
    let wrong_post = create_comment(&schema, &other, Some(root_id), "hi").await;
    assert_eq!(error_code(&wrong_post), Some("WRONG_PARENT_POST"));

    let bad_cursor = execute(
        &schema,
        r#"query($postId: String!) { comments(postId: $postId, after: "nope") { totalCount } }"#,
        json!({ "postId": open }),
    )
    .await;
    assert_eq!(error_code(&bad_cursor), Some("INVALID_CURSOR"));
}

#[tokio::test]
async fn test_first_is_clamped_to_max_page_size() {
    let limits = PageSizeLimits {
        default_size: 2,
        max_size: 3,
    };
    let schema = Harness::memory().schema(limits);
    let post_id = create_post(&schema, "P", true).await;
    for i in 0..5 {
        create_comment(&schema, &post_id, None, &format!("c{}", i)).await;
    }

    let query = r#"query($postId: String!, $first: Int) {
        comments(postId: $postId, first: $first) { edges { cursor } pageInfo { hasNextPage } }
    }"#;

    let default_page = execute(&schema, query, json!({ "postId": post_id })).await;
    assert_eq!(default_page["data"]["comments"]["edges"].as_array().unwrap().len(), 2);

    let clamped = execute(&schema, query, json!({ "postId": post_id, "first": 50 })).await;
    assert_eq!(clamped["data"]["comments"]["edges"].as_array().unwrap().len(), 3);
    assert_eq!(clamped["data"]["comments"]["pageInfo"]["hasNextPage"], true);
}

#[tokio::test]
async fn test_post_with_comments() {
    let schema = Harness::memory().schema(PageSizeLimits::default());
    let post_id = create_post(&schema, "P", true).await;
    let a = create_comment(&schema, &post_id, None, "A").await;
    let a_id = a["data"]["createComment"]["id"].as_str().unwrap().to_string();
    create_comment(&schema, &post_id, None, "B").await;
    create_comment(&schema, &post_id, Some(&a_id), "reply 1").await;
    create_comment(&schema, &post_id, Some(&a_id), "reply 2").await;

    let response = execute(
        &schema,
        r#"query($postId: String!) {
            postWithComments(postId: $postId) {
                post { id title }
                comments { text repliesCount }
                totalComments
            }
        }"#,
        json!({ "postId": post_id }),
    )
    .await;

    let data = &response["data"]["postWithComments"];
    assert_eq!(data["post"]["title"], "P");
    assert_eq!(data["totalComments"], 2);
    assert_eq!(data["comments"][0]["text"], "A");
    assert_eq!(data["comments"][0]["repliesCount"], 2);
    assert_eq!(data["comments"][1]["repliesCount"], 0);

    let count = execute(
        &schema,
        r#"query($postId: String!, $parentId: String) { commentsCount(postId: $postId, parentId: $parentId) }"#,
        json!({ "postId": post_id, "parentId": a_id }),
    )
    .await;
    assert_eq!(count["data"]["commentsCount"], 2);
}
