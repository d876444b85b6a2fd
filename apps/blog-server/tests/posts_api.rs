//! Blog posts API resource tests against the in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use async_trait::async_trait;
use blog_core::domain::{Author, BlogPost, BlogPostPatch, NewBlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};
use blog_server::AppState;
use blog_server::handlers::{configure_routes, post_response};
use blog_server::observability::RequestIdMiddleware;
use blog_shared::ErrorResponse;
use blog_shared::dto::{PostListResponse, PostResponse};

const FIRST_NAMES: [&str; 5] = ["Ada", "Grace", "Alan", "Edsger", "Barbara"];
const LAST_NAMES: [&str; 5] = ["Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov"];

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn generate_post_data(n: usize) -> NewBlogPost {
    NewBlogPost {
        author: Author::new(FIRST_NAMES[n % 5], LAST_NAMES[(n / 5) % 5]),
        title: format!("Sentence number {n}"),
        content: format!("Lorem ipsum dolor sit amet, paragraph {n}."),
    }
}

async fn seed_blog_data(state: &AppState) -> Vec<BlogPost> {
    state
        .posts
        .insert_many((1..=10).map(generate_post_data).collect())
        .await
        .unwrap()
}

async fn tear_down(state: &AppState) {
    state.posts.delete_all().await.unwrap();
}

async fn seeded_state() -> AppState {
    let state = AppState::in_memory();
    seed_blog_data(&state).await;
    state
}

async fn any_post(state: &AppState) -> BlogPost {
    state.posts.find_one().await.unwrap().unwrap()
}

/// Store whose every call fails the way a missing table does.
struct BrokenStore;

fn missing_table() -> RepoError {
    RepoError::Query(r#"relation "posts" does not exist"#.to_string())
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for BrokenStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        Err(missing_table())
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError> {
        Err(missing_table())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Err(missing_table())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(missing_table())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        Err(missing_table())
    }
}

#[async_trait]
impl PostRepository for BrokenStore {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        Err(missing_table())
    }

    async fn create(&self, _data: NewBlogPost) -> Result<BlogPost, RepoError> {
        Err(missing_table())
    }

    async fn insert_many(&self, _records: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, RepoError> {
        Err(missing_table())
    }

    async fn update_by_id(&self, _id: Uuid, _patch: BlogPostPatch) -> Result<BlogPost, RepoError> {
        Err(missing_table())
    }
}

#[actix_web::test]
async fn test_get_retrieves_all_posts() {
    let state = seeded_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: PostListResponse = test::read_body_json(resp).await;
    assert_eq!(body.entries.len(), 10);
    assert_eq!(
        body.entries.len() as u64,
        state.posts.count().await.unwrap()
    );

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_get_entries_have_correct_fields() {
    let state = seeded_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body: Value = test::read_body_json(resp).await;
    let entries = body["entries"].as_array().unwrap();
    assert!(!entries.is_empty());
    for entry in entries {
        let entry = entry.as_object().unwrap();
        for key in ["author", "created", "content", "id", "title"] {
            assert!(entry.contains_key(key), "missing key {key}");
        }
    }

    let first: PostResponse = serde_json::from_value(entries[0].clone()).unwrap();
    let stored = state
        .posts
        .find_by_id(first.id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first, post_response(&stored));

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_get_post_by_id() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let post = any_post(&state).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: PostResponse = test::read_body_json(resp).await;
    assert_eq!(body, post_response(&post));

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_get_unknown_post_is_not_found() {
    let state = seeded_state().await;
    let app = init_app!(state);

    for uri in [format!("/posts/{}", Uuid::new_v4()), "/posts/123".to_string()] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, 404);
        assert!(body.message.contains("not found"));
    }

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_post_adds_blog_entry() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let before = chrono::Utc::now() - chrono::Duration::seconds(1);

    let new_entry = json!({
        "author": {"firstName": "Mark", "lastName": "Twain"},
        "title": "T",
        "content": "C",
        "date": "2019-04-01T10:00:00.000Z",
    });

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(&new_entry)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let body: PostResponse = test::read_body_json(resp).await;
    assert!(!body.id.is_empty());
    assert_eq!(location, format!("/posts/{}", body.id));
    assert_eq!(body.author, "Mark Twain");
    assert_eq!(body.title, "T");
    assert_eq!(body.content, "C");

    let created = chrono::DateTime::parse_from_rfc3339(&body.created).unwrap();
    assert!(created >= before);
    assert!(created <= chrono::Utc::now());

    let stored = state
        .posts
        .find_by_id(body.id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.author, Author::new("Mark", "Twain"));
    assert_eq!(post_response(&stored), body);
    assert_eq!(state.posts.count().await.unwrap(), 11);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_post_accepts_formatted_author() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"author": "Mark Twain", "title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: PostResponse = test::read_body_json(resp).await;
    assert_eq!(body.author, "Mark Twain");

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_post_rejects_invalid_entries() {
    let state = seeded_state().await;
    let app = init_app!(state);

    let invalid = [
        (json!({"author": "Mark Twain", "content": "C"}), "title"),
        (json!({"title": "T", "content": "C"}), "author"),
        (json!({"author": "Mark Twain", "title": "T", "content": ""}), "content"),
        (json!({"author": {"firstName": "", "lastName": ""}, "title": "T", "content": "C"}), "author"),
        (json!({"author": "Mark Twain", "title": 42, "content": "C"}), "JSON"),
    ];

    for (payload, field) in invalid {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains(field), "message: {}", body.message);
    }

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(ContentType::json())
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.posts.count().await.unwrap(), 10);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_put_updates_blog_entry() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let entry = any_post(&state).await;

    let update_data = json!({
        "id": entry.id.to_string(),
        "author": "Mark Twain",
        "title": "The Adventures of Huckleberry Finn",
    });

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", entry.id))
        .set_json(&update_data)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: PostResponse = test::read_body_json(resp).await;
    assert_eq!(body.author, "Mark Twain");
    assert_eq!(body.title, "The Adventures of Huckleberry Finn");

    let stored = state.posts.find_by_id(entry.id).await.unwrap().unwrap();
    assert_eq!(stored.author, Author::new("Mark", "Twain"));
    assert_eq!(stored.title, "The Adventures of Huckleberry Finn");
    assert_eq!(stored.content, entry.content);
    assert_eq!(stored.created, entry.created);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_put_partial_update_keeps_other_fields() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let entry = any_post(&state).await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", entry.id))
        .set_json(json!({"title": "New"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", entry.id))
        .to_request();
    let body: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.title, "New");
    assert_eq!(body.content, entry.content);
    assert_eq!(body.author, entry.author.full_name());
    assert_eq!(body.created, post_response(&entry).created);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_put_rejects_invalid_updates() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let entry = any_post(&state).await;
    let uri = format!("/posts/{}", entry.id);

    let invalid = [
        json!({"id": Uuid::new_v4().to_string(), "title": "New"}),
        json!({}),
        json!({"created": "2001-01-01T00:00:00.000Z"}),
        json!({"title": "  "}),
    ];

    for payload in invalid {
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");
    }

    let stored = state.posts.find_by_id(entry.id).await.unwrap().unwrap();
    assert_eq!(stored, entry);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_put_unknown_post_is_not_found() {
    let state = seeded_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", Uuid::new_v4()))
        .set_json(json!({"title": "New"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_delete_removes_blog_entry() {
    let state = seeded_state().await;
    let app = init_app!(state);
    let blogpost = any_post(&state).await;
    let uri = format!("/posts/{}", blogpost.id);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(state.posts.find_by_id(blogpost.id).await.unwrap().is_none());
    assert_eq!(state.posts.count().await.unwrap(), 9);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    tear_down(&state).await;
}

#[actix_web::test]
async fn test_request_id_header() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/posts")
        .insert_header(("X-Request-ID", "trace-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-me");

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(generated).is_ok());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_store_failure_is_internal_error() {
    let state = AppState::with_repository(Arc::new(BrokenStore));
    let app = init_app!(state);

    let requests = [
        test::TestRequest::get().uri("/posts").to_request(),
        test::TestRequest::get()
            .uri(&format!("/posts/{}", Uuid::new_v4()))
            .to_request(),
        test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({
                "author": {"firstName": "Mark", "lastName": "Twain"},
                "title": "T",
                "content": "C"
            }))
            .to_request(),
        test::TestRequest::delete()
            .uri(&format!("/posts/{}", Uuid::new_v4()))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, 500);
        assert!(!body.message.is_empty());
        assert!(!body.message.contains("relation"));
    }
}
