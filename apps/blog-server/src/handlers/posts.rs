//! Blog post resource handlers.

use actix_web::{HttpResponse, http::header, web};
use chrono::SecondsFormat;
use uuid::Uuid;

use blog_core::domain::{Author, BlogPost, BlogPostPatch, NewBlogPost};
use blog_core::error::{DomainError, RepoError};
use blog_core::ports::{BaseRepository, PostRepository};
use blog_shared::dto::{
    AuthorPayload, CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "BlogPost";

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        entries: posts.iter().map(post_response).collect(),
    }))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let author = author_from_payload(require_field("author", req.author)?);
    let data = NewBlogPost::new(
        author,
        require_field("title", req.title)?,
        require_field("content", req.content)?,
    )?;

    let post = state.posts.create(data).await?;
    tracing::info!(post_id = %post.id, "Blog post created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{}", post.id)))
        .json(post_response(&post)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let req = body.into_inner();

    if let Some(body_id) = req.id.as_deref() {
        if Uuid::parse_str(body_id).ok() != Some(id) {
            return Err(AppError::BadRequest(format!(
                "Request path id ({}) and request body id ({}) must match",
                path.as_str(),
                body_id
            )));
        }
    }

    let patch = BlogPostPatch {
        author: req.author.map(author_from_payload),
        title: req.title,
        content: req.content,
    };
    patch.validate()?;

    let post = state
        .posts
        .update_by_id(id, patch)
        .await
        .map_err(|e| not_found_or(e, id))?;
    tracing::info!(post_id = %id, "Blog post updated");

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    state
        .posts
        .delete_by_id(id)
        .await
        .map_err(|e| not_found_or(e, id))?;
    tracing::info!(post_id = %id, "Blog post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Render a stored post in its wire shape.
pub fn post_response(post: &BlogPost) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author: post.author.full_name(),
        title: post.title.clone(),
        content: post.content.clone(),
        created: post.created.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn author_from_payload(payload: AuthorPayload) -> Author {
    match payload {
        AuthorPayload::Structured {
            first_name,
            last_name,
        } => Author::new(first_name, last_name),
        AuthorPayload::Formatted(name) => Author::from_formatted(&name),
    }
}

fn require_field<T>(field: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing `{field}` in request body")))
}

/// Ids that are not UUIDs cannot name a stored post.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("{ENTITY} with id {raw} not found")))
}

fn not_found(id: Uuid) -> AppError {
    DomainError::NotFound {
        entity_type: ENTITY,
        id,
    }
    .into()
}

fn not_found_or(err: RepoError, id: Uuid) -> AppError {
    match err {
        RepoError::NotFound => not_found(id),
        other => other.into(),
    }
}
