use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, BlogPostPatch, NewBlogPost};
use crate::error::RepoError;

/// Generic repository trait defining the entity-agnostic operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Return an arbitrary stored entity, if there is any.
    async fn find_one(&self) -> Result<Option<T>, RepoError>;

    /// Total number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` if absent.
    async fn delete_by_id(&self, id: ID) -> Result<(), RepoError>;

    /// Delete every entity, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

/// Blog post store.
#[async_trait]
pub trait PostRepository: BaseRepository<BlogPost, Uuid> {
    /// All posts, oldest first.
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError>;

    /// Store one post, assigning its `id` and `created` timestamp.
    async fn create(&self, data: NewBlogPost) -> Result<BlogPost, RepoError>;

    /// Bulk insert used for seeding.
    async fn insert_many(&self, records: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, RepoError>;

    /// Apply `patch` to the post with `id`. Fails with `RepoError::NotFound` if absent.
    async fn update_by_id(&self, id: Uuid, patch: BlogPostPatch) -> Result<BlogPost, RepoError>;
}
