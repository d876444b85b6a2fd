//! In-memory post store - used for `memory://` URLs and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{BlogPost, BlogPostPatch, NewBlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

/// In-memory post store backed by a `Vec` behind an async RwLock.
///
/// Posts are kept in insertion order, which is also creation order.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError> {
        Ok(self.posts.read().await.first().cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        posts.remove(index);

        tracing::debug!(post_id = %id, "Deleted post");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut posts = self.posts.write().await;
        let removed = posts.len() as u64;
        posts.clear();
        Ok(removed)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn create(&self, data: NewBlogPost) -> Result<BlogPost, RepoError> {
        let post = BlogPost::from_new(data);
        self.posts.write().await.push(post.clone());

        tracing::debug!(post_id = %post.id, "Created post");
        Ok(post)
    }

    async fn insert_many(&self, records: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, RepoError> {
        let created: Vec<BlogPost> = records.into_iter().map(BlogPost::from_new).collect();
        self.posts.write().await.extend(created.iter().cloned());

        tracing::debug!(count = created.len(), "Inserted posts");
        Ok(created)
    }

    async fn update_by_id(&self, id: Uuid, patch: BlogPostPatch) -> Result<BlogPost, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.apply(patch);

        tracing::debug!(post_id = %id, "Updated post");
        Ok(post.clone())
    }
}
