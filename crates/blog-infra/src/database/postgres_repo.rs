//! PostgreSQL post store.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    Schema, Set,
};
use uuid::Uuid;

use blog_core::domain::{BlogPost, BlogPostPatch, NewBlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    /// Accepts an owned connection or a pool shared with `DatabaseConnections`.
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    /// Create the `posts` table from the entity definition if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut stmt = schema.create_table_from_entity(PostEntity);
        stmt.if_not_exists();

        self.db
            .as_ref()
            .execute(backend.build(&stmt))
            .await
            .map_err(map_db_err)?;

        tracing::info!("Posts table ready");
        Ok(())
    }
}

fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        tracing::debug!(post_id = %id, "Finding post by id");

        let result = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(post_id = %id, "Deleted post");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, data: NewBlogPost) -> Result<BlogPost, RepoError> {
        let active_model: post::ActiveModel = BlogPost::from_new(data).into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, "Created post");
        Ok(model.into())
    }

    async fn insert_many(&self, records: Vec<NewBlogPost>) -> Result<Vec<BlogPost>, RepoError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let posts: Vec<BlogPost> = records.into_iter().map(BlogPost::from_new).collect();
        let models = posts
            .iter()
            .cloned()
            .map(post::ActiveModel::from)
            .collect::<Vec<_>>();

        PostEntity::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(count = posts.len(), "Inserted posts");
        Ok(posts)
    }

    async fn update_by_id(&self, id: Uuid, patch: BlogPostPatch) -> Result<BlogPost, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active_model: post::ActiveModel = model.into();
        if let Some(author) = patch.author {
            active_model.author_first_name = Set(author.first_name);
            active_model.author_last_name = Set(author.last_name);
        }
        if let Some(title) = patch.title {
            active_model.title = Set(title);
        }
        if let Some(content) = patch.content {
            active_model.content = Set(content);
        }

        // A concurrent delete between the read and the write surfaces as
        // RecordNotUpdated, which maps to NotFound.
        let updated = active_model.update(self.db.as_ref()).await.map_err(map_db_err)?;

        tracing::debug!(post_id = %id, "Updated post");
        Ok(updated.into())
    }
}
