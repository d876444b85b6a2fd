use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Author;
use crate::error::DomainError;

/// Blog post entity - a stored blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl BlogPost {
    /// Assign a fresh id and creation timestamp to validated post data.
    ///
    /// `created` is kept at millisecond precision, the resolution it is
    /// rendered with on the wire.
    pub fn from_new(data: NewBlogPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: data.author,
            title: data.title,
            content: data.content,
            created: Utc::now().trunc_subsecs(3),
        }
    }

    /// Apply the fields present in `patch`. `id` and `created` never change.
    pub fn apply(&mut self, patch: BlogPostPatch) {
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

/// Data for a post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlogPost {
    pub author: Author,
    pub title: String,
    pub content: String,
}

impl NewBlogPost {
    /// Build new post data, rejecting an empty author, title or content.
    pub fn new(
        author: Author,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let data = Self {
            author,
            title: title.into(),
            content: content.into(),
        };
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_author(&self.author)?;
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Partial update of a post. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostPatch {
    pub author: Option<Author>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogPostPatch {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.title.is_none() && self.content.is_none()
    }

    /// A patch must supply at least one field, and every supplied field must
    /// be non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::Validation(
                "Request body must contain at least one of `author`, `title`, `content`"
                    .to_string(),
            ));
        }
        if let Some(author) = &self.author {
            require_author(author)?;
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(())
    }
}

fn require_author(author: &Author) -> Result<(), DomainError> {
    if author.is_blank() {
        return Err(DomainError::Validation(
            "`author` must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "`{field}` must not be empty"
        )));
    }
    Ok(())
}
