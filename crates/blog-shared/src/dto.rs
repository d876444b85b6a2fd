//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Author as sent by clients: either `{"firstName", "lastName"}` or an
/// already formatted `"First Last"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorPayload {
    #[serde(rename_all = "camelCase")]
    Structured {
        #[serde(default)]
        first_name: String,
        #[serde(default)]
        last_name: String,
    },
    Formatted(String),
}

impl AuthorPayload {
    pub fn structured(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::Structured {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Request to create a post. Fields are optional on the wire so that a
/// missing field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Request to update a post. Only the supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    /// Must match the id in the request path when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A post as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    /// Formatted as `"First Last"`.
    pub author: String,
    pub title: String,
    pub content: String,
    /// ISO-8601 timestamp.
    pub created: String,
}

/// Response of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListResponse {
    pub entries: Vec<PostResponse>,
}
