use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a blog post, stored as separate name parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Split an already formatted name such as `"Mark Twain"`.
    ///
    /// The first word becomes the first name and everything after the
    /// following whitespace becomes the last name.
    pub fn from_formatted(name: &str) -> Self {
        let name = name.trim();
        match name.split_once(char::is_whitespace) {
            Some((first, last)) => Self::new(first, last.trim_start()),
            None => Self::new(name, ""),
        }
    }

    /// The name as rendered to clients: `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.first_name.trim().is_empty() && self.last_name.trim().is_empty()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
