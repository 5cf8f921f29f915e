//! Field rules for creating and editing posts.

use time::{Duration, OffsetDateTime};

use super::error::DomainError;

/// A post that passed field validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl NewPost {
    /// Every field is required; an empty string counts as missing.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
    ) -> Result<Self, DomainError> {
        match (present(title), present(content), present(author)) {
            (Some(title), Some(content), Some(author)) => Ok(Self {
                title,
                content,
                author,
            }),
            _ => Err(DomainError::validation(
                "Title, content, and author are required",
            )),
        }
    }
}

/// Partial edit of a post. A `None` field keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl PostPatch {
    /// Empty strings are dropped so they leave the stored field untouched.
    pub fn new(title: Option<String>, content: Option<String>, author: Option<String>) -> Self {
        Self {
            title: present(title),
            content: present(content),
            author: present(author),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }
}

/// Timestamp for an edit. Never earlier than, nor equal to, the previous one.
pub fn next_updated_at(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
