// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Who may see a content item. `Premium` items are visible to any signed-in identity, local
/// pseudo-identities included.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Public,
    Premium,
}

impl AccessLevel {
    pub fn is_public(&self) -> bool {
        matches!(self, AccessLevel::Public)
    }
}

/// Discriminant over the three content sections.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Project,
    BlogPost,
    Gradient,
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::Project => "project",
            ContentType::BlogPost => "blog_post",
            ContentType::Gradient => "gradient",
        };

        write!(f, "{s}")
    }
}

/// A portfolio case study.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub client: String,
    pub tags: Vec<String>,
    pub access_level: AccessLevel,
    pub hero_image: Option<String>,
}

/// A blog post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub author: String,
    pub published_at: u64,
    pub access_level: AccessLevel,
}

/// An entry in the gradient gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub id: String,
    pub name: String,
    pub stops: Vec<String>,
    pub angle: u16,
    pub access_level: AccessLevel,
}

/// A content item of any section.
///
/// Overlay and favorites logic is generic over the discriminant; everything that needs the
/// type-specific payload matches on the variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Project(Project),
    BlogPost(BlogPost),
    Gradient(Gradient),
}

impl ContentItem {
    /// Return the id of a content item. Ids are stable, edits never change them.
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Project(project) => &project.id,
            ContentItem::BlogPost(post) => &post.id,
            ContentItem::Gradient(gradient) => &gradient.id,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Project(_) => ContentType::Project,
            ContentItem::BlogPost(_) => ContentType::BlogPost,
            ContentItem::Gradient(_) => ContentType::Gradient,
        }
    }

    pub fn access_level(&self) -> AccessLevel {
        match self {
            ContentItem::Project(project) => project.access_level,
            ContentItem::BlogPost(post) => post.access_level,
            ContentItem::Gradient(gradient) => gradient.access_level,
        }
    }

    /// Return the display title of a content item.
    pub fn title(&self) -> &str {
        match self {
            ContentItem::Project(project) => &project.title,
            ContentItem::BlogPost(post) => &post.title,
            ContentItem::Gradient(gradient) => &gradient.name,
        }
    }

    /// Replace the id of a content item, used when minting locally-created items.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            ContentItem::Project(project) => project.id = id,
            ContentItem::BlogPost(post) => post.id = id,
            ContentItem::Gradient(gradient) => gradient.id = id,
        }
        self
    }
}

/// A single field failure, surfaced inline next to the offending form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validate user input before it enters the overlay.
///
/// Failures are itemized per field so forms can render them inline; invalid items are rejected
/// at the form boundary and never reach storage.
pub fn validate_item(item: &ContentItem) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if item.title().trim().is_empty() {
        errors.push(FieldError {
            field: "title",
            message: "a title is required".to_string(),
        });
    }

    if let ContentItem::Gradient(gradient) = item {
        if gradient.stops.len() < 2 {
            errors.push(FieldError {
                field: "stops",
                message: "a gradient needs at least two colour stops".to_string(),
            });
        }
        if gradient.angle > 360 {
            errors.push(FieldError {
                field: "angle",
                message: "angle must be between 0 and 360 degrees".to_string(),
            });
        }
    }

    if let ContentItem::BlogPost(post) = item
        && post.author.trim().is_empty()
    {
        errors.push(FieldError {
            field: "author",
            message: "an author is required".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
