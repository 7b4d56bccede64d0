// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod content;
pub mod identity;
pub mod request;
pub mod role;
pub mod visibility;

pub use content::{
    AccessLevel, BlogPost, ContentItem, ContentType, FieldError, Gradient, Project, validate_item,
};
pub use identity::{LocalIdentity, Resolution, User, Viewer};
pub use request::{RequestError, RequestStatus, ReviewDecision, RoleRequest};
pub use role::{Capabilities, Role, RoleError};
pub use visibility::{can_edit_item, is_accessible, visible_items};
