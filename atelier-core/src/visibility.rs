// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content visibility gating.
//!
//! Visibility and edit permission are two separate checks with different strictness: premium
//! content opens up to any signed-in identity (a local signup counts), while editing requires a
//! real authenticated user whose role grants it.

use crate::content::{AccessLevel, ContentItem};
use crate::identity::Viewer;

/// Return true when the given viewer may see this content item.
pub fn is_accessible(item: &ContentItem, viewer: &Viewer) -> bool {
    match item.access_level() {
        AccessLevel::Public => true,
        AccessLevel::Premium => viewer.is_signed_in(),
    }
}

/// Return true when the given viewer may edit content.
///
/// Local pseudo-identities can never edit, regardless of how the item is classified.
pub fn can_edit_item(viewer: &Viewer) -> bool {
    match viewer.role() {
        Some(role) => role.capabilities().can_edit,
        None => false,
    }
}

/// Filter a content list down to what the viewer may see, preserving order.
pub fn visible_items<'a>(items: &'a [ContentItem], viewer: &Viewer) -> Vec<&'a ContentItem> {
    items
        .iter()
        .filter(|item| is_accessible(item, viewer))
        .collect()
}
