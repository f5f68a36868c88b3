//! Change-event envelope consumed from the upstream content store

use serde::{Deserialize, Serialize};

use crate::ContentItem;

/// Event name carried by mutations of an existing row.
pub const EVENT_MODIFY: &str = "MODIFY";

/// Key block identifying the affected title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKeys {
    pub isbn: String,
}

/// A single change event from the content store.
///
/// `new_image` always holds the post-change snapshot; `old_image` is present
/// for MODIFY events and holds the pre-change snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub event_name: String,
    pub keys: EventKeys,
    pub new_image: ContentItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<ContentItem>,
}

impl ChangeEvent {
    pub fn is_modify(&self) -> bool {
        self.event_name == EVENT_MODIFY
    }

    /// The snapshot that should drive link derivation: for MODIFY events the
    /// diff of new against old, otherwise the new image as a whole. The isbn
    /// from the key block wins over anything inside the images.
    pub fn effective_item(&self) -> ContentItem {
        let mut new_image = self.new_image.clone();
        new_image.isbn = Some(self.keys.isbn.clone());
        match (self.is_modify(), &self.old_image) {
            (true, Some(old)) => new_image.changed_fields(old),
            _ => new_image,
        }
    }
}
