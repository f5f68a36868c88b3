//! Content snapshots and the field-level diff between them

use serde::{Deserialize, Serialize};

/// A snapshot of the externally derived content registered for one title.
///
/// Every attribute is optional; an attribute that is absent simply has no
/// content of that kind. The attribute keys mirror the upstream content
/// store's wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

fn changed(new: &Option<String>, old: &Option<String>) -> Option<String> {
    match (new, old) {
        (Some(n), Some(o)) if n != o => Some(n.clone()),
        _ => None,
    }
}

impl ContentItem {
    /// Return a snapshot holding only the attributes that actually changed
    /// relative to `old`.
    ///
    /// An attribute counts as changed when it is present in BOTH snapshots
    /// and the values differ. An attribute that newly appears, or one that
    /// disappears, is not reported; link removal is deliberately never
    /// derived from a diff.
    pub fn changed_fields(&self, old: &ContentItem) -> ContentItem {
        ContentItem {
            isbn: self.isbn.clone(),
            description_short: changed(&self.description_short, &old.description_short),
            description_long: changed(&self.description_long, &old.description_long),
            table_of_contents: changed(&self.table_of_contents, &old.table_of_contents),
            image_small: changed(&self.image_small, &old.image_small),
            image_large: changed(&self.image_large, &old.image_large),
            image_original: changed(&self.image_original, &old.image_original),
            audio_file: changed(&self.audio_file, &old.audio_file),
        }
    }

    /// True when no content attribute is set (the isbn does not count).
    pub fn is_empty(&self) -> bool {
        self.description_short.is_none()
            && self.description_long.is_none()
            && self.table_of_contents.is_none()
            && self.image_small.is_none()
            && self.image_large.is_none()
            && self.image_original.is_none()
            && self.audio_file.is_none()
    }
}
