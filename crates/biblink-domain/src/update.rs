//! The normalized unit of work produced from a change event

use serde::{Deserialize, Serialize};

/// One link that should be represented on every catalog record for `isbn`.
///
/// The material label is the human-readable text shown next to the link in
/// discovery interfaces. Whether the link lands in a print (856) or
/// electronic (956) field is decided per record at apply time, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkUpdate {
    pub isbn: String,
    pub link: String,
    pub material: String,
}

impl LinkUpdate {
    pub fn new(
        isbn: impl Into<String>,
        link: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            link: link.into(),
            material: material.into(),
        }
    }
}
