//! Link construction from content snapshots

use biblink_domain::{ContentItem, LinkUpdate};

use crate::config::SyncConfig;

const SMALL_KEY: &str = "small";
const LARGE_KEY: &str = "large";
const ORIGINAL_KEY: &str = "original";
const SHORT_KEY: &str = "description_short";
const LONG_KEY: &str = "description_long";
const CONTENTS_KEY: &str = "contents";

const SMALL_LABEL: &str = "Miniatyrbilde";
const LARGE_LABEL: &str = "Omslagsbilde";
const ORIGINAL_LABEL: &str = "Originalt bilde";
const SHORT_LABEL: &str = "Forlagets beskrivelse (kort)";
const LONG_LABEL: &str = "Forlagets beskrivelse (lang)";
const CONTENTS_LABEL: &str = "Innholdsfortegnelse";
const AUDIO_LABEL: &str = "Lydfil";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Large,
    Original,
}

impl ImageSize {
    fn key(self) -> &'static str {
        match self {
            ImageSize::Small => SMALL_KEY,
            ImageSize::Large => LARGE_KEY,
            ImageSize::Original => ORIGINAL_KEY,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ImageSize::Small => SMALL_LABEL,
            ImageSize::Large => LARGE_LABEL,
            ImageSize::Original => ORIGINAL_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    DescriptionShort,
    DescriptionLong,
    TableOfContents,
}

impl ContentKind {
    fn key(self) -> &'static str {
        match self {
            ContentKind::DescriptionShort => SHORT_KEY,
            ContentKind::DescriptionLong => LONG_KEY,
            ContentKind::TableOfContents => CONTENTS_KEY,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ContentKind::DescriptionShort => SHORT_LABEL,
            ContentKind::DescriptionLong => LONG_LABEL,
            ContentKind::TableOfContents => CONTENTS_LABEL,
        }
    }
}

/// The two tail characters used for directory sharding: the isbn's last
/// character, then its second-to-last. This is a path scheme, not a
/// checksum; the slicing is part of the external layout.
fn shard(isbn: &str) -> (char, char) {
    let chars: Vec<char> = isbn.chars().collect();
    let last = chars.last().copied().unwrap_or('0');
    let second_last = if chars.len() >= 2 {
        chars[chars.len() - 2]
    } else {
        last
    };
    (last, second_last)
}

/// Builds the externally visible links for a content snapshot. Base URLs are
/// injected configuration; they are never computed here.
pub struct LinkBuilder {
    content_base_url: String,
    image_base_url: String,
}

impl LinkBuilder {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            content_base_url: config.content_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn content_link(&self, kind: ContentKind, isbn: &str) -> LinkUpdate {
        let link = format!(
            "{}/{}?type={}",
            self.content_base_url,
            isbn,
            kind.key().to_uppercase()
        );
        LinkUpdate::new(isbn, link, kind.label())
    }

    pub fn image_link(&self, size: ImageSize, isbn: &str) -> LinkUpdate {
        let (last, second_last) = shard(isbn);
        let link = format!(
            "{}/{}/{}/{}/{}.jpg",
            self.image_base_url,
            size.key(),
            last,
            second_last,
            isbn
        );
        LinkUpdate::new(isbn, link, size.label())
    }

    pub fn audio_link(&self, isbn: &str) -> LinkUpdate {
        let (last, second_last) = shard(isbn);
        let link = format!(
            "{}/audio/mp3/{}/{}/{}.mp3",
            self.content_base_url, last, second_last, isbn
        );
        LinkUpdate::new(isbn, link, AUDIO_LABEL)
    }

    /// One link update per populated content attribute. Returns nothing when
    /// the snapshot carries no isbn; there is no record to address then.
    pub fn links_for(&self, item: &ContentItem) -> Vec<LinkUpdate> {
        let Some(isbn) = item.isbn.as_deref() else {
            return Vec::new();
        };
        let mut updates = Vec::new();
        if item.description_short.is_some() {
            updates.push(self.content_link(ContentKind::DescriptionShort, isbn));
        }
        if item.description_long.is_some() {
            updates.push(self.content_link(ContentKind::DescriptionLong, isbn));
        }
        if item.table_of_contents.is_some() {
            updates.push(self.content_link(ContentKind::TableOfContents, isbn));
        }
        if item.image_small.is_some() {
            updates.push(self.image_link(ImageSize::Small, isbn));
        }
        if item.image_large.is_some() {
            updates.push(self.image_link(ImageSize::Large, isbn));
        }
        if item.image_original.is_some() {
            updates.push(self.image_link(ImageSize::Original, isbn));
        }
        if item.audio_file.is_some() {
            updates.push(self.audio_link(isbn));
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> LinkBuilder {
        LinkBuilder {
            content_base_url: "https://content.example.org".to_string(),
            image_base_url: "https://img".to_string(),
        }
    }

    #[test]
    fn test_image_link_uses_tail_sharding() {
        let update = builder().image_link(ImageSize::Small, "9788205377547");
        assert_eq!(update.link, "https://img/small/7/4/9788205377547.jpg");
        assert_eq!(update.material, "Miniatyrbilde");
        assert_eq!(update.isbn, "9788205377547");
    }

    #[test]
    fn test_content_link_uppercases_type() {
        let update = builder().content_link(ContentKind::DescriptionShort, "8210053418");
        assert_eq!(
            update.link,
            "https://content.example.org/8210053418?type=DESCRIPTION_SHORT"
        );
        assert_eq!(update.material, "Forlagets beskrivelse (kort)");
    }

    #[test]
    fn test_audio_link() {
        let update = builder().audio_link("9788205377547");
        assert_eq!(
            update.link,
            "https://content.example.org/audio/mp3/7/4/9788205377547.mp3"
        );
        assert_eq!(update.material, "Lydfil");
    }

    #[test]
    fn test_links_for_emits_one_update_per_attribute() {
        let item = ContentItem {
            isbn: Some("9788205377547".to_string()),
            description_long: Some("text".to_string()),
            image_large: Some("cover.jpg".to_string()),
            audio_file: Some("sample.mp3".to_string()),
            ..ContentItem::default()
        };
        let updates = builder().links_for(&item);
        let materials: Vec<&str> = updates.iter().map(|u| u.material.as_str()).collect();
        assert_eq!(
            materials,
            vec!["Forlagets beskrivelse (lang)", "Omslagsbilde", "Lydfil"]
        );
    }

    #[test]
    fn test_links_for_without_isbn_is_empty() {
        let item = ContentItem {
            description_short: Some("text".to_string()),
            ..ContentItem::default()
        };
        assert!(builder().links_for(&item).is_empty());
    }
}
