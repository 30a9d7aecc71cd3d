//! Message content variants, keyed by `contentType`.

pub mod contacts;
pub mod interactive;
pub mod location;
pub mod media;
pub mod reaction;
pub mod template;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::checker::Checker;
use crate::error::IssueKind;
use crate::union::DiscriminatedUnion;

pub use contacts::{Contact, ContactAddress, ContactName};
pub use interactive::{
    Interactive, InteractiveComponents, InteractiveList, InteractiveSubType, InteractiveText,
    ListRow, ListSection, ProductItem, ProductList, ProductRef, ProductSection, Reply, ReplyButton,
};
pub use location::Location;
pub use media::{CaptionedMedia, DocumentMedia, Media};
pub use reaction::Reaction;
pub use template::{Template, TemplateBody, TemplateButton, TemplateComponents, TemplateHeader};

/// Field holding the content discriminator.
pub const CONTENT_TYPE_FIELD: &str = "contentType";

/// Content discriminator values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Image,
    Video,
    Document,
    Audio,
    Sticker,
    Location,
    Contacts,
    Reaction,
    Template,
    Interactive,
}

impl ContentType {
    pub const ALL: [ContentType; 11] = [
        ContentType::Text,
        ContentType::Image,
        ContentType::Video,
        ContentType::Document,
        ContentType::Audio,
        ContentType::Sticker,
        ContentType::Location,
        ContentType::Contacts,
        ContentType::Reaction,
        ContentType::Template,
        ContentType::Interactive,
    ];

    pub const MEDIA: [ContentType; 5] = [
        ContentType::Image,
        ContentType::Video,
        ContentType::Document,
        ContentType::Audio,
        ContentType::Sticker,
    ];

    /// Wire tag. Also the key holding the variant's payload.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Document => "document",
            ContentType::Audio => "audio",
            ContentType::Sticker => "sticker",
            ContentType::Location => "location",
            ContentType::Contacts => "contacts",
            ContentType::Reaction => "reaction",
            ContentType::Template => "template",
            ContentType::Interactive => "interactive",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message content. Serializes with its `contentType` tag alongside the
/// variant's payload key, e.g. `{"contentType":"text","text":"hi"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contentType", rename_all = "camelCase")]
pub enum Content {
    Text { text: String },
    Image { image: CaptionedMedia },
    Video { video: CaptionedMedia },
    Document { document: DocumentMedia },
    Audio { audio: Media },
    Sticker { sticker: Media },
    Location { location: Location },
    Contacts { contacts: Vec<Contact> },
    Reaction { reaction: Reaction },
    Template { template: Template },
    Interactive { interactive: Interactive },
}

impl Content {
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Text { .. } => ContentType::Text,
            Content::Image { .. } => ContentType::Image,
            Content::Video { .. } => ContentType::Video,
            Content::Document { .. } => ContentType::Document,
            Content::Audio { .. } => ContentType::Audio,
            Content::Sticker { .. } => ContentType::Sticker,
            Content::Location { .. } => ContentType::Location,
            Content::Contacts { .. } => ContentType::Contacts,
            Content::Reaction { .. } => ContentType::Reaction,
            Content::Template { .. } => ContentType::Template,
            Content::Interactive { .. } => ContentType::Interactive,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>, caption: Option<String>) -> Self {
        Content::Image {
            image: CaptionedMedia {
                url: url.into(),
                caption,
            },
        }
    }

    pub fn video(url: impl Into<String>, caption: Option<String>) -> Self {
        Content::Video {
            video: CaptionedMedia {
                url: url.into(),
                caption,
            },
        }
    }

    pub fn document(url: impl Into<String>, caption: Option<String>, filename: Option<String>) -> Self {
        Content::Document {
            document: DocumentMedia {
                url: url.into(),
                caption,
                filename,
            },
        }
    }

    pub fn audio(url: impl Into<String>) -> Self {
        Content::Audio {
            audio: Media { url: url.into() },
        }
    }

    pub fn sticker(url: impl Into<String>) -> Self {
        Content::Sticker {
            sticker: Media { url: url.into() },
        }
    }
}

fn text(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let text = c.required_string(map, "text");
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "text"]);
    Some(Content::Text { text: text? })
}

/// The union over every content variant, in [`ContentType::ALL`] order.
pub fn content_union() -> DiscriminatedUnion<Content> {
    DiscriminatedUnion::new(CONTENT_TYPE_FIELD)
        .variant("text", text)
        .variant("image", media::image)
        .variant("video", media::video)
        .variant("document", media::document)
        .variant("audio", media::audio)
        .variant("sticker", media::sticker)
        .variant("location", location::content)
        .variant("contacts", contacts::content)
        .variant("reaction", reaction::content)
        .variant("template", template::content)
        .variant("interactive", interactive::content)
}

/// Validate a content object against `union`.
///
/// Independently of strict mode, a content object may not carry the payload
/// key of another content type: `{"contentType":"text","text":"hi","image":{..}}`
/// is rejected.
pub fn check_content(
    checker: &mut Checker,
    value: &Value,
    union: &DiscriminatedUnion<Content>,
) -> Option<Content> {
    if let Value::Object(map) = value {
        reject_foreign_payloads(checker, map);
    }
    union.check(checker, value, "content object")
}

fn reject_foreign_payloads(checker: &mut Checker, map: &Map<String, Value>) {
    let Some(own) = map
        .get(CONTENT_TYPE_FIELD)
        .and_then(Value::as_str)
        .and_then(ContentType::from_tag)
    else {
        return;
    };

    for other in ContentType::ALL.into_iter().filter(|kind| *kind != own) {
        if map.contains_key(other.as_str()) {
            checker.at(other.as_str(), |c| {
                c.report(
                    IssueKind::UnexpectedField,
                    format!("no {other} payload on {own} content"),
                    other.as_str(),
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::RegistryConfig;

    fn check(value: Value) -> (Option<Content>, Checker) {
        let mut c = Checker::new(RegistryConfig::default());
        let out = check_content(&mut c, &value, &content_union());
        (out, c)
    }

    #[test]
    fn union_tags_follow_content_type_order() {
        let expected: Vec<&str> = ContentType::ALL.iter().map(|kind| kind.as_str()).collect();
        assert_eq!(content_union().tags(), expected);
    }

    #[test]
    fn union_tags_are_unique() {
        let mut tags = content_union().tags();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ContentType::ALL.len());
    }

    #[test]
    fn text_content_round_trips_through_serde() {
        let (out, c) = check(json!({ "contentType": "text", "text": "hi" }));
        assert!(c.issues().is_empty());
        let content = out.expect("text should validate");
        assert_eq!(content, Content::text("hi"));
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({ "contentType": "text", "text": "hi" })
        );
    }

    #[test]
    fn foreign_payload_is_rejected_even_when_lenient() {
        let (out, c) = check(json!({
            "contentType": "text",
            "text": "hi",
            "image": { "url": "https://cdn.example.com/a.png" }
        }));
        assert!(out.is_some());
        assert_eq!(c.issues().len(), 1);
        assert_eq!(c.issues()[0].path.to_string(), "image");
        assert_eq!(c.issues()[0].kind, IssueKind::UnexpectedField);
    }

    #[test]
    fn foreign_payload_is_reported_once_when_strict() {
        let mut c = Checker::new(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        let value = json!({
            "contentType": "text",
            "text": "hi",
            "image": { "url": "https://cdn.example.com/a.png" }
        });
        assert!(check_content(&mut c, &value, &content_union()).is_some());
        let paths: Vec<String> = c.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["image"]);
        assert_eq!(c.issues()[0].kind, IssueKind::UnexpectedField);
    }

    #[test]
    fn unknown_field_dropped_when_lenient() {
        let (out, c) = check(json!({ "contentType": "text", "text": "hi", "note": 1 }));
        assert!(c.issues().is_empty());
        assert_eq!(
            serde_json::to_value(out.unwrap()).unwrap(),
            json!({ "contentType": "text", "text": "hi" })
        );
    }

    #[test]
    fn content_type_lookup() {
        assert_eq!(ContentType::from_tag("sticker"), Some(ContentType::Sticker));
        assert_eq!(ContentType::from_tag("Sticker"), None);
        assert_eq!(Content::sticker("https://x.test/s.webp").content_type(), ContentType::Sticker);
    }
}
