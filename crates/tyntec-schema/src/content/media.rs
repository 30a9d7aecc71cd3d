use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Content, CONTENT_TYPE_FIELD};
use crate::checker::Checker;

/// Media referenced by URL only (audio, sticker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
}

/// Media with an optional caption (image, video).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionedMedia {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A document: captioned media with an optional display filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMedia {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

pub(crate) fn check_media(c: &mut Checker, value: &Value) -> Option<Media> {
    let map = c.object(value, "media object")?;
    let url = c.required_url(map, "url");
    c.allow_only(map, &["url"]);
    Some(Media { url: url? })
}

pub(crate) fn check_captioned(c: &mut Checker, value: &Value) -> Option<CaptionedMedia> {
    let map = c.object(value, "media object")?;
    let url = c.required_url(map, "url");
    let caption = c.optional_string(map, "caption");
    c.allow_only(map, &["url", "caption"]);
    Some(CaptionedMedia {
        url: url?,
        caption: caption?,
    })
}

pub(crate) fn check_document(c: &mut Checker, value: &Value) -> Option<DocumentMedia> {
    let map = c.object(value, "document object")?;
    let url = c.required_url(map, "url");
    let caption = c.optional_string(map, "caption");
    let filename = c.optional_string(map, "filename");
    c.allow_only(map, &["url", "caption", "filename"]);
    Some(DocumentMedia {
        url: url?,
        caption: caption?,
        filename: filename?,
    })
}

pub(crate) fn image(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let image = c.required(map, "image", "media object", check_captioned);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "image"]);
    Some(Content::Image { image: image? })
}

pub(crate) fn video(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let video = c.required(map, "video", "media object", check_captioned);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "video"]);
    Some(Content::Video { video: video? })
}

pub(crate) fn document(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let document = c.required(map, "document", "document object", check_document);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "document"]);
    Some(Content::Document {
        document: document?,
    })
}

pub(crate) fn audio(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let audio = c.required(map, "audio", "media object", check_media);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "audio"]);
    Some(Content::Audio { audio: audio? })
}

pub(crate) fn sticker(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let sticker = c.required(map, "sticker", "media object", check_media);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "sticker"]);
    Some(Content::Sticker { sticker: sticker? })
}
