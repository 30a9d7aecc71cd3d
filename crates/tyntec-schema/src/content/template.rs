use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::location::check_location;
use super::media::{check_captioned, check_document};
use super::{CaptionedMedia, Content, DocumentMedia, Location, CONTENT_TYPE_FIELD};
use crate::checker::Checker;
use crate::error::IssueKind;
use crate::union::DiscriminatedUnion;

/// Field holding the discriminator of header, body and button entries.
const TYPE_FIELD: &str = "type";

/// A pre-approved template message with its parameter components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub template_id: String,
    pub template_language: String,
    pub components: TemplateComponents,
}

/// Template parameters. Every list keeps the caller's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<TemplateHeader>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<TemplateBody>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Vec<TemplateButton>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateHeader {
    Text { text: String },
    Image { image: CaptionedMedia },
    Video { video: CaptionedMedia },
    Document { document: DocumentMedia },
    Location { location: Location },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateBody {
    Text { text: String },
}

/// A button parameter. `index` ties the value to the button's position in
/// the approved template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateButton {
    QuickReply { index: u32, payload: String },
    Url { index: u32, text: String },
}

impl TemplateButton {
    pub fn index(&self) -> u32 {
        match self {
            TemplateButton::QuickReply { index, .. } | TemplateButton::Url { index, .. } => *index,
        }
    }
}

impl Template {
    pub fn new(template_id: impl Into<String>, template_language: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            template_language: template_language.into(),
            components: TemplateComponents::default(),
        }
    }

    pub fn with_body_text(mut self, text: impl Into<String>) -> Self {
        self.components
            .body
            .get_or_insert_with(Vec::new)
            .push(TemplateBody::Text { text: text.into() });
        self
    }

    pub fn with_header(mut self, header: TemplateHeader) -> Self {
        self.components.header.get_or_insert_with(Vec::new).push(header);
        self
    }

    pub fn with_button(mut self, button: TemplateButton) -> Self {
        self.components.button.get_or_insert_with(Vec::new).push(button);
        self
    }
}

fn header_union() -> &'static DiscriminatedUnion<TemplateHeader> {
    static UNION: OnceLock<DiscriminatedUnion<TemplateHeader>> = OnceLock::new();
    UNION.get_or_init(|| {
        DiscriminatedUnion::new(TYPE_FIELD)
            .variant("text", |c, map| {
                let text = c.required_string(map, "text");
                c.allow_only(map, &[TYPE_FIELD, "text"]);
                Some(TemplateHeader::Text { text: text? })
            })
            .variant("image", |c, map| {
                let image = c.required(map, "image", "media object", check_captioned);
                c.allow_only(map, &[TYPE_FIELD, "image"]);
                Some(TemplateHeader::Image { image: image? })
            })
            .variant("video", |c, map| {
                let video = c.required(map, "video", "media object", check_captioned);
                c.allow_only(map, &[TYPE_FIELD, "video"]);
                Some(TemplateHeader::Video { video: video? })
            })
            .variant("document", |c, map| {
                let document = c.required(map, "document", "document object", check_document);
                c.allow_only(map, &[TYPE_FIELD, "document"]);
                Some(TemplateHeader::Document {
                    document: document?,
                })
            })
            .variant("location", |c, map| {
                let location = c.required(map, "location", "location object", check_location);
                c.allow_only(map, &[TYPE_FIELD, "location"]);
                Some(TemplateHeader::Location {
                    location: location?,
                })
            })
    })
}

fn body_union() -> &'static DiscriminatedUnion<TemplateBody> {
    static UNION: OnceLock<DiscriminatedUnion<TemplateBody>> = OnceLock::new();
    UNION.get_or_init(|| {
        DiscriminatedUnion::new(TYPE_FIELD).variant("text", |c, map| {
            let text = c.required_string(map, "text");
            c.allow_only(map, &[TYPE_FIELD, "text"]);
            Some(TemplateBody::Text { text: text? })
        })
    })
}

fn button_union() -> &'static DiscriminatedUnion<TemplateButton> {
    static UNION: OnceLock<DiscriminatedUnion<TemplateButton>> = OnceLock::new();
    UNION.get_or_init(|| {
        DiscriminatedUnion::new(TYPE_FIELD)
            .variant("quick_reply", |c, map| {
                let index = c.required(map, "index", "non-negative integer", Checker::index);
                let payload = c.required_string(map, "payload");
                c.allow_only(map, &[TYPE_FIELD, "index", "payload"]);
                Some(TemplateButton::QuickReply {
                    index: index?,
                    payload: payload?,
                })
            })
            .variant("url", |c, map| {
                let index = c.required(map, "index", "non-negative integer", Checker::index);
                let text = c.required_string(map, "text");
                c.allow_only(map, &[TYPE_FIELD, "index", "text"]);
                Some(TemplateButton::Url {
                    index: index?,
                    text: text?,
                })
            })
    })
}

fn check_buttons(c: &mut Checker, value: &Value) -> Option<Vec<TemplateButton>> {
    let buttons = c.array(value, "array of button parameters", |c, item| {
        button_union().check(c, item, "button object")
    })?;

    let mut seen = HashSet::new();
    let mut unique = true;
    for (position, button) in buttons.iter().enumerate() {
        if !seen.insert(button.index()) {
            unique = false;
            c.at(position, |c| {
                c.at("index", |c| {
                    c.report(
                        IssueKind::InvalidValue,
                        "index unique within the button list",
                        button.index().to_string(),
                    );
                })
            });
        }
    }
    unique.then_some(buttons)
}

fn check_components(c: &mut Checker, value: &Value) -> Option<TemplateComponents> {
    let map = c.object(value, "components object")?;
    let header = c.optional(map, "header", |c, v| {
        c.array(v, "array of header parameters", |c, item| {
            header_union().check(c, item, "header object")
        })
    });
    let body = c.optional(map, "body", |c, v| {
        c.array(v, "array of body parameters", |c, item| {
            body_union().check(c, item, "body object")
        })
    });
    let button = c.optional(map, "button", check_buttons);
    c.allow_only(map, &["header", "body", "button"]);
    Some(TemplateComponents {
        header: header?,
        body: body?,
        button: button?,
    })
}

fn check_template(c: &mut Checker, value: &Value) -> Option<Template> {
    let map = c.object(value, "template object")?;
    let template_id = c.required_string(map, "templateId");
    let template_language = c.required_string(map, "templateLanguage");
    let components = c.required(map, "components", "components object", check_components);
    c.allow_only(map, &["templateId", "templateLanguage", "components"]);
    Some(Template {
        template_id: template_id?,
        template_language: template_language?,
        components: components?,
    })
}

pub(crate) fn content(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let template = c.required(map, "template", "template object", check_template);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "template"]);
    Some(Content::Template {
        template: template?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::RegistryConfig;

    fn check(value: Value) -> (Option<Template>, Checker) {
        let mut c = Checker::new(RegistryConfig::default());
        let out = check_template(&mut c, &value);
        (out, c)
    }

    #[test]
    fn mixed_buttons_keep_their_order() {
        let (out, c) = check(json!({
            "templateId": "order_update",
            "templateLanguage": "en",
            "components": {
                "button": [
                    { "type": "quick_reply", "index": 0, "payload": "x" },
                    { "type": "url", "index": 1, "text": "y" }
                ]
            }
        }));
        assert!(c.issues().is_empty(), "{:?}", c.issues());
        let template = out.expect("template should validate");
        assert_eq!(
            template.components.button,
            Some(vec![
                TemplateButton::QuickReply {
                    index: 0,
                    payload: "x".to_string()
                },
                TemplateButton::Url {
                    index: 1,
                    text: "y".to_string()
                },
            ])
        );
    }

    #[test]
    fn every_header_kind_is_accepted() {
        let (out, c) = check(json!({
            "templateId": "t",
            "templateLanguage": "de",
            "components": {
                "header": [
                    { "type": "text", "text": "Hello" },
                    { "type": "image", "image": { "url": "https://cdn.example.com/h.png" } },
                    { "type": "video", "video": { "url": "https://cdn.example.com/h.mp4", "caption": "c" } },
                    { "type": "document", "document": { "url": "https://cdn.example.com/h.pdf", "filename": "h.pdf" } },
                    { "type": "location", "location": { "longitude": 7.46, "latitude": 51.51, "name": "tyntec", "address": "Dortmund" } }
                ],
                "body": [{ "type": "text", "text": "Jane" }]
            }
        }));
        assert!(c.issues().is_empty(), "{:?}", c.issues());
        let template = out.expect("template should validate");
        assert_eq!(template.components.header.as_ref().map(Vec::len), Some(5));
        assert!(template.components.button.is_none());
    }

    #[test]
    fn builder_matches_wire_shape() {
        let template = Template::new("welcome", "en")
            .with_body_text("Jane")
            .with_button(TemplateButton::QuickReply {
                index: 0,
                payload: "yes".to_string(),
            });
        assert_eq!(
            serde_json::to_value(&template).unwrap(),
            json!({
                "templateId": "welcome",
                "templateLanguage": "en",
                "components": {
                    "body": [{ "type": "text", "text": "Jane" }],
                    "button": [{ "type": "quick_reply", "index": 0, "payload": "yes" }]
                }
            })
        );
    }

    #[test]
    fn button_issues_point_at_the_element() {
        let (out, c) = check(json!({
            "templateId": "t",
            "templateLanguage": "en",
            "components": {
                "button": [
                    { "type": "quick_reply", "index": 0, "payload": "x" },
                    { "type": "url", "index": "1", "text": "y" },
                    { "type": "call", "index": 2 }
                ]
            }
        }));
        assert!(out.is_none());
        let paths: Vec<String> = c.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["components.button[1].index", "components.button[2].type"]);
        assert!(matches!(
            &c.issues()[1].kind,
            IssueKind::UnknownVariant { allowed, .. } if allowed == &vec!["quick_reply".to_string(), "url".to_string()]
        ));
    }

    #[test]
    fn duplicate_button_index_is_rejected() {
        let (out, c) = check(json!({
            "templateId": "t",
            "templateLanguage": "en",
            "components": {
                "button": [
                    { "type": "quick_reply", "index": 0, "payload": "a" },
                    { "type": "quick_reply", "index": 0, "payload": "b" }
                ]
            }
        }));
        assert!(out.is_none());
        assert_eq!(c.issues().len(), 1);
        assert_eq!(c.issues()[0].path.to_string(), "components.button[1].index");
        assert_eq!(c.issues()[0].kind, IssueKind::InvalidValue);
    }

    #[test]
    fn missing_template_fields_are_all_reported() {
        let (_, c) = check(json!({ "templateLanguage": "" }));
        let paths: Vec<String> = c.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["templateId", "templateLanguage", "components"]);
    }
}
