//! The message envelope: sender, recipient and channel around one content.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::checker::Checker;
use crate::config::RegistryConfig;
use crate::content::{check_content, content_union, Content, ContentType};
use crate::error::{IssueKind, ValidationResult};
use crate::registry::Schema;
use crate::union::DiscriminatedUnion;

/// Field holding the channel discriminator.
pub const CHANNEL_FIELD: &str = "channel";

/// Channel names the provider knows about but this crate does not model.
pub const RESERVED_CHANNELS: [&str; 2] = ["telegram", "facebook"];

const ENVELOPE_FIELDS: [&str; 6] = [
    "from",
    "to",
    CHANNEL_FIELD,
    "senderName",
    "urlPreviewDisplayed",
    "content",
];

/// Implemented channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl Channel {
    pub const ALL: [Channel; 1] = [Channel::WhatsApp];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated outbound message in its wire shape:
/// `{from, to, channel, senderName?, urlPreviewDisplayed?, content: {contentType, ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from: String,
    pub to: String,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_preview_displayed: Option<bool>,
    pub content: Content,
}

impl Message {
    pub fn whatsapp(from: impl Into<String>, to: impl Into<String>, content: Content) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            channel: Channel::WhatsApp,
            sender_name: None,
            url_preview_displayed: None,
            content,
        }
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }

    pub fn with_url_preview(mut self, displayed: bool) -> Self {
        self.url_preview_displayed = Some(displayed);
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content.content_type()
    }
}

/// Channel-specific part of the envelope, produced by the channel union.
#[derive(Debug)]
struct ChannelFields {
    channel: Channel,
    sender_name: Option<String>,
    url_preview_displayed: Option<bool>,
}

fn whatsapp_fields(c: &mut Checker, map: &Map<String, Value>) -> Option<ChannelFields> {
    let sender_name = c.optional_string(map, "senderName");
    let url_preview_displayed = c.optional_bool(map, "urlPreviewDisplayed");
    Some(ChannelFields {
        channel: Channel::WhatsApp,
        sender_name: sender_name?,
        url_preview_displayed: url_preview_displayed?,
    })
}

/// Envelope validator over a (possibly narrowed) content union.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    content: Arc<DiscriminatedUnion<Content>>,
    channels: DiscriminatedUnion<ChannelFields>,
}

impl MessageSchema {
    /// Accepts every content type on the WhatsApp channel.
    pub fn whatsapp() -> Self {
        Self::from_union(content_union())
    }

    /// Accepts only the listed content types. Other tags fail with
    /// `UnknownVariant` listing just these.
    pub fn for_content(types: &[ContentType]) -> Self {
        let tags: Vec<&str> = types.iter().map(|kind| kind.as_str()).collect();
        Self::from_union(content_union().restrict(&tags))
    }

    fn from_union(content: DiscriminatedUnion<Content>) -> Self {
        let channels =
            DiscriminatedUnion::new(CHANNEL_FIELD).variant(Channel::WhatsApp.as_str(), whatsapp_fields);
        Self {
            content: Arc::new(content),
            channels,
        }
    }

    /// Accepted `contentType` tags, in declaration order.
    pub fn content_tags(&self) -> Vec<&'static str> {
        self.content.tags()
    }

    fn check_channel(&self, c: &mut Checker, value: &Value, map: &Map<String, Value>) -> Option<ChannelFields> {
        match map.get(CHANNEL_FIELD) {
            Some(Value::String(name)) if !self.channels.contains(name) => {
                let supported: Vec<String> = self.channels.tags().iter().map(|t| t.to_string()).collect();
                let expected = if RESERVED_CHANNELS.contains(&name.as_str()) {
                    format!("one of {} ({name} is reserved)", supported.join(", "))
                } else {
                    format!("one of {}", supported.join(", "))
                };
                c.at(CHANNEL_FIELD, |c| {
                    c.report(
                        IssueKind::UnsupportedChannel {
                            channel: name.clone(),
                            supported,
                        },
                        expected,
                        format!("\"{name}\""),
                    );
                });
                None
            }
            _ => self.channels.check(c, value, "message object"),
        }
    }
}

impl Default for MessageSchema {
    fn default() -> Self {
        Self::whatsapp()
    }
}

impl Schema for MessageSchema {
    fn check(&self, c: &mut Checker, value: &Value) -> Option<Message> {
        let map = c.object(value, "message object")?;
        let to = c.required_string(map, "to");
        let from = c.required_string(map, "from");
        // Content is checked even when the channel is missing or unsupported.
        let fields = self.check_channel(c, value, map);
        let content = c.required(map, "content", "content object", |c, v| {
            check_content(c, v, &self.content)
        });
        c.allow_only(map, &ENVELOPE_FIELDS);

        let fields = fields?;
        Some(Message {
            from: from?,
            to: to?,
            channel: fields.channel,
            sender_name: fields.sender_name,
            url_preview_displayed: fields.url_preview_displayed,
            content: content?,
        })
    }

    fn content_types(&self) -> Vec<&'static str> {
        self.content_tags()
    }
}

impl MessageSchema {
    /// Validate `value` as a message.
    pub fn validate(&self, value: &Value, config: RegistryConfig) -> ValidationResult<Message> {
        Schema::validate(self, value, config)
    }
}
