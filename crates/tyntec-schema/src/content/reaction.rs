use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Content, CONTENT_TYPE_FIELD};
use crate::checker::Checker;

/// An emoji reaction to an earlier message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub message_id: String,
    pub emoji: String,
}

fn check_reaction(c: &mut Checker, value: &Value) -> Option<Reaction> {
    let map = c.object(value, "reaction object")?;
    let message_id = c.required_string(map, "messageId");
    let emoji = c.required_string(map, "emoji");
    c.allow_only(map, &["messageId", "emoji"]);
    Some(Reaction {
        message_id: message_id?,
        emoji: emoji?,
    })
}

pub(crate) fn content(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let reaction = c.required(map, "reaction", "reaction object", check_reaction);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "reaction"]);
    Some(Content::Reaction {
        reaction: reaction?,
    })
}
