use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Content, CONTENT_TYPE_FIELD};
use crate::checker::Checker;
use crate::error::IssueKind;

/// Which kind of interactive message is sent. Each subtype's component key in
/// [`InteractiveComponents`] has the same name as its wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractiveSubType {
    Buttons,
    List,
    Product,
    ProductList,
}

impl InteractiveSubType {
    pub const ALL: [InteractiveSubType; 4] = [
        InteractiveSubType::Buttons,
        InteractiveSubType::List,
        InteractiveSubType::Product,
        InteractiveSubType::ProductList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractiveSubType::Buttons => "buttons",
            InteractiveSubType::List => "list",
            InteractiveSubType::Product => "product",
            InteractiveSubType::ProductList => "productList",
        }
    }

    fn choices() -> [(&'static str, InteractiveSubType); 4] {
        Self::ALL.map(|sub_type| (sub_type.as_str(), sub_type))
    }
}

impl fmt::Display for InteractiveSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactive {
    pub sub_type: InteractiveSubType,
    pub components: InteractiveComponents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<InteractiveText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<InteractiveText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<InteractiveText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ReplyButton>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<InteractiveList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_list: Option<ProductList>,
}

impl InteractiveComponents {
    /// Whether the component belonging to `sub_type` is set.
    pub fn has(&self, sub_type: InteractiveSubType) -> bool {
        match sub_type {
            InteractiveSubType::Buttons => self.buttons.is_some(),
            InteractiveSubType::List => self.list.is_some(),
            InteractiveSubType::Product => self.product.is_some(),
            InteractiveSubType::ProductList => self.product_list.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveText {
    Text { text: String },
}

impl InteractiveText {
    pub fn text(text: impl Into<String>) -> Self {
        InteractiveText::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyButton {
    Reply { reply: Reply },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub payload: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveList {
    pub title: String,
    pub sections: Vec<ListSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    pub payload: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub catalog_id: String,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub catalog_id: String,
    pub sections: Vec<ProductSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSection {
    pub items: Vec<ProductItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub product_id: String,
}

fn check_text(c: &mut Checker, value: &Value) -> Option<InteractiveText> {
    let map = c.object(value, "text component object")?;
    let tag = c.literal(map, "type", "text");
    let text = c.required_string(map, "text");
    c.allow_only(map, &["type", "text"]);
    tag?;
    Some(InteractiveText::Text { text: text? })
}

fn check_reply_button(c: &mut Checker, value: &Value) -> Option<ReplyButton> {
    let map = c.object(value, "reply button object")?;
    let tag = c.literal(map, "type", "reply");
    let reply = c.required(map, "reply", "reply object", |c, v| {
        let reply = c.object(v, "reply object")?;
        let payload = c.required_string(reply, "payload");
        let title = c.required_string(reply, "title");
        c.allow_only(reply, &["payload", "title"]);
        Some(Reply {
            payload: payload?,
            title: title?,
        })
    });
    c.allow_only(map, &["type", "reply"]);
    tag?;
    Some(ReplyButton::Reply { reply: reply? })
}

fn check_row(c: &mut Checker, value: &Value) -> Option<ListRow> {
    let map = c.object(value, "row object")?;
    let payload = c.required_string(map, "payload");
    let title = c.required_string(map, "title");
    let description = c.required_string(map, "description");
    c.allow_only(map, &["payload", "title", "description"]);
    Some(ListRow {
        payload: payload?,
        title: title?,
        description: description?,
    })
}

fn check_list(c: &mut Checker, value: &Value) -> Option<InteractiveList> {
    let map = c.object(value, "list object")?;
    let title = c.required_string(map, "title");
    let sections = c.required(map, "sections", "array of sections", |c, v| {
        c.array(v, "array of sections", |c, section| {
            let section = c.object(section, "section object")?;
            let title = c.required_string(section, "title");
            let rows = c.required(section, "rows", "array of rows", |c, v| {
                c.array(v, "array of rows", check_row)
            });
            c.allow_only(section, &["title", "rows"]);
            Some(ListSection {
                title: title?,
                rows: rows?,
            })
        })
    });
    c.allow_only(map, &["title", "sections"]);
    Some(InteractiveList {
        title: title?,
        sections: sections?,
    })
}

fn check_product(c: &mut Checker, value: &Value) -> Option<ProductRef> {
    let map = c.object(value, "product object")?;
    let catalog_id = c.required_string(map, "catalogId");
    let product_id = c.required_string(map, "productId");
    c.allow_only(map, &["catalogId", "productId"]);
    Some(ProductRef {
        catalog_id: catalog_id?,
        product_id: product_id?,
    })
}

fn check_product_list(c: &mut Checker, value: &Value) -> Option<ProductList> {
    let map = c.object(value, "product list object")?;
    let catalog_id = c.required_string(map, "catalogId");
    let sections = c.required(map, "sections", "array of product sections", |c, v| {
        c.array(v, "array of product sections", |c, section| {
            let section = c.object(section, "product section object")?;
            let items = c.required(section, "items", "array of products", |c, v| {
                c.array(v, "array of products", |c, item| {
                    let item = c.object(item, "product item object")?;
                    let product_id = c.required_string(item, "productId");
                    c.allow_only(item, &["productId"]);
                    Some(ProductItem {
                        product_id: product_id?,
                    })
                })
            });
            c.allow_only(section, &["items"]);
            Some(ProductSection { items: items? })
        })
    });
    c.allow_only(map, &["catalogId", "sections"]);
    Some(ProductList {
        catalog_id: catalog_id?,
        sections: sections?,
    })
}

fn check_components(c: &mut Checker, value: &Value) -> Option<InteractiveComponents> {
    let map = c.object(value, "components object")?;
    let header = c.optional(map, "header", check_text);
    let body = c.optional(map, "body", check_text);
    let footer = c.optional(map, "footer", check_text);
    let buttons = c.optional(map, "buttons", |c, v| {
        c.array(v, "array of reply buttons", check_reply_button)
    });
    let list = c.optional(map, "list", check_list);
    let product = c.optional(map, "product", check_product);
    let product_list = c.optional(map, "productList", check_product_list);
    c.allow_only(
        map,
        &["header", "body", "footer", "buttons", "list", "product", "productList"],
    );
    Some(InteractiveComponents {
        header: header?,
        body: body?,
        footer: footer?,
        buttons: buttons?,
        list: list?,
        product: product?,
        product_list: product_list?,
    })
}

/// The component named by `sub_type` must be present and the components of
/// the other subtypes must be absent.
fn cross_check(c: &mut Checker, sub_type: InteractiveSubType, components: &InteractiveComponents) -> bool {
    let mut consistent = true;
    c.at("components", |c| {
        for other in InteractiveSubType::ALL {
            let present = components.has(other);
            if other == sub_type && !present {
                consistent = false;
                c.at(other.as_str(), |c| {
                    c.report(
                        IssueKind::MissingField,
                        format!("{other} component for subType {sub_type}"),
                        "nothing",
                    );
                });
            } else if other != sub_type && present {
                consistent = false;
                c.at(other.as_str(), |c| {
                    c.report(
                        IssueKind::UnexpectedField,
                        format!("no {other} component for subType {sub_type}"),
                        "object",
                    );
                });
            }
        }
    });
    consistent
}

fn check_interactive(c: &mut Checker, value: &Value) -> Option<Interactive> {
    let map = c.object(value, "interactive object")?;
    let sub_type = c.required(map, "subType", "interactive subtype", |c, v| {
        c.one_of(v, &InteractiveSubType::choices())
    });
    let components = c.required(map, "components", "components object", check_components);
    c.allow_only(map, &["subType", "components"]);

    let (sub_type, components) = (sub_type?, components?);
    if c.config().cross_check_interactive && !cross_check(c, sub_type, &components) {
        return None;
    }
    Some(Interactive {
        sub_type,
        components,
    })
}

pub(crate) fn content(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let interactive = c.required(map, "interactive", "interactive object", check_interactive);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "interactive"]);
    Some(Content::Interactive {
        interactive: interactive?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::RegistryConfig;

    fn check_with(config: RegistryConfig, value: Value) -> (Option<Interactive>, Checker) {
        let mut c = Checker::new(config);
        let out = check_interactive(&mut c, &value);
        (out, c)
    }

    fn check(value: Value) -> (Option<Interactive>, Checker) {
        check_with(RegistryConfig::default(), value)
    }

    fn buttons() -> Value {
        json!([
            { "type": "reply", "reply": { "payload": "yes", "title": "Yes" } },
            { "type": "reply", "reply": { "payload": "no", "title": "No" } }
        ])
    }

    #[test]
    fn buttons_message_validates() {
        let doc = json!({
            "subType": "buttons",
            "components": {
                "header": { "type": "text", "text": "Confirm" },
                "body": { "type": "text", "text": "Keep the appointment?" },
                "buttons": buttons()
            }
        });
        let (out, c) = check(doc.clone());
        assert!(c.issues().is_empty(), "{:?}", c.issues());
        let interactive = out.expect("interactive should validate");
        assert_eq!(interactive.sub_type, InteractiveSubType::Buttons);
        assert_eq!(serde_json::to_value(&interactive).unwrap(), doc);
    }

    #[test]
    fn list_and_product_list_shapes() {
        let (out, c) = check(json!({
            "subType": "list",
            "components": {
                "body": { "type": "text", "text": "Pick one" },
                "list": {
                    "title": "Menu",
                    "sections": [{
                        "title": "Mains",
                        "rows": [{ "payload": "p1", "title": "Pasta", "description": "Fresh" }]
                    }]
                }
            }
        }));
        assert!(c.issues().is_empty(), "{:?}", c.issues());
        assert_eq!(out.unwrap().components.list.unwrap().sections[0].rows[0].title, "Pasta");

        let (out, c) = check(json!({
            "subType": "productList",
            "components": {
                "productList": {
                    "catalogId": "cat-1",
                    "sections": [{ "items": [{ "productId": "sku-1" }, { "productId": "sku-2" }] }]
                }
            }
        }));
        assert!(c.issues().is_empty(), "{:?}", c.issues());
        let list = out.unwrap().components.product_list.unwrap();
        assert_eq!(list.sections[0].items.len(), 2);
    }

    #[test]
    fn subtype_must_match_component() {
        let doc = json!({
            "subType": "product",
            "components": { "buttons": buttons() }
        });
        let (out, c) = check(doc.clone());
        assert!(out.is_none());
        let found: Vec<(String, &IssueKind)> = c
            .issues()
            .iter()
            .map(|i| (i.path.to_string(), &i.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("components.buttons".to_string(), &IssueKind::UnexpectedField),
                ("components.product".to_string(), &IssueKind::MissingField),
            ]
        );

        let relaxed = RegistryConfig {
            cross_check_interactive: false,
            ..RegistryConfig::default()
        };
        let (out, c) = check_with(relaxed, doc);
        assert!(out.is_some());
        assert!(c.issues().is_empty());
    }

    #[test]
    fn unknown_subtype_and_header_tag() {
        let (out, c) = check(json!({
            "subType": "carousel",
            "components": { "header": { "type": "image", "text": "x" } }
        }));
        assert!(out.is_none());
        let paths: Vec<String> = c.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["subType", "components.header.type"]);
        assert!(c.issues().iter().all(|i| i.kind == IssueKind::InvalidValue));
    }

    #[test]
    fn reply_button_issues_are_indexed() {
        let (_, c) = check(json!({
            "subType": "buttons",
            "components": {
                "buttons": [
                    { "type": "reply", "reply": { "payload": "yes", "title": "Yes" } },
                    { "type": "reply", "reply": { "payload": "no" } }
                ]
            }
        }));
        assert_eq!(c.issues().len(), 1);
        assert_eq!(c.issues()[0].path.to_string(), "components.buttons[1].reply.title");
    }
}
