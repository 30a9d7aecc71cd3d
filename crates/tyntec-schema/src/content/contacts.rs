use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Content, CONTENT_TYPE_FIELD};
use crate::checker::Checker;

/// A contact card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub addresses: Vec<ContactAddress>,
    pub name: ContactName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAddress {
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub street: String,
    /// Free-form label such as `HOME` or `WORK`.
    #[serde(rename = "type")]
    pub address_type: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactName {
    pub formatted_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

fn check_address(c: &mut Checker, value: &Value) -> Option<ContactAddress> {
    let map = c.object(value, "address object")?;
    let city = c.required_string(map, "city");
    let country = c.required_string(map, "country");
    let country_code = c.required_string(map, "countryCode");
    let street = c.required_string(map, "street");
    let address_type = c.required_string(map, "type");
    let zip = c.required_string(map, "zip");
    c.allow_only(map, &["city", "country", "countryCode", "street", "type", "zip"]);
    Some(ContactAddress {
        city: city?,
        country: country?,
        country_code: country_code?,
        street: street?,
        address_type: address_type?,
        zip: zip?,
    })
}

fn check_name(c: &mut Checker, value: &Value) -> Option<ContactName> {
    let map = c.object(value, "name object")?;
    let formatted_name = c.required_string(map, "formattedName");
    let last_name = c.optional_string(map, "lastName");
    c.allow_only(map, &["formattedName", "lastName"]);
    Some(ContactName {
        formatted_name: formatted_name?,
        last_name: last_name?,
    })
}

fn check_contact(c: &mut Checker, value: &Value) -> Option<Contact> {
    let map = c.object(value, "contact object")?;
    let addresses = c.required(map, "addresses", "array of addresses", |c, v| {
        c.array(v, "array of addresses", check_address)
    });
    let name = c.required(map, "name", "name object", check_name);
    c.allow_only(map, &["addresses", "name"]);
    Some(Contact {
        addresses: addresses?,
        name: name?,
    })
}

pub(crate) fn content(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let contacts = c.required(map, "contacts", "non-empty array of contacts", |c, v| {
        c.non_empty_array(v, "array of contacts", check_contact)
    });
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "contacts"]);
    Some(Content::Contacts {
        contacts: contacts?,
    })
}
