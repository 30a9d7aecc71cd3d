use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Content, CONTENT_TYPE_FIELD};
use crate::checker::Checker;

/// A geographic point with a display name and address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    pub name: String,
    pub address: String,
}

impl Location {
    pub fn new(
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            longitude,
            latitude,
            name: name.into(),
            address: address.into(),
        }
    }
}

pub(crate) fn check_location(c: &mut Checker, value: &Value) -> Option<Location> {
    let map = c.object(value, "location object")?;
    let longitude = c.required(map, "longitude", "number", |c, v| c.number_in(v, -180.0, 180.0));
    let latitude = c.required(map, "latitude", "number", |c, v| c.number_in(v, -90.0, 90.0));
    let name = c.required_string(map, "name");
    let address = c.required_string(map, "address");
    c.allow_only(map, &["longitude", "latitude", "name", "address"]);
    Some(Location {
        longitude: longitude?,
        latitude: latitude?,
        name: name?,
        address: address?,
    })
}

pub(crate) fn content(c: &mut Checker, map: &Map<String, Value>) -> Option<Content> {
    let location = c.required(map, "location", "location object", check_location);
    c.allow_only(map, &[CONTENT_TYPE_FIELD, "location"]);
    Some(Content::Location {
        location: location?,
    })
}
