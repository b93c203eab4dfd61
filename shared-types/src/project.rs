use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::Amount;

/// Project category as embedded in the project record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct Category {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Project tracked against a budget, with its services embedded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct Project {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub category: Option<Category>,
    #[serde(default)]
    #[ts(type = "number")]
    pub budget: Amount,
    /// Running total of the services' costs.
    #[serde(default)]
    #[ts(type = "number")]
    pub cost: Amount,
    #[serde(default, deserialize_with = "deserialize_services")]
    pub services: Vec<Service>,
}

impl Project {
    /// A project without a name is treated as not yet loaded.
    pub fn is_loaded(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.name.as_str())
    }
}

/// Billable line item belonging to a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct Service {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub cost: Amount,
    #[serde(default)]
    pub description: String,
}

/// Service submitted by the service form, before it has an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct NewService {
    pub name: String,
    #[ts(type = "number")]
    pub cost: Amount,
    #[serde(default)]
    pub description: String,
}

impl NewService {
    pub fn with_id(self, id: impl Into<String>) -> Service {
        Service {
            id: id.into(),
            name: self.name,
            cost: self.cost,
            description: self.description,
        }
    }

    /// Assigns a random v4 UUID. Uniqueness is not checked against the
    /// project's existing services.
    pub fn into_service(self) -> Service {
        self.with_id(Uuid::new_v4().to_string())
    }
}

// json-server hands out numeric ids for seeded records and string ids for
// everything created through the API.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

// A null services list reads as empty, same as a missing one.
fn deserialize_services<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Service>, D::Error> {
    Ok(Option::<Vec<Service>>::deserialize(deserializer)?.unwrap_or_default())
}
