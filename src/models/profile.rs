// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Belonio user profile and employment records.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Profile returned by `GET /profiles/self`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Employment records keyed by identifier, in document order.
    #[serde(deserialize_with = "ordered_employments")]
    pub employments: Vec<(String, Employment)>,
    /// Remaining profile fields, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// The active employment: the first one without an end date.
    pub fn current_employment(&self) -> Option<&Employment> {
        self.employments
            .iter()
            .map(|(_, employment)| employment)
            .find(|employment| employment.is_active())
    }
}

/// A user's association with an employer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employment {
    /// Identifier used to scope gift card searches
    pub public_id: String,
    /// End of validity; `None` while the employment is ongoing
    pub valid_till: Option<String>,
    pub employer: Employer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employment {
    pub fn is_active(&self) -> bool {
        self.valid_till.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Employer {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a JSON object into key/value pairs without reordering, so
/// "first active employment" means first in the payload.
fn ordered_employments<'de, D>(deserializer: D) -> Result<Vec<(String, Employment)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Employment)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of employment records")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Employment>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employment(public_id: &str, valid_till: Option<&str>, employer: &str) -> Value {
        serde_json::json!({
            "publicId": public_id,
            "validTill": valid_till,
            "employer": { "name": employer, "id": 7 },
        })
    }

    #[test]
    fn test_current_employment_picks_open_ended_record() {
        let json = serde_json::json!({
            "firstName": "Jane",
            "employments": {
                "b": employment("emp-old", Some("2023-12-31"), "Old GmbH"),
                "a": employment("emp-new", None, "New AG"),
            }
        });

        let profile: UserProfile = serde_json::from_value(json).unwrap();
        let current = profile.current_employment().expect("active employment");

        assert_eq!(current.public_id, "emp-new");
        assert_eq!(current.employer.name, "New AG");
        assert_eq!(profile.extra["firstName"], "Jane");
    }

    #[test]
    fn test_first_active_employment_in_document_order_wins() {
        let body = r#"{
            "employments": {
                "zz": {"publicId": "first", "validTill": null, "employer": {"name": "A"}},
                "aa": {"publicId": "second", "validTill": null, "employer": {"name": "B"}}
            }
        }"#;

        let profile: UserProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.employments[0].0, "zz");
        assert_eq!(profile.current_employment().unwrap().public_id, "first");
    }

    #[test]
    fn test_no_active_employment() {
        let json = serde_json::json!({
            "employments": { "x": employment("emp", Some("2020-01-01"), "Gone Ltd") }
        });

        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert!(profile.current_employment().is_none());
    }

    #[test]
    fn test_missing_employments_is_an_error() {
        let result = serde_json::from_str::<UserProfile>(r#"{"firstName": "Jane"}"#);
        assert!(result.is_err());
    }
}
