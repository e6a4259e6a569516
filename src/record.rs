//! The resolved inventory record
//!
//! One [`InventoryRecord`] is produced per repository that survives
//! exclusion. It serializes to the code inventory JSON shape:
//!
//! ```json
//! {
//!   "name": "ProductOne",
//!   "description": "The first product",
//!   "permissions": {
//!     "licenses": [{"URL": "https://api.github.com/licenses/mit", "name": "MIT"}],
//!     "usageType": "openSource",
//!     "exemptionText": null
//!   },
//!   "tags": ["topic1"],
//!   "contact": {"email": "gsa@example.gov"},
//!   "repositoryURL": "https://github.com/GSA/ProductOne",
//!   "laborHours": 0
//! }
//! ```
//!
//! Field values are kept as JSON values: an override or declaration may
//! supply any type and it is passed through as given. `organization` is the
//! only optional key and is omitted unless something supplied it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    pub licenses: Value,
    #[serde(rename = "usageType")]
    pub usage_type: Value,
    #[serde(rename = "exemptionText")]
    pub exemption_text: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: Value,
}

/// Merged metadata for one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub name: Value,
    pub description: Value,
    pub permissions: Permissions,
    pub tags: Value,
    pub contact: Contact,
    #[serde(rename = "repositoryURL")]
    pub repository_url: Value,
    #[serde(rename = "laborHours")]
    pub labor_hours: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Value>,
}

impl InventoryRecord {
    /// The record as a JSON value, keys in output order.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> InventoryRecord {
        InventoryRecord {
            name: json!("ProductOne"),
            description: json!("ProductOne"),
            permissions: Permissions {
                licenses: Value::Null,
                usage_type: json!("openSource"),
                exemption_text: Value::Null,
            },
            tags: json!(["GSA"]),
            contact: Contact {
                email: json!("gsa@example.gov"),
            },
            repository_url: json!("https://github.com/GSA/ProductOne"),
            labor_hours: json!(0),
            organization: None,
        }
    }

    #[test]
    fn test_serialized_key_order_and_names() {
        let json = serde_json::to_string(&record()).unwrap();
        let expected = concat!(
            r#"{"name":"ProductOne","description":"ProductOne","#,
            r#""permissions":{"licenses":null,"usageType":"openSource","exemptionText":null},"#,
            r#""tags":["GSA"],"contact":{"email":"gsa@example.gov"},"#,
            r#""repositoryURL":"https://github.com/GSA/ProductOne","laborHours":0}"#
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_organization_present_only_when_set() {
        let mut with_org = record();
        with_org.organization = Some(json!("GSA TTS"));
        let value = with_org.to_value();
        assert_eq!(value["organization"], json!("GSA TTS"));

        let value = record().to_value();
        assert!(value.as_object().unwrap().get("organization").is_none());
    }

    #[test]
    fn test_roundtrip_from_json() {
        let parsed: InventoryRecord = serde_json::from_value(record().to_value()).unwrap();
        assert_eq!(parsed, record());
    }
}
