use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
}

impl User {
    /// Letter shown in the avatar bubble.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub id: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Wire payloads, shared by the api client and the mock table.

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewMessage {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreated {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdated {
    pub id: u32,
    pub content: String,
    pub updated_at: DateTime<Utc>,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeleted {
    pub id: u32,
    pub msg: String,
    pub deleted_at: DateTime<Utc>,
}

/// Body of error replies, e.g. `{"msg": "Unauthorized"}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Notice {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        let user = User {
            id: 1,
            name: "User Test".to_owned(),
        };
        assert_eq!(user.initial(), "U");

        let user = User {
            id: 2,
            name: "éloïse".to_owned(),
        };
        assert_eq!(user.initial(), "É");

        let user = User {
            id: 3,
            name: String::new(),
        };
        assert_eq!(user.initial(), "");
    }

    #[test]
    fn test_wire_names() {
        let json = r#"{"content":"hello","createdAt":"2024-05-01T10:00:00Z"}"#;
        let created: MessageCreated = serde_json::from_str(json).unwrap();
        assert_eq!(created.content, "hello");

        let deleted = MessageDeleted {
            id: 4,
            msg: "ok".to_owned(),
            deleted_at: created.created_at,
        };
        let value = serde_json::to_value(&deleted).unwrap();
        assert_eq!(value["deletedAt"], "2024-05-01T10:00:00Z");
        assert_eq!(value["id"], 4);
    }
}
