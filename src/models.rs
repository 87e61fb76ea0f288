//! Request parameter types and the raw response wrapper.
//!
//! Response bodies are passed through as [`serde_json::Value`]; only the
//! values sent to Chatwork are typed here.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::{Serialize, Serializer};

/// What to do when removing yourself from a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomAction {
    /// Leave the chat; it stays for the other members.
    Leave,
    /// Delete the chat for everyone (admin only).
    Delete,
}

/// Icon types accepted for group chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPreset {
    Group,
    Check,
    Document,
    Meeting,
    Event,
    Project,
    Business,
    Study,
    Security,
    Star,
    Idea,
    Heart,
    Magcup,
    Beer,
    Music,
    Sports,
    Travel,
}

/// Parameters for creating a group chat.
#[derive(Debug, Clone, Serialize)]
pub struct NewRoom {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_preset: Option<IconPreset>,
    #[serde(serialize_with = "comma_separated")]
    pub members_admin_ids: Vec<u64>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members_member_ids: Vec<u64>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members_readonly_ids: Vec<u64>,
}

impl NewRoom {
    /// A room needs a name and at least one administrator.
    pub fn new(name: impl Into<String>, members_admin_ids: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            description: None,
            icon_preset: None,
            members_admin_ids,
            members_member_ids: Vec::new(),
            members_readonly_ids: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon_preset(mut self, icon_preset: IconPreset) -> Self {
        self.icon_preset = Some(icon_preset);
        self
    }

    pub fn members(mut self, ids: Vec<u64>) -> Self {
        self.members_member_ids = ids;
        self
    }

    pub fn readonly_members(mut self, ids: Vec<u64>) -> Self {
        self.members_readonly_ids = ids;
        self
    }
}

/// Fields to change on an existing chat. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_preset: Option<IconPreset>,
}

/// Complete member list of a group chat, by role.
///
/// Chatwork replaces the membership wholesale, so accounts missing from all
/// three lists are removed from the room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMembers {
    #[serde(serialize_with = "comma_separated")]
    pub members_admin_ids: Vec<u64>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members_member_ids: Vec<u64>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members_readonly_ids: Vec<u64>,
}

/// A task to add to a chat.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub body: String,
    /// Due date as Unix time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(serialize_with = "comma_separated")]
    pub to_ids: Vec<u64>,
}

/// Response returned as-is to the caller, without interpreting the body.
///
/// Only successful responses are wrapped; non-2xx statuses surface as
/// [`Error::Api`](crate::Error::Api) instead.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub(crate) async fn read(response: reqwest::Response) -> crate::Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> crate::Result<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }
}

/// Chatwork takes account id lists as `1,2,3`.
fn comma_separated<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode `value` exactly as `RequestBuilder::form` puts it on the wire.
    fn form_body<T: Serialize + ?Sized>(value: &T) -> String {
        let request = reqwest::Client::new()
            .post("http://localhost/")
            .form(value)
            .build()
            .unwrap();
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn new_room_omits_unset_fields() {
        let room = NewRoom::new("Ops team", vec![1, 2]).icon_preset(IconPreset::Meeting);
        assert_eq!(
            form_body(&room),
            "name=Ops+team&icon_preset=meeting&members_admin_ids=1%2C2"
        );
    }

    #[test]
    fn room_update_default_is_empty() {
        assert_eq!(form_body(&RoomUpdate::default()), "");
    }

    #[test]
    fn room_update_encodes_set_fields() {
        let update = RoomUpdate {
            name: Some("Release".to_string()),
            icon_preset: Some(IconPreset::Travel),
            ..Default::default()
        };
        assert_eq!(form_body(&update), "name=Release&icon_preset=travel");
    }

    #[test]
    fn task_ids_are_joined() {
        let task = NewTask {
            body: "Review".to_string(),
            limit: Some(1_700_000_000),
            to_ids: vec![10, 20, 30],
        };
        assert_eq!(
            form_body(&task),
            "body=Review&limit=1700000000&to_ids=10%2C20%2C30"
        );
    }

    #[test]
    fn room_members_skip_empty_roles() {
        let members = RoomMembers {
            members_admin_ids: vec![7],
            members_member_ids: Vec::new(),
            members_readonly_ids: vec![8, 9],
        };
        assert_eq!(
            form_body(&members),
            "members_admin_ids=7&members_readonly_ids=8%2C9"
        );
    }

    #[test]
    fn room_action_lowercase() {
        assert_eq!(form_body(&[("action_type", RoomAction::Leave)]), "action_type=leave");
        assert_eq!(form_body(&[("action_type", RoomAction::Delete)]), "action_type=delete");
    }
}
