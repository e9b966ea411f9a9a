//! Records returned by the GroupMe API.
//!
//! These mirror the JSON the remote API produces closely enough to decode
//! it with serde, with a few normalizations (null text becomes an empty
//! string, unknown attachment kinds decode to [`Attachment::Unknown`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque GroupMe identifier.
///
/// GroupMe ids are decimal strings and sort numerically. Ids that are not
/// numbers sort after every numeric id, in string order among themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(#[serde(deserialize_with = "string_or_number")] String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Id(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |id: &Id| {
            let n = id.0.parse::<u128>().ok();
            (n.is_none(), n, id.0.clone())
        };
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id(n.to_string())
    }
}

/// A conversation on the remote platform.
///
/// The kind decides which endpoint serves its history and whether the
/// results need reordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Conversation {
    /// A multi-party group, keyed by group id.
    Group(Id),
    /// A two-party direct conversation, keyed by the other user's id.
    Direct(Id),
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversation::Group(id) => write!(f, "group {}", id),
            Conversation::Direct(id) => write!(f, "dm {}", id),
        }
    }
}

/// Pagination boundary for message listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Since(Id),
    After(Id),
    Before(Id),
}

impl Cursor {
    /// The query parameter this cursor is sent as.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            Cursor::Since(id) => ("since_id", id.as_str()),
            Cursor::After(id) => ("after_id", id.as_str()),
            Cursor::Before(id) => ("before_id", id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    #[serde(default)]
    pub source_guid: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
    /// Body text. Empty for attachment-only messages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub system: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorited_by: Vec<Id>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// File ids referenced by `file` attachments, in attachment order.
    pub fn file_ids(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().filter_map(|a| match a {
            Attachment::File { file_id } => Some(file_id.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    Image {
        url: String,
    },
    LinkedImage {
        url: String,
    },
    Video {
        url: String,
        #[serde(default)]
        preview_url: String,
    },
    File {
        file_id: String,
    },
    Location {
        #[serde(default, deserialize_with = "string_or_number")]
        lat: String,
        #[serde(default, deserialize_with = "string_or_number")]
        lng: String,
        #[serde(default)]
        name: String,
    },
    Emoji {
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        charmap: Vec<[u32; 2]>,
    },
    Mentions {
        #[serde(default)]
        user_ids: Vec<Id>,
        #[serde(default)]
        loci: Vec<[usize; 2]>,
    },
    Reply {
        #[serde(default)]
        reply_id: Id,
        #[serde(default)]
        base_reply_id: Id,
    },
    Split {
        #[serde(default)]
        token: String,
    },
    Poll {
        #[serde(default)]
        poll_id: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Membership id, distinct from the user id.
    pub id: Id,
    pub user_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPreview {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub last_message_id: Option<Id>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_message_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub creator_user_id: Id,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<Member>,
    #[serde(default)]
    pub messages: GroupPreview,
}

impl Group {
    pub fn member_by_user_id(&self, user_id: &Id) -> Option<&Member> {
        self.members.iter().find(|m| &m.user_id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages_count: u64,
    pub other_user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
}

/// The authenticated account, as returned by `users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: Id,
    #[serde(default)]
    pub user_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// Metadata resolved by the first phase of a file download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(rename = "mime_type", default)]
    pub mime: String,
}

/// Raw bytes plus the resolved MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedMedia {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// A downloaded file and the metadata it was resolved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub bytes: Vec<u8>,
    pub metadata: FileMetadata,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
