//! Common types for SenderNews

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a Sender.net audience group
pub type GroupId = String;

/// Identifier of a Sender.net campaign
pub type CampaignId = String;

/// Identifier of a host post
pub type PostId = u64;

/// Audience group as shown to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// Email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    pub local: String,
    pub domain: String,
}

impl EmailAddress {
    /// Create a new email address
    pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    /// Parse an email address from a string
    pub fn parse(s: &str) -> Option<Self> {
        let (local, domain) = s.split_once('@')?;
        let valid = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !s.chars().any(char::is_whitespace);
        valid.then(|| Self::new(local, domain))
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::Validation(format!("Invalid email address: {}", s)))
    }
}

/// A post saved by the host, as delivered with the publish event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEvent {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub post_type: String,
    #[serde(default)]
    pub is_revision: bool,
}

impl PostEvent {
    /// Create a publish event for a regular (non-revision) post
    pub fn new(
        post_id: PostId,
        post_type: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            title: title.into(),
            content: content.into(),
            post_type: post_type.into(),
            is_revision: false,
        }
    }

    /// Mark the event as a revision save
    pub fn as_revision(mut self) -> Self {
        self.is_revision = true;
        self
    }
}

/// Deserialize an identifier the API may send as either a string or a number
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
