//! Sender.net types
//!
//! Error taxonomy, campaign payload and the client trait.

use crate::vault::ApiToken;
use async_trait::async_trait;
use sendernews_common::types::{CampaignId, Group, GroupId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown to administrators when Sender.net rejects the token
pub const AUTHENTICATION_FAILED_MESSAGE: &str =
    "Unable to authenticate with Sender.net using that API token, please try again with a valid token.";

/// Sender.net error types
#[derive(Debug, Error)]
pub enum SenderError {
    #[error("{0}")]
    Authentication(String),
    #[error("Unexpected response from Sender.net API: HTTP {status}")]
    UnexpectedApi { status: u16 },
    #[error("Sender.net API unreachable: {0}")]
    Transport(String),
    #[error("Invalid Sender.net API response: {0}")]
    InvalidResponse(String),
}

impl SenderError {
    pub(crate) fn authentication() -> Self {
        SenderError::Authentication(AUTHENTICATION_FAILED_MESSAGE.to_string())
    }

    /// HTTP status returned by the API, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SenderError::Authentication(_) => Some(401),
            SenderError::UnexpectedApi { status } => Some(*status),
            SenderError::Transport(_) | SenderError::InvalidResponse(_) => None,
        }
    }
}

impl From<SenderError> for sendernews_common::Error {
    fn from(err: SenderError) -> Self {
        use sendernews_common::Error;
        match err {
            SenderError::Authentication(message) => Error::Auth(message),
            SenderError::UnexpectedApi { status } => Error::Api { status },
            SenderError::Transport(message) => Error::Transport(message),
            SenderError::InvalidResponse(message) => {
                Error::Internal(format!("Invalid Sender.net API response: {}", message))
            }
        }
    }
}

/// Sender.net result type
pub type SenderResult<T> = Result<T, SenderError>;

/// Campaign to create from a published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    /// Internal campaign title
    pub title: String,
    /// Email subject line
    pub subject: String,
    /// HTML body
    pub content: String,
    /// Reply-to address
    pub reply_to: Option<String>,
    /// Recipient group IDs, passed through unchanged
    pub groups: Vec<GroupId>,
}

impl NewCampaign {
    /// Campaign whose title and subject are the post title
    pub fn from_post(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            subject: title.clone(),
            title,
            content: content.into(),
            reply_to: None,
            groups: Vec::new(),
        }
    }

    pub fn with_reply_to(mut self, reply_to: Option<String>) -> Self {
        self.reply_to = reply_to;
        self
    }

    pub fn with_groups(mut self, groups: Vec<GroupId>) -> Self {
        self.groups = groups;
        self
    }
}

/// Outbound operations against the newsletter service
#[async_trait]
pub trait NewsletterApi: Send + Sync {
    /// List the audience groups available to the token
    async fn list_groups(&self, token: &ApiToken) -> SenderResult<Vec<Group>>;

    /// Create a draft campaign and return its identifier
    async fn create_campaign(
        &self,
        token: &ApiToken,
        campaign: &NewCampaign,
    ) -> SenderResult<CampaignId>;

    /// Send a previously created campaign
    async fn send_campaign(&self, token: &ApiToken, campaign_id: &str) -> SenderResult<()>;
}
