//! Settings page view model
//!
//! What the settings page shows; rendering is left to the host.

use sendernews_common::types::Group;
use serde::Serialize;

/// Shown when the stored token cannot be decrypted with the current secret
pub const UNREADABLE_TOKEN_MESSAGE: &str =
    "The stored Sender.net API token could not be read, please enter it again.";

/// A group checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOption {
    pub group: Group,
    pub selected: bool,
}

/// State of the group list section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GroupsState {
    /// No token saved yet; only the token field is shown
    NotConfigured,
    /// Groups fetched from Sender.net
    Loaded { groups: Vec<GroupOption> },
    /// Fetching groups failed; the message replaces the remaining fields
    Failed { message: String },
}

/// Everything the settings page needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    /// Masked token for the token input, `None` when no token is stored
    pub masked_token: Option<String>,
    pub token_help_url: String,
    pub autopublish: bool,
    pub reply_to: Option<String>,
    pub groups: GroupsState,
}

impl SettingsView {
    /// Whether the autopublish, reply-to and group fields are rendered
    pub fn shows_campaign_fields(&self) -> bool {
        matches!(self.groups, GroupsState::Loaded { .. })
    }

    /// Error to display above the form, if any
    pub fn error_message(&self) -> Option<&str> {
        match &self.groups {
            GroupsState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Mark the groups whose IDs are among the selected ones
pub fn group_options(groups: Vec<Group>, selected: &[String]) -> Vec<GroupOption> {
    groups
        .into_iter()
        .map(|group| GroupOption {
            selected: selected.contains(&group.id),
            group,
        })
        .collect()
}
