//! SenderNews Core - Sender.net campaign publishing
//!
//! This crate provides the credential vault, the Sender.net API client, the
//! settings flow and the post-published reaction of the SenderNews plugin.

pub mod plugin;
pub mod publish;
pub mod sender;
pub mod settings;
pub mod vault;

#[cfg(test)]
mod testing;

pub use plugin::SenderNews;
pub use publish::{PublishOutcome, SkipReason};
pub use sender::{NewCampaign, NewsletterApi, SenderClient, SenderError, SenderResult};
pub use settings::{ConfigStore, GroupsState, MemoryStore, SettingsSubmission, SettingsView};
pub use vault::{ApiToken, CredentialVault, VaultError};
