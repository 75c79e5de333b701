//! Plugin facade
//!
//! Entry points the host platform calls on its events: settings
//! registration, settings page render, settings save and post publication.

use crate::publish::{self, PublishOutcome, SkipReason};
use crate::sender::{NewCampaign, NewsletterApi, SenderClient};
use crate::settings::view::group_options;
use crate::settings::{
    sanitize_text_field, settings_schema, ConfigStore, GroupsState, PluginOptions,
    SettingDescriptor, SettingsSubmission, SettingsView, OPTION_API_TOKEN, OPTION_AUTOPUBLISH,
    OPTION_REPLY_TO, OPTION_SELECTED_GROUPS, UNREADABLE_TOKEN_MESSAGE,
};
use crate::vault::{ApiToken, CredentialVault};
use sendernews_common::types::{EmailAddress, GroupId, PostEvent};
use sendernews_common::{Config, Error, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// SenderNews plugin core
pub struct SenderNews {
    config: Config,
    vault: CredentialVault,
    store: Arc<dyn ConfigStore>,
    api: Arc<dyn NewsletterApi>,
}

impl SenderNews {
    /// Create the plugin from its collaborators
    pub fn new(
        config: Config,
        vault: CredentialVault,
        store: Arc<dyn ConfigStore>,
        api: Arc<dyn NewsletterApi>,
    ) -> Self {
        Self {
            config,
            vault,
            store,
            api,
        }
    }

    /// Create the plugin with the Sender.net HTTP client and the vault secret
    /// taken from the environment
    pub fn from_config(config: Config, store: Arc<dyn ConfigStore>) -> Result<Self> {
        let vault = CredentialVault::from_env(&config.vault)?;
        let api = Arc::new(SenderClient::new(config.sender.clone())?);
        info!("SenderNews initialized against {}", config.sender.base_url);
        Ok(Self::new(config, vault, store, api))
    }

    /// Options to register with the host settings API
    pub fn register_settings(&self) -> Vec<SettingDescriptor> {
        settings_schema()
    }

    /// Decrypt the stored token; `None` when no token is saved
    pub async fn stored_token(&self) -> Result<Option<ApiToken>> {
        let options = PluginOptions::load(self.store.as_ref()).await?;
        match options.api_token {
            Some(ciphertext) => Ok(Some(self.vault.decrypt(&ciphertext)?)),
            None => Ok(None),
        }
    }

    /// Sanitize and persist a settings form submission.
    ///
    /// All fields are validated before any option is written.
    pub async fn save_settings(&self, submission: SettingsSubmission) -> Result<()> {
        let submitted_token = sanitize_text_field(&submission.api_token);
        let existing = self.store.get(OPTION_API_TOKEN).await?;
        let existing = existing.as_ref().and_then(Value::as_str);
        let api_token = self.vault.resolve_submission(&submitted_token, existing)?;

        let reply_to = sanitize_text_field(&submission.reply_to);
        if !reply_to.is_empty() {
            reply_to.parse::<EmailAddress>()?;
        }

        let selected_groups = dedup_groups(submission.selected_groups);

        self.store.set(OPTION_API_TOKEN, json!(api_token)).await?;
        self.store
            .set(OPTION_AUTOPUBLISH, json!(submission.autopublish))
            .await?;
        self.store
            .set(OPTION_SELECTED_GROUPS, json!(selected_groups))
            .await?;
        self.store.set(OPTION_REPLY_TO, json!(reply_to)).await?;

        info!(
            autopublish = submission.autopublish,
            groups = selected_groups.len(),
            "Settings saved"
        );
        Ok(())
    }

    /// Build the settings page model, fetching groups when a token is saved
    pub async fn render_settings(&self) -> Result<SettingsView> {
        let options = PluginOptions::load(self.store.as_ref()).await?;

        let mut view = SettingsView {
            masked_token: None,
            token_help_url: self.config.sender.token_help_url.clone(),
            autopublish: options.autopublish,
            reply_to: options.reply_to.clone(),
            groups: GroupsState::NotConfigured,
        };

        let Some(ciphertext) = options.api_token.as_deref() else {
            return Ok(view);
        };

        let token = match self.vault.decrypt(ciphertext) {
            Ok(token) => token,
            Err(e) => {
                error!("Stored API token could not be decrypted: {}", e);
                view.groups = GroupsState::Failed {
                    message: UNREADABLE_TOKEN_MESSAGE.to_string(),
                };
                return Ok(view);
            }
        };

        view.masked_token = Some(token.masked());
        view.groups = match self.api.list_groups(&token).await {
            Ok(groups) => GroupsState::Loaded {
                groups: group_options(groups, &options.selected_groups),
            },
            Err(e) => {
                warn!("Failed to load Sender.net groups: {}", e);
                GroupsState::Failed {
                    message: e.to_string(),
                }
            }
        };

        Ok(view)
    }

    /// React to a post being saved or published
    pub async fn on_post_published(&self, event: &PostEvent) -> Result<PublishOutcome> {
        let span = info_span!(
            "post_published",
            post_id = event.post_id,
            request_id = %Uuid::new_v4()
        );

        self.handle_post_published(event).instrument(span).await
    }

    async fn handle_post_published(&self, event: &PostEvent) -> Result<PublishOutcome> {
        if let Err(reason) = publish::check_event(event, &self.config.publish.target_post_type) {
            debug!(?reason, "Ignoring post event");
            return Ok(PublishOutcome::Skipped(reason));
        }

        let options = PluginOptions::load(self.store.as_ref()).await?;

        let Some(ciphertext) = options.api_token.as_deref() else {
            warn!("No Sender.net API token configured, campaign not created");
            return Ok(PublishOutcome::Skipped(SkipReason::MissingToken));
        };
        let token = self.vault.decrypt(ciphertext)?;

        let campaign = NewCampaign::from_post(&event.title, &event.content)
            .with_reply_to(options.reply_to)
            .with_groups(options.selected_groups);

        let outcome = publish::publish_campaign(self.api.as_ref(), &token, &campaign, options.autopublish)
            .await
            .map_err(|e| {
                error!("Failed to publish post {} to Sender.net: {}", event.post_id, e);
                Error::from(e)
            })?;

        info!(?outcome, "Post published to Sender.net");
        Ok(outcome)
    }
}

fn dedup_groups(groups: Vec<GroupId>) -> Vec<GroupId> {
    let mut unique: Vec<GroupId> = Vec::with_capacity(groups.len());
    for group in groups {
        let group = sanitize_text_field(&group);
        if !group.is_empty() && !unique.contains(&group) {
            unique.push(group);
        }
    }
    unique
}
