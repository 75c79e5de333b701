//! Post-published reaction
//!
//! Decides whether a saved post becomes a Sender.net campaign, then creates
//! it and, when autopublish is on, sends it.

use crate::sender::{NewCampaign, NewsletterApi, SenderResult};
use crate::vault::ApiToken;
use sendernews_common::types::{CampaignId, PostEvent};
use serde::Serialize;
use tracing::{debug, info};

/// Why an event produced no campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The save was a revision of an existing post
    Revision,
    /// The post is not of the configured content type
    OtherPostType { post_type: String },
    /// No API token is configured
    MissingToken,
}

/// Result of handling a publish event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    Skipped(SkipReason),
    /// Campaign created and left as a draft
    Drafted { campaign_id: CampaignId },
    /// Campaign created and sent
    Sent { campaign_id: CampaignId },
}

impl PublishOutcome {
    pub fn campaign_id(&self) -> Option<&str> {
        match self {
            PublishOutcome::Drafted { campaign_id } | PublishOutcome::Sent { campaign_id } => {
                Some(campaign_id)
            }
            PublishOutcome::Skipped(_) => None,
        }
    }
}

/// Gate an event: revisions and other content types are ignored
pub fn check_event(event: &PostEvent, target_post_type: &str) -> Result<(), SkipReason> {
    if event.is_revision {
        return Err(SkipReason::Revision);
    }

    if event.post_type != target_post_type {
        return Err(SkipReason::OtherPostType {
            post_type: event.post_type.clone(),
        });
    }

    Ok(())
}

/// Create the campaign and send it only when `autopublish` is set.
/// No retry on failure.
pub async fn publish_campaign(
    api: &dyn NewsletterApi,
    token: &ApiToken,
    campaign: &NewCampaign,
    autopublish: bool,
) -> SenderResult<PublishOutcome> {
    let campaign_id = api.create_campaign(token, campaign).await?;

    if !autopublish {
        debug!("Autopublish disabled, campaign {} left as draft", campaign_id);
        return Ok(PublishOutcome::Drafted { campaign_id });
    }

    api.send_campaign(token, &campaign_id).await?;
    info!("Campaign {} sent", campaign_id);

    Ok(PublishOutcome::Sent { campaign_id })
}
