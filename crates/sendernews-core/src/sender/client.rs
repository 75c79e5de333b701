//! Sender.net API client implementation

use super::types::{NewCampaign, NewsletterApi, SenderError, SenderResult};
use crate::vault::ApiToken;
use async_trait::async_trait;
use reqwest::{header, Client, Method, Response, StatusCode, Url};
use sendernews_common::config::SenderConfig;
use sendernews_common::types::{deserialize_id, CampaignId, Group};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Raw `GET /groups` response
#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    data: Vec<GroupRecord>,
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
}

/// `POST /campaigns` request body
#[derive(Debug, Serialize)]
struct CreateCampaignRequest<'a> {
    title: &'a str,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    content_type: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "no_groups")]
    groups: &'a [String],
}

fn no_groups(groups: &&[String]) -> bool {
    groups.is_empty()
}

/// Raw `POST /campaigns` response
#[derive(Debug, Deserialize)]
struct CampaignResponse {
    data: CampaignRecord,
}

#[derive(Debug, Deserialize)]
struct CampaignRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

/// Sender.net HTTP client
pub struct SenderClient {
    config: SenderConfig,
    client: Client,
}

impl SenderClient {
    /// Create a new Sender.net client
    pub fn new(config: SenderConfig) -> SenderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SenderError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Resolve an endpoint below the base URL. Each segment is
    /// percent-encoded, so provider IDs cannot change the route.
    fn endpoint(&self, segments: &[&str]) -> SenderResult<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            SenderError::Transport(format!("Invalid base URL {}: {}", self.config.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                SenderError::Transport(format!("Invalid base URL {}", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Build an authenticated JSON request
    fn build_request(
        &self,
        method: Method,
        segments: &[&str],
        token: &ApiToken,
    ) -> SenderResult<reqwest::RequestBuilder> {
        let url = self.endpoint(segments)?;

        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token.expose())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json"))
    }

    /// Map a response status onto the error taxonomy
    async fn check_status(
        response: Response,
        operation: &str,
        accept: fn(StatusCode) -> bool,
    ) -> SenderResult<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            error!("{}: Sender.net rejected the API token", operation);
            return Err(SenderError::authentication());
        }

        if !accept(status) {
            let body = response.text().await.unwrap_or_default();
            error!("{} failed: {} - {}", operation, status, body);
            return Err(SenderError::UnexpectedApi {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn transport(operation: &str) -> impl FnOnce(reqwest::Error) -> SenderError + '_ {
    move |e| {
        error!("{} request failed: {}", operation, e);
        SenderError::Transport(e.to_string())
    }
}

#[async_trait]
impl NewsletterApi for SenderClient {
    async fn list_groups(&self, token: &ApiToken) -> SenderResult<Vec<Group>> {
        debug!("Fetching Sender.net groups");

        let response = self
            .build_request(Method::GET, &["groups"], token)?
            .send()
            .await
            .map_err(transport("List groups"))?;

        let response =
            Self::check_status(response, "List groups", |s| s == StatusCode::OK).await?;

        let groups: GroupsResponse = response
            .json()
            .await
            .map_err(|e| SenderError::InvalidResponse(e.to_string()))?;

        let groups: Vec<Group> = groups
            .data
            .into_iter()
            .map(|record| Group {
                id: record.id,
                name: record.title,
            })
            .collect();

        debug!("Fetched {} groups", groups.len());
        Ok(groups)
    }

    async fn create_campaign(
        &self,
        token: &ApiToken,
        campaign: &NewCampaign,
    ) -> SenderResult<CampaignId> {
        let body = CreateCampaignRequest {
            title: &campaign.title,
            subject: &campaign.subject,
            reply_to: campaign.reply_to.as_deref(),
            content_type: "html",
            content: &campaign.content,
            groups: &campaign.groups,
        };

        let response = self
            .build_request(Method::POST, &["campaigns"], token)?
            .json(&body)
            .send()
            .await
            .map_err(transport("Create campaign"))?;

        let response =
            Self::check_status(response, "Create campaign", |s| s.is_success()).await?;

        let created: CampaignResponse = response
            .json()
            .await
            .map_err(|e| SenderError::InvalidResponse(e.to_string()))?;

        info!("Created Sender.net campaign {}", created.data.id);
        Ok(created.data.id)
    }

    async fn send_campaign(&self, token: &ApiToken, campaign_id: &str) -> SenderResult<()> {
        let response = self
            .build_request(Method::POST, &["campaigns", campaign_id, "send"], token)?
            .send()
            .await
            .map_err(transport("Send campaign"))?;

        Self::check_status(response, "Send campaign", |s| s.is_success()).await?;

        info!("Sent Sender.net campaign {}", campaign_id);
        Ok(())
    }
}
