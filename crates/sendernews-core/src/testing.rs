//! Test doubles

use crate::sender::{NewCampaign, NewsletterApi, SenderError, SenderResult};
use crate::vault::ApiToken;
use async_trait::async_trait;
use sendernews_common::types::{CampaignId, Group};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListGroups,
    CreateCampaign(NewCampaign),
    SendCampaign(CampaignId),
}

/// Records every call and answers with canned results
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    campaign_id: CampaignId,
    groups: Vec<Group>,
    create_error: Mutex<Option<SenderError>>,
    groups_error: Mutex<Option<SenderError>>,
}

impl RecordingApi {
    pub fn new(campaign_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            campaign_id: campaign_id.to_string(),
            groups: Vec::new(),
            create_error: Mutex::new(None),
            groups_error: Mutex::new(None),
        }
    }

    pub fn failing_create(error: SenderError) -> Self {
        let api = Self::new("unused");
        *api.create_error.lock().unwrap() = Some(error);
        api
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn failing_groups(self, error: SenderError) -> Self {
        *self.groups_error.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsletterApi for RecordingApi {
    async fn list_groups(&self, _token: &ApiToken) -> SenderResult<Vec<Group>> {
        self.calls.lock().unwrap().push(ApiCall::ListGroups);
        match self.groups_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(self.groups.clone()),
        }
    }

    async fn create_campaign(
        &self,
        _token: &ApiToken,
        campaign: &NewCampaign,
    ) -> SenderResult<CampaignId> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::CreateCampaign(campaign.clone()));
        match self.create_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(self.campaign_id.clone()),
        }
    }

    async fn send_campaign(&self, _token: &ApiToken, campaign_id: &str) -> SenderResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::SendCampaign(campaign_id.to_string()));
        Ok(())
    }
}
