//! Sender.net newsletter integration
//!
//! Lists audience groups and creates/sends campaigns through the
//! Sender.net HTTP API.

mod client;
mod types;

pub use client::SenderClient;
pub use types::{
    NewCampaign, NewsletterApi, SenderError, SenderResult, AUTHENTICATION_FAILED_MESSAGE,
};
