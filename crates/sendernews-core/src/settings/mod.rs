//! Plugin settings
//!
//! Option keys and schema, the host option store port, and the settings
//! page view model.

pub mod schema;
pub mod store;
pub mod view;

pub use schema::{
    sanitize_text_field, settings_schema, PluginOptions, SettingDescriptor, SettingKind,
    SettingsSubmission, OPTION_API_TOKEN, OPTION_AUTOPUBLISH, OPTION_REPLY_TO,
    OPTION_SELECTED_GROUPS, SETTINGS_GROUP,
};
pub use store::{ConfigStore, MemoryStore};
pub use view::{GroupOption, GroupsState, SettingsView, UNREADABLE_TOKEN_MESSAGE};
