//! Settings schema
//!
//! Option keys, their declared kinds and defaults, the sanitization applied
//! on save, and the typed view of stored options.

use sendernews_common::types::GroupId;
use sendernews_common::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::store::ConfigStore;

/// Settings group the options are registered under
pub const SETTINGS_GROUP: &str = "wordpress-news-to-sender-net_settings_group";

pub const OPTION_API_TOKEN: &str = "sender_net_api_token";
pub const OPTION_AUTOPUBLISH: &str = "sender_net_autopublish";
pub const OPTION_SELECTED_GROUPS: &str = "sender_net_selected_groups";
pub const OPTION_REPLY_TO: &str = "sender_net_reply_to";

/// Declared value kind of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    String,
    Boolean,
    Array,
}

/// One registered option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDescriptor {
    pub group: &'static str,
    pub key: &'static str,
    pub kind: SettingKind,
    pub default: Value,
    /// Whether the host runs the value through `save_settings` sanitization
    pub sanitized: bool,
    /// Whether the host may expose the option through its public REST API
    pub show_in_rest: bool,
}

/// The options this plugin registers with the host
pub fn settings_schema() -> Vec<SettingDescriptor> {
    let descriptor = |key: &'static str, kind: SettingKind, default: Value, sanitized: bool| {
        SettingDescriptor {
            group: SETTINGS_GROUP,
            key,
            kind,
            default,
            sanitized,
            show_in_rest: false,
        }
    };

    vec![
        descriptor(OPTION_API_TOKEN, SettingKind::String, json!(""), true),
        descriptor(OPTION_AUTOPUBLISH, SettingKind::Boolean, json!(false), false),
        descriptor(OPTION_SELECTED_GROUPS, SettingKind::Array, json!([]), false),
        descriptor(OPTION_REPLY_TO, SettingKind::String, json!(""), true),
    ]
}

/// Values posted from the settings form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSubmission {
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub autopublish: bool,
    #[serde(default)]
    pub selected_groups: Vec<GroupId>,
    #[serde(default)]
    pub reply_to: String,
}

/// Strip markup, line breaks and control characters from a single-line
/// text field and trim it.
pub fn sanitize_text_field(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut pending_space = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_whitespace() => pending_space = true,
            c if c.is_control() => {}
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    out
}

/// Typed view of the stored options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOptions {
    /// Encrypted API token, `None` when unset or empty
    pub api_token: Option<String>,
    pub autopublish: bool,
    pub selected_groups: Vec<GroupId>,
    pub reply_to: Option<String>,
}

impl PluginOptions {
    /// Read every option from the store, tolerating the loose value types
    /// hosts persist (e.g. `"1"` for a checked checkbox).
    pub async fn load(store: &dyn ConfigStore) -> Result<Self> {
        let api_token = non_empty_string(store.get(OPTION_API_TOKEN).await?);
        let autopublish = truthy(&store.get_or(OPTION_AUTOPUBLISH, json!(false)).await?);
        let selected_groups = string_list(store.get_or(OPTION_SELECTED_GROUPS, json!([])).await?);
        let reply_to = non_empty_string(store.get(OPTION_REPLY_TO).await?);

        Ok(Self {
            api_token,
            autopublish,
            selected_groups,
            reply_to,
        })
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false" | "off"),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn string_list(value: Value) -> Vec<GroupId> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_declares_all_options() {
        let schema = settings_schema();
        let keys: Vec<_> = schema.iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![OPTION_API_TOKEN, OPTION_AUTOPUBLISH, OPTION_SELECTED_GROUPS, OPTION_REPLY_TO]
        );
        let autopublish = schema.iter().find(|d| d.key == OPTION_AUTOPUBLISH).unwrap();
        assert_eq!(autopublish.kind, SettingKind::Boolean);
        assert_eq!(autopublish.default, json!(false));
        assert!(schema.iter().all(|d| !d.show_in_rest && d.group == SETTINGS_GROUP));
    }

    #[test]
    fn test_sanitize_text_field() {
        assert_eq!(sanitize_text_field("  abc  "), "abc");
        assert_eq!(sanitize_text_field("tok\r\nen"), "tok en");
        assert_eq!(sanitize_text_field("a\t\t b"), "a b");
        assert_eq!(sanitize_text_field("<b>bold</b> text"), "bold text");
        assert_eq!(sanitize_text_field("abc\u{0}def"), "abcdef");
        assert_eq!(sanitize_text_field("abcde*****"), "abcde*****");
    }

    #[test]
    fn test_submission_defaults() {
        let submission: SettingsSubmission =
            serde_json::from_str(r#"{"api_token":"abc"}"#).unwrap();
        assert_eq!(submission.api_token, "abc");
        assert!(!submission.autopublish);
        assert!(submission.selected_groups.is_empty());
    }

    #[tokio::test]
    async fn test_load_defaults_from_empty_store() {
        let store = MemoryStore::new();
        let options = PluginOptions::load(&store).await.unwrap();
        assert_eq!(options, PluginOptions::default());
    }

    #[tokio::test]
    async fn test_load_loose_values() {
        let store = MemoryStore::with_options([
            (OPTION_API_TOKEN.to_string(), json!("c2VhbGVk")),
            (OPTION_AUTOPUBLISH.to_string(), json!("1")),
            (OPTION_SELECTED_GROUPS.to_string(), json!(["7", 9, null])),
            (OPTION_REPLY_TO.to_string(), json!("")),
        ]);

        let options = PluginOptions::load(&store).await.unwrap();
        assert_eq!(options.api_token.as_deref(), Some("c2VhbGVk"));
        assert!(options.autopublish);
        assert_eq!(options.selected_groups, vec!["7".to_string(), "9".to_string()]);
        assert_eq!(options.reply_to, None);
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("on")));
    }
}
