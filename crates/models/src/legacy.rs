use super::RawValue;
use std::time::Duration;

/// Run state of a paused legacy alert. Any other state is an evaluating one.
pub const STATE_PAUSED: &str = "paused";

/// DashAlert is a single legacy dashboard-panel alert, as read from the
/// legacy alert store. It is an immutable input of the migration.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DashAlert {
    /// Row id of the legacy alert.
    pub id: i64,
    pub org_id: i64,
    pub dashboard_id: i64,
    pub panel_id: i64,
    /// Display name of the alert, which seeds the migrated rule title.
    pub name: String,
    /// Free-text message sent with notifications. May be empty.
    #[serde(default)]
    pub message: String,
    /// Evaluation frequency, in seconds.
    pub frequency: i64,
    /// Current run state. Only `paused` is meaningful to the migration.
    #[serde(default)]
    pub state: String,
    /// Duration a threshold breach must hold before the alert fires.
    #[serde(rename = "for", with = "humantime_serde")]
    pub for_: Duration,
    /// Raw settings blob: condition definitions, notification targets,
    /// no-data / execution-error policies, and free-form tags. Condition
    /// definitions are owned by the condition translator and never decoded
    /// by this crate.
    pub settings: RawValue,
}

/// DashAlertSettings is the decoded subset of a DashAlert settings blob
/// which the migration core reads. Unknown fields are ignored.
#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashAlertSettings {
    pub no_data_state: String,
    pub execution_error_state: String,
    /// Free-form tags. Values are strings or JSON scalars.
    pub alert_rule_tags: serde_json::Value,
    pub notifications: Vec<NotificationKey>,
}

/// NotificationKey identifies one notification channel target of a legacy
/// alert. Either `uid` or `id` is set, never both meaningfully.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct NotificationKey {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub id: i64,
}

/// ChannelRef is a notification channel reference extracted from a legacy
/// alert, handed to the notification-policy builder.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChannelRef {
    Uid(String),
    Id(i64),
}

/// DashboardRef is the dashboard context of a migrating alert.
#[derive(Clone, Debug)]
pub struct DashboardRef {
    pub id: i64,
    pub uid: String,
    pub title: String,
}

/// FolderRef is the folder (namespace) a migrated rule lands in.
#[derive(Clone, Debug)]
pub struct FolderRef {
    pub uid: String,
    pub title: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn settings_tolerate_unknown_fields() {
        let fixture = serde_json::json!({
            "noDataState": "keep_state",
            "executionErrorState": "alerting",
            "alertRuleTags": {"team": "infra", "severity": 2},
            "notifications": [{"uid": "abc"}, {"id": 7}, {}],
            "conditions": [{"evaluator": {"params": [90], "type": "gt"}}],
            "handler": 1,
        });

        let settings: DashAlertSettings = serde_json::from_value(fixture).unwrap();
        assert_eq!(settings.no_data_state, "keep_state");
        assert_eq!(settings.execution_error_state, "alerting");
        assert_eq!(settings.notifications.len(), 3);
        assert_eq!(settings.notifications[0].uid, "abc");
        assert_eq!(settings.notifications[1].id, 7);
    }

    #[test]
    fn empty_settings_decode_with_defaults() {
        let settings: DashAlertSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.no_data_state, "");
        assert!(settings.notifications.is_empty());
    }

    #[test]
    fn channel_refs_serialize_untagged() {
        let refs = vec![ChannelRef::Uid("abc".to_string()), ChannelRef::Id(7)];
        assert_eq!(serde_json::to_string(&refs).unwrap(), r#"["abc",7]"#);
    }
}
