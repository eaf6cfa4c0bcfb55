// Reserved label and annotation names attached to migrated alert rules,
// and the matcher helpers built over them. Values here are wire names of
// the unified alerting model and must not change across migration runs.

use models::{ChannelRef, Matcher};

/// Routing label carrying the rule UID. Set on every migrated rule, and
/// matched by the compatibility silences the migration synthesizes.
pub const RULE_UID: &str = "__alert_rule_uid__";

/// Private label created during migration recording the notification
/// channels a rule should send to. It is consumed by the post-migration
/// notification-policy builder.
pub const CONTACTS: &str = "__contacts__";

// Annotations recording a rule's legacy provenance.
pub const DASHBOARD_UID_ANNOTATION: &str = "__dashboardUid__";
pub const PANEL_ID_ANNOTATION: &str = "__panelId__";
pub const ALERT_ID_ANNOTATION: &str = "__alertId__";
pub const MESSAGE_ANNOTATION: &str = "message";

/// Label carrying an alert's rule name, as set by the unified evaluator.
pub const ALERT_NAME: &str = "alertname";

// Names of the synthetic alerts the unified engine raises in place of the
// legacy "keep last state" behavior.
pub const DATASOURCE_NO_DATA: &str = "DatasourceNoData";
pub const DATASOURCE_ERROR: &str = "DatasourceError";

/// The (name, value) routing label of a migrated rule, used both on the
/// rule itself and in silence matchers targeting it.
pub fn rule_uid_label(rule_uid: &str) -> (String, String) {
    (RULE_UID.to_string(), rule_uid.to_string())
}

/// The (name, value) contacts label of a migrated rule: the extracted
/// channel references, encoded as a JSON array.
pub fn contacts_label(channels: &[ChannelRef]) -> (String, String) {
    let encoded = serde_json::to_string(channels).expect("channel refs always serialize");
    (CONTACTS.to_string(), encoded)
}

/// Matchers selecting one synthetic alert of one migrated rule.
pub fn silence_matchers(rule_uid: &str, alert_name: &str) -> Vec<Matcher> {
    vec![
        Matcher::equal(RULE_UID, rule_uid),
        Matcher::equal(ALERT_NAME, alert_name),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use models::ChannelRef;

    #[test]
    fn contacts_label_encodes_channel_refs() {
        let (name, value) = contacts_label(&[ChannelRef::Uid("abc".to_string()), ChannelRef::Id(7)]);
        assert_eq!(name, CONTACTS);
        assert_eq!(value, r#"["abc",7]"#);

        let (_, empty) = contacts_label(&[]);
        assert_eq!(empty, "[]");
    }

    #[test]
    fn silence_matchers_select_rule_and_alert() {
        let matchers = silence_matchers("abc123", DATASOURCE_ERROR);
        assert_eq!(
            matchers,
            vec![
                Matcher::equal(RULE_UID, "abc123"),
                Matcher::equal(ALERT_NAME, DATASOURCE_ERROR),
            ]
        );
    }
}
