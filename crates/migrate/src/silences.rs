use chrono::{DateTime, Duration, Utc};
use models::{AlertRule, Silence};

/// How long a keep-last-state compatibility silence stays active.
const SILENCE_TERM_DAYS: i64 = 365;

/// Build a silence suppressing one synthetic alert (`DatasourceNoData` or
/// `DatasourceError`) of one migrated rule. Used to reproduce the legacy
/// "keep last state" policy, which the unified model cannot express
/// directly.
pub fn keep_state_silence(
    rule: &AlertRule,
    alert_name: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<Silence> {
    if rule.uid.is_empty() {
        anyhow::bail!("rule {:?} has no UID to match on", rule.title);
    }

    Ok(Silence {
        id: uuid::Uuid::new_v4().to_string(),
        matchers: labels::silence_matchers(&rule.uid, alert_name),
        starts_at: now,
        ends_at: now + Duration::days(SILENCE_TERM_DAYS),
        created_by: "Migration".to_string(),
        comment: format!(
            "Silence the {alert_name} alert of rule {:?}, which used the legacy 'Keep Last State' option",
            rule.title,
        ),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use models::{ExecErrState, Matcher, NoDataState};
    use std::collections::BTreeMap;

    fn rule(uid: &str) -> AlertRule {
        AlertRule {
            org_id: 1,
            uid: uid.to_string(),
            title: "CPU > 90%".to_string(),
            condition: "B".to_string(),
            data: Vec::new(),
            interval_seconds: 10,
            version: 1,
            namespace_uid: "folder1".to_string(),
            dashboard_uid: None,
            panel_id: None,
            rule_group: String::new(),
            rule_group_index: 1,
            for_: std::time::Duration::ZERO,
            updated: Utc::now(),
            annotations: BTreeMap::new(),
            labels: BTreeMap::new(),
            is_paused: false,
            no_data_state: NoDataState::NoData,
            exec_err_state: ExecErrState::Error,
        }
    }

    #[test]
    fn silence_matches_rule_and_synthetic_alert() {
        let now = Utc::now();
        let silence = keep_state_silence(&rule("abc123"), labels::DATASOURCE_NO_DATA, now).unwrap();

        assert_eq!(
            silence.matchers,
            vec![
                Matcher::equal(labels::RULE_UID, "abc123"),
                Matcher::equal(labels::ALERT_NAME, labels::DATASOURCE_NO_DATA),
            ]
        );
        assert_eq!(silence.starts_at, now);
        assert!(silence.ends_at > now);
        assert_eq!(silence.created_by, "Migration");
    }

    #[test]
    fn blank_rule_uid_is_rejected() {
        assert!(keep_state_silence(&rule(""), labels::DATASOURCE_ERROR, Utc::now()).is_err());
    }
}
