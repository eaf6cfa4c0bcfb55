use super::RawValue;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// NoDataState is a unified rule's behavior when evaluation yields no data.
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoDataState {
    Alerting,
    NoData,
    OK,
}

/// ExecErrState is a unified rule's behavior when evaluation fails.
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecErrState {
    Alerting,
    Error,
    OK,
}

/// RelativeTimeRange is a query's evaluation window, in seconds relative
/// to the evaluation instant.
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RelativeTimeRange {
    pub from: i64,
    pub to: i64,
}

/// AlertQuery is one query of a unified rule's condition data.
/// Its model is an opaque fragment owned by the query engine; the
/// migration repairs a few known fields and passes the rest through.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query_type: String,
    #[serde(default)]
    pub relative_time_range: RelativeTimeRange,
    pub datasource_uid: String,
    pub model: RawValue,
}

/// Condition is the unified translation of a legacy alert's condition
/// settings, as produced by the condition translator.
#[derive(Clone, Debug)]
pub struct Condition {
    /// RefID of the query or expression which is the rule's condition.
    pub condition: String,
    pub data: Vec<AlertQuery>,
}

/// AlertRule is a migrated, folder-scoped unified alert rule.
/// It is assembled exactly once per legacy alert and never mutated after.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub org_id: i64,
    /// Unique rule identifier, bounded by the configured maximum length.
    pub uid: String,
    /// Rule title, unique within its namespace.
    pub title: String,
    pub condition: String,
    pub data: Vec<AlertQuery>,
    /// Evaluation interval in seconds. Always a positive multiple of the
    /// base scheduling granularity.
    pub interval_seconds: i64,
    pub version: i64,
    /// UID of the folder (namespace) holding this rule.
    pub namespace_uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_id: Option<i64>,
    pub rule_group: String,
    pub rule_group_index: i64,
    #[serde(rename = "for", with = "humantime_serde")]
    pub for_: Duration,
    pub updated: DateTime<Utc>,
    pub annotations: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    pub is_paused: bool,
    pub no_data_state: NoDataState,
    pub exec_err_state: ExecErrState,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn states_use_unified_wire_names() {
        assert_eq!(
            serde_json::to_string(&NoDataState::NoData).unwrap(),
            r#""NoData""#
        );
        assert_eq!(
            serde_json::to_string(&ExecErrState::Error).unwrap(),
            r#""Error""#
        );
    }

    #[test]
    fn alert_query_model_is_opaque() {
        // RawValue fields require a JSON text source, not a Value.
        let fixture = r#"{
            "refId": "A",
            "relativeTimeRange": {"from": 600, "to": 0},
            "datasourceUid": "000000001",
            "model": {"expr": "up == 1", "refId": "A"}
        }"#;
        let query: AlertQuery = serde_json::from_str(fixture).unwrap();

        assert_eq!(query.ref_id, "A");
        assert_eq!(query.relative_time_range.from, 600);
        assert_eq!(query.model.get(), r#"{"expr": "up == 1", "refId": "A"}"#);
    }
}
