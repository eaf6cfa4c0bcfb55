use chrono::{DateTime, Utc};

/// Matcher is a single equality label matcher of a silence.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    pub name: String,
    pub value: String,
    pub is_equal: bool,
}

impl Matcher {
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_equal: true,
        }
    }
}

/// Silence is a time-scoped suppression of alerts matching its label
/// matchers. The migration synthesizes silences to reproduce the legacy
/// "keep last state" policy; after creation they are owned by the alerting
/// notification subsystem.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Silence {
    pub id: String,
    pub matchers: Vec<Matcher>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by: String,
    pub comment: String,
}
