/// Errors which are fatal to migrating a single alert. The run loop logs
/// the failed alert with full context and continues with the next one.
#[must_use]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to parse alert settings")]
    ParseSettings(#[source] serde_json::Error),
    #[error("failed to transform alert conditions")]
    TransformConditions(#[source] anyhow::Error),
    #[error("query {ref_id} has a malformed model")]
    MalformedQuery {
        ref_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to re-encode the repaired model of query {ref_id}")]
    SerializeQuery {
        ref_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to deduplicate rule title {name:?} within {attempts} attempts")]
    DeduplicationExhausted { name: String, attempts: usize },
    #[error("failed to allocate a unique rule UID within {attempts} attempts")]
    UidExhausted { attempts: usize },
}
