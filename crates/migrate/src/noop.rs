use crate::{ConditionTranslator, DatasourceLookup};
use models::{Condition, RawValue};

/// NoOpTranslator is a permissive placeholder for the condition translator
/// which never fails and returns an empty, well-formed condition.
#[derive(Clone, Debug)]
pub struct NoOpTranslator;

impl ConditionTranslator for NoOpTranslator {
    fn translate(&self, _org_id: i64, _settings: &RawValue) -> anyhow::Result<Condition> {
        Ok(Condition {
            condition: "A".to_string(),
            data: Vec::new(),
        })
    }
}

/// NoOpDatasources resolves no datasource names.
#[derive(Clone, Debug)]
pub struct NoOpDatasources;

impl DatasourceLookup for NoOpDatasources {
    fn datasource_type(&self, _org_id: i64, _name: &str) -> Option<String> {
        None
    }
}
