use crate::{DatasourceLookup, Error};
use models::{AlertQuery, RawValue};
use std::collections::BTreeMap;

/// Sentinel datasource UID of expression queries, which are evaluated
/// inside the unified engine and need no repair.
pub const EXPRESSION_DATASOURCE_UID: &str = "__expr__";

// Graphite model fields. `targetFull` holds the template-variable-expanded
// form of `target`, maintained by the legacy UI.
const TARGET_FIELD: &str = "target";
const TARGET_FULL_FIELD: &str = "targetFull";

const PROMETHEUS_TYPE: &str = "prometheus";

/// A query model as a typed field map. Field values stay raw so untouched
/// fields round-trip byte-identical.
type QueryModel = BTreeMap<String, Box<serde_json::value::RawValue>>;

/// Repair the translated queries of one rule so they evaluate correctly
/// under the unified engine. Applied independently to every query.
pub fn migrate_alert_rule_queries(
    datasources: &dyn DatasourceLookup,
    org_id: i64,
    data: Vec<AlertQuery>,
) -> Result<Vec<AlertQuery>, Error> {
    data.into_iter()
        .map(|mut query| {
            if query.datasource_uid == EXPRESSION_DATASOURCE_UID {
                return Ok(query);
            }
            let mut model: QueryModel =
                serde_json::from_str(query.model.get()).map_err(|source| Error::MalformedQuery {
                    ref_id: query.ref_id.clone(),
                    source,
                })?;

            // The unified engine has no per-query visibility toggle.
            model.remove("hide");

            fix_graphite_referenced_sub_queries(&mut model);
            fix_prometheus_both_type_query(&mut model, datasources, org_id);

            let repaired =
                serde_json::to_string(&model).map_err(|source| Error::SerializeQuery {
                    ref_id: query.ref_id.clone(),
                    source,
                })?;
            query.model = RawValue::from_string(repaired).map_err(|source| Error::SerializeQuery {
                ref_id: query.ref_id.clone(),
                source,
            })?;

            Ok(query)
        })
        .collect()
}

/// Promote Graphite's expanded `targetFull` into `target`. The unified
/// engine evaluates only `target`; without this, template-variable queries
/// silently evaluate the unexpanded expression.
fn fix_graphite_referenced_sub_queries(model: &mut QueryModel) {
    if let Some(full) = model.remove(TARGET_FULL_FIELD) {
        model.insert(TARGET_FIELD.to_string(), full);
    }
}

/// Downgrade a Prometheus "both instant and range" query to a range query.
/// The unified engine cannot evaluate one query both ways; range is the
/// safe choice, and the downgrade is surfaced to the operator.
fn fix_prometheus_both_type_query(
    model: &mut QueryModel,
    datasources: &dyn DatasourceLookup,
    org_id: i64,
) {
    let instant = match model.get("instant") {
        Some(raw) => match serde_json::from_str::<bool>(raw.get()) {
            Ok(instant) => instant,
            Err(err) => {
                // Warn only for provably Prometheus queries. Malformed
                // fields on other datasources are not our concern.
                if let Ok(true) = is_prometheus_query(model, datasources, org_id) {
                    tracing::warn!(
                        instant = raw.get(),
                        error = %err,
                        "failed to parse instant field on Prometheus query"
                    );
                }
                return;
            }
        },
        None => false,
    };
    let range = match model.get("range") {
        Some(raw) => match serde_json::from_str::<bool>(raw.get()) {
            Ok(range) => range,
            Err(err) => {
                if let Ok(true) = is_prometheus_query(model, datasources, org_id) {
                    tracing::warn!(
                        range = raw.get(),
                        error = %err,
                        "failed to parse range field on Prometheus query"
                    );
                }
                return;
            }
        },
        None => false,
    };

    // Only 'Both' type queries are repaired.
    if !instant || !range {
        return;
    }

    match is_prometheus_query(model, datasources, org_id) {
        Ok(true) => (),
        Ok(false) => return,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "unable to determine whether a 'Both' type query is Prometheus, leaving it as-is"
            );
            return;
        }
    }

    tracing::warn!(
        "Prometheus 'Both' type queries are not supported in unified alerting, converting to range query"
    );
    model.insert(
        "instant".to_string(),
        serde_json::value::RawValue::from_string("false".to_string())
            .expect("false is valid JSON"),
    );
}

/// The datasource of a query model: either an inline reference object
/// carrying the plugin type, or (in older models) the datasource name.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DatasourceField {
    Name(String),
    Ref {
        #[serde(rename = "type", default)]
        type_: String,
    },
}

/// Whether the query's declared datasource is Prometheus. Name-form
/// references are resolved through the datasource lookup collaborator.
fn is_prometheus_query(
    model: &QueryModel,
    datasources: &dyn DatasourceLookup,
    org_id: i64,
) -> anyhow::Result<bool> {
    let Some(raw) = model.get("datasource") else {
        anyhow::bail!("missing datasource field");
    };
    let field: DatasourceField = serde_json::from_str(raw.get())
        .map_err(|err| anyhow::anyhow!("failed to parse datasource '{}': {err}", raw.get()))?;

    let type_ = match field {
        DatasourceField::Ref { type_ } if !type_.is_empty() => type_,
        DatasourceField::Ref { .. } => anyhow::bail!("missing type field '{}'", raw.get()),
        DatasourceField::Name(name) => datasources
            .datasource_type(org_id, &name)
            .ok_or_else(|| anyhow::anyhow!("unknown datasource {name:?}"))?,
    };
    Ok(type_ == PROMETHEUS_TYPE)
}
