use chrono::Utc;
use models::{
    policy, AlertRule, ChannelRef, Condition, DashAlert, DashAlertSettings, DashboardRef,
    FolderRef, RawValue, Silence, STATE_PAUSED,
};
use std::collections::{BTreeMap, HashMap};

mod dedup;
mod errors;
mod noop;
mod queries;
mod silences;
mod states;

pub use dedup::{Deduplicator, UidAllocator, MAX_DEDUP_ATTEMPTS, MAX_UID_ATTEMPTS};
pub use errors::Error;
pub use noop::{NoOpDatasources, NoOpTranslator};
pub use queries::{migrate_alert_rule_queries, EXPRESSION_DATASOURCE_UID};
pub use silences::keep_state_silence;
pub use states::{trans_exec_err, trans_no_data};

/// Maximum length of a migrated rule title.
pub const MAX_TITLE_LENGTH: usize = 190;
/// Maximum length of a rule UID.
pub const MAX_UID_LENGTH: usize = 40;
/// Base scheduling granularity, in seconds. Evaluation intervals are
/// positive multiples of this.
pub const BASE_INTERVAL_SECONDS: i64 = 10;

/// ConditionTranslator is a delegated trait through which legacy condition
/// settings are turned into a unified condition plus queries. Datasource
/// lookups happen behind it; a failure aborts migration of the one alert.
pub trait ConditionTranslator {
    fn translate(&self, org_id: i64, settings: &RawValue) -> anyhow::Result<Condition>;
}

/// DatasourceLookup resolves a datasource referenced by name to its plugin
/// type. Read-only and shareable across organizations.
pub trait DatasourceLookup {
    fn datasource_type(&self, org_id: i64, name: &str) -> Option<String>;
}

/// How the rule group of a migrated rule is named. Both variants are
/// observed in the wild; the dashboard-and-panel form is the default and
/// still unique per rule since every rule is in its own group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuleGroupMode {
    DashboardAndPanel,
    RuleTitle,
}

/// Per-run migration policy, owned by the run orchestrator.
#[derive(Clone, Debug)]
pub struct MigrationConfig {
    pub max_title_length: usize,
    pub max_uid_length: usize,
    pub base_interval_seconds: i64,
    /// Whether the backing store collates rule titles case-insensitively.
    pub case_insensitive_titles: bool,
    pub rule_group_mode: RuleGroupMode,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            max_title_length: MAX_TITLE_LENGTH,
            max_uid_length: MAX_UID_LENGTH,
            base_interval_seconds: BASE_INTERVAL_SECONDS,
            case_insensitive_titles: false,
            rule_group_mode: RuleGroupMode::DashboardAndPanel,
        }
    }
}

/// One successfully migrated alert: the assembled rule and the
/// notification-channel references extracted alongside it.
#[derive(Clone, Debug)]
pub struct MigratedRule {
    pub rule: AlertRule,
    pub channels: Vec<ChannelRef>,
}

/// OrgMigration is the mutable per-run, per-organization migration state:
/// per-folder title deduplicators, the UID allocator, and the silences
/// synthesized so far. Alerts of one organization migrate sequentially
/// through it; organizations may run in parallel, each with its own
/// OrgMigration, sharing only the read-only collaborators.
pub struct OrgMigration<'a> {
    org_id: i64,
    cfg: MigrationConfig,
    conditions: &'a dyn ConditionTranslator,
    datasources: &'a dyn DatasourceLookup,
    title_dedup: HashMap<String, Deduplicator>,
    uids: UidAllocator,
    silences: Vec<Silence>,
}

impl<'a> OrgMigration<'a> {
    pub fn new(
        org_id: i64,
        cfg: MigrationConfig,
        conditions: &'a dyn ConditionTranslator,
        datasources: &'a dyn DatasourceLookup,
    ) -> Self {
        let uids = UidAllocator::new(cfg.max_uid_length);
        Self {
            org_id,
            cfg,
            conditions,
            datasources,
            title_dedup: HashMap::new(),
            uids,
            silences: Vec::new(),
        }
    }

    pub fn org_id(&self) -> i64 {
        self.org_id
    }

    /// Silences synthesized so far, for hand-off to persistence.
    pub fn silences(&self) -> &[Silence] {
        &self.silences
    }

    pub fn into_silences(self) -> Vec<Silence> {
        self.silences
    }

    /// Migrate all alerts of one dashboard. An alert whose pipeline fails
    /// is logged and skipped; the remainder keep migrating.
    pub fn migrate_dashboard(
        &mut self,
        alerts: &[DashAlert],
        dashboard: &DashboardRef,
        folder: &FolderRef,
    ) -> Vec<MigratedRule> {
        let mut migrated = Vec::with_capacity(alerts.len());
        for alert in alerts {
            match self.migrate_alert(alert, dashboard, folder) {
                Ok((rule, channels)) => migrated.push(MigratedRule { rule, channels }),
                Err(err) => tracing::error!(
                    alert_id = alert.id,
                    name = %alert.name,
                    error = ?err,
                    "skipping alert which failed to migrate",
                ),
            }
        }
        migrated
    }

    /// Migrate a single legacy dashboard alert into a unified alert rule
    /// plus its extracted notification-channel references.
    pub fn migrate_alert(
        &mut self,
        alert: &DashAlert,
        dashboard: &DashboardRef,
        folder: &FolderRef,
    ) -> Result<(AlertRule, Vec<ChannelRef>), Error> {
        tracing::debug!(name = %alert.name, "migrating alert rule to unified alerting");

        let parsed: DashAlertSettings =
            serde_json::from_str(alert.settings.get()).map_err(Error::ParseSettings)?;

        let condition = self
            .conditions
            .translate(alert.org_id, &alert.settings)
            .map_err(Error::TransformConditions)?;

        let channels = extract_channel_ids(&parsed);
        let rule = self.make_alert_rule(condition, alert, &parsed, &channels, dashboard, folder)?;

        Ok((rule, channels))
    }

    fn make_alert_rule(
        &mut self,
        condition: Condition,
        alert: &DashAlert,
        parsed: &DashAlertSettings,
        channels: &[ChannelRef],
        dashboard: &DashboardRef,
        folder: &FolderRef,
    ) -> Result<AlertRule, Error> {
        let (mut lbls, mut annotations) = migration_info(alert, parsed, &dashboard.uid);
        annotations.insert(labels::MESSAGE_ANNOTATION.to_string(), alert.message.clone());

        let data =
            queries::migrate_alert_rule_queries(self.datasources, alert.org_id, condition.data)?;

        // Ensure the rule title is unique within its folder.
        let dedup = self
            .title_dedup
            .entry(folder.uid.clone())
            .or_insert_with(|| {
                Deduplicator::new(self.cfg.case_insensitive_titles, self.cfg.max_title_length)
            });
        let mut title = dedup.truncate(&alert.name).to_string();
        if dedup.contains(&title) {
            let renamed = dedup.deduplicate(&title)?;
            tracing::warn!(
                old_name = %title,
                new_name = %renamed,
                "duplicate alert rule name detected, renaming",
            );
            title = renamed;
        }
        dedup.add(&title);

        let uid = self.uids.allocate()?;

        // Label for routing and silences, plus the contacts hand-off label.
        let (name, value) = labels::rule_uid_label(&uid);
        lbls.insert(name, value);
        let (name, value) = labels::contacts_label(channels);
        lbls.insert(name, value);

        let rule_group = match self.cfg.rule_group_mode {
            // Unique to this dashboard alert but still contains useful info.
            RuleGroupMode::DashboardAndPanel => {
                format!("{} - {}", dashboard.title, alert.panel_id)
            }
            RuleGroupMode::RuleTitle => title.clone(),
        };

        let rule = AlertRule {
            org_id: alert.org_id,
            uid,
            title,
            condition: condition.condition,
            data,
            interval_seconds: rule_adjust_interval(
                alert.frequency,
                self.cfg.base_interval_seconds,
            ),
            version: 1,
            namespace_uid: folder.uid.clone(),
            dashboard_uid: Some(dashboard.uid.clone()),
            panel_id: Some(alert.panel_id),
            rule_group,
            rule_group_index: 1, // Every rule is in its own group.
            for_: alert.for_,
            updated: Utc::now(),
            annotations,
            labels: lbls,
            is_paused: alert.state == STATE_PAUSED,
            no_data_state: states::trans_no_data(&parsed.no_data_state),
            exec_err_state: states::trans_exec_err(&parsed.execution_error_state),
        };

        self.add_keep_state_silences(parsed, &rule);

        Ok(rule)
    }

    /// Synthesize the keep-last-state compatibility silences of a rule.
    /// Best-effort: a failure is logged and the rule remains usable.
    fn add_keep_state_silences(&mut self, parsed: &DashAlertSettings, rule: &AlertRule) {
        let now = Utc::now();
        for (state, alert_name) in [
            (&parsed.no_data_state, labels::DATASOURCE_NO_DATA),
            (&parsed.execution_error_state, labels::DATASOURCE_ERROR),
        ] {
            if state.as_str() != policy::KEEP_STATE {
                continue;
            }
            match silences::keep_state_silence(rule, alert_name, now) {
                Ok(silence) => self.silences.push(silence),
                Err(err) => tracing::warn!(
                    rule = %rule.title,
                    alert = alert_name,
                    error = %err,
                    "failed to create keep-last-state silence, continuing",
                ),
            }
        }
    }
}

/// Derive a rule's labels (from the legacy alert's free-form tags) and its
/// provenance annotations.
fn migration_info(
    alert: &DashAlert,
    parsed: &DashAlertSettings,
    dashboard_uid: &str,
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut lbls = BTreeMap::new();
    if let serde_json::Value::Object(tags) = &parsed.alert_rule_tags {
        for (key, value) in tags {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                scalar => scalar.to_string(),
            };
            lbls.insert(key.clone(), value);
        }
    }

    let mut annotations = BTreeMap::new();
    annotations.insert(
        labels::DASHBOARD_UID_ANNOTATION.to_string(),
        dashboard_uid.to_string(),
    );
    annotations.insert(
        labels::PANEL_ID_ANNOTATION.to_string(),
        alert.panel_id.to_string(),
    );
    annotations.insert(labels::ALERT_ID_ANNOTATION.to_string(), alert.id.to_string());

    (lbls, annotations)
}

/// Round the legacy evaluation frequency down to the nearest multiple of
/// the base granularity, with a floor of one granularity unit.
pub fn rule_adjust_interval(frequency: i64, base: i64) -> i64 {
    if frequency <= base {
        base
    } else {
        frequency - (frequency % base)
    }
}

/// Extract the notification channel references of a legacy alert. The UID
/// is preferred; in certain circumstances only a numeric id is set, and it
/// is used instead. Targets with neither are dropped.
pub fn extract_channel_ids(parsed: &DashAlertSettings) -> Vec<ChannelRef> {
    parsed
        .notifications
        .iter()
        .filter_map(|key| {
            if !key.uid.is_empty() {
                Some(ChannelRef::Uid(key.uid.clone()))
            } else if key.id > 0 {
                Some(ChannelRef::Id(key.id))
            } else {
                None
            }
        })
        .collect()
}
