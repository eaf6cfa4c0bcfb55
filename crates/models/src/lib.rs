use caseless::Caseless;
use unicode_normalization::UnicodeNormalization;

mod legacy;
mod raw_value;
mod rule;
mod silence;

pub use legacy::{
    ChannelRef, DashAlert, DashAlertSettings, DashboardRef, FolderRef, NotificationKey,
    STATE_PAUSED,
};
pub use raw_value::RawValue;
pub use rule::{AlertQuery, AlertRule, Condition, ExecErrState, NoDataState, RelativeTimeRange};
pub use silence::{Matcher, Silence};

/// Legacy no-data / execution-error policy strings, as stored in
/// dashboard alert settings.
pub mod policy {
    pub const OK: &str = "ok";
    pub const NO_DATA: &str = "no_data";
    pub const ALERTING: &str = "alerting";
    pub const KEEP_STATE: &str = "keep_state";
}

/// Map input characters (e.x. String::chars()) into their collated form,
/// which ignores casing and is unicode-normalized. Rule titles compare
/// equal under this collation when the backing store's collation is
/// case-insensitive.
pub fn collate<I>(i: I) -> impl Iterator<Item = char>
where
    I: Iterator<Item = char>,
{
    i.nfd().default_case_fold().nfkc()
}

#[cfg(test)]
mod test {
    use super::collate;

    #[test]
    fn collation_ignores_case_and_normalization() {
        let table = vec![
            ("", ""),
            ("CPU > 90%", "cpu > 90%"),
            ("Straße", "strasse"),
            // 'E' + combining grave accent collates with the composed 'è'.
            ("\u{0045}\u{0300}", "\u{00e8}"),
        ];

        for (input, expect) in table {
            assert_eq!(collate(input.chars()).collect::<String>().as_str(), expect);
        }
    }
}
