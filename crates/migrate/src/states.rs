use models::policy;
use models::{ExecErrState, NoDataState};

/// Translate a legacy no-data policy string into its unified state.
/// Total: unrecognized values fall back to NoData with a warning.
///
/// "keep_state" also maps to NoData: the unified engine raises a distinct
/// synthetic alert when evaluation yields no data, so the evaluation itself
/// never fires and a compatibility silence covers the rest.
pub fn trans_no_data(s: &str) -> NoDataState {
    match s {
        policy::OK => NoDataState::OK,
        "" | policy::NO_DATA => NoDataState::NoData,
        policy::ALERTING => NoDataState::Alerting,
        policy::KEEP_STATE => NoDataState::NoData,
        _ => {
            tracing::warn!(
                old = s,
                new = ?NoDataState::NoData,
                "unable to translate no-data state, using default"
            );
            NoDataState::NoData
        }
    }
}

/// Translate a legacy execution-error policy string into its unified state.
/// Total: unrecognized values fall back to Error with a warning.
pub fn trans_exec_err(s: &str) -> ExecErrState {
    match s {
        "" | policy::ALERTING => ExecErrState::Alerting,
        // The unified engine emits a DatasourceError alert when evaluation
        // fails, so "keep_state" maps to Error plus a compatibility silence.
        policy::KEEP_STATE => ExecErrState::Error,
        policy::OK => ExecErrState::OK,
        _ => {
            tracing::warn!(
                old = s,
                new = ?ExecErrState::Error,
                "unable to translate execution-error state, using default"
            );
            ExecErrState::Error
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_data_translation_is_total_and_fixed() {
        let table = vec![
            ("ok", NoDataState::OK),
            ("", NoDataState::NoData),
            ("no_data", NoDataState::NoData),
            ("alerting", NoDataState::Alerting),
            ("keep_state", NoDataState::NoData),
            ("bogus", NoDataState::NoData),
        ];
        for (input, expect) in table {
            assert_eq!(trans_no_data(input), expect, "input {input:?}");
            // Same value on every call.
            assert_eq!(trans_no_data(input), expect);
        }
    }

    #[test]
    fn exec_err_translation_is_total_and_fixed() {
        let table = vec![
            ("", ExecErrState::Alerting),
            ("alerting", ExecErrState::Alerting),
            ("keep_state", ExecErrState::Error),
            ("ok", ExecErrState::OK),
            ("bogus", ExecErrState::Error),
        ];
        for (input, expect) in table {
            assert_eq!(trans_exec_err(input), expect, "input {input:?}");
            assert_eq!(trans_exec_err(input), expect);
        }
    }
}
