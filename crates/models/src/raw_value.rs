/// RawValue is a thin wrapper of serde_json::value::RawValue which holds an
/// opaque, already-encoded JSON fragment. Legacy alert settings and query
/// models pass through the migration without re-encoding the fields it does
/// not touch, so untouched fields round-trip byte-identical.
///
/// As it uses serde_json::RawValue, it MUST be deserialized using serde_json
/// and not some other Deserializer.
#[derive(serde::Serialize, serde::Deserialize, Clone)]
pub struct RawValue(Box<serde_json::value::RawValue>);

impl RawValue {
    pub fn is_null(&self) -> bool {
        self.get() == "null"
    }
    pub fn from_str(s: &str) -> serde_json::Result<Self> {
        Self::from_string(s.to_owned())
    }
    pub fn from_string(s: String) -> serde_json::Result<Self> {
        serde_json::value::RawValue::from_string(s).map(Self)
    }
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self::from_string(value.to_string()).expect("Value is always valid JSON")
    }
    pub fn get(&self) -> &str {
        self.0.get()
    }
}

impl Default for RawValue {
    fn default() -> Self {
        Self::from_str("null").expect("null is valid JSON")
    }
}

// RawValues are equal if they are byte-for-byte identical,
// except for leading and trailing whitespace.
impl std::cmp::PartialEq<RawValue> for RawValue {
    fn eq(&self, other: &RawValue) -> bool {
        self.get().trim() == other.get().trim()
    }
}

impl From<Box<serde_json::value::RawValue>> for RawValue {
    fn from(value: Box<serde_json::value::RawValue>) -> Self {
        Self(value)
    }
}

impl std::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::RawValue;

    #[test]
    fn raw_value_round_trips_untouched() {
        let fixture = r#"{"expr":"up == 1","legendFormat":"{{instance}}","refId":"A"}"#;
        let raw = RawValue::from_str(fixture).unwrap();
        assert_eq!(raw.get(), fixture);
        assert_eq!(serde_json::to_string(&raw).unwrap(), fixture);
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(RawValue::from_str("{not json").is_err());
        assert!(RawValue::default().is_null());
    }
}
