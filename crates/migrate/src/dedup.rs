use crate::Error;
use std::collections::HashSet;

/// Bound on rename attempts before deduplication fails for an alert.
pub const MAX_DEDUP_ATTEMPTS: usize = 10;

/// Bound on UID draws before allocation fails. A v4 UUID collision within
/// a run is already a sign something is deeply wrong.
pub const MAX_UID_ATTEMPTS: usize = 10;

/// Truncate `name` to at most `max` characters.
fn truncate_chars(name: &str, max: usize) -> &str {
    match name.char_indices().nth(max) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Deduplicator tracks the rule titles already claimed within one
/// namespace of one migration run. Claimed titles compare under the
/// backing store's collation: case-insensitively when the store is.
#[derive(Debug)]
pub struct Deduplicator {
    set: HashSet<String>,
    case_insensitive: bool,
    max_len: usize,
}

impl Deduplicator {
    pub fn new(case_insensitive: bool, max_len: usize) -> Self {
        Self {
            set: HashSet::new(),
            case_insensitive,
            max_len,
        }
    }

    fn fold(&self, name: &str) -> String {
        if self.case_insensitive {
            models::collate(name.chars()).collect()
        } else {
            name.to_string()
        }
    }

    /// Truncate `name` to the maximum title length.
    pub fn truncate<'a>(&self, name: &'a str) -> &'a str {
        truncate_chars(name, self.max_len)
    }

    /// Whether `name` is already claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.set.contains(&self.fold(name))
    }

    /// Claim `name`. Must be called exactly once per assigned title, after
    /// any deduplication and before the title is used.
    pub fn add(&mut self, name: &str) {
        self.set.insert(self.fold(name));
    }

    /// Produce an unclaimed variant of the already-claimed `name` by
    /// appending a numeric suffix, shortening the base to stay within the
    /// maximum length. Attempts are explicitly bounded.
    pub fn deduplicate(&self, name: &str) -> Result<String, Error> {
        for attempt in 2..2 + MAX_DEDUP_ATTEMPTS {
            let suffix = format!("_{attempt}");
            let base = truncate_chars(name, self.max_len.saturating_sub(suffix.chars().count()));
            let candidate = format!("{base}{suffix}");
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(Error::DeduplicationExhausted {
            name: name.to_string(),
            attempts: MAX_DEDUP_ATTEMPTS,
        })
    }
}

/// UidAllocator issues rule UIDs which are unique across the migration run
/// and bounded in length.
#[derive(Debug)]
pub struct UidAllocator {
    seen: HashSet<String>,
    max_len: usize,
}

impl UidAllocator {
    pub fn new(max_len: usize) -> Self {
        Self {
            seen: HashSet::new(),
            max_len,
        }
    }

    pub fn allocate(&mut self) -> Result<String, Error> {
        for _ in 0..MAX_UID_ATTEMPTS {
            let uid = uuid::Uuid::new_v4().simple().to_string();
            let uid = truncate_chars(&uid, self.max_len).to_string();
            if self.seen.insert(uid.clone()) {
                return Ok(uid);
            }
        }
        Err(Error::UidExhausted {
            attempts: MAX_UID_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncation_is_exact_and_char_safe() {
        let dedup = Deduplicator::new(false, 10);
        assert_eq!(dedup.truncate("short"), "short");
        assert_eq!(dedup.truncate("exactly10!"), "exactly10!");
        assert_eq!(dedup.truncate("longer than ten chars"), "longer tha");
        assert_eq!(dedup.truncate("longer tha").chars().count(), 10);
        // Multi-byte characters truncate on character boundaries.
        assert_eq!(dedup.truncate("ééééééééééé"), "éééééééééé");
    }

    #[test]
    fn contains_respects_case_sensitivity() {
        let mut sensitive = Deduplicator::new(false, 190);
        sensitive.add("CPU > 90%");
        assert!(sensitive.contains("CPU > 90%"));
        assert!(!sensitive.contains("cpu > 90%"));

        let mut insensitive = Deduplicator::new(true, 190);
        insensitive.add("CPU > 90%");
        assert!(insensitive.contains("cpu > 90%"));
        assert!(insensitive.contains("CPU > 90%"));
    }

    #[test]
    fn deduplication_shortens_base_to_fit() {
        let max = 10;
        let mut dedup = Deduplicator::new(false, max);

        // Two distinct over-length names truncating to the same prefix.
        let first = dedup.truncate("collision AAA").to_string();
        dedup.add(&first);

        let second = dedup.truncate("collision BBB").to_string();
        assert!(dedup.contains(&second));
        let second = dedup.deduplicate(&second).unwrap();
        dedup.add(&second);

        assert_ne!(first, second);
        assert_eq!(first.chars().count(), max);
        assert_eq!(second.chars().count(), max);
        assert!(second.ends_with("_2"));
    }

    #[test]
    fn deduplication_attempts_are_bounded() {
        let mut dedup = Deduplicator::new(false, 190);
        dedup.add("dup");
        for n in 2..2 + MAX_DEDUP_ATTEMPTS {
            dedup.add(&format!("dup_{n}"));
        }

        match dedup.deduplicate("dup") {
            Err(Error::DeduplicationExhausted { name, attempts }) => {
                assert_eq!(name, "dup");
                assert_eq!(attempts, MAX_DEDUP_ATTEMPTS);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn uids_are_unique_and_bounded() {
        let mut uids = UidAllocator::new(40);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let uid = uids.allocate().unwrap();
            assert!(uid.chars().count() <= 40);
            assert!(seen.insert(uid));
        }
    }
}
