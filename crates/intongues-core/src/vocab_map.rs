use std::collections::HashMap;

use intongues_types::{VocabEntry, VocabStatus};

use crate::preprocess::normalise;

/// In-memory vocabulary of one user and language, keyed by normalised expression
#[derive(Debug, Clone, Default)]
pub struct VocabMap {
    entries: HashMap<String, VocabEntry>,
}

impl VocabMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up by surface form or key
    pub fn get(&self, expression: &str) -> Option<&VocabEntry> {
        self.entries
            .get(expression)
            .or_else(|| self.entries.get(&normalise(expression)))
    }

    pub fn status_of(&self, expression: &str) -> Option<VocabStatus> {
        self.get(expression).map(|e| e.status)
    }

    pub fn insert(&mut self, entry: VocabEntry) -> Option<VocabEntry> {
        self.entries.insert(entry.normalised.clone(), entry)
    }

    pub fn remove(&mut self, expression: &str) -> Option<VocabEntry> {
        self.entries.remove(&normalise(expression))
    }

    /// Multi-word keys, longest first
    pub fn phrase_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.is_phrase())
            .map(|e| e.normalised.as_str())
            .collect();
        keys.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        keys
    }

    pub fn count_by_status(&self) -> HashMap<VocabStatus, usize> {
        let mut counts = HashMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn entries(&self) -> impl Iterator<Item = &VocabEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VocabEntry> for VocabMap {
    fn from_iter<I: IntoIterator<Item = VocabEntry>>(iter: I) -> Self {
        let mut map = VocabMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    pub(crate) fn entry(text: &str, status: VocabStatus) -> VocabEntry {
        let now = Utc::now();
        VocabEntry {
            text: text.to_string(),
            normalised: normalise(text),
            language: "en".to_string(),
            status,
            translation: None,
            content_ids: BTreeSet::new(),
            srs: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let map: VocabMap = [entry("hello", VocabStatus::Familiar)].into_iter().collect();
        assert_eq!(map.status_of("Hello"), Some(VocabStatus::Familiar));
        assert_eq!(map.status_of("HELLO"), Some(VocabStatus::Familiar));
        assert_eq!(map.get("hello").map(|e| e.normalised.as_str()), Some("hello"));
    }

    #[test]
    fn phrase_keys_are_longest_first() {
        let map: VocabMap = [
            entry("good morning", VocabStatus::Unknown),
            entry("good morning everyone", VocabStatus::Unknown),
            entry("morning", VocabStatus::Known),
            entry("by the way", VocabStatus::Recognised),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            map.phrase_keys(),
            vec!["good morning everyone", "good morning", "by the way"]
        );
    }

    #[test]
    fn counts_group_by_status() {
        let map: VocabMap = [
            entry("uno", VocabStatus::Known),
            entry("dos", VocabStatus::Known),
            entry("tres", VocabStatus::Unknown),
        ]
        .into_iter()
        .collect();

        let counts = map.count_by_status();
        assert_eq!(counts.get(&VocabStatus::Known), Some(&2));
        assert_eq!(counts.get(&VocabStatus::Unknown), Some(&1));
        assert_eq!(counts.get(&VocabStatus::Familiar), None);
    }
}
