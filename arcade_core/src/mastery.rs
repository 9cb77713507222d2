use std::collections::BTreeMap;

use thiserror::Error;

const PERCENT: f64 = 100.0;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MasteryError {
    #[error("threshold must be between 0.0 and 100.0, was [{0}]")]
    ThresholdOutOfRange(f64),
    #[error("successful attempts [{successful}] exceed total attempts [{total}]")]
    InconsistentCounts { successful: u32, total: u32 },
}

/// Attempt counts for a single skill.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SkillRecord {
    total_attempts: u32,
    successful_attempts: u32,
}

impl SkillRecord {
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn successful_attempts(&self) -> u32 {
        self.successful_attempts
    }

    /// 0.0 when nothing has been attempted.
    pub fn mastery_percent(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.successful_attempts as f64 / self.total_attempts as f64 * PERCENT
    }

    fn record_attempt(&mut self, success: bool) {
        self.total_attempts += 1;
        if success {
            self.successful_attempts += 1;
        }
    }
}

/// Tracks attempts per skill key and derives how well each one is mastered.
///
/// Keys are kept in key order, which also breaks ties when sorting by
/// mastery.
#[derive(Clone, Debug, PartialEq)]
pub struct MasteryTracker<K: Ord> {
    records: BTreeMap<K, SkillRecord>,
}

impl<K: Ord> Default for MasteryTracker<K> {
    fn default() -> Self {
        MasteryTracker {
            records: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> MasteryTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self, key: K, success: bool) {
        self.records.entry(key).or_default().record_attempt(success);
    }

    /// Replaces the counts for `key` wholesale, for restoring saved progress.
    pub fn restore(&mut self, key: K, successful: u32, total: u32) -> Result<(), MasteryError> {
        if successful > total {
            return Err(MasteryError::InconsistentCounts { successful, total });
        }
        if total == 0 {
            self.records.remove(&key);
        } else {
            self.records.insert(
                key,
                SkillRecord {
                    total_attempts: total,
                    successful_attempts: successful,
                },
            );
        }
        Ok(())
    }

    pub fn record(&self, key: &K) -> Option<SkillRecord> {
        self.records.get(key).copied()
    }

    pub fn mastery_percent(&self, key: &K) -> f64 {
        self.records
            .get(key)
            .map(SkillRecord::mastery_percent)
            .unwrap_or(0.0)
    }

    /// Keys below `threshold_percent`, weakest first.
    pub fn weak_keys(&self, threshold_percent: f64) -> Result<Vec<K>, MasteryError> {
        if !(0.0..=PERCENT).contains(&threshold_percent) {
            return Err(MasteryError::ThresholdOutOfRange(threshold_percent));
        }
        Ok(self
            .sorted_entries()
            .into_iter()
            .filter(|(_, percent)| *percent < threshold_percent)
            .map(|(key, _)| key)
            .collect())
    }

    /// Every tracked key, weakest first.
    pub fn all_keys_sorted(&self) -> Vec<K> {
        self.sorted_entries()
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// The current mastery of every tracked key. Later attempts do not
    /// affect the returned map.
    pub fn snapshot(&self) -> BTreeMap<K, f64> {
        self.records
            .iter()
            .map(|(key, record)| (key.clone(), record.mastery_percent()))
            .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = (&K, &SkillRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // sort_by is stable, so equal percentages stay in key order
    fn sorted_entries(&self) -> Vec<(K, f64)> {
        let mut entries: Vec<(K, f64)> = self
            .records
            .iter()
            .map(|(key, record)| (key.clone(), record.mastery_percent()))
            .collect();
        entries.sort_by(|(_, a), (_, b)| a.total_cmp(b));
        entries
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    fn record_many(tracker: &mut MasteryTracker<char>, key: char, successes: u32, failures: u32) {
        for _ in 0..successes {
            tracker.record_attempt(key, true);
        }
        for _ in 0..failures {
            tracker.record_attempt(key, false);
        }
    }

    #[test]
    fn attempts_are_counted_exactly() {
        let mut tracker = MasteryTracker::new();
        tracker.record_attempt('A', true);
        tracker.record_attempt('A', false);
        tracker.record_attempt('A', true);
        let record = tracker.record(&'A').unwrap();
        assert_eq!(3, record.total_attempts());
        assert_eq!(2, record.successful_attempts());
        assert_eq!(None, tracker.record(&'B'));
    }

    #[test]
    fn four_of_five_is_eighty_percent() {
        let mut tracker = MasteryTracker::new();
        record_many(&mut tracker, 'A', 4, 1);
        assert_eq!(80.0, tracker.mastery_percent(&'A'));
    }

    #[test]
    fn unattempted_key_is_zero() {
        let tracker = MasteryTracker::<char>::new();
        assert_eq!(0.0, tracker.mastery_percent(&'Q'));
        assert!(tracker.is_empty());
    }

    #[test]
    fn weak_keys_filters_and_sorts() {
        let mut tracker = MasteryTracker::new();
        record_many(&mut tracker, 'A', 2, 0);
        record_many(&mut tracker, 'B', 1, 1);
        record_many(&mut tracker, 'C', 0, 2);
        record_many(&mut tracker, 'D', 1, 1);

        assert_eq!(vec!['C', 'B', 'D'], tracker.weak_keys(80.0).unwrap());
        assert_eq!(vec!['C'], tracker.weak_keys(50.0).unwrap());
        assert!(tracker.weak_keys(0.0).unwrap().is_empty());
        assert_eq!(3, tracker.weak_keys(100.0).unwrap().len());
        assert_eq!(vec!['C', 'B', 'D', 'A'], tracker.all_keys_sorted());
    }

    #[test]
    fn weak_keys_rejects_bad_threshold() {
        let tracker = MasteryTracker::<char>::new();
        assert_eq!(
            Err(MasteryError::ThresholdOutOfRange(-0.5)),
            tracker.weak_keys(-0.5)
        );
        assert_eq!(
            Err(MasteryError::ThresholdOutOfRange(100.5)),
            tracker.weak_keys(100.5)
        );
        assert!(tracker.weak_keys(f64::NAN).is_err());
    }

    #[test]
    fn works_with_string_keys() {
        let mut tracker = MasteryTracker::new();
        tracker.record_attempt("hello".to_string(), true);
        tracker.record_attempt("world".to_string(), true);
        tracker.record_attempt("world".to_string(), false);
        assert_eq!(100.0, tracker.mastery_percent(&"hello".to_string()));
        assert_eq!(50.0, tracker.mastery_percent(&"world".to_string()));
        assert_eq!(
            vec!["world".to_string()],
            tracker.weak_keys(60.0).unwrap()
        );
    }

    #[test]
    fn snapshot_is_detached() {
        let mut tracker = MasteryTracker::new();
        record_many(&mut tracker, 'A', 1, 1);
        let snapshot = tracker.snapshot();
        record_many(&mut tracker, 'A', 5, 0);
        tracker.record_attempt('B', true);
        assert_eq!(1, snapshot.len());
        assert_eq!(Some(&50.0), snapshot.get(&'A'));
        assert!(tracker.mastery_percent(&'A') > 50.0);
    }

    #[test]
    fn restore_checks_counts() {
        let mut tracker = MasteryTracker::new();
        assert_eq!(
            Err(MasteryError::InconsistentCounts {
                successful: 3,
                total: 2
            }),
            tracker.restore('A', 3, 2)
        );
        tracker.restore('A', 7, 10).unwrap();
        assert_eq!(70.0, tracker.mastery_percent(&'A'));
        tracker.restore('A', 0, 0).unwrap();
        assert_eq!(None, tracker.record(&'A'));
    }
}
