use serde::Serialize;

use crate::models::{MasteryLevel, Timestamp, WordRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub new_words: usize,
    pub due_now: usize,
    /// In rotation but not yet due
    pub waiting: usize,
    pub mastered: usize,
    pub avg_mastery: f64,
}

impl CatalogStats {
    pub fn collect(words: &[WordRecord], now: Timestamp) -> Self {
        let mut stats = CatalogStats {
            total: words.len(),
            new_words: 0,
            due_now: 0,
            waiting: 0,
            mastered: 0,
            avg_mastery: 0.0,
        };

        let mut mastery_sum = 0u64;
        for w in words {
            mastery_sum += w.mastery_level.value() as u64;
            if w.is_new() {
                stats.new_words += 1;
            } else if w.is_due(now) {
                stats.due_now += 1;
            } else {
                stats.waiting += 1;
            }
            if w.mastery_level == MasteryLevel::MASTERED {
                stats.mastered += 1;
            }
        }

        if !words.is_empty() {
            stats.avg_mastery = mastery_sum as f64 / words.len() as f64;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str, level: i64, next_review_time: Timestamp) -> WordRecord {
        WordRecord {
            mastery_level: MasteryLevel::new(level).unwrap(),
            next_review_time,
            ..WordRecord::new(id, "cat")
        }
    }

    #[test]
    fn stats_empty() {
        let stats = CatalogStats::collect(&[], 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.new_words, 0);
        assert_eq!(stats.avg_mastery, 0.0);
    }

    #[test]
    fn stats_buckets_partition_the_catalog() {
        let words = vec![
            word("1", 0, 0),
            word("2", 0, 50),
            word("3", 2, 100),
            word("4", 5, 101),
            word("5", 5, 99),
        ];
        let stats = CatalogStats::collect(&words, 100);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.new_words, 2);
        assert_eq!(stats.due_now, 2);
        assert_eq!(stats.waiting, 1);
        assert_eq!(stats.mastered, 2);
        assert_eq!(stats.avg_mastery, 12.0 / 5.0);
    }
}
