//! Review scheduling for spelling words.
//!
//! Two-tier policy: words that are due for review come first, then words that
//! have never been answered correctly. Ties are broken by catalog order. A
//! correct answer on a new word schedules it five minutes out; every later
//! correct answer schedules it twelve hours out. A wrong answer sends the word
//! back to level 0 and makes it immediately eligible again.
//!
//! Every operation takes the current time as an argument and never reads the
//! system clock.

use log::debug;

use crate::models::{MasteryLevel, Timestamp, WordRecord};

pub const FIVE_MINUTES_MS: i64 = 5 * 60 * 1000;
pub const TWELVE_HOURS_MS: i64 = 12 * 60 * 60 * 1000;

pub struct ReviewScheduler;

impl ReviewScheduler {
    /// Words in active rotation whose review time has elapsed, in catalog order.
    pub fn select_due_words(words: &[WordRecord], now: Timestamp) -> Vec<&WordRecord> {
        words.iter().filter(|w| w.is_due(now)).collect()
    }

    /// Words never answered correctly, in catalog order.
    pub fn select_new_words(words: &[WordRecord]) -> Vec<&WordRecord> {
        words.iter().filter(|w| w.is_new()).collect()
    }

    /// First due word, else first new word, else `None` when the collection has
    /// nothing left to offer right now.
    pub fn pick_next_word(words: &[WordRecord], now: Timestamp) -> Option<&WordRecord> {
        let picked = words
            .iter()
            .find(|w| w.is_due(now))
            .or_else(|| words.iter().find(|w| w.is_new()));

        match picked {
            Some(w) => debug!(
                "picked '{}' (id {}, level {}, {})",
                w.word,
                w.id,
                w.mastery_level,
                if w.is_new() { "new" } else { "due" }
            ),
            None => debug!("nothing due or new among {} words", words.len()),
        }

        picked
    }

    /// Returns the record as it stands after one spelling attempt. The input is
    /// left untouched.
    pub fn process_review(word: &WordRecord, is_correct: bool, now: Timestamp) -> WordRecord {
        let (mastery_level, next_review_time) = if is_correct {
            (
                word.mastery_level.increment(),
                now.saturating_add(Self::next_interval(word.mastery_level)),
            )
        } else {
            (MasteryLevel::NEW, now)
        };

        debug!(
            "review '{}' {}: level {} -> {}, next review at {}",
            word.word,
            if is_correct { "correct" } else { "incorrect" },
            word.mastery_level,
            mastery_level,
            next_review_time
        );

        WordRecord {
            mastery_level,
            next_review_time,
            ..word.clone()
        }
    }

    // Delay after a correct answer, keyed on the level before the answer
    pub fn next_interval(mastery_level: MasteryLevel) -> i64 {
        if mastery_level.is_new() {
            FIVE_MINUTES_MS
        } else {
            TWELVE_HOURS_MS
        }
    }
}
