use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub type WordId = String;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("mastery level {0} is outside 0..={max}", max = MasteryLevel::MAX)]
    MasteryOutOfRange(i64),
}

// How many scheduling cycles a word has survived without a failed attempt
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const MAX: u8 = 5;
    pub const NEW: MasteryLevel = MasteryLevel(0);
    pub const MASTERED: MasteryLevel = MasteryLevel(Self::MAX);

    pub fn new(level: i64) -> Result<Self, PreconditionError> {
        if (0..=Self::MAX as i64).contains(&level) {
            Ok(MasteryLevel(level as u8))
        } else {
            Err(PreconditionError::MasteryOutOfRange(level))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_new(&self) -> bool {
        self.0 == 0
    }

    /// One level up, saturating at `MAX`.
    pub fn increment(self) -> Self {
        MasteryLevel((self.0 + 1).min(Self::MAX))
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            0 => "New",
            1 => "Learning",
            2 => "Familiar",
            3 => "Comfortable",
            4 => "Proficient",
            _ => "Mastered",
        }
    }
}

impl TryFrom<i64> for MasteryLevel {
    type Error = PreconditionError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        MasteryLevel::new(level)
    }
}

impl From<MasteryLevel> for i64 {
    fn from(level: MasteryLevel) -> i64 {
        level.0 as i64
    }
}

impl std::fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Part of speech. Only presentation cares about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    #[default]
    Noun,
    Verb,
    Adjective,
}

impl WordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordType::Noun => "noun",
            WordType::Verb => "verb",
            WordType::Adjective => "adjective",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "noun" | "n" => Some(WordType::Noun),
            "verb" | "v" => Some(WordType::Verb),
            "adjective" | "adj" | "a" => Some(WordType::Adjective),
            _ => None,
        }
    }
}

// Cambridge young-learner exam bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[default]
    Starters,
    Movers,
    Flyers,
    #[serde(rename = "KET")]
    Ket,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Starters => "Starters",
            DifficultyLevel::Movers => "Movers",
            DifficultyLevel::Flyers => "Flyers",
            DifficultyLevel::Ket => "KET",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "starters" => Some(DifficultyLevel::Starters),
            "movers" => Some(DifficultyLevel::Movers),
            "flyers" => Some(DifficultyLevel::Flyers),
            "ket" => Some(DifficultyLevel::Ket),
            _ => None,
        }
    }
}

/// A single spelling target and its review metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: WordId,
    pub word: String,
    #[serde(rename = "type")]
    pub word_type: WordType,
    pub level: DifficultyLevel,
    pub meaning: Option<String>,
    pub example: Option<String>,
    pub memory_tip: Option<String>,
    pub mastery_level: MasteryLevel,
    pub next_review_time: Timestamp,
}

impl WordRecord {
    /// A fresh word that has never been answered correctly.
    pub fn new(id: impl Into<WordId>, word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            word_type: WordType::default(),
            level: DifficultyLevel::default(),
            meaning: None,
            example: None,
            memory_tip: None,
            mastery_level: MasteryLevel::NEW,
            next_review_time: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.mastery_level.is_new()
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        !self.is_new() && self.next_review_time <= now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
}

impl ReviewOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewOutcome::Correct => "correct",
            ReviewOutcome::Incorrect => "incorrect",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "correct" | "c" | "yes" | "y" | "success" | "1" => Some(ReviewOutcome::Correct),
            "incorrect" | "x" | "no" | "n" | "fail" | "wrong" | "0" => {
                Some(ReviewOutcome::Incorrect)
            }
            _ => None,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, ReviewOutcome::Correct)
    }
}


// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod mastery_level_tests {
        use super::*;

        #[test]
        fn new_accepts_full_range() {
            for level in 0..=5 {
                assert_eq!(MasteryLevel::new(level).unwrap().value() as i64, level);
            }
        }

        #[test]
        fn new_rejects_out_of_range() {
            assert_eq!(
                MasteryLevel::new(-1),
                Err(PreconditionError::MasteryOutOfRange(-1))
            );
            assert_eq!(
                MasteryLevel::new(6),
                Err(PreconditionError::MasteryOutOfRange(6))
            );
        }

        #[test]
        fn increment_saturates_at_max() {
            assert_eq!(MasteryLevel::NEW.increment().value(), 1);
            assert_eq!(MasteryLevel::MASTERED.increment(), MasteryLevel::MASTERED);
        }

        #[test]
        fn labels() {
            assert_eq!(MasteryLevel::NEW.label(), "New");
            assert_eq!(MasteryLevel::new(1).unwrap().label(), "Learning");
            assert_eq!(MasteryLevel::new(3).unwrap().label(), "Comfortable");
            assert_eq!(MasteryLevel::MASTERED.label(), "Mastered");
        }

        #[test]
        fn deserialize_rejects_out_of_range() {
            assert!(serde_json::from_str::<MasteryLevel>("7").is_err());
            assert_eq!(
                serde_json::from_str::<MasteryLevel>("4").unwrap().value(),
                4
            );
        }
    }

    mod word_record_tests {
        use super::*;

        #[test]
        fn new_word_is_never_due() {
            let w = WordRecord::new("1", "swim");
            assert!(w.is_new());
            assert!(!w.is_due(i64::MAX));
        }

        #[test]
        fn due_when_review_time_elapsed() {
            let mut w = WordRecord::new("1", "swim");
            w.mastery_level = MasteryLevel::new(2).unwrap();
            w.next_review_time = 1_000;
            assert!(!w.is_due(999));
            assert!(w.is_due(1_000));
            assert!(w.is_due(5_000));
        }

        #[test]
        fn serializes_with_camel_case_keys() {
            let w = WordRecord::new("7", "apple");
            let json = serde_json::to_string(&w).unwrap();
            assert!(json.contains("\"masteryLevel\":0"));
            assert!(json.contains("\"nextReviewTime\":0"));
            assert!(json.contains("\"type\":\"noun\""));
            assert!(json.contains("\"level\":\"Starters\""));
        }
    }

    mod word_type_tests {
        use super::*;

        #[test]
        fn from_str_variants() {
            assert_eq!(WordType::from_str("Verb"), Some(WordType::Verb));
            assert_eq!(WordType::from_str("adj"), Some(WordType::Adjective));
            assert_eq!(WordType::from_str("n"), Some(WordType::Noun));
            assert_eq!(WordType::from_str("adverb"), None);
        }

        #[test]
        fn as_str_round_values() {
            assert_eq!(WordType::Noun.as_str(), "noun");
            assert_eq!(WordType::Adjective.as_str(), "adjective");
        }
    }

    mod difficulty_level_tests {
        use super::*;

        #[test]
        fn ket_serializes_uppercase() {
            assert_eq!(
                serde_json::to_string(&DifficultyLevel::Ket).unwrap(),
                "\"KET\""
            );
            assert_eq!(DifficultyLevel::from_str("ket"), Some(DifficultyLevel::Ket));
            assert_eq!(DifficultyLevel::Flyers.as_str(), "Flyers");
        }
    }

    mod review_outcome_tests {
        use super::*;

        #[test]
        fn from_str_correct_variants() {
            for v in ["correct", "c", "yes", "Y", "success", "1", " CORRECT "] {
                assert_eq!(
                    ReviewOutcome::from_str(v),
                    Some(ReviewOutcome::Correct),
                    "Expected Correct for '{}'",
                    v
                );
            }
        }

        #[test]
        fn from_str_incorrect_variants() {
            for v in ["incorrect", "x", "no", "N", "fail", "wrong", "0"] {
                assert_eq!(
                    ReviewOutcome::from_str(v),
                    Some(ReviewOutcome::Incorrect),
                    "Expected Incorrect for '{}'",
                    v
                );
            }
        }

        #[test]
        fn from_str_invalid() {
            assert!(ReviewOutcome::from_str("maybe").is_none());
            assert!(ReviewOutcome::from_str("").is_none());
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_with_string() {
            let output = JsonOutput::ok("test data");
            assert!(output.success);
            assert_eq!(output.data, Some("test data"));
            assert!(output.error.is_none());
        }

        #[test]
        fn err_with_string() {
            let output = JsonOutput::<()>::err("something went wrong");
            assert!(!output.success);
            assert!(output.data.is_none());
            assert_eq!(output.error, Some("something went wrong".to_string()));
        }

        #[test]
        fn serializes_err_correctly() {
            let output = JsonOutput::<()>::err("error");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":false"));
            assert!(json.contains("\"data\":null"));
            assert!(json.contains("\"error\":\"error\""));
        }
    }
}
