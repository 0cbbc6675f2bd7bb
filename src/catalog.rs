//! Word catalog loading.
//!
//! A catalog is a JSON array of word objects using the same camelCase keys as
//! the web app's word list. Only the fields the scheduler and CLI care about are
//! read; images, audio and phonics data are ignored. Order in the file is kept
//! because it is the tie-break for which word gets offered next.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    DifficultyLevel, MasteryLevel, PreconditionError, Timestamp, WordRecord, WordType,
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word {id}: {source}")]
    InvalidMastery {
        id: String,
        #[source]
        source: PreconditionError,
    },

    #[error("Word {0} has an empty spelling")]
    EmptyWord(String),

    #[error("Duplicate word id: {0}")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWord {
    id: RawId,
    word: String,
    #[serde(rename = "type", default)]
    word_type: WordType,
    #[serde(default)]
    level: DifficultyLevel,
    meaning: Option<String>,
    example: Option<String>,
    memory_tip: Option<String>,
    #[serde(default)]
    mastery_level: i64,
    #[serde(default)]
    next_review_time: Timestamp,
}

impl RawWord {
    fn into_record(self) -> Result<WordRecord> {
        let id = self.id.into_string();
        let word = self.word.trim().to_lowercase();
        if word.is_empty() {
            return Err(CatalogError::EmptyWord(id));
        }
        let mastery_level = MasteryLevel::new(self.mastery_level).map_err(|source| {
            CatalogError::InvalidMastery {
                id: id.clone(),
                source,
            }
        })?;

        Ok(WordRecord {
            id,
            word,
            word_type: self.word_type,
            level: self.level,
            meaning: self.meaning,
            example: self.example,
            memory_tip: self.memory_tip,
            mastery_level,
            next_review_time: self.next_review_time,
        })
    }
}

pub fn parse_catalog(json: &str) -> Result<Vec<WordRecord>> {
    let raw: Vec<RawWord> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(raw.len());
    for entry in raw {
        let record = entry.into_record()?;
        if !seen.insert(record.id.clone()) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        words.push(record);
    }

    Ok(words)
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<WordRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let words = parse_catalog(&content)?;
    info!("loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"id": "1", "word": "swim", "type": "verb", "level": "Starters",
         "meaning": "to move through water", "imageUrl": "https://example.com/swim.gif",
         "phonics": {"segments": ["swim"], "rules": []},
         "masteryLevel": 0, "nextReviewTime": 1700000000000,
         "example": "Fish like to swim in the sea."},
        {"id": "2", "word": "Apple ", "type": "noun", "masteryLevel": 3,
         "nextReviewTime": 1700000000500, "memoryTip": "The round a is like an apple."},
        {"id": 3, "word": "jump", "type": "verb", "level": "KET"}
    ]"#;

    mod parse_tests {
        use super::*;

        #[test]
        fn parses_in_file_order() {
            let words = parse_catalog(SAMPLE).unwrap();
            let ids: Vec<&str> = words.iter().map(|w| w.id.as_str()).collect();
            assert_eq!(ids, vec!["1", "2", "3"]);
        }

        #[test]
        fn normalizes_spelling() {
            let words = parse_catalog(SAMPLE).unwrap();
            assert_eq!(words[1].word, "apple");
        }

        #[test]
        fn reads_review_metadata() {
            let words = parse_catalog(SAMPLE).unwrap();
            assert_eq!(words[1].mastery_level.value(), 3);
            assert_eq!(words[1].next_review_time, 1_700_000_000_500);
            assert_eq!(
                words[1].memory_tip.as_deref(),
                Some("The round a is like an apple.")
            );
        }

        #[test]
        fn missing_review_fields_default_to_new() {
            let words = parse_catalog(SAMPLE).unwrap();
            assert!(words[2].is_new());
            assert_eq!(words[2].next_review_time, 0);
            assert_eq!(words[2].level, DifficultyLevel::Ket);
        }

        #[test]
        fn numeric_ids_become_strings() {
            let words = parse_catalog(SAMPLE).unwrap();
            assert_eq!(words[2].id, "3");
        }

        #[test]
        fn empty_catalog_is_fine() {
            assert!(parse_catalog("[]").unwrap().is_empty());
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn rejects_out_of_range_mastery() {
            let err = parse_catalog(r#"[{"id": "9", "word": "cat", "masteryLevel": 6}]"#)
                .unwrap_err();
            match err {
                CatalogError::InvalidMastery { id, source } => {
                    assert_eq!(id, "9");
                    assert_eq!(source, PreconditionError::MasteryOutOfRange(6));
                }
                other => panic!("Expected InvalidMastery, got {:?}", other),
            }
        }

        #[test]
        fn rejects_negative_mastery() {
            let err = parse_catalog(r#"[{"id": "1", "word": "cat", "masteryLevel": -1}]"#)
                .unwrap_err();
            assert!(matches!(err, CatalogError::InvalidMastery { .. }));
        }

        #[test]
        fn rejects_blank_word() {
            let err = parse_catalog(r#"[{"id": "1", "word": "   "}]"#).unwrap_err();
            assert!(matches!(err, CatalogError::EmptyWord(id) if id == "1"));
        }

        #[test]
        fn rejects_duplicate_ids() {
            let err = parse_catalog(
                r#"[{"id": "1", "word": "cat"}, {"id": 1, "word": "dog"}]"#,
            )
            .unwrap_err();
            assert!(matches!(err, CatalogError::DuplicateId(id) if id == "1"));
        }

        #[test]
        fn rejects_unknown_word_type() {
            let err = parse_catalog(r#"[{"id": "1", "word": "cat", "type": "adverb"}]"#)
                .unwrap_err();
            assert!(matches!(err, CatalogError::Json(_)));
        }

        #[test]
        fn rejects_non_array() {
            assert!(matches!(
                parse_catalog(r#"{"id": "1"}"#),
                Err(CatalogError::Json(_))
            ));
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn loads_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(SAMPLE.as_bytes()).unwrap();

            let words = load_catalog(file.path()).unwrap();
            assert_eq!(words.len(), 3);
            assert_eq!(words[0].word, "swim");
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = load_catalog(dir.path().join("nope.json")).unwrap_err();
            assert!(matches!(err, CatalogError::Io(_)));
        }
    }
}
