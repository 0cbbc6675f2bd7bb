//! One learner's run through a word collection.
//!
//! The session owns the only mutable copy of the words. The scheduler hands
//! back updated records and the session swaps them in by id, so the scheduler
//! itself never holds state between calls.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::models::{MasteryLevel, Timestamp, WordId, WordRecord};
use crate::scheduler::ReviewScheduler;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Duplicate word id: {0}")]
    DuplicateId(WordId),

    #[error("No word is waiting for an answer")]
    NoActiveWord,

    #[error("No hearts left")]
    OutOfHearts,

    #[error("The session is not at a set break")]
    NotAtSetBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub daily_goal: usize,
    pub starting_hearts: u32,
    pub set_size: usize,
    pub points_per_word: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            daily_goal: 15,
            starting_hearts: 5,
            set_size: 5,
            points_per_word: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub score: u32,
    pub hearts: u32,
    /// Consecutive correct answers
    pub streak: u32,
    pub words_completed_today: usize,
    pub daily_goal: usize,
    pub is_finished: bool,
}

/// What the learner should see after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "word_id", rename_all = "snake_case")]
pub enum NextStep {
    Present(WordId),
    /// Same word again after a wrong answer
    Retry(WordId),
    /// Break between sets; call `next_set` to continue
    SetComplete,
    GoalReached,
    /// Nothing due and nothing new right now
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptResult {
    pub previous: WordRecord,
    pub updated: WordRecord,
    pub next: NextStep,
}

pub struct Session {
    words: Vec<WordRecord>,
    index: HashMap<WordId, usize>,
    active: Option<WordId>,
    at_set_break: bool,
    state: SessionState,
    config: SessionConfig,
}

impl Session {
    pub fn new(words: Vec<WordRecord>, config: SessionConfig) -> Result<Self, SessionError> {
        let mut index = HashMap::with_capacity(words.len());
        for (i, w) in words.iter().enumerate() {
            if index.insert(w.id.clone(), i).is_some() {
                return Err(SessionError::DuplicateId(w.id.clone()));
            }
        }

        let state = SessionState {
            score: 0,
            hearts: config.starting_hearts,
            streak: 0,
            words_completed_today: count_completed(&words),
            daily_goal: config.daily_goal,
            is_finished: false,
        };

        Ok(Self {
            words,
            index,
            active: None,
            at_set_break: false,
            state,
            config,
        })
    }

    pub fn start(&mut self, now: Timestamp) -> NextStep {
        info!("session started with {} words", self.words.len());
        self.present_next(now)
    }

    pub fn current_word(&self) -> Option<&WordRecord> {
        self.active.as_ref().and_then(|id| self.word(id))
    }

    pub fn word(&self, id: &str) -> Option<&WordRecord> {
        self.index.get(id).map(|&i| &self.words[i])
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn at_set_break(&self) -> bool {
        self.at_set_break
    }

    pub fn is_game_over(&self) -> bool {
        self.state.hearts == 0
    }

    pub fn progress_percent(&self) -> f64 {
        if self.state.daily_goal == 0 {
            100.0
        } else {
            (self.state.words_completed_today as f64 / self.state.daily_goal as f64) * 100.0
        }
    }

    /// Records one spelling attempt on the active word.
    pub fn answer(
        &mut self,
        is_correct: bool,
        now: Timestamp,
    ) -> Result<AttemptResult, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::OutOfHearts);
        }
        let previous = self
            .current_word()
            .cloned()
            .ok_or(SessionError::NoActiveWord)?;

        let updated = ReviewScheduler::process_review(&previous, is_correct, now);
        self.replace(updated.clone());

        let next = if is_correct {
            self.state.score += self.config.points_per_word;
            self.state.streak += 1;
            self.advance(now)
        } else {
            self.state.hearts = self.state.hearts.saturating_sub(1);
            self.state.streak = 0;
            debug!("wrong answer, {} hearts left", self.state.hearts);
            NextStep::Retry(previous.id.clone())
        };

        Ok(AttemptResult {
            previous,
            updated,
            next,
        })
    }

    /// Leaves a set break and picks the next word. Only valid right after
    /// an answer returned `NextStep::SetComplete`.
    pub fn next_set(&mut self, now: Timestamp) -> Result<NextStep, SessionError> {
        if !self.at_set_break || self.state.is_finished {
            return Err(SessionError::NotAtSetBreak);
        }
        self.at_set_break = false;
        Ok(self.present_next(now))
    }

    fn advance(&mut self, now: Timestamp) -> NextStep {
        let completed = count_completed(&self.words);
        self.state.words_completed_today = completed;

        let at_set_boundary =
            self.config.set_size > 0 && completed > 0 && completed % self.config.set_size == 0;
        if at_set_boundary && completed < self.config.daily_goal {
            info!("set complete at {} words", completed);
            self.active = None;
            self.at_set_break = true;
            return NextStep::SetComplete;
        }

        if completed >= self.config.daily_goal {
            info!("daily goal of {} reached", self.config.daily_goal);
            self.finish();
            return NextStep::GoalReached;
        }

        self.present_next(now)
    }

    fn present_next(&mut self, now: Timestamp) -> NextStep {
        match ReviewScheduler::pick_next_word(&self.words, now) {
            Some(w) => {
                let id = w.id.clone();
                self.active = Some(id.clone());
                NextStep::Present(id)
            }
            None => {
                self.finish();
                NextStep::Exhausted
            }
        }
    }

    fn finish(&mut self) {
        self.active = None;
        self.at_set_break = false;
        self.state.is_finished = true;
    }

    fn replace(&mut self, updated: WordRecord) {
        if let Some(&i) = self.index.get(&updated.id) {
            self.words[i] = updated;
        }
    }
}

fn count_completed(words: &[WordRecord]) -> usize {
    words
        .iter()
        .filter(|w| w.mastery_level > MasteryLevel::NEW)
        .count()
}
