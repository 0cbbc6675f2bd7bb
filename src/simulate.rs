//! Scripted sessions with a simulated clock.
//!
//! Plays a list of answers against a fresh session, moving the clock forward
//! by a fixed step before every answer. Set breaks are dismissed immediately.
//! Useful for seeing how a catalog moves through the review tiers without
//! waiting on real time.

use log::debug;
use serde::Serialize;

use crate::models::{MasteryLevel, ReviewOutcome, Timestamp, WordId, WordRecord};
use crate::session::{NextStep, Session, SessionConfig, SessionError, SessionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStep {
    pub at: Timestamp,
    pub word_id: WordId,
    pub word: String,
    pub outcome: ReviewOutcome,
    pub mastery_before: MasteryLevel,
    pub mastery_after: MasteryLevel,
    pub next_review_time: Timestamp,
    /// Session score after this answer
    pub score: u32,
    pub next: NextStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<SimulationStep>,
    pub final_state: SessionState,
    pub words: Vec<WordRecord>,
}

pub fn simulate(
    words: Vec<WordRecord>,
    config: SessionConfig,
    outcomes: &[ReviewOutcome],
    start: Timestamp,
    step_ms: i64,
) -> Result<SimulationReport, SessionError> {
    let mut session = Session::new(words, config)?;
    let mut clock = start;
    let mut steps = Vec::with_capacity(outcomes.len());

    session.start(clock);

    for &outcome in outcomes {
        clock = clock.saturating_add(step_ms);

        if session.is_game_over() || session.state().is_finished {
            break;
        }
        if session.at_set_break() {
            debug!("dismissing set break at {}", clock);
            if session.next_set(clock)? == NextStep::Exhausted {
                break;
            }
        }

        let result = session.answer(outcome.is_correct(), clock)?;
        steps.push(SimulationStep {
            at: clock,
            word_id: result.updated.id.clone(),
            word: result.updated.word.clone(),
            outcome,
            mastery_before: result.previous.mastery_level,
            mastery_after: result.updated.mastery_level,
            next_review_time: result.updated.next_review_time,
            score: session.state().score,
            next: result.next,
        });
    }

    Ok(SimulationReport {
        steps,
        final_state: session.state().clone(),
        words: session.words().to_vec(),
    })
}

/// Parses a comma or whitespace separated list such as `c,c,x,correct`.
pub fn parse_outcomes(input: &str) -> Result<Vec<ReviewOutcome>, String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            ReviewOutcome::from_str(s)
                .ok_or_else(|| format!("Invalid outcome '{}'. Use: correct or incorrect", s))
        })
        .collect()
}
