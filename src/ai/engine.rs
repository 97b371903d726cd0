//! AI engine — trait definition, RandomAi, and SearchAi.
//!
//! The `AiEngine` trait defines the interface for all AI engines.
//! Two implementations are provided:
//!   - `RandomAi` — plays a random legal move (used for "harmless" difficulty
//!     and by data-generation consumers wanting a weak opponent).
//!   - `SearchAi` — the iterative-deepening alpha-beta search, keeping its
//!     transposition table warm across moves of the same game.

use std::time::Duration;

use rand::seq::SliceRandom;

use crate::ai::search::{self, SearchOutcome};
use crate::ai::tt::TranspositionTable;
use crate::engine::board::Position;
use crate::engine::types::{Difficulty, MakhosError, Move};

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine {
    /// Select a move for the side to move in `pos`.
    fn best_move(&mut self, pos: &Position) -> Result<Move, MakhosError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// RandomAi
// =========================================================================

/// Picks a random legal move.
pub struct RandomAi;

impl AiEngine for RandomAi {
    fn best_move(&mut self, pos: &Position) -> Result<Move, MakhosError> {
        let moves = crate::engine::movegen::legal_moves(pos);
        if moves.is_empty() {
            return Err(MakhosError::GameOver("no legal moves".to_string()));
        }
        let mut rng = rand::thread_rng();
        Ok(moves.choose(&mut rng).unwrap().clone())
    }

    fn name(&self) -> &str {
        "RandomAi"
    }
}

// =========================================================================
// SearchAi
// =========================================================================

/// Time-bounded search engine. The transposition table persists across
/// calls, so consecutive moves of one game reuse earlier work.
pub struct SearchAi {
    time_budget: Duration,
    tt: TranspositionTable,
}

impl SearchAi {
    pub fn new(time_budget: Duration) -> Self {
        SearchAi {
            time_budget,
            tt: TranspositionTable::new(),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// An engine tuned to a named difficulty. `Harmless` gets no search
    /// budget; pair it with `RandomAi` instead.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::from_millis(difficulty.time_ms())
    }

    /// Run the search and expose the full outcome (score, nodes, depth).
    pub fn analyze(&mut self, pos: &Position) -> SearchOutcome {
        search::iterative_deepening(pos, self.time_budget, &mut self.tt, None)
    }

    /// Drop accumulated transposition entries, e.g. between games.
    pub fn reset(&mut self) {
        self.tt.clear();
    }
}

impl AiEngine for SearchAi {
    fn best_move(&mut self, pos: &Position) -> Result<Move, MakhosError> {
        self.analyze(pos)
            .best
            .ok_or_else(|| MakhosError::GameOver("no legal moves".to_string()))
    }

    fn name(&self) -> &str {
        "SearchAi"
    }
}

/// Convenience: create the default AI engine.
pub fn default_engine() -> SearchAi {
    SearchAi::with_difficulty(Difficulty::Medium)
}

// =========================================================================
// Tests
// =========================================================================
