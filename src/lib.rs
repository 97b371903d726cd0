//! Makhos (Thai Checkers) engine.
//!
//! The crate splits into two layers:
//!   - [`engine`] — the rules core: bitboard position, rule-exact move
//!     generation with forced maximum-length captures and flying kings,
//!     Zobrist hashing, and a stateful [`engine::Game`] controller.
//!   - [`ai`] — the search core: phase-blended evaluation, transposition
//!     table, and a time-bounded iterative-deepening alpha-beta search.
//!
//! ```
//! use makhos::engine::Position;
//! use makhos::ai::{TranspositionTable, iterative_deepening};
//! use std::time::Duration;
//!
//! let mut tt = TranspositionTable::new();
//! let outcome =
//!     iterative_deepening(&Position::starting(), Duration::from_millis(50), &mut tt, None);
//! assert!(outcome.best.is_some());
//! ```

pub mod ai;
pub mod engine;

pub use ai::{evaluate, iterative_deepening};
pub use engine::{Game, Position, legal_moves, legal_moves_from};
