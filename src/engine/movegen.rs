//! Legal move generation.
//!
//! Rules implemented:
//! - men step one dark diagonal forward onto an empty square;
//! - men capture by jumping forward over an adjacent enemy into the empty
//!   square immediately beyond;
//! - kings fly any number of empty squares along a diagonal;
//! - kings capture by sliding past empty squares, jumping exactly one enemy
//!   and landing on the square immediately beyond it (short landing);
//! - a capture chain continues from the landing square; promotion ends the
//!   chain; captured pieces are removed for the remainder of the chain;
//! - if any capture exists, quiet moves are illegal, and only capture
//!   sequences of maximum length are legal.
//!
//! The capture search is a depth-first recursion over bitboard snapshots:
//! updated 32-bit boards are passed by value, so there is no undo step.
//! Pieces and directions are visited in ascending order (men before kings,
//! directions UL, UR, DL, DR), which makes generation deterministic.

use crate::engine::board::Position;
use crate::engine::steps::{self, StepTables};
use crate::engine::types::{Bitboard, Direction, Move, Piece, Side, Square};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move. Returns an empty vector
/// when the side has no moves, which the caller treats as a loss.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let side = pos.side_to_move;
    let mut captures = capture_moves_for(pos, side);
    if !captures.is_empty() {
        let max_len = captures.iter().map(|m| m.captured.len()).max().unwrap();
        captures.retain(|m| m.captured.len() == max_len);
        return captures;
    }
    quiet_moves_for(pos, side)
}

/// Generate all legal moves originating from a specific square.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|m| m.from == from)
        .collect()
}

/// Capture potential of one side, computed as if that side were to move.
/// Used by the evaluator's capture-swing term.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureProfile {
    /// Length of the longest capture chain (0 when no capture exists).
    pub max_chain: u32,
    /// Union of all squares threatened by some capture chain.
    pub targets: Bitboard,
}

/// Compute the capture profile for `side`, regardless of whose turn it is.
pub fn capture_profile(pos: &Position, side: Side) -> CaptureProfile {
    let mut profile = CaptureProfile::default();
    for mv in capture_moves_for(pos, side) {
        profile.max_chain = profile.max_chain.max(mv.captured.len() as u32);
        for &sq in &mv.captured {
            profile.targets.set(sq);
        }
    }
    profile
}

// =========================================================================
// Capture generation (DFS over bitboard snapshots)
// =========================================================================

/// Per-chain search state: the moving piece's origin, the friendly pieces
/// other than the mover, and the output sink.
struct ChainSearch<'a> {
    tables: &'static StepTables,
    side: Side,
    origin: Square,
    /// Friendly pieces excluding the mover — fixed for the whole chain.
    own_others: Bitboard,
    /// Jumped squares so far, in order.
    chain: Vec<Square>,
    out: &'a mut Vec<Move>,
}

/// All capture moves for `side`, before max-length filtering.
fn capture_moves_for(pos: &Position, side: Side) -> Vec<Move> {
    let tables = steps::tables();
    let own = pos.side_pieces(side);
    let enemy = pos.side_pieces(!side);
    let mut out = Vec::new();

    for origin in pos.pieces(side, Piece::Man).iter() {
        let mut search = ChainSearch {
            tables,
            side,
            origin,
            own_others: own.without(origin),
            chain: Vec::new(),
            out: &mut out,
        };
        search.man_jumps(origin, enemy);
    }
    for origin in pos.pieces(side, Piece::King).iter() {
        let mut search = ChainSearch {
            tables,
            side,
            origin,
            own_others: own.without(origin),
            chain: Vec::new(),
            out: &mut out,
        };
        search.king_jumps(origin, enemy);
    }
    out
}

impl ChainSearch<'_> {
    /// Occupancy during a chain: friendly pieces minus the mover's origin,
    /// surviving enemies, and the mover on `cur`.
    #[inline]
    fn occupied(&self, cur: Square, enemy: Bitboard) -> Bitboard {
        self.own_others | enemy | Bitboard::from_square(cur)
    }

    /// Extend a man's chain from `cur`. Returns true if any jump extended
    /// the chain; a leaf with no extension emits the accumulated move.
    fn man_jumps(&mut self, cur: Square, enemy: Bitboard) -> bool {
        let mut extended = false;
        for dir in Direction::forward(self.side) {
            let Some(over) = self.tables.neighbor(cur, dir) else {
                continue;
            };
            if !enemy.is_set(over) {
                continue;
            }
            let Some(land) = self.tables.neighbor(over, dir) else {
                continue;
            };
            if self.occupied(cur, enemy).is_set(land) {
                continue;
            }
            extended = true;
            self.chain.push(over);
            let survivors = enemy.without(over);
            if land.is_promotion_for(self.side) {
                // Promotion ends the chain even if further jumps exist.
                self.out
                    .push(Move::capture(self.origin, land, self.chain.clone(), true));
            } else if !self.man_jumps(land, survivors) {
                self.out
                    .push(Move::capture(self.origin, land, self.chain.clone(), false));
            }
            self.chain.pop();
        }
        extended
    }

    /// Extend a king's chain from `cur`: slide over empties, jump exactly
    /// one enemy, land immediately beyond it.
    fn king_jumps(&mut self, cur: Square, enemy: Bitboard) -> bool {
        let mut extended = false;
        for dir in Direction::ALL {
            let occupied = self.occupied(cur, enemy).without(cur);
            let mut over = None;
            for sq in self.tables.ray(cur, dir) {
                if occupied.is_set(sq) {
                    over = Some(sq);
                    break;
                }
            }
            // The first blocker must be an enemy, with an empty square
            // immediately beyond it.
            let Some(over) = over else { continue };
            if !enemy.is_set(over) {
                continue;
            }
            let Some(land) = self.tables.neighbor(over, dir) else {
                continue;
            };
            if occupied.is_set(land) {
                continue;
            }
            extended = true;
            self.chain.push(over);
            let survivors = enemy.without(over);
            if !self.king_jumps(land, survivors) {
                self.out
                    .push(Move::capture(self.origin, land, self.chain.clone(), false));
            }
            self.chain.pop();
        }
        extended
    }
}

// =========================================================================
// Quiet generation
// =========================================================================

fn quiet_moves_for(pos: &Position, side: Side) -> Vec<Move> {
    let tables = steps::tables();
    let occupied = pos.occupied();
    let mut out = Vec::new();

    for from in pos.pieces(side, Piece::Man).iter() {
        for dir in Direction::forward(side) {
            if let Some(to) = tables.neighbor(from, dir)
                && !occupied.is_set(to)
            {
                out.push(Move::quiet(from, to, to.is_promotion_for(side)));
            }
        }
    }

    for from in pos.pieces(side, Piece::King).iter() {
        for dir in Direction::ALL {
            for to in tables.ray(from, dir) {
                if occupied.is_set(to) {
                    break;
                }
                out.push(Move::quiet(from, to, false));
            }
        }
    }

    out
}

// =========================================================================
// Tests
// =========================================================================
