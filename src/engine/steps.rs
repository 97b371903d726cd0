//! Pre-computed step tables for move generation and evaluation.
//!
//! All tables are initialised once (via `OnceLock`) and live for the lifetime
//! of the process. On a 32-square board a full neighbor table is tiny; rays
//! are walked lazily through it rather than stored.

use crate::engine::types::{Bitboard, Direction, Side, Square};
use std::sync::OnceLock;

// =========================================================================
// Public API
// =========================================================================

/// Get a reference to the global step tables.
pub fn tables() -> &'static StepTables {
    static TABLES: OnceLock<StepTables> = OnceLock::new();
    TABLES.get_or_init(StepTables::init)
}

/// Pre-computed adjacency and region masks for the 32 dark squares.
pub struct StepTables {
    /// `neighbor[square][direction]` — the adjacent dark square, if any.
    neighbor: [[Option<Square>; 4]; 32],
    /// Squares whose (row, col) both lie in [2, 5].
    center: Bitboard,
    /// `promotion[side]` — the four promotion squares for each side.
    promotion: [Bitboard; 2],
    /// `back_rank[side]` — each side's own back row.
    back_rank: [Bitboard; 2],
}

impl StepTables {
    /// The adjacent dark square one step from `sq` in `dir`, or `None`
    /// when the step leaves the board.
    #[inline]
    pub fn neighbor(&self, sq: Square, dir: Direction) -> Option<Square> {
        self.neighbor[sq.0 as usize][dir.index()]
    }

    /// Lazy ray traversal: successive squares from `sq` in `dir`, excluding
    /// `sq` itself, until the board edge.
    #[inline]
    pub fn ray(&self, sq: Square, dir: Direction) -> RayIter<'_> {
        RayIter {
            tables: self,
            cur: Some(sq),
            dir,
        }
    }

    /// Central region mask (rows and columns 2..=5).
    #[inline]
    pub fn center(&self) -> Bitboard {
        self.center
    }

    /// The four promotion squares for `side`.
    #[inline]
    pub fn promotion(&self, side: Side) -> Bitboard {
        self.promotion[side.index()]
    }

    /// The back rank guarded by `side`'s men.
    #[inline]
    pub fn back_rank(&self, side: Side) -> Bitboard {
        self.back_rank[side.index()]
    }
}

/// Iterator walking a diagonal ray square by square.
pub struct RayIter<'a> {
    tables: &'a StepTables,
    cur: Option<Square>,
    dir: Direction,
}

impl Iterator for RayIter<'_> {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let next = self.tables.neighbor(self.cur?, self.dir);
        self.cur = next;
        next
    }
}

// =========================================================================
// Initialisation
// =========================================================================

impl StepTables {
    fn init() -> Self {
        let mut neighbor = [[None; 4]; 32];
        for idx in 0..32u8 {
            let sq = Square(idx);
            let (row, col) = (sq.row() as i8, sq.col() as i8);
            for dir in Direction::ALL {
                let (dr, dc) = dir.delta();
                neighbor[idx as usize][dir.index()] = Square::from_row_col(row + dr, col + dc);
            }
        }

        let mut center = Bitboard::EMPTY;
        for idx in 0..32u8 {
            let sq = Square(idx);
            if (2..=5).contains(&sq.row()) && (2..=5).contains(&sq.col()) {
                center.set(sq);
            }
        }

        let mut promotion = [Bitboard::EMPTY; 2];
        let mut back_rank = [Bitboard::EMPTY; 2];
        for side in [Side::White, Side::Black] {
            for idx in 0..32u8 {
                let sq = Square(idx);
                if sq.row() == side.promotion_row() {
                    promotion[side.index()].set(sq);
                }
                if sq.row() == side.back_row() {
                    back_rank[side.index()].set(sq);
                }
            }
        }

        StepTables {
            neighbor,
            center,
            promotion,
            back_rank,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
