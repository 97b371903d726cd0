//! Bitboard-based position representation.
//!
//! `Position` stores piece placement as four 32-bit bitboards (2 sides ×
//! 2 piece kinds), the side to move, and the halfmove clock (quiet plies
//! since the last capture). Positions are immutable values: `apply_move`
//! returns a new position and never mutates its receiver.

use crate::engine::types::{Bitboard, Move, Piece, Side, Square};
use crate::engine::zobrist;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete Makhos position.
///
/// Invariants upheld by construction and by `apply_move`:
/// - the four bitboards are pairwise disjoint;
/// - White men never sit on row 0, Black men never on row 7 (promotion is
///   atomic within a move);
/// - `halfmove_clock` is zero immediately after any capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub white_men: Bitboard,
    pub white_kings: Bitboard,
    pub black_men: Bitboard,
    pub black_kings: Bitboard,
    pub side_to_move: Side,
    /// Quiet (non-capture) plies since the last capture.
    pub halfmove_clock: u16,
}

/// Quiet-ply threshold for the inactivity draw.
const INACTIVITY_PLIES: u16 = 20;

/// Piece threshold per side for the inactivity draw.
const INACTIVITY_PIECES: u32 = 2;

impl Position {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// An empty board, White to move.
    pub fn empty() -> Self {
        Position {
            white_men: Bitboard::EMPTY,
            white_kings: Bitboard::EMPTY,
            black_men: Bitboard::EMPTY,
            black_kings: Bitboard::EMPTY,
            side_to_move: Side::White,
            halfmove_clock: 0,
        }
    }

    /// Standard starting position: Black men on squares 0..7 (top two rows),
    /// White men on squares 24..31 (bottom two rows), White to move.
    pub fn starting() -> Self {
        Position {
            white_men: Bitboard(0xFF00_0000),
            white_kings: Bitboard::EMPTY,
            black_men: Bitboard(0x0000_00FF),
            black_kings: Bitboard::EMPTY,
            side_to_move: Side::White,
            halfmove_clock: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Bitboard of pieces of one side and kind.
    #[inline]
    pub fn pieces(&self, side: Side, piece: Piece) -> Bitboard {
        match (side, piece) {
            (Side::White, Piece::Man) => self.white_men,
            (Side::White, Piece::King) => self.white_kings,
            (Side::Black, Piece::Man) => self.black_men,
            (Side::Black, Piece::King) => self.black_kings,
        }
    }

    /// All pieces of one side.
    #[inline]
    pub fn side_pieces(&self, side: Side) -> Bitboard {
        match side {
            Side::White => self.white_men | self.white_kings,
            Side::Black => self.black_men | self.black_kings,
        }
    }

    /// Combined occupancy of both sides.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.white_men | self.white_kings | self.black_men | self.black_kings
    }

    /// Pieces of the side to move.
    #[inline]
    pub fn friendly(&self) -> Bitboard {
        self.side_pieces(self.side_to_move)
    }

    /// Pieces of the opponent of the side to move.
    #[inline]
    pub fn enemy(&self) -> Bitboard {
        self.side_pieces(!self.side_to_move)
    }

    /// What piece (if any) is on a given square?
    pub fn piece_at(&self, sq: Square) -> Option<(Side, Piece)> {
        let bb = Bitboard::from_square(sq);
        if (self.white_men & bb).is_not_empty() {
            Some((Side::White, Piece::Man))
        } else if (self.white_kings & bb).is_not_empty() {
            Some((Side::White, Piece::King))
        } else if (self.black_men & bb).is_not_empty() {
            Some((Side::Black, Piece::Man))
        } else if (self.black_kings & bb).is_not_empty() {
            Some((Side::Black, Piece::King))
        } else {
            None
        }
    }

    /// Piece count for one side.
    #[inline]
    pub fn count(&self, side: Side) -> u32 {
        self.side_pieces(side).pop_count()
    }

    /// Total pieces on the board.
    #[inline]
    pub fn total_pieces(&self) -> u32 {
        self.occupied().pop_count()
    }

    /// Zobrist hash of this position.
    #[inline]
    pub fn hash(&self) -> u32 {
        zobrist::hash_position(self)
    }

    // -----------------------------------------------------------------------
    // Terminal tests
    // -----------------------------------------------------------------------

    /// Either side has no pieces left. (A side to move with pieces but no
    /// legal moves has also lost; that case is detected by the caller via
    /// `legal_moves`.)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.count(Side::White) == 0 || self.count(Side::Black) == 0
    }

    /// Draw by inactivity: each side has at most two pieces and at least
    /// twenty quiet plies have passed since the last capture.
    #[inline]
    pub fn is_draw_by_inactivity(&self) -> bool {
        self.halfmove_clock >= INACTIVITY_PLIES
            && self.count(Side::White) <= INACTIVITY_PIECES
            && self.count(Side::Black) <= INACTIVITY_PIECES
    }

    // -----------------------------------------------------------------------
    // Apply move
    // -----------------------------------------------------------------------

    /// Apply a move, producing the successor position.
    ///
    /// The move must have been produced by `legal_moves` on this position;
    /// behavior is unspecified otherwise.
    pub fn apply_move(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        let us = self.side_to_move;
        let from_bb = Bitboard::from_square(mv.from);
        let to_bb = Bitboard::from_square(mv.to);

        // Move the piece within its own class, promoting a man that ends on
        // its promotion row.
        match us {
            Side::White => {
                if (next.white_men & from_bb).is_not_empty() {
                    next.white_men &= !from_bb;
                    if mv.promote {
                        next.white_kings |= to_bb;
                    } else {
                        next.white_men |= to_bb;
                    }
                } else {
                    next.white_kings &= !from_bb;
                    next.white_kings |= to_bb;
                }
            }
            Side::Black => {
                if (next.black_men & from_bb).is_not_empty() {
                    next.black_men &= !from_bb;
                    if mv.promote {
                        next.black_kings |= to_bb;
                    } else {
                        next.black_men |= to_bb;
                    }
                } else {
                    next.black_kings &= !from_bb;
                    next.black_kings |= to_bb;
                }
            }
        }

        // Remove every captured piece, man or king.
        for &cap in &mv.captured {
            let cap_bb = !Bitboard::from_square(cap);
            match us {
                Side::White => {
                    next.black_men &= cap_bb;
                    next.black_kings &= cap_bb;
                }
                Side::Black => {
                    next.white_men &= cap_bb;
                    next.white_kings &= cap_bb;
                }
            }
        }

        next.side_to_move = !us;
        next.halfmove_clock = if mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };

        #[cfg(any(debug_assertions, test))]
        next.assert_consistent();

        next
    }

    // -----------------------------------------------------------------------
    // Consistency check (debug builds)
    // -----------------------------------------------------------------------

    /// Verify the bitboards are pairwise disjoint and no man sits on its
    /// promotion row. Available in debug and test builds.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        let boards = [
            self.white_men,
            self.white_kings,
            self.black_men,
            self.black_kings,
        ];
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!(
                    (boards[i] & boards[j]).is_empty(),
                    "bitboards {i} and {j} overlap:\n{}",
                    self.board_string(),
                );
            }
        }
        assert!(
            (self.white_men & crate::engine::steps::tables().promotion(Side::White)).is_empty(),
            "white man on promotion row:\n{}",
            self.board_string(),
        );
        assert!(
            (self.black_men & crate::engine::steps::tables().promotion(Side::Black)).is_empty(),
            "black man on promotion row:\n{}",
            self.board_string(),
        );
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (row 0 at top), useful for
    /// debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(160);
        for row in 0..8 {
            for col in 0..8 {
                let ch = match Square::from_row_col(row, col) {
                    Some(sq) => match self.piece_at(sq) {
                        Some((side, piece)) => piece.to_char(side),
                        None => '.',
                    },
                    None => ' ',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
