//! Zobrist hashing for position identification.
//!
//! Each piece class (White man, White king, Black man, Black king) gets one
//! random 32-bit key per square; one extra key marks White to move. The
//! position hash is the XOR of all applicable keys. 32-bit collisions are
//! accepted — the transposition table verifies entries by key equality and
//! never bypasses legal-move generation.

use crate::engine::board::Position;
use crate::engine::types::{Piece, Side, Square};

/// Number of piece classes: side × piece kind.
const CLASSES: usize = 4;

// ---------------------------------------------------------------------------
// ZobristKeys — immutable singleton
// ---------------------------------------------------------------------------

/// Pre-computed Zobrist random keys (generated once at startup via `OnceLock`).
pub struct ZobristKeys {
    /// piece\[class\]\[square\] — random key for a piece of a class on a square.
    pub piece: [[u32; Square::NUM]; CLASSES],
    /// XOR this when it is White's turn to move.
    pub side_to_move: u32,
}

/// Static singleton holding the Zobrist keys (initialised once).
static ZOBRIST: std::sync::OnceLock<ZobristKeys> = std::sync::OnceLock::new();

/// Get a reference to the global Zobrist keys.
pub fn keys() -> &'static ZobristKeys {
    ZOBRIST.get_or_init(ZobristKeys::init)
}

/// Array index for a piece class.
#[inline]
pub fn class_index(side: Side, piece: Piece) -> usize {
    side.index() * 2 + piece.index()
}

impl ZobristKeys {
    /// Generate all keys using a deterministic PRNG seeded with a fixed value.
    /// Using a fixed seed ensures reproducible hashes across runs.
    fn init() -> Self {
        let mut rng = Xorshift64::new(0x9E37_79B9_7F4A_7C15); // golden ratio

        let mut piece = [[0u32; Square::NUM]; CLASSES];
        for class in &mut piece {
            for sq in class {
                *sq = rng.next_u32();
            }
        }

        let side_to_move = rng.next_u32();

        ZobristKeys {
            piece,
            side_to_move,
        }
    }

    /// Key for a specific piece on a specific square.
    #[inline]
    pub fn piece_key(&self, side: Side, piece: Piece, sq: Square) -> u32 {
        self.piece[class_index(side, piece)][sq.0 as usize]
    }
}

/// Hash a position from scratch. A pure function of the position.
pub fn hash_position(pos: &Position) -> u32 {
    let zk = keys();
    let mut hash = 0u32;

    for side in [Side::White, Side::Black] {
        for piece in [Piece::Man, Piece::King] {
            for sq in pos.pieces(side, piece).iter() {
                hash ^= zk.piece_key(side, piece, sq);
            }
        }
    }

    if pos.side_to_move == Side::White {
        hash ^= zk.side_to_move;
    }

    hash
}

// ---------------------------------------------------------------------------
// Deterministic PRNG (xorshift64)
// ---------------------------------------------------------------------------

/// Minimal xorshift64 PRNG — deterministic, fast, good distribution.
struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        // Ensure state is never zero (xorshift zero → always zero).
        Xorshift64 {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
