//! Static position evaluation.
//!
//! Returns a score in centipawn-like units from the side-to-move's
//! perspective. Positive = the mover stands better.
//!
//! Components, each contributing `(mover − opponent) × weight`:
//!   material, mobility, center control, promotion progress, back-rank
//!   guards, king proximity, trapped kings, capture swing, simplification,
//!   endgame finishers. Weights blend between opening and endgame via the
//!   phase factor `gp = total_pieces / 16`.

use crate::engine::board::Position;
use crate::engine::movegen::capture_profile;
use crate::engine::steps;
use crate::engine::types::{Direction, Piece, Side};

/// Infinity sentinel. Larger than any realistic eval.
pub const INF: i32 = 10_000_000;

/// Lost-position score base. Actual loss scores are `-(MATE - ply)` so that
/// faster wins score higher.
pub const MATE: i32 = 999_999;

/// Is this score a forced-win (or forced-loss) score?
#[inline]
pub fn is_decisive(score: i32) -> bool {
    score.abs() >= MATE - 1_000
}

// =========================================================================
// Weights
// =========================================================================

const MAN_VALUE: i32 = 100;
const KING_VALUE: i32 = 210;

const MOBILITY_MAN: i32 = 2;
const MOBILITY_KING: i32 = 3;
const CENTER: i32 = 2;
const BACK_RANK_GUARD: i32 = 3;
const KING_PROXIMITY: i32 = 2;
const TRAPPED_KING: i32 = -12;
const CAPTURE_SWING: i32 = 90;
const CAPTURE_TARGETS: i32 = 45;

/// Phase-dependent weight table, resolved once per evaluation.
struct Weights {
    king: i32,
    promote_progress: i32,
    simplification: i32,
    capture_swing: i32,
    capture_targets: i32,
}

impl Weights {
    /// `eg` is the endgame factor in [0, 1]; `leader` tells whether the
    /// mover is materially ahead; `loser_total` is the opponent's piece
    /// count. A leading side values kings less and simplification more as
    /// the endgame nears — the incentive to trade down and finish.
    fn resolve(eg: f64, leader: bool, loser_total: u32) -> Self {
        let mut king = KING_VALUE;
        if eg >= 0.5 && leader {
            king -= 60;
        }
        if eg >= 0.8 && leader && loser_total <= 2 {
            king -= 90;
        }

        let mut simplification = 6;
        if leader {
            simplification += (8.0 * eg).round() as i32;
        }
        if leader && loser_total <= 2 {
            simplification += 10;
        }

        Weights {
            king,
            promote_progress: 6 + (6.0 * eg).round() as i32,
            simplification,
            capture_swing: CAPTURE_SWING + if eg >= 0.7 { 20 } else { 0 },
            capture_targets: CAPTURE_TARGETS + (4.0 * eg).round() as i32,
        }
    }
}

// =========================================================================
// Per-side feature extraction
// =========================================================================

#[derive(Default)]
struct SideFeatures {
    men: i32,
    kings: i32,
    mobility_men: i32,
    mobility_kings: i32,
    center: i32,
    /// Sum over own men of the row distance to promotion.
    promotion_distance: i32,
    back_rank: i32,
    /// `clamp(6 − average Chebyshev distance to nearest enemy, 0, ∞)`,
    /// averaged over own kings.
    king_proximity: i32,
    trapped_kings: i32,
}

fn extract(pos: &Position, side: Side) -> SideFeatures {
    let t = steps::tables();
    let occupied = pos.occupied();
    let men = pos.pieces(side, Piece::Man);
    let kings = pos.pieces(side, Piece::King);
    let enemy = pos.side_pieces(!side);

    let mut f = SideFeatures {
        men: men.pop_count() as i32,
        kings: kings.pop_count() as i32,
        center: ((men | kings) & t.center()).pop_count() as i32,
        back_rank: (men & t.back_rank(side)).pop_count() as i32,
        ..SideFeatures::default()
    };

    for sq in men.iter() {
        for dir in Direction::forward(side) {
            if let Some(to) = t.neighbor(sq, dir)
                && !occupied.is_set(to)
            {
                f.mobility_men += 1;
            }
        }
        f.promotion_distance += match side {
            Side::White => sq.row() as i32,
            Side::Black => 7 - sq.row() as i32,
        };
    }

    let mut proximity_sum = 0i32;
    for sq in kings.iter() {
        let mut exits = 0;
        for dir in Direction::ALL {
            if let Some(to) = t.neighbor(sq, dir)
                && !occupied.is_set(to)
            {
                exits += 1;
            }
        }
        if exits == 0 {
            f.trapped_kings += 1;
        } else {
            f.mobility_kings += exits;
        }

        let mut nearest = i32::MAX;
        for target in enemy.iter() {
            let dr = (sq.row() as i32 - target.row() as i32).abs();
            let dc = (sq.col() as i32 - target.col() as i32).abs();
            nearest = nearest.min(dr.max(dc));
        }
        if nearest != i32::MAX {
            proximity_sum += nearest;
        }
    }
    if f.kings > 0 && enemy.is_not_empty() {
        f.king_proximity = (6 - proximity_sum / f.kings).max(0);
    }

    f
}

// =========================================================================
// Evaluation
// =========================================================================

/// Evaluate a position from the side-to-move's perspective.
pub fn evaluate(pos: &Position) -> i32 {
    let mover = pos.side_to_move;
    let total = pos.total_pieces() as i32;

    let ours = extract(pos, mover);
    let theirs = extract(pos, !mover);

    // Material lead counting a king as two men.
    let our_units = ours.men + 2 * ours.kings;
    let their_units = theirs.men + 2 * theirs.kings;
    let lead = our_units - their_units;
    let leader = lead > 0;
    let their_total = (theirs.men + theirs.kings) as u32;

    let gp = (total as f64 / 16.0).clamp(0.0, 1.0);
    let eg = 1.0 - gp;
    let w = Weights::resolve(eg, leader, their_total);

    let mut score = 0i32;
    score += MAN_VALUE * (ours.men - theirs.men);
    score += w.king * (ours.kings - theirs.kings);
    score += MOBILITY_MAN * (ours.mobility_men - theirs.mobility_men);
    score += MOBILITY_KING * (ours.mobility_kings - theirs.mobility_kings);
    score += CENTER * (ours.center - theirs.center);
    // Shorter distance to promotion is better, so the difference is
    // opponent-minus-us.
    score += w.promote_progress * (theirs.promotion_distance - ours.promotion_distance) / 10;
    score += BACK_RANK_GUARD * (ours.back_rank - theirs.back_rank);
    score += KING_PROXIMITY * (ours.king_proximity - theirs.king_proximity);
    score += TRAPPED_KING * (ours.trapped_kings - theirs.trapped_kings);

    // Capture swing: each side's best capture chain and threatened squares,
    // computed as if that side were to move.
    let our_caps = capture_profile(pos, mover);
    let their_caps = capture_profile(pos, !mover);
    score += w.capture_swing * (our_caps.max_chain as i32 - their_caps.max_chain as i32);
    score += w.capture_targets
        * (our_caps.targets.pop_count() as i32 - their_caps.targets.pop_count() as i32);

    // Simplification: trading down favors whoever is ahead.
    if lead != 0 {
        score += w.simplification * (16 - total) * lead.signum();
    }

    // Endgame finishers.
    if leader && their_total == 1 {
        score += 140;
    }
    if leader && their_total <= 2 {
        score += 70;
    }

    score
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Square;

    fn pos_with(
        white_men: &[u8],
        white_kings: &[u8],
        black_men: &[u8],
        black_kings: &[u8],
        side: Side,
    ) -> Position {
        let mut pos = Position::empty();
        for &s in white_men {
            pos.white_men.set(Square(s));
        }
        for &s in white_kings {
            pos.white_kings.set(Square(s));
        }
        for &s in black_men {
            pos.black_men.set(Square(s));
        }
        for &s in black_kings {
            pos.black_kings.set(Square(s));
        }
        pos.side_to_move = side;
        pos
    }

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate(&Position::starting()), 0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let pos = Position::starting();
        assert_eq!(evaluate(&pos), evaluate(&pos.clone()));
    }

    #[test]
    fn extra_man_is_positive_for_the_mover() {
        // Two white men vs one black man, white to move.
        let pos = pos_with(&[24, 26], &[], &[4], &[], Side::White);
        assert!(evaluate(&pos) > 0);
        // Same board from Black's perspective is negative.
        let pos = pos_with(&[24, 26], &[], &[4], &[], Side::Black);
        assert!(evaluate(&pos) < 0);
    }

    #[test]
    fn king_outweighs_man() {
        let king_side = pos_with(&[], &[24], &[4], &[], Side::White);
        let man_side = pos_with(&[24], &[], &[4], &[], Side::White);
        assert!(evaluate(&king_side) > evaluate(&man_side));
    }

    #[test]
    fn pending_capture_swings_the_score() {
        // White to move can jump 20; the same material with the black man
        // on 16 offers no jump, so the threat must be worth a large part of
        // the deficit.
        let threat = pos_with(&[24], &[], &[20, 4], &[], Side::White);
        let quiet = pos_with(&[24], &[], &[16, 4], &[], Side::White);
        assert!(evaluate(&threat) > evaluate(&quiet) + 100);
    }

    #[test]
    fn promotion_progress_prefers_advanced_men() {
        // A white man two rows from promotion vs one on its home row; the
        // black man is out of reach so no capture term interferes.
        let advanced = pos_with(&[10], &[], &[7], &[], Side::White);
        let home = pos_with(&[28], &[], &[7], &[], Side::White);
        assert!(evaluate(&advanced) > evaluate(&home));
    }

    #[test]
    fn rotated_board_evaluates_identically() {
        // Rotating the board 180° and swapping the sides presents the mover
        // with the same game, so the score must match. Square 31-s is the
        // rotation of square s, which on a u32 bitboard is bit reversal.
        let rotate = |pos: &Position| {
            let mut out = Position::empty();
            out.white_men.0 = pos.black_men.0.reverse_bits();
            out.white_kings.0 = pos.black_kings.0.reverse_bits();
            out.black_men.0 = pos.white_men.0.reverse_bits();
            out.black_kings.0 = pos.white_kings.0.reverse_bits();
            out.side_to_move = !pos.side_to_move;
            out.halfmove_clock = pos.halfmove_clock;
            out
        };
        for pos in [
            Position::starting(),
            pos_with(&[24, 26], &[18], &[4, 9], &[0], Side::White),
            pos_with(&[20], &[29], &[16], &[], Side::White),
        ] {
            assert_eq!(
                evaluate(&pos),
                evaluate(&rotate(&pos)),
                "rotation symmetry broken for:\n{}",
                pos.board_string()
            );
        }
    }

    #[test]
    fn trapped_king_is_penalised() {
        // Same material, no captures for either side: a centralized king
        // versus one boxed into the corner. The man on 22 blocks the jump
        // over 27 that the cornered king would otherwise have.
        let free = pos_with(&[], &[18], &[22, 26, 27], &[], Side::White);
        let trapped = pos_with(&[], &[31], &[22, 26, 27], &[], Side::White);
        assert!(evaluate(&free) > evaluate(&trapped));
    }

    #[test]
    fn leader_likes_simplification() {
        // White up a man: fewer total pieces scores higher for White.
        let many = pos_with(&[24, 25, 26, 27], &[], &[4, 5, 6], &[], Side::White);
        let few = pos_with(&[24, 25], &[], &[4], &[], Side::White);
        assert!(evaluate(&few) > evaluate(&many));
    }

    #[test]
    fn finisher_bonus_when_opponent_is_down_to_one() {
        let two_left = pos_with(&[24, 25, 26], &[], &[4, 5], &[], Side::White);
        let one_left = pos_with(&[24, 25, 26], &[], &[4], &[], Side::White);
        assert!(evaluate(&one_left) > evaluate(&two_left));
    }

    #[test]
    fn decisive_scores() {
        assert!(is_decisive(MATE));
        assert!(is_decisive(-(MATE - 50)));
        assert!(!is_decisive(5_000));
    }
}
