//! Time-bounded alpha-beta search with iterative deepening.
//!
//! The driver deepens from 1 up to `MAX_DEPTH`, re-searching each depth
//! inside an aspiration window around the previous score. The interior
//! search is a principal-variation search with transposition table,
//! killer/history move ordering, late-move reduction, a small extension
//! budget for forcing lines, and a capture-only quiescence at the horizon.
//! Before any depth is searched, a root finisher scan looks for short
//! forced wins under maximum-capture play and short-circuits the search
//! when one exists.
//!
//! Time control is cooperative: the wall-clock deadline is polled at every
//! recursive entry and every inspected move, and the driver discards any
//! depth whose root pass did not complete.

use std::time::Duration;

use crate::ai::clock::SearchClock;
use crate::ai::evaluation::{self, INF, MATE};
use crate::ai::tt::{Bound, Entry, TranspositionTable};
use crate::engine::board::Position;
use crate::engine::movegen::legal_moves;
use crate::engine::types::Move;

/// Hard ply cap for the recursion.
pub const MAX_PLY: i32 = 96;

/// Absolute iterative-deepening depth cap.
pub const MAX_DEPTH: i32 = 22;

/// Score reported when the root finisher scan proves a short forced win.
pub const FINISHER_SCORE: i32 = 900_000;

const ASPIRATION_WINDOW: i32 = 80;
const ASPIRATION_STEP: i32 = 160;
const HISTORY_SIZE: usize = 1024;

/// Piece-count gate for the deeper (3-ply) finisher check; the 2-ply check
/// always runs. Verifying 3-ply forced wins costs two extra levels of move
/// generation per root move, which only pays off once the board is nearly
/// empty.
const FINISHER_DEEP_SCAN_PIECES: u32 = 8;

// =========================================================================
// Public results
// =========================================================================

/// Progress report passed to the `on_info` callback after each completed
/// iteration.
#[derive(Clone, Debug)]
pub struct SearchInfo {
    pub depth: i32,
    /// Score from the mover's perspective.
    pub score: i32,
    /// Nodes searched so far in this invocation.
    pub nodes: u64,
    /// Principal variation recovered from the transposition table.
    pub pv: Vec<Move>,
}

/// Final result of one `iterative_deepening` invocation.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Best move found; `None` only when the root has no legal moves.
    pub best: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    /// Deepest fully completed iteration.
    pub depth: i32,
}

// =========================================================================
// Iterative deepening driver
// =========================================================================

/// Search `root` for up to `budget` wall-clock time, reusing `tt` across
/// invocations when the caller keeps it alive.
pub fn iterative_deepening(
    root: &Position,
    budget: Duration,
    tt: &mut TranspositionTable,
    mut on_info: Option<&mut dyn FnMut(&SearchInfo)>,
) -> SearchOutcome {
    let clock = SearchClock::new(budget);
    let root_moves = legal_moves(root);
    if root_moves.is_empty() {
        return SearchOutcome {
            best: None,
            score: -MATE,
            nodes: 0,
            depth: 0,
        };
    }

    // The inactivity test runs at the root only: interior nodes may carry
    // an irrelevantly reset clock, so testing it there would fabricate
    // draws mid-line.
    if root.is_draw_by_inactivity() {
        return SearchOutcome {
            best: Some(root_moves[0].clone()),
            score: 0,
            nodes: 0,
            depth: 0,
        };
    }

    let mut searcher = Searcher::new(tt, clock);

    // Root finisher scan: a proven short win ends the search outright.
    let root_infos = searcher.analyze_root_moves(root, &root_moves);
    if let Some(info) = root_infos.iter().find(|i| i.fw2 || i.fw3) {
        tracing::debug!(best = %info.mv, "finisher scan found a forced win");
        return SearchOutcome {
            best: Some(info.mv.clone()),
            score: FINISHER_SCORE,
            nodes: searcher.nodes,
            depth: 1,
        };
    }

    // Rank root moves once; the per-depth windowed passes reuse the order.
    let mut ordered = root_infos;
    ordered.sort_by_key(|i| std::cmp::Reverse(i.order));

    let ext_budget = initial_extension_budget(root);

    let mut best: Option<Move> = None;
    let mut best_score = 0;
    let mut last_score = 0;
    let mut completed_depth = 0;

    'deepening: for depth in 1..=MAX_DEPTH {
        let (mut alpha, mut beta) = if depth == 1 {
            (-INF, INF)
        } else {
            (last_score - ASPIRATION_WINDOW, last_score + ASPIRATION_WINDOW)
        };

        // Aspiration: re-search with a widened window on fail-low/high.
        let result = loop {
            match searcher.root_search(root, &ordered, depth, alpha, beta, ext_budget) {
                None => break 'deepening, // deadline: discard this depth
                Some(result) => {
                    if result.score <= alpha {
                        alpha -= ASPIRATION_STEP;
                    } else if result.score >= beta {
                        beta += ASPIRATION_STEP;
                    } else {
                        break result;
                    }
                }
            }
        };

        best = Some(result.best);
        best_score = result.score;
        last_score = result.score;
        completed_depth = depth;

        tracing::debug!(
            depth,
            score = best_score,
            nodes = searcher.nodes,
            "iteration complete"
        );
        if let Some(callback) = on_info.as_mut() {
            let pv = extract_pv(searcher.tt, root, depth);
            callback(&SearchInfo {
                depth,
                score: best_score,
                nodes: searcher.nodes,
                pv,
            });
        }

        if clock.expired() {
            break;
        }
    }

    let nodes = searcher.nodes;
    SearchOutcome {
        // A legal root always yields a move, even when no depth completed.
        best: best.or_else(|| Some(root_moves[0].clone())),
        score: best_score,
        nodes,
        depth: completed_depth,
    }
}

/// Walk TT best moves from the root to recover the principal variation,
/// stopping on a missing entry or a move absent from the legal set.
fn extract_pv(tt: &TranspositionTable, root: &Position, max_len: i32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut pos = root.clone();
    for _ in 0..max_len {
        let legal = legal_moves(&pos);
        let Some(mv) = tt.best_move(pos.hash(), &legal) else {
            break;
        };
        let mv = mv.clone();
        pos = pos.apply_move(&mv);
        pv.push(mv);
    }
    pv
}

/// Forcing lines may extend the search; the budget bounds how often.
/// King endings with very few pieces get one extra extension.
fn initial_extension_budget(root: &Position) -> i32 {
    let kings_only = root.white_men.is_empty() && root.black_men.is_empty();
    let kings = (root.white_kings | root.black_kings).pop_count();
    if kings_only && kings <= 3 { 2 } else { 1 }
}

// =========================================================================
// Root move analysis
// =========================================================================

/// Per-root-move facts gathered before the first iteration.
struct RootMove {
    mv: Move,
    /// Forced win in two plies.
    fw2: bool,
    /// Forced win in three plies.
    fw3: bool,
    /// Mobility-drop bonus from the reply count, already scaled.
    mobility_bonus: i32,
    /// Static ordering score.
    order: i32,
}

/// Does the mover at `pos` have a move that immediately ends the game?
fn has_immediate_win(pos: &Position) -> bool {
    legal_moves(pos)
        .iter()
        .any(|m| legal_moves(&pos.apply_move(m)).is_empty())
}

/// After our move, is the opponent lost within two plies whatever they do?
fn is_forced_win_in_two(after: &Position) -> bool {
    let replies = legal_moves(after);
    replies.is_empty()
        || replies
            .iter()
            .all(|r| has_immediate_win(&after.apply_move(r)))
}

/// After our move, can we force the win in three plies: every reply admits
/// a response after which every further reply leaves the position won.
fn is_forced_win_in_three(after: &Position) -> bool {
    let replies = legal_moves(after);
    if replies.is_empty() {
        return true;
    }
    replies.iter().all(|r| {
        let p = after.apply_move(r);
        legal_moves(&p)
            .iter()
            .any(|s| is_forced_win_in_two(&p.apply_move(s)))
    })
}

// =========================================================================
// Searcher
// =========================================================================

/// Result of one windowed root pass.
struct RootResult {
    best: Move,
    score: i32,
}

/// Mutable search state for a single driver invocation. Killers and history
/// are fresh per invocation; the TT is caller-owned and may persist.
struct Searcher<'a> {
    tt: &'a mut TranspositionTable,
    clock: SearchClock,
    nodes: u64,
    /// Two killer move keys per ply.
    killers: [[u16; 2]; MAX_PLY as usize],
    /// History scores indexed by the 10-bit packed move key.
    history: [i32; HISTORY_SIZE],
}

impl<'a> Searcher<'a> {
    fn new(tt: &'a mut TranspositionTable, clock: SearchClock) -> Self {
        Searcher {
            tt,
            clock,
            nodes: 0,
            killers: [[0; 2]; MAX_PLY as usize],
            history: [0; HISTORY_SIZE],
        }
    }

    // -------------------------------------------------------------------
    // Root ordering and finisher facts
    // -------------------------------------------------------------------

    fn analyze_root_moves(&mut self, root: &Position, moves: &[Move]) -> Vec<RootMove> {
        let root_hash = root.hash();
        let deep_scan = root.total_pieces() <= FINISHER_DEEP_SCAN_PIECES;

        moves
            .iter()
            .map(|mv| {
                let after = root.apply_move(mv);
                let replies = legal_moves(&after);

                let fw2 = replies.is_empty()
                    || replies
                        .iter()
                        .all(|r| has_immediate_win(&after.apply_move(r)));
                let fw3 = !fw2 && deep_scan && is_forced_win_in_three(&after);

                let kings_only = after.white_men.is_empty() && after.black_men.is_empty();
                let total_kings = (after.white_kings | after.black_kings).pop_count();
                let scale = if kings_only {
                    if total_kings <= 3 { 6 } else { 4 }
                } else {
                    2
                };
                let mobility_bonus = (12 - replies.len() as i32).max(0) * scale;
                let leaves_capture = replies.iter().any(|r| r.is_capture());

                let mut order = if fw2 {
                    1_000_000
                } else if fw3 {
                    900_000
                } else {
                    0
                };
                order += mobility_bonus;
                if leaves_capture && !(fw2 || fw3) {
                    order -= 200;
                }
                // Deterministic 3-bit tiebreak keeps equal moves in a
                // reproducible order.
                order += ((root_hash ^ mv.key() as u32) & 7) as i32;

                RootMove {
                    mv: mv.clone(),
                    fw2,
                    fw3,
                    mobility_bonus,
                    order,
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------
    // Root search
    // -------------------------------------------------------------------

    /// One windowed pass over the ordered root moves. Returns `None` when
    /// the deadline cut the pass short (the driver discards the depth).
    fn root_search(
        &mut self,
        root: &Position,
        ordered: &[RootMove],
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ext_budget: i32,
    ) -> Option<RootResult> {
        let orig_alpha = alpha;
        let total_moves = ordered.len();
        let mut best_score = -INF;
        let mut best_selection = -INF;
        let mut best_move: Option<&Move> = None;

        for (index, info) in ordered.iter().enumerate() {
            if self.clock.expired() {
                return None;
            }
            let child = root.apply_move(&info.mv);
            let child_moves = legal_moves(&child);

            let (d, budget) =
                extend_depth(depth, ext_budget, total_moves, root, &child_moves);
            let (d, reduced) = reduce_late_move(d, index, &info.mv, total_moves, &child_moves);

            let score = self.search_move(&child, depth, d, reduced, index, alpha, beta, 1, budget);
            if self.clock.expired() {
                return None;
            }

            // Finisher and mobility-drop bonuses steer which move is kept,
            // without touching the score reported upward.
            let selection = score
                + if info.fw2 || info.fw3 { 500 } else { 0 }
                + info.mobility_bonus.min(100);
            if selection > best_selection {
                best_selection = selection;
                best_move = Some(&info.mv);
            }
            best_score = best_score.max(score);
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                break;
            }
        }

        let best = best_move.expect("root has moves").clone();
        let bound = if best_score <= orig_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(Entry {
            key: root.hash(),
            depth,
            score: best_score,
            mv: best.key(),
            bound,
        });

        Some(RootResult {
            best,
            score: best_score,
        })
    }

    // -------------------------------------------------------------------
    // Interior search
    // -------------------------------------------------------------------

    fn alphabeta(
        &mut self,
        pos: &Position,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        ply: i32,
        ext_budget: i32,
    ) -> i32 {
        self.nodes += 1;
        if ply >= MAX_PLY || self.clock.expired() {
            return evaluation::evaluate(pos);
        }
        if depth <= 0 {
            return self.quiesce(pos, alpha, beta, ply);
        }

        // TT probe: a sufficiently deep entry can resolve this node or
        // tighten the window.
        let key = pos.hash();
        let mut tt_move_key = 0u16;
        if let Some(entry) = self.tt.probe(key) {
            tt_move_key = entry.mv;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        let mut moves = legal_moves(pos);
        if moves.is_empty() {
            return -(MATE - ply);
        }
        self.order_moves(&mut moves, ply, tt_move_key);

        let total_moves = moves.len();
        let orig_alpha = alpha;
        let mut best = -INF;
        let mut best_move_key = 0u16;

        for (index, mv) in moves.iter().enumerate() {
            if self.clock.expired() {
                break;
            }
            let child = pos.apply_move(mv);
            let child_moves = legal_moves(&child);

            let (d, budget) = extend_depth(depth, ext_budget, total_moves, pos, &child_moves);
            let (d, reduced) = reduce_late_move(d, index, mv, total_moves, &child_moves);

            let score =
                self.search_move(&child, depth, d, reduced, index, alpha, beta, ply + 1, budget);

            if score > best {
                best = score;
                best_move_key = mv.key();
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                // Beta cutoff: remember the refutation.
                if !mv.is_capture() {
                    self.push_killer(ply, mv.key());
                }
                self.history[mv.key() as usize & (HISTORY_SIZE - 1)] += depth * depth;
                break;
            }
        }

        if best == -INF {
            // Deadline expired before any move was searched.
            return evaluation::evaluate(pos);
        }

        let bound = if best <= orig_alpha {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(Entry {
            key,
            depth,
            score: best,
            mv: best_move_key,
            bound,
        });
        best
    }

    /// Principal-variation move loop body shared by the root and interior
    /// searches: full window for the first move, null window plus targeted
    /// re-searches for the rest.
    #[allow(clippy::too_many_arguments)]
    fn search_move(
        &mut self,
        child: &Position,
        depth: i32,
        d: i32,
        reduced: bool,
        index: usize,
        alpha: i32,
        beta: i32,
        child_ply: i32,
        budget: i32,
    ) -> i32 {
        if index == 0 {
            return -self.alphabeta(child, d, -beta, -alpha, child_ply, budget);
        }
        let mut score = -self.alphabeta(child, d, -(alpha + 1), -alpha, child_ply, budget);
        if score > alpha && reduced {
            // The reduction failed high: repeat at full depth and window.
            score = -self.alphabeta(child, depth - 1, -beta, -alpha, child_ply, budget);
        } else if score > alpha && score < beta {
            // Null-window hit inside the window: confirm with a full one.
            score = -self.alphabeta(child, depth - 1, -beta, -alpha, child_ply, budget);
        }
        score
    }

    // -------------------------------------------------------------------
    // Quiescence
    // -------------------------------------------------------------------

    /// Resolve capture sequences at the horizon. At a capture-free position
    /// this returns the static evaluation exactly.
    fn quiesce(&mut self, pos: &Position, mut alpha: i32, beta: i32, ply: i32) -> i32 {
        self.nodes += 1;
        if ply >= MAX_PLY || self.clock.expired() {
            return evaluation::evaluate(pos);
        }

        let stand = evaluation::evaluate(pos);
        if stand >= beta {
            return stand;
        }
        if stand > alpha {
            alpha = stand;
        }

        let mut captures: Vec<Move> = legal_moves(pos)
            .into_iter()
            .filter(|m| m.is_capture())
            .collect();
        captures.sort_by_key(|m| std::cmp::Reverse(m.captured.len()));

        for mv in &captures {
            let child = pos.apply_move(mv);
            let score = -self.quiesce(&child, -beta, -alpha, ply + 1);
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    // -------------------------------------------------------------------
    // Move ordering, killers, history
    // -------------------------------------------------------------------

    fn order_moves(&self, moves: &mut [Move], ply: i32, tt_move_key: u16) {
        let killers = self.killers[ply as usize];
        moves.sort_by_cached_key(|mv| {
            let key = mv.key();
            let mut score = 0i32;
            if tt_move_key != 0 && key == tt_move_key {
                score += 1_000_000;
            }
            if mv.is_capture() {
                score += 10_000 * mv.captured.len() as i32;
            }
            if killers[0] != 0 && key == killers[0] {
                score += 5_000;
            } else if killers[1] != 0 && key == killers[1] {
                score += 4_000;
            }
            score += self.history[key as usize & (HISTORY_SIZE - 1)];
            if mv.promote && !mv.is_capture() {
                score += 1_500;
            }
            -score
        });
    }

    fn push_killer(&mut self, ply: i32, key: u16) {
        let slot = &mut self.killers[ply as usize];
        if slot[0] == key {
            return;
        }
        slot[1] = slot[0];
        slot[0] = key;
    }
}

// =========================================================================
// Depth adjustments
// =========================================================================

/// Apply the extension rules: a sole reply extends, and (with budget left)
/// so does a sparse board, a child with captures pending, or a child with a
/// single reply. Returns the adjusted depth and the budget handed to the
/// child, with the depth clamped to `[0, depth]`.
fn extend_depth(
    depth: i32,
    ext_budget: i32,
    total_moves: usize,
    pos: &Position,
    child_moves: &[Move],
) -> (i32, i32) {
    let mut budget = ext_budget;
    let mut d = depth - 1;
    if budget > 0 && total_moves == 1 {
        budget -= 1;
        d += 1;
    }
    if budget > 0
        && (pos.total_pieces() <= 5
            || child_moves.iter().any(|m| m.is_capture())
            || child_moves.len() == 1)
    {
        budget -= 1;
        d += 1;
    }
    (d.clamp(0, depth), budget)
}

/// Late-move reduction: trim one ply off late, quiet, unforcing moves.
fn reduce_late_move(
    d: i32,
    index: usize,
    mv: &Move,
    total_moves: usize,
    child_moves: &[Move],
) -> (i32, bool) {
    if index >= 3 && !mv.is_capture() && d >= 2 && total_moves > 2 && child_moves.len() != 1 {
        ((d - 1).max(0), true)
    } else {
        (d, false)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Side, Square};

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

    fn search_ms(pos: &Position, millis: u64) -> SearchOutcome {
        let mut tt = TranspositionTable::new();
        iterative_deepening(pos, Duration::from_millis(millis), &mut tt, None)
    }

    #[test]
    fn finds_a_move_from_the_start() {
        let outcome = search_ms(&Position::starting(), 100);
        let best = outcome.best.expect("start has moves");
        assert!(legal_moves(&Position::starting()).contains(&best));
        assert!(outcome.depth >= 1);
        assert!(outcome.nodes > 0);
    }

    #[test]
    fn no_move_on_terminal_root() {
        // Black to move with no pieces at all.
        let mut pos = Position::empty();
        pos.white_men.set(Square(24));
        pos.side_to_move = Side::Black;
        let outcome = search_ms(&pos, 50);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.score, -MATE);
        assert_eq!(outcome.depth, 0);
    }

    #[test]
    fn root_inactivity_draw_scores_zero() {
        let mut pos = pos_with(&[], &[28, 30], &[], &[1, 3], Side::White);
        pos.halfmove_clock = 20;
        let outcome = search_ms(&pos, 50);
        assert_eq!(outcome.score, 0);
        assert!(outcome.best.is_some());
    }

    #[test]
    fn zero_budget_still_returns_a_legal_move() {
        let outcome = search_ms(&Position::starting(), 0);
        let best = outcome.best.expect("start has moves");
        assert!(legal_moves(&Position::starting()).contains(&best));
    }

    #[test]
    fn finisher_scan_finds_a_forced_win() {
        // White king on 29 can seal the black man in with 29-25, and 20-17
        // wins by forcing 16-20 into the king's diagonal; either way the
        // scan must prove a win without searching.
        let pos = pos_with(&[20], &[29], &[16], &[], Side::White);
        let outcome = search_ms(&pos, 100);
        assert_eq!(outcome.score, FINISHER_SCORE);
        let best = outcome.best.unwrap();
        let after = pos.apply_move(&best);
        assert!(is_forced_win_in_two(&after), "{best} is not a forced win");
    }

    #[test]
    fn forced_win_in_two_detected_through_forced_recapture() {
        // 30->27 blocks the double jump down to a single forced capture,
        // which White answers by taking Black's last piece.
        let after = pos_with(&[10, 13, 22, 27], &[], &[9], &[], Side::Black);
        assert!(is_forced_win_in_two(&after));
    }

    #[test]
    fn quiescence_equals_evaluation_without_captures() {
        let pos = Position::starting();
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        assert_eq!(
            searcher.quiesce(&pos, -INF, INF, 0),
            evaluation::evaluate(&pos)
        );
    }

    #[test]
    fn quiescence_resolves_a_hanging_exchange() {
        // White to move captures a free man: quiescence must see at least
        // the static eval after the exchange, not the naive stand-pat.
        let pos = pos_with(&[24], &[], &[20, 4], &[], Side::White);
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        let q = searcher.quiesce(&pos, -INF, INF, 0);
        let stand = evaluation::evaluate(&pos);
        assert!(q >= stand);
    }

    #[test]
    fn lost_positions_score_as_mate_minus_ply() {
        // Black to move, stuck: alphabeta at the stuck node returns
        // -(MATE - ply).
        let pos = pos_with(&[20, 25], &[], &[16], &[], Side::Black);
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        assert_eq!(searcher.alphabeta(&pos, 3, -INF, INF, 2, 1), -(MATE - 2));
    }

    #[test]
    fn killers_rank_quiet_refutations_first() {
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        let pos = Position::starting();
        let mut moves = legal_moves(&pos);
        let killer = moves[4].clone();
        searcher.push_killer(3, killer.key());
        searcher.order_moves(&mut moves, 3, 0);
        assert_eq!(moves[0], killer);
    }

    #[test]
    fn killer_slots_demote() {
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        searcher.push_killer(0, 11);
        searcher.push_killer(0, 11); // repeat is a no-op
        assert_eq!(searcher.killers[0], [11, 0]);
        searcher.push_killer(0, 22);
        assert_eq!(searcher.killers[0], [22, 11]);
    }

    #[test]
    fn tt_move_ordered_first() {
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        let pos = Position::starting();
        let mut moves = legal_moves(&pos);
        let tt_mv_key = moves[5].key();
        searcher.order_moves(&mut moves, 0, tt_mv_key);
        assert_eq!(moves[0].key(), tt_mv_key);
    }

    #[test]
    fn extension_budget_depends_on_root_material() {
        let men = Position::starting();
        assert_eq!(initial_extension_budget(&men), 1);
        let kings = pos_with(&[], &[18], &[], &[0, 3], Side::White);
        assert_eq!(initial_extension_budget(&kings), 2);
        let many_kings = pos_with(&[], &[18, 22], &[], &[0, 3], Side::White);
        assert_eq!(initial_extension_budget(&many_kings), 1);
    }

    #[test]
    fn extend_depth_consumes_budget_and_clamps() {
        let pos = pos_with(&[24], &[], &[4, 6], &[], Side::White);
        // Sparse board (3 pieces): one extension, capped at `depth`.
        let quiet_child: Vec<Move> = vec![Move::quiet(Square(4), Square(9), false)];
        let (d, budget) = extend_depth(4, 1, 5, &pos, &quiet_child);
        assert_eq!((d, budget), (4, 0));
        // Sole legal move plus sparse board: both fire, still capped.
        let (d, budget) = extend_depth(4, 2, 1, &pos, &quiet_child);
        assert_eq!((d, budget), (4, 0));
        // No budget: plain depth - 1.
        let (d, budget) = extend_depth(4, 0, 5, &pos, &quiet_child);
        assert_eq!((d, budget), (3, 0));
    }

    #[test]
    fn lmr_only_reduces_late_quiet_unforcing_moves() {
        let quiet = Move::quiet(Square(24), Square(20), false);
        let capture = Move::capture(Square(24), Square(17), vec![Square(20)], false);
        let children = vec![
            Move::quiet(Square(4), Square(8), false),
            Move::quiet(Square(4), Square(9), false),
        ];
        assert_eq!(reduce_late_move(3, 4, &quiet, 6, &children), (2, true));
        // Early index: no reduction.
        assert_eq!(reduce_late_move(3, 1, &quiet, 6, &children), (3, false));
        // Captures: no reduction.
        assert_eq!(reduce_late_move(3, 4, &capture, 6, &children), (3, false));
        // Shallow: no reduction.
        assert_eq!(reduce_late_move(1, 4, &quiet, 6, &children), (1, false));
        // Forced child: no reduction.
        let forced = vec![Move::quiet(Square(4), Square(8), false)];
        assert_eq!(reduce_late_move(3, 4, &quiet, 6, &forced), (3, false));
    }

    #[test]
    fn deeper_search_reports_progress() {
        let mut tt = TranspositionTable::new();
        let mut depths = Vec::new();
        let mut on_info = |info: &SearchInfo| depths.push(info.depth);
        let outcome = iterative_deepening(
            &Position::starting(),
            Duration::from_millis(200),
            &mut tt,
            Some(&mut on_info),
        );
        assert!(!depths.is_empty());
        assert!(depths.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*depths.last().unwrap(), outcome.depth);
    }

    #[test]
    fn pv_starts_with_the_best_move() {
        let mut tt = TranspositionTable::new();
        let mut pv0: Option<Move> = None;
        let mut on_info = |info: &SearchInfo| pv0 = info.pv.first().cloned();
        let outcome = iterative_deepening(
            &Position::starting(),
            Duration::from_millis(200),
            &mut tt,
            Some(&mut on_info),
        );
        assert_eq!(pv0, outcome.best);
    }

    #[test]
    fn reused_tt_accumulates_entries() {
        let mut tt = TranspositionTable::new();
        let pos = Position::starting();
        iterative_deepening(&pos, Duration::from_millis(50), &mut tt, None);
        let after_first = tt.len();
        assert!(after_first > 0);
        iterative_deepening(&pos, Duration::from_millis(50), &mut tt, None);
        assert!(tt.len() >= after_first);
    }

    #[test]
    fn search_sees_a_simple_two_for_one() {
        // White down the exchange unless it plays the double jump.
        let pos = pos_with(&[24], &[], &[20, 13, 4], &[], Side::White);
        let outcome = search_ms(&pos, 100);
        let best = outcome.best.unwrap();
        assert_eq!(best.captured, vec![Square(20), Square(13)]);
    }

    #[test]
    fn killer_indexing_stays_in_bounds_at_max_ply() {
        let mut tt = TranspositionTable::new();
        let mut searcher = Searcher::new(&mut tt, SearchClock::from_millis(10_000));
        // Ply at the cap returns a static eval rather than indexing.
        let pos = Position::starting();
        let v = searcher.alphabeta(&pos, 3, -INF, INF, MAX_PLY, 1);
        assert_eq!(v, evaluation::evaluate(&pos));
    }
}
