//! Iterative-deepening-free DFS search engine (§4.6): enumerates up to `L`
//! move sequences of exactly `D` plies turning `start` into `target`.
//!
//! The source algorithm recurses one stack frame per ply; this crate
//! mirrors the teacher's preference for explicit, non-recursive state
//! machines (see [`cesso_engine::search::pool`] for the analogous
//! iterative-deepening driver there) with a frame stack, since `D` can run
//! past native recursion limits.

use proof_core::{file_rank_to_sq, Color, HandPieceKind, Move, MoveOrigin, Position};

use crate::cost::{hand_distance, need_moves_count};
use crate::error::SearchError;
use crate::tt::{LookupResult, TranspositionTable};
use crate::validate::{adjust_target_turn, is_move_touching_fixed_piece, validate_piece_counts};

/// Counters accumulated over one [`find_all_paths_to_target`] call.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total nodes visited (every call into the per-node TT-lookup step).
    pub nodes_expanded: u64,
    /// Moves skipped because the need-moves heuristic exceeded the
    /// available plies for one side.
    pub pruned_by_need: u64,
    /// Moves skipped because Black's hand-distance lower bound exceeded
    /// Black's available plies.
    pub pruned_by_hand_black: u64,
    /// Moves skipped because White's hand-distance lower bound exceeded
    /// White's available plies.
    pub pruned_by_hand_white: u64,
    /// Count of pruned branches (any reason), indexed by the depth of the
    /// node that would have been explored.
    pub pruned_per_depth: Vec<u64>,
    /// Total transposition-table lookups performed.
    pub tt_lookups: u64,
    /// Total transposition-table hits.
    pub tt_hits: u64,
    /// Total fresh transposition-table inserts.
    pub tt_stores: u64,
    /// Total transposition-table in-place updates.
    pub tt_updates: u64,
    /// Total transposition-table evictions.
    pub tt_evictions: u64,
    /// Final transposition-table entry count.
    pub tt_final_size: usize,
    /// Transposition-table capacity (entries).
    pub tt_capacity: usize,
}

impl SearchStats {
    fn record_prune(&mut self, depth: u32) {
        let depth = depth as usize;
        if self.pruned_per_depth.len() <= depth {
            self.pruned_per_depth.resize(depth + 1, 0);
        }
        self.pruned_per_depth[depth] += 1;
    }
}

/// Parses one USI move string (`"7g7f"`, `"7g7f+"`, or a drop `"P*5e"`)
/// into a [`Move`]. Returns `None` for anything malformed; used only to
/// resolve a `DEBUG_SOL_START`/`DEBUG_SOL_END` trace path, never for
/// ordinary move generation.
fn parse_usi_move(s: &str) -> Option<Move> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    let rank_from_letter = |c: char| -> Option<u8> {
        if ('a'..='i').contains(&c) {
            Some(c as u8 - b'a' + 1)
        } else {
            None
        }
    };
    if chars[1] == '*' {
        let kind = match chars[0] {
            'P' => HandPieceKind::Pawn,
            'L' => HandPieceKind::Lance,
            'N' => HandPieceKind::Knight,
            'S' => HandPieceKind::Silver,
            'G' => HandPieceKind::Gold,
            'B' => HandPieceKind::Bishop,
            'R' => HandPieceKind::Rook,
            _ => return None,
        };
        let to_file = chars[2].to_digit(10)? as u8;
        let to_rank = rank_from_letter(chars[3])?;
        return Some(Move {
            from: MoveOrigin::Drop(kind),
            to: file_rank_to_sq(to_file, to_rank),
            promote: false,
        });
    }
    let from_file = chars[0].to_digit(10)? as u8;
    let from_rank = rank_from_letter(chars[1])?;
    let to_file = chars[2].to_digit(10)? as u8;
    let to_rank = rank_from_letter(chars[3])?;
    Some(Move {
        from: MoveOrigin::Board(file_rank_to_sq(from_file, from_rank)),
        to: file_rank_to_sq(to_file, to_rank),
        promote: chars.get(4) == Some(&'+'),
    })
}

/// Whether `path` is still a prefix of `debug_path` (empty `debug_path`
/// always reports `false`, since there's nothing to trace).
fn on_debug_path(path: &[Move], debug_path: &[Move]) -> bool {
    !debug_path.is_empty() && path.len() <= debug_path.len() && path == &debug_path[..path.len()]
}

/// `(avail_mover, avail_other)` distributed as `((R+1)/2, R/2)`, returned
/// as `(avail_black, avail_white)` depending on which side moves next.
fn split_remaining(remain: u32, side_to_move: Color) -> (u32, u32) {
    let mover = (remain + 1) / 2;
    let other = remain / 2;
    match side_to_move {
        Color::Black => (mover, other),
        Color::White => (other, mover),
    }
}

enum NodeOutcome {
    /// The transposition table already proved this node fails.
    Pruned,
    /// Reached full depth without matching the target.
    Failure,
    /// Reached full depth and matched the target.
    Success,
    /// Not a terminal node; here are its legal moves.
    Expand(Frame),
}

struct Frame {
    depth: u32,
    remain: u32,
    hash: u64,
    moves: Vec<Move>,
    cursor: usize,
    child_found: bool,
}

fn enter_node(
    board: &Position,
    depth: u32,
    max_depth: u32,
    target: &Position,
    tt: &mut TranspositionTable,
    margin: u32,
    stats: &mut SearchStats,
) -> Result<NodeOutcome, SearchError> {
    stats.nodes_expanded += 1;
    let remain = max_depth - depth;
    let hash = board.hash();

    stats.tt_lookups += 1;
    if let LookupResult::Hit = tt.lookup(hash, remain, margin) {
        stats.tt_hits += 1;
        return Ok(NodeOutcome::Pruned);
    }

    if depth == max_depth {
        if hash == target.hash() {
            return Ok(NodeOutcome::Success);
        }
        tt.store(hash, 0);
        return Ok(NodeOutcome::Failure);
    }

    let moves = board.legal_moves()?;
    Ok(NodeOutcome::Expand(Frame {
        depth,
        remain,
        hash,
        moves,
        cursor: 0,
        child_found: false,
    }))
}

/// Enumerates up to `limit` move sequences of exactly `max_depth` plies
/// that transform `start` into `target`.
///
/// Performs the §4.7 preconditions up front (turn-parity fixup on a local
/// copy of `target`, piece-count conservation, two-king sanity), then runs
/// the depth-limited DFS of §4.6 over an explicit frame stack.
///
/// `debug_solution`, if given, is a known USI move sequence (from a
/// problem file's `DEBUG_SOL_START`/`DEBUG_SOL_END` block); whenever the
/// search is about to prune a node that lies on this path, it logs the
/// resulting position hash and the pruning reason at `trace` level.
/// Unparseable entries are skipped rather than rejected, since this is a
/// diagnostic aid, not a correctness input.
pub fn find_all_paths_to_target(
    start: &Position,
    target: &Position,
    max_depth: u32,
    limit: usize,
    fixed_squares: &[u8],
    tt_memory_bytes: usize,
    margin: u32,
    debug_solution: Option<&[String]>,
) -> Result<(Vec<Vec<Move>>, SearchStats), SearchError> {
    let mut target = *target;
    if adjust_target_turn(start, &mut target, max_depth) {
        tracing::info!("target side-to-move adjusted for turn parity");
    }
    validate_piece_counts(start, &target)?;
    start
        .validate_king_count()
        .and_then(|()| target.validate_king_count())
        .map_err(|_| crate::error::ValidationError::MissingKing)?;

    let debug_path: Vec<Move> = debug_solution
        .unwrap_or(&[])
        .iter()
        .filter_map(|s| parse_usi_move(s))
        .collect();

    let mut stats = SearchStats::default();
    let mut tt = TranspositionTable::new(tt_memory_bytes);
    let mut solutions: Vec<Vec<Move>> = Vec::new();
    let mut board = *start;
    let mut path: Vec<Move> = Vec::new();
    let mut undo_stack: Vec<Position> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();

    match enter_node(&board, 0, max_depth, &target, &mut tt, margin, &mut stats)? {
        NodeOutcome::Pruned | NodeOutcome::Failure => {
            return Ok((solutions, finish_stats(stats, &tt)));
        }
        NodeOutcome::Success => {
            solutions.push(Vec::new());
            return Ok((solutions, finish_stats(stats, &tt)));
        }
        NodeOutcome::Expand(frame) => frames.push(frame),
    }

    'outer: while let Some(top) = frames.len().checked_sub(1) {
        if frames[top].cursor >= frames[top].moves.len() {
            if !frames[top].child_found {
                tt.store(frames[top].hash, frames[top].remain);
            }
            let child_found = frames[top].child_found;
            frames.pop();
            if let Some(undo) = undo_stack.pop() {
                board.undo_move(undo);
                path.pop();
            }
            if let Some(parent) = frames.last_mut() {
                parent.child_found |= child_found;
            }
            continue;
        }

        let mv = frames[top].moves[frames[top].cursor];
        frames[top].cursor += 1;
        let child_depth = frames[top].depth + 1;
        let parent_remain = frames[top].remain;

        if is_move_touching_fixed_piece(&mv, fixed_squares) {
            continue;
        }

        let undo = board.apply_move(mv);
        path.push(mv);

        let path_is_debug_path = on_debug_path(&path, &debug_path);

        let (avail_black, avail_white) =
            split_remaining(parent_remain - 1, board.side_to_move());
        let (need_black, need_white) = need_moves_count(&board, &target);
        if need_black > avail_black || need_white > avail_white {
            stats.pruned_by_need += 1;
            stats.record_prune(child_depth);
            if path_is_debug_path {
                tracing::trace!(hash = board.hash(), "known solution pruned by need-moves heuristic");
            }
            board.undo_move(undo);
            path.pop();
            continue;
        }

        let hand_black = hand_distance(&board, &target, Color::Black);
        let hand_white = hand_distance(&board, &target, Color::White);
        if hand_black > avail_black {
            stats.pruned_by_hand_black += 1;
            stats.record_prune(child_depth);
            if path_is_debug_path {
                tracing::trace!(hash = board.hash(), "known solution pruned by Black hand-distance heuristic");
            }
            board.undo_move(undo);
            path.pop();
            continue;
        }
        if hand_white > avail_white {
            stats.pruned_by_hand_white += 1;
            stats.record_prune(child_depth);
            if path_is_debug_path {
                tracing::trace!(hash = board.hash(), "known solution pruned by White hand-distance heuristic");
            }
            board.undo_move(undo);
            path.pop();
            continue;
        }

        match enter_node(&board, child_depth, max_depth, &target, &mut tt, margin, &mut stats)? {
            NodeOutcome::Pruned | NodeOutcome::Failure => {
                if path_is_debug_path {
                    tracing::trace!(
                        hash = board.hash(),
                        "known solution pruned by transposition table or full-depth mismatch"
                    );
                }
                board.undo_move(undo);
                path.pop();
            }
            NodeOutcome::Success => {
                solutions.push(path.clone());
                frames[top].child_found = true;
                board.undo_move(undo);
                path.pop();
                if solutions.len() >= limit {
                    break 'outer;
                }
            }
            NodeOutcome::Expand(frame) => {
                undo_stack.push(undo);
                frames.push(frame);
            }
        }
    }

    Ok((solutions, finish_stats(stats, &tt)))
}

fn finish_stats(mut stats: SearchStats, tt: &TranspositionTable) -> SearchStats {
    stats.tt_stores = tt.stores();
    stats.tt_updates = tt.updates();
    stats.tt_evictions = tt.evictions();
    stats.tt_final_size = tt.len();
    stats.tt_capacity = tt.capacity();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTPOS: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    #[test]
    fn zero_depth_identical_positions_has_one_empty_solution() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let target = Position::from_sfen(STARTPOS).unwrap();
        let (solutions, _) =
            find_all_paths_to_target(&start, &target, 0, 1, &[], 1 << 20, 0, None).unwrap();
        assert_eq!(solutions, vec![Vec::<Move>::new()]);
    }

    #[test]
    fn one_ply_pawn_push_has_exactly_one_solution() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut target = Position::from_sfen(STARTPOS).unwrap();
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        target.apply_move(mv);
        let (solutions, _) =
            find_all_paths_to_target(&start, &target, 1, 1, &[], 1 << 20, 0, None).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], vec![mv]);
    }

    #[test]
    fn one_ply_pawn_push_is_found_even_with_a_matching_debug_path() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut target = Position::from_sfen(STARTPOS).unwrap();
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        target.apply_move(mv);
        let debug = ["7g7f".to_string()];
        let (solutions, _) =
            find_all_paths_to_target(&start, &target, 1, 1, &[], 1 << 20, 0, Some(&debug))
                .unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], vec![mv]);
    }

    #[test]
    fn unreachable_one_ply_target_has_zero_solutions() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut target = Position::from_sfen(STARTPOS).unwrap();
        // No single ply can place a black rook on 55 from the opening position.
        target.set_piece(file_rank_to_sq(2, 8), None);
        target.set_piece(
            file_rank_to_sq(5, 5),
            Some(proof_core::Piece::new(
                proof_core::PieceKind::Rook,
                Color::Black,
            )),
        );
        let (solutions, stats) =
            find_all_paths_to_target(&start, &target, 1, 1, &[], 1 << 20, 0, None).unwrap();
        assert!(solutions.is_empty());
        assert!(stats.tt_final_size >= 1);
    }

    #[test]
    fn fixed_square_blocks_the_only_path_through_it() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut target = Position::from_sfen(STARTPOS).unwrap();
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        target.apply_move(mv);
        let fixed = [file_rank_to_sq(7, 7)];
        let (solutions, _) =
            find_all_paths_to_target(&start, &target, 1, 1, &fixed, 1 << 20, 0, None).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn mismatched_piece_counts_reject_before_search() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut target = Position::from_sfen(STARTPOS).unwrap();
        target.set_piece(file_rank_to_sq(1, 9), None);
        let result = find_all_paths_to_target(&start, &target, 1, 1, &[], 1 << 20, 0, None);
        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn parse_usi_move_reads_board_moves_and_promotion() {
        let mv = parse_usi_move("7g7f").unwrap();
        assert_eq!(mv.from, MoveOrigin::Board(file_rank_to_sq(7, 7)));
        assert_eq!(mv.to, file_rank_to_sq(7, 6));
        assert!(!mv.promote);

        let promo = parse_usi_move("2c2b+").unwrap();
        assert!(promo.promote);
    }

    #[test]
    fn parse_usi_move_reads_drops() {
        let mv = parse_usi_move("P*5e").unwrap();
        assert_eq!(mv.from, MoveOrigin::Drop(HandPieceKind::Pawn));
        assert_eq!(mv.to, file_rank_to_sq(5, 5));
    }

    #[test]
    fn parse_usi_move_rejects_garbage() {
        assert!(parse_usi_move("").is_none());
        assert!(parse_usi_move("xyz").is_none());
    }

    #[test]
    fn on_debug_path_matches_only_an_exact_prefix() {
        let mv_a = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        let mv_b = Move {
            from: MoveOrigin::Board(file_rank_to_sq(3, 3)),
            to: file_rank_to_sq(3, 4),
            promote: false,
        };
        let debug_path = vec![mv_a, mv_b];
        assert!(on_debug_path(&[], &debug_path));
        assert!(on_debug_path(&[mv_a], &debug_path));
        assert!(on_debug_path(&[mv_a, mv_b], &debug_path));
        assert!(!on_debug_path(&[mv_b], &debug_path));
        assert!(!on_debug_path(&[], &[]));
    }
}
