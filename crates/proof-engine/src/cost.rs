//! Position cost estimator (§4.4): aggregates per-piece reach costs into a
//! per-side lower bound on the number of own-plies still needed to turn
//! `current` into `target`.

use proof_core::{
    file_rank, in_prom_zone, is_promoted, major_promoted_cost, minor_promoted_cost, rotate_sq,
    unpromoted_move_cost, Color, HandPieceKind, Piece, PieceKind, Position, UNREACHABLE,
};

/// Per-square cost breakdown produced while aggregating [`need_moves_count`].
/// Transient — recomputed on every heuristic call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCost {
    /// The target piece that must appear on `sq`.
    pub piece: Piece,
    /// The piece's owning side.
    pub owner: Color,
    /// The square the discrepancy is at.
    pub sq: u8,
    /// Minimum plies to create this piece on `sq` by dropping (and, for
    /// promoted targets, promoting) it.
    pub make_cost: u32,
    /// Minimum plies to move an existing board piece to become this piece
    /// on `sq`.
    pub move_cost: u32,
}

fn prom_zone_entry_rank(owner: Color) -> u8 {
    match owner {
        Color::Black => 3,
        Color::White => 7,
    }
}

fn prom_zone_inner_rank(owner: Color) -> u8 {
    match owner {
        Color::Black => 4,
        Color::White => 6,
    }
}

fn normalized_rank(owner: Color, sq: u8) -> u8 {
    file_rank(rotate_sq(owner, sq)).1
}

fn make_cost_waypoint(owner: Color, raw_kind: PieceKind, dst_sq: u8) -> u8 {
    let (dst_file, dst_rank) = file_rank(dst_sq);
    let waypoint_rank = match raw_kind {
        PieceKind::Silver => {
            if in_prom_zone(Color::Black, normalized_rank(owner, dst_sq)) {
                dst_rank
            } else {
                prom_zone_inner_rank(owner)
            }
        }
        _ => prom_zone_entry_rank(owner),
    };
    proof_core::file_rank_to_sq(dst_file, waypoint_rank)
}

fn make_cost_base(owner: Color, raw_kind: PieceKind, dst_sq: u8) -> u32 {
    let norm_rank = normalized_rank(owner, dst_sq) as i32;
    match raw_kind {
        PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight => (norm_rank - 1).max(2) as u32,
        PieceKind::Silver => (norm_rank - 2).max(2) as u32,
        PieceKind::Bishop | PieceKind::Rook => 2,
        _ => UNREACHABLE,
    }
}

/// Computes `(make_cost, move_cost)` for one target square holding a
/// promoted piece.
fn promoted_square_cost(position: &Position, target_piece: Piece, dst_sq: u8) -> (u32, u32) {
    let owner = target_piece.color();
    let raw_kind = target_piece
        .piece_kind()
        .unpromote()
        .unwrap_or(target_piece.piece_kind());

    let is_major = matches!(raw_kind, PieceKind::Bishop | PieceKind::Rook);

    let mut make_cost = make_cost_base(owner, raw_kind, dst_sq);
    if !is_major && make_cost < UNREACHABLE {
        let waypoint = make_cost_waypoint(owner, raw_kind, dst_sq);
        let reaches_waypoint_in_one = position.board().iter().enumerate().any(|(sq, slot)| {
            matches!(slot, Some(p) if p.color() == owner
                && p.piece_kind() == raw_kind
                && unpromoted_move_cost(*p, sq as u8, waypoint) == 1)
        });
        if reaches_waypoint_in_one {
            make_cost = make_cost.saturating_sub(1);
        }
    }
    let mut move_cost = UNREACHABLE;
    for (sq, slot) in position.board().iter().enumerate() {
        let Some(p) = slot else { continue };
        if p.color() != owner {
            continue;
        }
        let same_base = p.piece_kind() == raw_kind
            || p.piece_kind().unpromote() == Some(raw_kind);
        if !same_base {
            continue;
        }
        let cost = if is_major {
            major_promoted_cost(*p, sq as u8, dst_sq)
        } else {
            minor_promoted_cost(*p, sq as u8, dst_sq)
        };
        move_cost = move_cost.min(cost);
    }

    (make_cost, move_cost)
}

/// Computes `(make_cost, move_cost)` for one target square holding a raw
/// (unpromoted) non-king piece.
fn raw_square_cost(position: &Position, target_piece: Piece, dst_sq: u8) -> (u32, u32) {
    let owner = target_piece.color();
    let kind = target_piece.piece_kind();
    let make_cost = 1;
    let mut move_cost = UNREACHABLE;
    for (sq, slot) in position.board().iter().enumerate() {
        let Some(p) = slot else { continue };
        if p.color() == owner && !is_promoted(*p) && p.piece_kind() == kind {
            move_cost = move_cost.min(unpromoted_move_cost(*p, sq as u8, dst_sq));
        }
    }
    (make_cost, move_cost)
}

/// One [`PieceCost`] record per square where `current` disagrees with
/// `target` and `target` has an owner there.
pub fn piece_costs(current: &Position, target: &Position) -> Vec<PieceCost> {
    let mut out = Vec::new();
    for sq in 0..proof_core::NUM_SQUARES as u8 {
        let Some(target_piece) = target.piece_at(sq) else {
            continue;
        };
        if current.piece_at(sq) == Some(target_piece) {
            continue;
        }
        let owner = target_piece.color();
        let (make_cost, move_cost) = if target_piece.piece_kind() == PieceKind::King {
            let cost = current
                .king_square(owner)
                .map(|king_sq| proof_core::chebyshev(king_sq, sq))
                .unwrap_or(0);
            (cost, cost)
        } else if is_promoted(target_piece) {
            promoted_square_cost(current, target_piece, sq)
        } else {
            raw_square_cost(current, target_piece, sq)
        };
        out.push(PieceCost {
            piece: target_piece,
            owner,
            sq,
            make_cost,
            move_cost,
        });
    }
    out
}

/// `(need_black, need_white)`: the admissible lower bound on remaining
/// own-plies each side needs to turn `current` into `target`.
///
/// Per-square contributions are independent lower bounds — this ignores
/// that one board piece could serve multiple target squares and ignores
/// hand availability, but each discrepancy still requires at least one
/// move by its owning side, so the sum remains admissible.
pub fn need_moves_count(current: &Position, target: &Position) -> (u32, u32) {
    let mut need_black = 0u32;
    let mut need_white = 0u32;
    for cost in piece_costs(current, target) {
        let contribution = cost.make_cost.min(cost.move_cost);
        match cost.owner {
            Color::Black => need_black = need_black.saturating_add(contribution),
            Color::White => need_white = need_white.saturating_add(contribution),
        }
    }
    (need_black, need_white)
}

/// Σ|current.hand[color][k] − target.hand[color][k]| over the seven hand
/// kinds — a lower bound on moves driven purely by hand-count mismatch.
pub fn hand_distance(current: &Position, target: &Position, color: Color) -> u32 {
    HandPieceKind::ALL
        .iter()
        .map(|&kind| {
            let a = current.hand_count(color, kind) as i32;
            let b = target.hand_count(color, kind) as i32;
            (a - b).unsigned_abs()
        })
        .sum()
}
