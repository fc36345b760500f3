//! Per-piece reach cost (§4.3): how many plies it takes a piece to get from
//! one square to another, possibly promoting along the way.
//!
//! Every routine here is side-aware directly (it takes the piece's actual
//! owner and un-rotated squares) rather than requiring the caller to
//! pre-normalize. Internally, deltas are rotated to Black's perspective via
//! [`crate::geometry::rotate_sq`] before the closed-form formulas — which
//! are all written for Black — are applied.

use shogi_core::{Color, Piece, PieceKind};

use crate::geometry::{chebyshev, file_rank, in_prom_zone, manhattan, rotate_sq};
use crate::movement::{
    can_move_as_bishop, can_move_as_prom_bishop, can_move_as_prom_rook, can_move_as_rook,
};
use crate::piece::is_promoted;

/// Sentinel standing in for "unreachable under any budget we care about".
/// Any value `>= UNREACHABLE` should be treated as infeasible.
pub const UNREACHABLE: u32 = 100;

fn normalized_delta(owner: Color, src_sq: u8, dst_sq: u8) -> (i32, i32) {
    let (sf, sr) = file_rank(rotate_sq(owner, src_sq));
    let (df_, dr_) = file_rank(rotate_sq(owner, dst_sq));
    (df_ as i32 - sf as i32, dr_ as i32 - sr as i32)
}

fn normalized_rank(owner: Color, sq: u8) -> u8 {
    file_rank(rotate_sq(owner, sq)).1
}

/// Gold-pattern travel distance: Chebyshev while advancing (diagonal steps
/// are available going forward), Manhattan while retreating (a gold/promoted
/// minor can't step diagonally backward).
pub fn minor_p_distance(owner: Color, src_sq: u8, dst_sq: u8) -> u32 {
    let (_, dr) = normalized_delta(owner, src_sq, dst_sq);
    if dr < 0 {
        chebyshev(src_sq, dst_sq)
    } else {
        manhattan(src_sq, dst_sq)
    }
}

/// Plies for `piece` (assumed raw) to travel `src_sq` -> `dst_sq` without
/// promoting along the way.
pub fn unpromoted_move_cost(piece: Piece, src_sq: u8, dst_sq: u8) -> u32 {
    let owner = piece.color();
    let (df, dr) = normalized_delta(owner, src_sq, dst_sq);
    match piece.piece_kind() {
        PieceKind::Rook => {
            if can_move_as_rook(df, dr) {
                1
            } else {
                2
            }
        }
        PieceKind::Bishop => {
            if can_move_as_bishop(df, dr) {
                1
            } else if (df + dr).rem_euclid(2) == 0 {
                2
            } else {
                UNREACHABLE
            }
        }
        PieceKind::Gold => minor_p_distance(owner, src_sq, dst_sq),
        PieceKind::Silver => {
            if dr < 0 && dr.abs() >= df.abs() {
                minor_p_distance(owner, src_sq, dst_sq)
            } else if (df + dr).rem_euclid(2) == 0 {
                df.abs().max(dr.abs()) as u32
            } else {
                ((dr.abs() + 1).max(df.abs()) + 1) as u32
            }
        }
        PieceKind::Knight => match (df.abs(), dr) {
            (1, -2) => 1,
            (0, -4) | (2, -4) => 2,
            (1, -6) | (3, -6) => 3,
            _ => UNREACHABLE,
        },
        PieceKind::Lance => {
            if df == 0 && dr < 0 {
                1
            } else {
                UNREACHABLE
            }
        }
        PieceKind::Pawn => {
            if df == 0 && dr < 0 {
                (-dr) as u32
            } else {
                UNREACHABLE
            }
        }
        PieceKind::King => chebyshev(src_sq, dst_sq),
        _ => UNREACHABLE,
    }
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

/// Plies for a minor piece (silver/knight/lance/pawn), raw or already
/// promoted, to end at `dst_sq` as its **promoted** form.
pub fn minor_promoted_cost(piece: Piece, src_sq: u8, dst_sq: u8) -> u32 {
    let owner = piece.color();
    if is_promoted(piece) {
        return minor_p_distance(owner, src_sq, dst_sq);
    }
    let (dst_file, dst_rank) = file_rank(dst_sq);
    let waypoint_rank = match piece.piece_kind() {
        PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight => prom_zone_entry_rank(owner),
        PieceKind::Silver => {
            if in_prom_zone(owner, dst_rank) {
                dst_rank
            } else {
                prom_zone_inner_rank(owner)
            }
        }
        _ => return UNREACHABLE,
    };
    let waypoint = crate::geometry::file_rank_to_sq(dst_file, waypoint_rank);
    let to_waypoint = unpromoted_move_cost(piece, src_sq, waypoint);
    let from_waypoint = minor_p_distance(owner, waypoint, dst_sq);
    to_waypoint + from_waypoint
}

fn rook_cascade(owner: Color, src_sq: u8, dst_sq: u8) -> u32 {
    let (df, dr) = normalized_delta(owner, src_sq, dst_sq);
    if can_move_as_prom_rook(df, dr) {
        1
    } else {
        2
    }
}

fn rook_to_prom_cascade(owner: Color, src_sq: u8, dst_sq: u8) -> u32 {
    let src_rank = normalized_rank(owner, src_sq);
    let dst_rank = normalized_rank(owner, dst_sq);
    let (df, dr) = normalized_delta(owner, src_sq, dst_sq);
    if in_prom_zone(Color::Black, src_rank) || in_prom_zone(Color::Black, dst_rank) {
        return if can_move_as_rook(df, dr) { 1 } else { 2 };
    }
    if df.abs() == 1 && dst_rank == 4 {
        2
    } else if df == 0 {
        2
    } else {
        3
    }
}

fn one_step_bishop_offset(df: i32, dr: i32) -> bool {
    can_move_as_bishop(df, dr - 1) || can_move_as_bishop(df, dr + 1)
}

fn bishop_cascade(owner: Color, src_sq: u8, dst_sq: u8) -> u32 {
    let (df, dr) = normalized_delta(owner, src_sq, dst_sq);
    if can_move_as_prom_bishop(df, dr) {
        1
    } else if (df + dr).rem_euclid(2) == 0 || one_step_bishop_offset(df, dr) {
        2
    } else {
        3
    }
}

fn all_bishop_reachable(src_sq: u8) -> Vec<u8> {
    (0..crate::geometry::NUM_SQUARES as u8)
        .filter(|&sq| {
            if sq == src_sq {
                return false;
            }
            let (sf, sr) = file_rank(src_sq);
            let (df_, dr_) = file_rank(sq);
            can_move_as_bishop(df_ as i32 - sf as i32, dr_ as i32 - sr as i32)
        })
        .collect()
}

fn bishop_reachable_in_zone(owner: Color, src_sq: u8) -> Vec<u8> {
    all_bishop_reachable(src_sq)
        .into_iter()
        .filter(|&sq| in_prom_zone(Color::Black, normalized_rank(owner, sq)))
        .collect()
}

fn bishop_to_prom_cascade(owner: Color, src_sq: u8, dst_sq: u8) -> u32 {
    let src_rank = normalized_rank(owner, src_sq);
    let dst_rank = normalized_rank(owner, dst_sq);
    if in_prom_zone(Color::Black, src_rank) || in_prom_zone(Color::Black, dst_rank) {
        return bishop_cascade(owner, src_sq, dst_sq);
    }
    let one_hop = bishop_reachable_in_zone(owner, src_sq);
    if let Some(best) = one_hop
        .iter()
        .map(|&sq| 1 + bishop_cascade(owner, sq, dst_sq))
        .min()
    {
        return best;
    }
    let mut best = UNREACHABLE;
    for mid in all_bishop_reachable(src_sq) {
        for sq in bishop_reachable_in_zone(owner, mid) {
            best = best.min(2 + bishop_cascade(owner, sq, dst_sq));
        }
    }
    best
}

/// Plies for a major piece (bishop/rook, raw or promoted) to end at
/// `dst_sq` as its promoted form.
pub fn major_promoted_cost(piece: Piece, src_sq: u8, dst_sq: u8) -> u32 {
    let owner = piece.color();
    match piece.piece_kind() {
        PieceKind::Rook => rook_to_prom_cascade(owner, src_sq, dst_sq),
        PieceKind::ProRook => rook_cascade(owner, src_sq, dst_sq),
        PieceKind::Bishop => bishop_to_prom_cascade(owner, src_sq, dst_sq),
        PieceKind::ProBishop => bishop_cascade(owner, src_sq, dst_sq),
        _ => UNREACHABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::file_rank_to_sq;

    fn black(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Black)
    }

    #[test]
    fn rook_move_cost_is_one_or_two() {
        let rook = black(PieceKind::Rook);
        let src = file_rank_to_sq(5, 5);
        assert_eq!(unpromoted_move_cost(rook, src, file_rank_to_sq(5, 1)), 1);
        assert_eq!(unpromoted_move_cost(rook, src, file_rank_to_sq(3, 3)), 2);
    }

    #[test]
    fn bishop_move_cost_respects_color_parity() {
        let bishop = black(PieceKind::Bishop);
        let src = file_rank_to_sq(5, 5);
        assert_eq!(unpromoted_move_cost(bishop, src, file_rank_to_sq(7, 7)), 1);
        assert_eq!(unpromoted_move_cost(bishop, src, file_rank_to_sq(8, 4)), 2);
        assert_eq!(
            unpromoted_move_cost(bishop, src, file_rank_to_sq(6, 5)),
            UNREACHABLE
        );
    }

    #[test]
    fn pawn_cost_is_forward_distance_only() {
        let pawn = black(PieceKind::Pawn);
        let src = file_rank_to_sq(5, 7);
        assert_eq!(unpromoted_move_cost(pawn, src, file_rank_to_sq(5, 4)), 3);
        assert_eq!(
            unpromoted_move_cost(pawn, src, file_rank_to_sq(5, 9)),
            UNREACHABLE
        );
    }

    #[test]
    fn knight_cost_steps_by_distance_band() {
        let knight = black(PieceKind::Knight);
        let src = file_rank_to_sq(5, 9);
        assert_eq!(unpromoted_move_cost(knight, src, file_rank_to_sq(4, 7)), 1);
        assert_eq!(unpromoted_move_cost(knight, src, file_rank_to_sq(5, 5)), 2);
        assert_eq!(unpromoted_move_cost(knight, src, file_rank_to_sq(6, 3)), 3);
    }

    #[test]
    fn king_cost_is_chebyshev() {
        let king = black(PieceKind::King);
        let src = file_rank_to_sq(5, 9);
        assert_eq!(
            unpromoted_move_cost(king, src, file_rank_to_sq(7, 7)),
            chebyshev(src, file_rank_to_sq(7, 7))
        );
    }

    #[test]
    fn minor_promoted_cost_already_promoted_uses_minor_p_distance() {
        let tokin = black(PieceKind::ProPawn);
        let src = file_rank_to_sq(5, 3);
        let dst = file_rank_to_sq(6, 2);
        assert_eq!(
            minor_promoted_cost(tokin, src, dst),
            minor_p_distance(Color::Black, src, dst)
        );
    }

    #[test]
    fn minor_promoted_cost_waypoints_raw_pawn_through_prom_zone() {
        let pawn = black(PieceKind::Pawn);
        let src = file_rank_to_sq(5, 9);
        let dst = file_rank_to_sq(5, 1);
        let cost = minor_promoted_cost(pawn, src, dst);
        assert!(cost >= 6 && cost < UNREACHABLE);
    }

    #[test]
    fn major_promoted_cost_rook_already_in_zone_is_cheap() {
        let rook = black(PieceKind::Rook);
        let src = file_rank_to_sq(5, 2);
        let dst = file_rank_to_sq(5, 1);
        assert_eq!(major_promoted_cost(rook, src, dst), 1);
    }

    #[test]
    fn major_promoted_cost_bishop_reaches_via_zone_hop() {
        let bishop = black(PieceKind::Bishop);
        let src = file_rank_to_sq(5, 9);
        let dst = file_rank_to_sq(1, 5);
        let cost = major_promoted_cost(bishop, src, dst);
        assert!(cost >= 2 && cost < UNREACHABLE);
    }
}
