//! Core shogi types: the position data model, movement and reach-cost
//! arithmetic, and Zobrist hashing.
//!
//! This crate owns no rules engine of its own beyond what the cost
//! formulas (§4.3) need; legal move generation is delegated to
//! `shogi_core`/`shogi_legality_lite` at the single leaf in
//! [`position::Position::legal_moves`].

mod error;
mod geometry;
mod movement;
mod piece;
mod position;
mod reach_cost;
mod zobrist;

pub use error::SfenError;
pub use geometry::{chebyshev, file_rank, file_rank_to_sq, in_prom_zone, manhattan, normalize, rotate_sq, NUM_SQUARES};
pub use movement::{
    can_move_as_bishop, can_move_as_gold, can_move_as_king, can_move_as_knight,
    can_move_as_lance, can_move_as_pawn, can_move_as_prom_bishop, can_move_as_prom_rook,
    can_move_as_rook, can_move_as_silver, can_promote_on_move,
};
pub use piece::{change_owner, demote, is_promoted, kind, owner, promote, unpromote, HandPieceKind};
pub use position::{Move, MoveOrigin, Position};
pub use reach_cost::{major_promoted_cost, minor_p_distance, minor_promoted_cost, unpromoted_move_cost, UNREACHABLE};
pub use zobrist::{hand_count_key, piece_square_key, side_to_move_key, MAX_HAND_COUNT};

pub use shogi_core::{Color, Piece, PieceKind};
