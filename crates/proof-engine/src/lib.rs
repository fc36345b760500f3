//! Position-cost heuristics, the unreachability transposition table, and
//! the depth-limited proof-game search built on top of `proof-core`.

mod cost;
mod error;
mod search;
mod tt;
mod validate;

pub use cost::{hand_distance, need_moves_count, piece_costs, PieceCost};
pub use error::{SearchError, ValidationError};
pub use search::{find_all_paths_to_target, SearchStats};
pub use tt::{LookupResult, TranspositionTable};
pub use validate::{
    adjust_target_turn, is_move_touching_fixed_piece, validate_fixed_square_occupied,
    validate_non_negative_margin, validate_piece_counts, validate_positive_depth,
    validate_sfen_has_king, validate_two_digits,
};
