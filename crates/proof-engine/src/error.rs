//! Errors surfaced by position validation and search setup.

/// Errors from validating a start/target pair before search begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The board + hands piece multiset (kind, side-and-promotion collapsed)
    /// differs between the start and target positions.
    #[error("piece counts differ between start and target")]
    PieceCountMismatch,
    /// A two-digit square code had a digit outside `1..=9`.
    #[error("square code {code} is out of range: both digits must be 1..=9")]
    SquareCodeOutOfRange {
        /// The offending two-digit code.
        code: u32,
    },
    /// `MAX_DEPTH` was zero or negative.
    #[error("max depth must be at least 1, got {depth}")]
    NonPositiveDepth {
        /// The offending depth value.
        depth: i64,
    },
    /// `MARGIN` was negative.
    #[error("margin must not be negative, got {margin}")]
    NegativeMargin {
        /// The offending margin value.
        margin: i64,
    },
    /// The board portion of an SFEN string is missing one side's king.
    #[error("board is missing a king for one or both sides")]
    MissingKing,
    /// A `FIXED_PIECES` entry names a square with no piece on it.
    #[error("fixed piece square {code} has no piece on it")]
    FixedSquareEmpty {
        /// The offending two-digit code.
        code: u32,
    },
}

/// Errors from running a search, beyond the local pruning decisions (§7:
/// heuristic infeasibility is never an error).
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The start/target pair failed pre-search validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The external legal-move generator rejected a position reached during
    /// search (an internal consistency failure, not a user input error).
    #[error("legal move generation failed: {0}")]
    LegalMoves(#[from] proof_core::SfenError),
}
