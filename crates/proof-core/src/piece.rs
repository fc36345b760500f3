//! Piece algebra: owner, promotion, and the canonical hand-piece domain.
//!
//! `shogi_core::Piece` already gives us `piece_kind()`/`color()`/`new()`;
//! this module layers the small set of operations the data model (§3)
//! asks for on top: `owner`, `is_promoted`, `unpromote`, `demote`,
//! `change_owner`, and the seven-kind hand-piece enumeration.

use shogi_core::{Color, Piece, PieceKind};

/// Returns the owner of a piece. Shogi pieces always have an owner, but the
/// signature mirrors the data model's `owner(p) -> {Black, White, None}`
/// contract, which exists to accommodate the "empty square" case at the
/// `Option<Piece>` level, not here.
#[inline]
pub fn owner(p: Piece) -> Color {
    p.color()
}

/// Side-agnostic piece kind, collapsing promotion and color.
#[inline]
pub fn kind(p: Piece) -> PieceKind {
    p.piece_kind()
}

/// Whether `p` is a promoted piece.
#[inline]
pub fn is_promoted(p: Piece) -> bool {
    p.piece_kind().unpromote().is_some()
}

/// Returns the raw (unpromoted) form of `p`, same owner. A no-op if `p` is
/// already raw.
#[inline]
pub fn unpromote(p: Piece) -> Piece {
    match p.piece_kind().unpromote() {
        Some(raw) => Piece::new(raw, p.color()),
        None => p,
    }
}

/// Returns the raw form of `p` if `p` is promoted, `None` if it is already raw.
#[inline]
pub fn demote(p: Piece) -> Option<Piece> {
    p.piece_kind()
        .unpromote()
        .map(|raw| Piece::new(raw, p.color()))
}

/// Returns the promoted form of `p`, same owner. A no-op if `p` has no
/// promoted form (king) or is already promoted.
#[inline]
pub fn promote(p: Piece) -> Piece {
    match p.piece_kind().promote() {
        Some(pro) => Piece::new(pro, p.color()),
        None => p,
    }
}

/// Flips the owner of `p`, preserving kind and promotion.
#[inline]
pub fn change_owner(p: Piece) -> Piece {
    Piece::new(p.piece_kind(), p.color().flip())
}

/// The seven kinds of piece that can be held in hand and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandPieceKind {
    /// Pawn.
    Pawn,
    /// Lance.
    Lance,
    /// Knight.
    Knight,
    /// Silver general.
    Silver,
    /// Gold general.
    Gold,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
}

impl HandPieceKind {
    /// All seven hand-piece kinds, in a fixed canonical order used for
    /// hand-count arrays throughout the crate.
    pub const ALL: [HandPieceKind; 7] = [
        HandPieceKind::Pawn,
        HandPieceKind::Lance,
        HandPieceKind::Knight,
        HandPieceKind::Silver,
        HandPieceKind::Gold,
        HandPieceKind::Bishop,
        HandPieceKind::Rook,
    ];

    /// Index into a `[T; 7]` hand-count array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            HandPieceKind::Pawn => 0,
            HandPieceKind::Lance => 1,
            HandPieceKind::Knight => 2,
            HandPieceKind::Silver => 3,
            HandPieceKind::Gold => 4,
            HandPieceKind::Bishop => 5,
            HandPieceKind::Rook => 6,
        }
    }

    /// The raw board `PieceKind` this hand piece drops as.
    #[inline]
    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            HandPieceKind::Pawn => PieceKind::Pawn,
            HandPieceKind::Lance => PieceKind::Lance,
            HandPieceKind::Knight => PieceKind::Knight,
            HandPieceKind::Silver => PieceKind::Silver,
            HandPieceKind::Gold => PieceKind::Gold,
            HandPieceKind::Bishop => PieceKind::Bishop,
            HandPieceKind::Rook => PieceKind::Rook,
        }
    }

    /// Maps a board `PieceKind` to its hand-piece kind, if it is one of the
    /// seven capturable kinds (raw form only; promoted pieces demote to
    /// their hand form via [`crate::piece::demote`] before calling this).
    #[inline]
    pub const fn from_piece_kind(kind: PieceKind) -> Option<HandPieceKind> {
        match kind {
            PieceKind::Pawn => Some(HandPieceKind::Pawn),
            PieceKind::Lance => Some(HandPieceKind::Lance),
            PieceKind::Knight => Some(HandPieceKind::Knight),
            PieceKind::Silver => Some(HandPieceKind::Silver),
            PieceKind::Gold => Some(HandPieceKind::Gold),
            PieceKind::Bishop => Some(HandPieceKind::Bishop),
            PieceKind::Rook => Some(HandPieceKind::Rook),
            _ => None,
        }
    }
}
