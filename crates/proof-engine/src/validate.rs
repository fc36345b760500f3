//! Validation & adjustment (§4.7): turn-parity fixup and the sanity checks
//! run on a problem's start/target pair before search begins.

use proof_core::{HandPieceKind, Position};

use crate::error::ValidationError;

/// Sets `target`'s side-to-move so that exactly `depth` plies from `start`
/// land on the correct side: same as `start` if `depth` is even, the
/// opposite otherwise. Returns `true` if `target`'s recorded side-to-move
/// had to change.
pub fn adjust_target_turn(start: &Position, target: &mut Position, depth: u32) -> bool {
    let wanted = if depth % 2 == 0 {
        start.side_to_move()
    } else {
        start.side_to_move().flip()
    };
    if target.side_to_move() == wanted {
        return false;
    }
    flip_side_to_move(target);
    true
}

fn flip_side_to_move(position: &mut Position) {
    // `Position` has no public side-to-move setter since ordinary play only
    // ever flips it via `apply_move`; rebuild via SFEN with the side field
    // swapped, which is the one place outside `apply_move` this is needed.
    let sfen = position.to_sfen();
    let mut parts: Vec<&str> = sfen.split_whitespace().collect();
    if let Some(side) = parts.get_mut(1) {
        *side = if *side == "b" { "w" } else { "b" };
    }
    if let Ok(rebuilt) = Position::from_sfen(&parts.join(" ")) {
        *position = rebuilt;
    }
}

/// Collapses a piece kind's side and promotion, for piece-count comparison:
/// `Pawn`/`ProPawn` both count as the bare pawn kind, and so on.
fn base_kind(kind: proof_core::PieceKind) -> proof_core::PieceKind {
    kind.unpromote().unwrap_or(kind)
}

/// Counts each piece kind (side and promotion collapsed) across board and
/// both hands; fails if `start` and `target` disagree.
pub fn validate_piece_counts(start: &Position, target: &Position) -> Result<(), ValidationError> {
    fn counts(position: &Position) -> [u32; 8] {
        let mut counts = [0u32; 8];
        for sq in 0..proof_core::NUM_SQUARES as u8 {
            if let Some(p) = position.piece_at(sq) {
                counts[kind_index(base_kind(p.piece_kind()))] += 1;
            }
        }
        for &color in &[proof_core::Color::Black, proof_core::Color::White] {
            for hp in HandPieceKind::ALL {
                counts[kind_index(hp.to_piece_kind())] += position.hand_count(color, hp);
            }
        }
        counts
    }
    if counts(start) == counts(target) {
        Ok(())
    } else {
        Err(ValidationError::PieceCountMismatch)
    }
}

fn kind_index(kind: proof_core::PieceKind) -> usize {
    match kind {
        proof_core::PieceKind::Pawn => 0,
        proof_core::PieceKind::Lance => 1,
        proof_core::PieceKind::Knight => 2,
        proof_core::PieceKind::Silver => 3,
        proof_core::PieceKind::Gold => 4,
        proof_core::PieceKind::Bishop => 5,
        proof_core::PieceKind::Rook => 6,
        proof_core::PieceKind::King => 7,
        _ => unreachable!("base_kind always returns an unpromoted kind"),
    }
}

/// Checks that the board portion of an SFEN string has exactly one
/// uppercase `K` and one lowercase `k`.
pub fn validate_sfen_has_king(sfen: &str) -> Result<(), ValidationError> {
    let board_part = sfen.split_whitespace().next().unwrap_or("");
    let black_kings = board_part.chars().filter(|&c| c == 'K').count();
    let white_kings = board_part.chars().filter(|&c| c == 'k').count();
    if black_kings == 1 && white_kings == 1 {
        Ok(())
    } else {
        Err(ValidationError::MissingKing)
    }
}

/// Splits a two-digit code `10*a + b` into `(a, b)`, both required in
/// `1..=9`.
pub fn validate_two_digits(code: u32) -> Result<(u8, u8), ValidationError> {
    let a = code / 10;
    let b = code % 10;
    if (1..=9).contains(&a) && (1..=9).contains(&b) {
        Ok((a as u8, b as u8))
    } else {
        Err(ValidationError::SquareCodeOutOfRange { code })
    }
}

/// Checks `MAX_DEPTH` is at least 1; zero and negative depths are a
/// configuration error, not something to silently clamp.
pub fn validate_positive_depth(depth: i64) -> Result<u32, ValidationError> {
    if depth >= 1 {
        Ok(depth as u32)
    } else {
        Err(ValidationError::NonPositiveDepth { depth })
    }
}

/// Checks `MARGIN` is non-negative; the upper bound is a plain clamp, but a
/// negative margin is a configuration error.
pub fn validate_non_negative_margin(margin: i64) -> Result<u32, ValidationError> {
    if margin >= 0 {
        Ok(margin as u32)
    } else {
        Err(ValidationError::NegativeMargin { margin })
    }
}

/// Checks that `position` has a piece on `sq`; used to validate that a
/// `FIXED_PIECES` entry actually names an occupied square.
pub fn validate_fixed_square_occupied(
    position: &Position,
    sq: u8,
    code: u32,
) -> Result<(), ValidationError> {
    if position.piece_at(sq).is_some() {
        Ok(())
    } else {
        Err(ValidationError::FixedSquareEmpty { code })
    }
}

/// Whether either endpoint of `mv` is in `fixed` — a drop has no source
/// endpoint, so only its destination is checked.
pub fn is_move_touching_fixed_piece(mv: &proof_core::Move, fixed: &[u8]) -> bool {
    let source_touches = mv.from_square().is_some_and(|sq| fixed.contains(&sq));
    source_touches || fixed.contains(&mv.to)
}
