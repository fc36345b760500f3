//! Zobrist hashing keys for position deduplication and the transposition
//! table's hash domain.
//!
//! Tables are generated at compile time with a const-evaluated xorshift64
//! PRNG, seeded once and threaded through each table in turn so that no two
//! tables ever reuse the same PRNG state.

use shogi_core::{Color, PieceKind};

use crate::piece::HandPieceKind;

const SEED: u64 = 0x5348_4f47_4953_5421; // "SHOGIS!"

const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Dense `0..2` index for a color. `Color`'s own discriminants are `1` and
/// `2` (so that `Option<Color>` packs into a byte), so every table here is
/// indexed through this function rather than `color as usize`.
#[inline]
const fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

/// Number of distinct (kind, promotion) piece codes: 8 raw kinds (including
/// king) plus 6 promotable kinds' promoted forms.
const NUM_KINDS: usize = 14;

/// Maps a `PieceKind` to a dense `0..14` index for table lookups.
const fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Lance => 1,
        PieceKind::Knight => 2,
        PieceKind::Silver => 3,
        PieceKind::Gold => 4,
        PieceKind::Bishop => 5,
        PieceKind::Rook => 6,
        PieceKind::King => 7,
        PieceKind::ProPawn => 8,
        PieceKind::ProLance => 9,
        PieceKind::ProKnight => 10,
        PieceKind::ProSilver => 11,
        PieceKind::ProBishop => 12,
        PieceKind::ProRook => 13,
    }
}

/// Maximum count of any single hand-piece kind a side can hold (the full
/// complement of pawns).
pub const MAX_HAND_COUNT: usize = 18;

/// Zobrist key for each `(color, kind, square)` triple.
/// Indexed `[color as usize][kind_index][square 0..81]`.
static PIECE_SQUARE: [[[u64; 81]; NUM_KINDS]; 2] = {
    let mut table = [[[0u64; 81]; NUM_KINDS]; 2];
    let mut state = SEED;
    let mut color = 0;
    while color < 2 {
        let mut kind = 0;
        while kind < NUM_KINDS {
            let mut sq = 0;
            while sq < 81 {
                let (val, next) = xorshift64(state);
                table[color][kind][sq] = val;
                state = next;
                sq += 1;
            }
            kind += 1;
        }
        color += 1;
    }
    table
};

const PIECE_SQUARE_KEY_COUNT: usize = 2 * NUM_KINDS * 81;

/// Zobrist key for `(color, hand-piece kind, count)`. The hash XORs the key
/// for the *current count* of each hand-piece kind, so going from `n` to
/// `n+1` of a kind XORs out `HAND[color][kind][n]` and XORs in
/// `HAND[color][kind][n+1]`.
static HAND: [[[u64; MAX_HAND_COUNT + 1]; 7]; 2] = {
    let mut table = [[[0u64; MAX_HAND_COUNT + 1]; 7]; 2];
    let mut state = SEED;
    let mut i = 0;
    while i < PIECE_SQUARE_KEY_COUNT {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let mut color = 0;
    while color < 2 {
        let mut kind = 0;
        while kind < 7 {
            let mut count = 0;
            while count <= MAX_HAND_COUNT {
                let (val, next) = xorshift64(state);
                table[color][kind][count] = val;
                state = next;
                count += 1;
            }
            kind += 1;
        }
        color += 1;
    }
    table
};

const HAND_KEY_COUNT: usize = 2 * 7 * (MAX_HAND_COUNT + 1);

/// Zobrist key XORed in when it is White's turn to move.
static SIDE_TO_MOVE: u64 = {
    let mut state = SEED;
    let mut i = 0;
    while i < PIECE_SQUARE_KEY_COUNT + HAND_KEY_COUNT {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let (val, _) = xorshift64(state);
    val
};

/// Key for a piece of `color` and `kind` sitting on `sq` (`0..81`).
#[inline]
pub fn piece_square_key(color: Color, kind: PieceKind, sq: u8) -> u64 {
    PIECE_SQUARE[color_index(color)][kind_index(kind)][sq as usize]
}

/// Key for `color` holding exactly `count` of `kind` in hand.
#[inline]
pub fn hand_count_key(color: Color, kind: HandPieceKind, count: u32) -> u64 {
    let count = (count as usize).min(MAX_HAND_COUNT);
    HAND[color_index(color)][kind.index()][count]
}

/// Key XORed in when White is to move (absent, i.e. XORed out, when Black
/// is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    SIDE_TO_MOVE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_square_keys_are_distinct_across_squares() {
        let a = piece_square_key(Color::Black, PieceKind::Pawn, 0);
        let b = piece_square_key(Color::Black, PieceKind::Pawn, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn piece_square_keys_are_distinct_across_colors_and_kinds() {
        let black_pawn = piece_square_key(Color::Black, PieceKind::Pawn, 40);
        let white_pawn = piece_square_key(Color::White, PieceKind::Pawn, 40);
        let black_gold = piece_square_key(Color::Black, PieceKind::Gold, 40);
        assert_ne!(black_pawn, white_pawn);
        assert_ne!(black_pawn, black_gold);
    }

    #[test]
    fn hand_count_keys_vary_by_count() {
        let zero = hand_count_key(Color::Black, HandPieceKind::Pawn, 0);
        let one = hand_count_key(Color::Black, HandPieceKind::Pawn, 1);
        assert_ne!(zero, one);
    }

    #[test]
    fn hand_count_key_clamps_above_max() {
        let at_max = hand_count_key(Color::Black, HandPieceKind::Pawn, MAX_HAND_COUNT as u32);
        let over_max = hand_count_key(Color::Black, HandPieceKind::Pawn, 999);
        assert_eq!(at_max, over_max);
    }

    #[test]
    fn side_to_move_key_is_nonzero() {
        assert_ne!(side_to_move_key(), 0);
    }
}
