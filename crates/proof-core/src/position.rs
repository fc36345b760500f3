//! The position/board data model (§3): an 81-square board, two hands, the
//! side to move, and an incrementally maintained Zobrist hash.
//!
//! This struct is its own source of truth for board state — it does not
//! wrap the external engine's position type. Legal-move enumeration is the
//! one operation that genuinely needs a full shogi rules implementation, so
//! for that single leaf we hand off to the external collaborator: serialize
//! to SFEN, parse it back with `shogi_usi_parser`, and ask
//! `shogi_legality_lite` for the legal moves. Everything else (apply/undo,
//! hashing, king lookup, hand accounting) stays here, where the types are
//! ours and under test.

use shogi_core::{Color, LegalityChecker, Piece, PieceKind};
use shogi_usi_parser::FromUsi;

use crate::error::SfenError;
use crate::geometry::{file_rank_to_sq, NUM_SQUARES};
use crate::piece::{self, HandPieceKind};
use crate::zobrist;

/// Where a move's piece comes from: an existing board square, or a hand drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    /// The piece starts on this board square.
    Board(u8),
    /// The piece is dropped from hand.
    Drop(HandPieceKind),
}

/// A single ply, opaque beyond the fields the engine needs for fixed-piece
/// filtering and KIF rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Where the moving piece comes from.
    pub from: MoveOrigin,
    /// Destination square, `0..81`.
    pub to: u8,
    /// Whether the piece promotes on this move.
    pub promote: bool,
}

impl Move {
    /// The origin square, if this move starts from the board rather than hand.
    #[inline]
    pub fn from_square(&self) -> Option<u8> {
        match self.from {
            MoveOrigin::Board(sq) => Some(sq),
            MoveOrigin::Drop(_) => None,
        }
    }
}

/// The 81-square board, both hands, side to move, and a stable Zobrist hash
/// over all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; NUM_SQUARES],
    hands: [[u32; 7]; 2],
    side_to_move: Color,
    hash: u64,
}

/// Dense `0..2` index for a color; see the identical note in `zobrist.rs` —
/// `Color`'s discriminants are `1`/`2`, not `0`/`1`.
#[inline]
fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

fn kind_letter(kind: PieceKind) -> char {
    match kind {
        PieceKind::Pawn | PieceKind::ProPawn => 'P',
        PieceKind::Lance | PieceKind::ProLance => 'L',
        PieceKind::Knight | PieceKind::ProKnight => 'N',
        PieceKind::Silver | PieceKind::ProSilver => 'S',
        PieceKind::Gold => 'G',
        PieceKind::Bishop | PieceKind::ProBishop => 'B',
        PieceKind::Rook | PieceKind::ProRook => 'R',
        PieceKind::King => 'K',
    }
}

fn kind_from_letter(c: char) -> Result<PieceKind, SfenError> {
    match c {
        'P' => Ok(PieceKind::Pawn),
        'L' => Ok(PieceKind::Lance),
        'N' => Ok(PieceKind::Knight),
        'S' => Ok(PieceKind::Silver),
        'G' => Ok(PieceKind::Gold),
        'B' => Ok(PieceKind::Bishop),
        'R' => Ok(PieceKind::Rook),
        'K' => Ok(PieceKind::King),
        other => Err(SfenError::Malformed {
            detail: format!("unknown piece letter '{other}'"),
        }),
    }
}

/// Hand kinds in the conventional SFEN ordering (descending value).
const HAND_SFEN_ORDER: [HandPieceKind; 7] = [
    HandPieceKind::Rook,
    HandPieceKind::Bishop,
    HandPieceKind::Gold,
    HandPieceKind::Silver,
    HandPieceKind::Knight,
    HandPieceKind::Lance,
    HandPieceKind::Pawn,
];

impl Position {
    /// An empty board: no pieces, no hand pieces, Black to move.
    pub fn empty() -> Self {
        let mut pos = Position {
            board: [None; NUM_SQUARES],
            hands: [[0; 7]; 2],
            side_to_move: Color::Black,
            hash: 0,
        };
        pos.recompute_hash();
        pos
    }

    /// Parses an SFEN string (board, side to move, hands; the trailing move
    /// number is accepted but ignored).
    pub fn from_sfen(sfen: &str) -> Result<Self, SfenError> {
        let mut parts = sfen.split_whitespace();
        let board_part = parts.next().ok_or_else(|| SfenError::Malformed {
            detail: "missing board field".to_string(),
        })?;
        let side_part = parts.next().ok_or_else(|| SfenError::Malformed {
            detail: "missing side-to-move field".to_string(),
        })?;
        let hand_part = parts.next().unwrap_or("-");

        let mut board = [None; NUM_SQUARES];
        for (row_idx, row) in board_part.split('/').enumerate() {
            if row_idx >= 9 {
                return Err(SfenError::Malformed {
                    detail: "too many board rows".to_string(),
                });
            }
            let rank = row_idx as u8 + 1;
            let mut file = 9i32;
            let mut chars = row.chars().peekable();
            while let Some(c) = chars.next() {
                if let Some(n) = c.to_digit(10) {
                    file -= n as i32;
                    continue;
                }
                let promoted = c == '+';
                let letter = if promoted {
                    chars.next().ok_or_else(|| SfenError::Malformed {
                        detail: "dangling '+' in board field".to_string(),
                    })?
                } else {
                    c
                };
                let raw_kind = kind_from_letter(letter.to_ascii_uppercase())?;
                let kind = if promoted {
                    raw_kind.promote().ok_or_else(|| SfenError::Malformed {
                        detail: format!("'{letter}' cannot promote"),
                    })?
                } else {
                    raw_kind
                };
                let color = if letter.is_ascii_uppercase() {
                    Color::Black
                } else {
                    Color::White
                };
                if file < 1 {
                    return Err(SfenError::Malformed {
                        detail: "board row overflows 9 files".to_string(),
                    });
                }
                let sq = file_rank_to_sq(file as u8, rank);
                board[sq as usize] = Some(Piece::new(kind, color));
                file -= 1;
            }
        }

        let side_to_move = match side_part {
            "b" => Color::Black,
            "w" => Color::White,
            other => {
                return Err(SfenError::Malformed {
                    detail: format!("unknown side-to-move '{other}'"),
                })
            }
        };

        let mut hands = [[0u32; 7]; 2];
        if hand_part != "-" {
            let mut count = 0u32;
            for c in hand_part.chars() {
                if let Some(d) = c.to_digit(10) {
                    count = count * 10 + d;
                    continue;
                }
                let n = if count == 0 { 1 } else { count };
                count = 0;
                let kind = kind_from_letter(c.to_ascii_uppercase())?;
                let hp = HandPieceKind::from_piece_kind(kind).ok_or_else(|| SfenError::Malformed {
                    detail: format!("'{c}' is not a hand-piece kind"),
                })?;
                let color = if c.is_ascii_uppercase() {
                    Color::Black
                } else {
                    Color::White
                };
                hands[color_index(color)][hp.index()] = n;
            }
        }

        let mut pos = Position {
            board,
            hands,
            side_to_move,
            hash: 0,
        };
        pos.recompute_hash();
        Ok(pos)
    }

    /// Serializes to SFEN (board, side to move, hands, move number `1`).
    pub fn to_sfen(&self) -> String {
        let mut s = String::new();
        for rank in 1..=9u8 {
            let mut empties = 0u32;
            for file in (1..=9u8).rev() {
                let sq = file_rank_to_sq(file, rank);
                match self.board[sq as usize] {
                    None => empties += 1,
                    Some(p) => {
                        if empties > 0 {
                            s.push_str(&empties.to_string());
                            empties = 0;
                        }
                        if piece::is_promoted(p) {
                            s.push('+');
                        }
                        let letter = kind_letter(p.piece_kind());
                        s.push(if p.color() == Color::Black {
                            letter
                        } else {
                            letter.to_ascii_lowercase()
                        });
                    }
                }
            }
            if empties > 0 {
                s.push_str(&empties.to_string());
            }
            if rank != 9 {
                s.push('/');
            }
        }
        s.push(' ');
        s.push(if self.side_to_move == Color::Black {
            'b'
        } else {
            'w'
        });
        s.push(' ');
        let mut any_hand = false;
        for &color in &[Color::Black, Color::White] {
            for hp in HAND_SFEN_ORDER {
                let count = self.hands[color_index(color)][hp.index()];
                if count == 0 {
                    continue;
                }
                any_hand = true;
                if count > 1 {
                    s.push_str(&count.to_string());
                }
                let letter = kind_letter(hp.to_piece_kind());
                s.push(if color == Color::Black {
                    letter
                } else {
                    letter.to_ascii_lowercase()
                });
            }
        }
        if !any_hand {
            s.push('-');
        }
        s.push_str(" 1");
        s
    }

    fn recompute_hash(&mut self) {
        let mut h = 0u64;
        for sq in 0..NUM_SQUARES as u8 {
            if let Some(p) = self.board[sq as usize] {
                h ^= zobrist::piece_square_key(p.color(), p.piece_kind(), sq);
            }
        }
        for &color in &[Color::Black, Color::White] {
            for hp in HandPieceKind::ALL {
                let count = self.hands[color_index(color)][hp.index()];
                h ^= zobrist::hand_count_key(color, hp, count);
            }
        }
        if self.side_to_move == Color::White {
            h ^= zobrist::side_to_move_key();
        }
        self.hash = h;
    }

    fn set_square(&mut self, sq: u8, piece: Option<Piece>) {
        if let Some(old) = self.board[sq as usize] {
            self.hash ^= zobrist::piece_square_key(old.color(), old.piece_kind(), sq);
        }
        if let Some(new) = piece {
            self.hash ^= zobrist::piece_square_key(new.color(), new.piece_kind(), sq);
        }
        self.board[sq as usize] = piece;
    }

    fn set_hand_count(&mut self, color: Color, kind: HandPieceKind, count: u32) {
        let old = self.hands[color_index(color)][kind.index()];
        self.hash ^= zobrist::hand_count_key(color, kind, old);
        self.hash ^= zobrist::hand_count_key(color, kind, count);
        self.hands[color_index(color)][kind.index()] = count;
    }

    fn flip_side(&mut self) {
        self.hash ^= zobrist::side_to_move_key();
        self.side_to_move = self.side_to_move.flip();
    }

    /// The stable Zobrist hash over board, hands, and side to move.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Piece occupying `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    /// Places (or clears, if `piece` is `None`) a piece on `sq`, bulk-style.
    /// Used to assemble a position from problem-file directives outside of
    /// normal move application. Invalidates no invariants by itself; callers
    /// are responsible for piece-count conservation.
    pub fn set_piece(&mut self, sq: u8, piece: Option<Piece>) {
        self.set_square(sq, piece);
    }

    /// Count of `kind` held in `color`'s hand.
    #[inline]
    pub fn hand_count(&self, color: Color, kind: HandPieceKind) -> u32 {
        self.hands[color_index(color)][kind.index()]
    }

    /// Sets the count of `kind` held in `color`'s hand directly.
    pub fn set_hand(&mut self, color: Color, kind: HandPieceKind, count: u32) {
        self.set_hand_count(color, kind, count);
    }

    /// The square holding `color`'s king, if present.
    pub fn king_square(&self, color: Color) -> Option<u8> {
        (0..NUM_SQUARES as u8).find(|&sq| {
            matches!(self.board[sq as usize], Some(p) if p.piece_kind() == PieceKind::King && p.color() == color)
        })
    }

    /// Full board snapshot.
    #[inline]
    pub fn board(&self) -> &[Option<Piece>; NUM_SQUARES] {
        &self.board
    }

    /// Both sides' hand counts, indexed `[color_index(color)][hand kind index]`.
    #[inline]
    pub fn hands(&self) -> &[[u32; 7]; 2] {
        &self.hands
    }

    /// Applies `mv`, returning a full snapshot that [`Self::undo_move`] can
    /// restore. `mv` is assumed to already be legal.
    pub fn apply_move(&mut self, mv: Move) -> Position {
        let undo = *self;
        let mover = self.side_to_move;
        match mv.from {
            MoveOrigin::Drop(hp) => {
                let count = self.hands[color_index(mover)][hp.index()];
                self.set_hand_count(mover, hp, count.saturating_sub(1));
                self.set_square(mv.to, Some(Piece::new(hp.to_piece_kind(), mover)));
            }
            MoveOrigin::Board(src) => {
                let moving = self.board[src as usize]
                    .expect("apply_move: origin square is empty");
                if let Some(captured) = self.board[mv.to as usize] {
                    let demoted = piece::unpromote(captured);
                    if let Some(hp) = HandPieceKind::from_piece_kind(demoted.piece_kind()) {
                        let count = self.hands[color_index(mover)][hp.index()];
                        self.set_hand_count(mover, hp, count + 1);
                    }
                }
                self.set_square(src, None);
                let placed = if mv.promote {
                    piece::promote(moving)
                } else {
                    moving
                };
                self.set_square(mv.to, Some(placed));
            }
        }
        self.flip_side();
        undo
    }

    /// Restores a position to a snapshot returned by [`Self::apply_move`].
    #[inline]
    pub fn undo_move(&mut self, undo: Position) {
        *self = undo;
    }

    /// Enumerates this position's legal moves, via the external shogi rule
    /// engine. The only operation in this module not implemented locally.
    pub fn legal_moves(&self) -> Result<Vec<Move>, SfenError> {
        let sfen = self.to_sfen();
        let partial = shogi_core::PartialPosition::from_usi(&sfen).map_err(|e| SfenError::Malformed {
            detail: format!("{e:?}"),
        })?;
        let checker = shogi_legality_lite::LiteLegalityChecker;
        Ok(checker
            .all_legal_moves_partial(&partial)
            .into_iter()
            .map(move_from_shogi_core)
            .collect())
    }

    /// Validates the I3 invariant: exactly one king per side.
    pub fn validate_king_count(&self) -> Result<(), SfenError> {
        let black = (0..NUM_SQUARES as u8)
            .filter(|&sq| matches!(self.board[sq as usize], Some(p) if p.piece_kind() == PieceKind::King && p.color() == Color::Black))
            .count() as u32;
        let white = (0..NUM_SQUARES as u8)
            .filter(|&sq| matches!(self.board[sq as usize], Some(p) if p.piece_kind() == PieceKind::King && p.color() == Color::White))
            .count() as u32;
        if black == 1 && white == 1 {
            Ok(())
        } else {
            Err(SfenError::WrongKingCount { black, white })
        }
    }
}

fn move_from_shogi_core(mv: shogi_core::Move) -> Move {
    match mv {
        shogi_core::Move::Normal { from, to, promote } => Move {
            from: MoveOrigin::Board(file_rank_to_sq(from.file(), from.rank())),
            to: file_rank_to_sq(to.file(), to.rank()),
            promote,
        },
        shogi_core::Move::Drop { piece, to } => Move {
            from: MoveOrigin::Drop(
                HandPieceKind::from_piece_kind(piece.piece_kind())
                    .expect("dropped piece must be a hand-piece kind"),
            ),
            to: file_rank_to_sq(to.file(), to.rank()),
            promote: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::file_rank;

    const STARTPOS: &str =
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    #[test]
    fn startpos_round_trips_through_sfen() {
        let pos = Position::from_sfen(STARTPOS).unwrap();
        assert_eq!(pos.to_sfen(), STARTPOS);
    }

    #[test]
    fn startpos_has_both_kings() {
        let pos = Position::from_sfen(STARTPOS).unwrap();
        assert!(pos.validate_king_count().is_ok());
        assert_eq!(file_rank(pos.king_square(Color::Black).unwrap()), (5, 9));
        assert_eq!(file_rank(pos.king_square(Color::White).unwrap()), (5, 1));
    }

    #[test]
    fn apply_then_undo_restores_position() {
        let mut pos = Position::from_sfen(STARTPOS).unwrap();
        let before = pos;
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        let undo = pos.apply_move(mv);
        assert_ne!(pos.hash(), before.hash());
        assert_eq!(pos.side_to_move(), Color::White);
        pos.undo_move(undo);
        assert_eq!(pos, before);
        assert_eq!(pos.hash(), before.hash());
    }

    #[test]
    fn capture_adds_demoted_piece_to_hand() {
        let mut pos = Position::empty();
        pos.set_piece(file_rank_to_sq(5, 5), Some(Piece::new(PieceKind::Rook, Color::Black)));
        pos.set_piece(
            file_rank_to_sq(5, 1),
            Some(Piece::new(PieceKind::ProPawn, Color::White)),
        );
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(5, 5)),
            to: file_rank_to_sq(5, 1),
            promote: false,
        };
        pos.apply_move(mv);
        assert_eq!(pos.hand_count(Color::Black, HandPieceKind::Pawn), 1);
    }

    #[test]
    fn drop_move_decrements_hand_and_places_piece() {
        let mut pos = Position::empty();
        pos.set_hand(Color::Black, HandPieceKind::Gold, 1);
        let mv = Move {
            from: MoveOrigin::Drop(HandPieceKind::Gold),
            to: file_rank_to_sq(5, 5),
            promote: false,
        };
        pos.apply_move(mv);
        assert_eq!(pos.hand_count(Color::Black, HandPieceKind::Gold), 0);
        assert_eq!(
            pos.piece_at(file_rank_to_sq(5, 5)),
            Some(Piece::new(PieceKind::Gold, Color::Black))
        );
    }

    #[test]
    fn hash_matches_recompute_from_scratch_after_mutation() {
        let mut pos = Position::from_sfen(STARTPOS).unwrap();
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(3, 3)),
            to: file_rank_to_sq(3, 4),
            promote: false,
        };
        pos.apply_move(mv);
        let reparsed = Position::from_sfen(&pos.to_sfen()).unwrap();
        assert_eq!(pos.hash(), reparsed.hash());
    }
}
