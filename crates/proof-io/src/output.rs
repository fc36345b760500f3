//! Solution output (§6): appends one `=== 解 #k ===` block per solution to
//! the output file, each followed by numbered KIF move lines.

use std::io::Write;

use proof_core::{MoveOrigin, Position};
use shogi_core::PartialPosition;
use shogi_usi_parser::FromUsi;

/// Renders one solution's moves as KIF lines, replaying them over `start`
/// to get the board context `display_single_move` needs for disambiguation.
pub fn render_solution(start: &Position, moves: &[proof_core::Move]) -> String {
    let mut board = *start;
    let mut out = String::new();
    for (i, &mv) in moves.iter().enumerate() {
        let kif = render_single_move(&board, mv).unwrap_or_else(|| usi_fallback(&board, mv));
        out.push_str(&format!("{:>3} {}\n", i + 1, kif));
        board.apply_move(mv);
    }
    out
}

/// Writes one `=== 解 #k ===` header and its move lines to `writer`.
pub fn write_solution(
    writer: &mut impl Write,
    index: usize,
    start: &Position,
    moves: &[proof_core::Move],
) -> std::io::Result<()> {
    writeln!(writer, "=== 解 #{index} ===")?;
    write!(writer, "{}", render_solution(start, moves))
}

fn render_single_move(board: &Position, mv: proof_core::Move) -> Option<String> {
    let partial = PartialPosition::from_usi(&board.to_sfen()).ok()?;
    let shogi_mv = to_shogi_core_move(board, mv)?;
    shogi_official_kifu::display_single_move(&partial, shogi_mv)
}

fn to_shogi_core_move(board: &Position, mv: proof_core::Move) -> Option<shogi_core::Move> {
    let to = square_from_sq(mv.to)?;
    match mv.from {
        MoveOrigin::Board(from_sq) => Some(shogi_core::Move::Normal {
            from: square_from_sq(from_sq)?,
            to,
            promote: mv.promote,
        }),
        MoveOrigin::Drop(hand_kind) => {
            let piece = shogi_core::Piece::new(hand_kind.to_piece_kind(), board.side_to_move());
            Some(shogi_core::Move::Drop { piece, to })
        }
    }
}

fn square_from_sq(sq: u8) -> Option<shogi_core::Square> {
    let (file, rank) = proof_core::file_rank(sq);
    shogi_core::Square::new(file, rank)
}

/// A plain USI move string, used if the KIF renderer can't disambiguate
/// (e.g. an inconsistent intermediate board during a debug trace).
fn usi_fallback(_board: &Position, mv: proof_core::Move) -> String {
    let (to_file, to_rank) = proof_core::file_rank(mv.to);
    match mv.from {
        MoveOrigin::Board(from_sq) => {
            let (from_file, from_rank) = proof_core::file_rank(from_sq);
            format!(
                "{from_file}{from_rank}{to_file}{to_rank}{}",
                if mv.promote { "+" } else { "" }
            )
        }
        MoveOrigin::Drop(kind) => {
            format!("{}*{to_file}{to_rank}", drop_letter(kind))
        }
    }
}

fn drop_letter(kind: proof_core::HandPieceKind) -> char {
    use proof_core::HandPieceKind::*;
    match kind {
        Pawn => 'P',
        Lance => 'L',
        Knight => 'N',
        Silver => 'S',
        Gold => 'G',
        Bishop => 'B',
        Rook => 'R',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proof_core::{file_rank_to_sq, Move};

    const STARTPOS: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    #[test]
    fn empty_solution_renders_no_lines() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        assert_eq!(render_solution(&start, &[]), "");
    }

    #[test]
    fn single_pawn_push_renders_one_numbered_line() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mv = Move {
            from: MoveOrigin::Board(file_rank_to_sq(7, 7)),
            to: file_rank_to_sq(7, 6),
            promote: false,
        };
        let rendered = render_solution(&start, &[mv]);
        assert!(rendered.starts_with("  1 "));
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn write_solution_includes_header() {
        let start = Position::from_sfen(STARTPOS).unwrap();
        let mut buf = Vec::new();
        write_solution(&mut buf, 3, &start, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("=== 解 #3 ===\n"));
    }

    #[test]
    fn usi_fallback_formats_a_drop() {
        let start = Position::empty();
        let mv = Move {
            from: MoveOrigin::Drop(proof_core::HandPieceKind::Gold),
            to: file_rank_to_sq(5, 5),
            promote: false,
        };
        assert_eq!(usi_fallback(&start, mv), "G*55");
    }
}
