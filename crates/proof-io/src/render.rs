//! Board diagram rendering (§10.8): a BOD-style 9x9 diagram, and the
//! side-by-side comparison of two positions used for start/target echo.

use proof_core::{is_promoted, Color, Piece, PieceKind, Position};
use unicode_width::UnicodeWidthStr;

const RANK_HEADER: &str = "   9  8  7  6  5  4  3  2  1";
const BORDER: &str = "+---------------------------+";

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

fn cell(piece: Option<Piece>) -> String {
    match piece {
        None => " . ".to_string(),
        Some(p) => {
            let mut s = String::new();
            s.push(if p.color() == Color::White { 'v' } else { ' ' });
            if is_promoted(p) {
                s.push('+');
            } else {
                s.push(' ');
            }
            let letter = kind_letter(p.piece_kind());
            s.push(if p.color() == Color::Black {
                letter
            } else {
                letter.to_ascii_lowercase()
            });
            s
        }
    }
}

fn hand_line(position: &Position, color: Color, label: &str) -> String {
    let mut parts = Vec::new();
    for hp in proof_core::HandPieceKind::ALL {
        let count = position.hand_count(color, hp);
        if count > 0 {
            let letter = kind_letter(hp.to_piece_kind());
            parts.push(format!("{letter}{count}"));
        }
    }
    if parts.is_empty() {
        format!("{label}の持駒：なし")
    } else {
        format!("{label}の持駒：{}", parts.join(" "))
    }
}

/// Renders `position` as a fixed 14-line BOD-style diagram: gote's hand,
/// the rank header, the board framed by borders, and sente's hand.
pub fn board_lines(position: &Position) -> Vec<String> {
    let mut lines = Vec::with_capacity(14);
    lines.push(hand_line(position, Color::White, "後手"));
    lines.push(RANK_HEADER.to_string());
    lines.push(BORDER.to_string());
    for rank in 1..=9u8 {
        let mut row = String::from("|");
        for file in (1..=9u8).rev() {
            let sq = proof_core::file_rank_to_sq(file, rank);
            row.push_str(&cell(position.piece_at(sq)));
        }
        row.push('|');
        lines.push(row);
    }
    lines.push(BORDER.to_string());
    lines.push(hand_line(position, Color::Black, "先手"));
    lines
}

/// Renders `left` and `right` as two BOD-style diagrams placed side by
/// side, East-Asian-width-aware padded so the right diagram lines up
/// regardless of how many full-width characters the left one contains.
pub fn side_by_side(left: &Position, right: &Position, sep: &str) -> Vec<String> {
    let left_lines = board_lines(left);
    let right_lines = board_lines(right);
    let left_width = left_lines
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);
    left_lines
        .iter()
        .zip(right_lines.iter())
        .map(|(l, r)| format!("{}{sep}{r}", pad_to(l, left_width)))
        .collect()
}

fn pad_to(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current < width {
        format!("{s}{}", " ".repeat(width - current))
    } else {
        s.to_string()
    }
}
