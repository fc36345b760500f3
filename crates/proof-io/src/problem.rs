//! Problem-file loading (§6): start/target SFENs, search bounds, fixed
//! pieces, and the opt-in debug solution trace.

use std::path::Path;

use proof_core::{file_rank_to_sq, Position};
use proof_engine::{
    validate_fixed_square_occupied, validate_non_negative_margin, validate_positive_depth,
    validate_sfen_has_king, validate_two_digits,
};

use crate::error::ProblemError;
use crate::kv::KvFile;

/// The standard opening position, used as `START_SFEN`'s default.
pub const STANDARD_OPENING_SFEN: &str =
    "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// One proof-game problem: the start/target pair, search bounds, and any
/// squares that must not participate in a solution.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Starting SFEN, defaulting to [`STANDARD_OPENING_SFEN`].
    pub start_sfen: String,
    /// Required target SFEN.
    pub target_sfen: String,
    /// Exact ply count every solution must have.
    pub max_depth: u32,
    /// Maximum number of solutions to report, clamped to `1..=10`.
    pub limit: usize,
    /// Transposition-table lenience, clamped to `0..=5`.
    pub margin: u32,
    /// Board squares (`0..81`) that no solution move may touch.
    pub fixed_squares: Vec<u8>,
    /// Known USI move sequences to trace at `trace` level if pruned (§10.8),
    /// absent unless the file has a `DEBUG_SOL_START`/`DEBUG_SOL_END` block.
    pub debug_solution: Option<Vec<String>>,
}

impl Problem {
    /// Loads and validates a problem file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        let kv = KvFile::load(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| {
            crate::error::ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_kv_and_text(&kv, &text)
    }

    fn from_kv_and_text(kv: &KvFile, text: &str) -> Result<Self, ProblemError> {
        let start_sfen = kv
            .get("START_SFEN")
            .filter(|s| !s.is_empty())
            .unwrap_or(STANDARD_OPENING_SFEN)
            .to_string();
        let target_sfen = kv.get_required("TARGET_SFEN")?.to_string();

        validate_sfen_has_king(&start_sfen)?;
        validate_sfen_has_king(&target_sfen)?;
        let start = Position::from_sfen(&start_sfen).map_err(|source| ProblemError::Sfen {
            field: "START_SFEN",
            source,
        })?;
        Position::from_sfen(&target_sfen).map_err(|source| ProblemError::Sfen {
            field: "TARGET_SFEN",
            source,
        })?;

        let max_depth = validate_positive_depth(kv.get_required_int("MAX_DEPTH")?)?;
        let limit = (kv.get_required_int("LIMIT")?.clamp(1, 10)) as usize;
        let margin = validate_non_negative_margin(kv.get_int("MARGIN", 0)?)?.min(5);

        let mut fixed_squares = Vec::new();
        if let Some(raw) = kv.get("FIXED_PIECES") {
            for code in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let code: u32 = code.parse().unwrap_or(0);
                let (file, rank) = validate_two_digits(code)?;
                let sq = file_rank_to_sq(file, rank);
                validate_fixed_square_occupied(&start, sq, code)?;
                fixed_squares.push(sq);
            }
        }

        let debug_solution = parse_debug_sol_block(text);

        Ok(Self {
            start_sfen,
            target_sfen,
            max_depth,
            limit,
            margin,
            fixed_squares,
            debug_solution,
        })
    }
}

/// Scans `DEBUG_SOL_START`/`DEBUG_SOL_END` markers for a block of raw USI
/// move strings, one per line.
fn parse_debug_sol_block(text: &str) -> Option<Vec<String>> {
    let mut lines = Vec::new();
    let mut in_block = false;
    let mut found = false;
    for line in text.lines() {
        let line = line.trim();
        if line == "DEBUG_SOL_START" {
            in_block = true;
            found = true;
            continue;
        }
        if line == "DEBUG_SOL_END" {
            break;
        }
        if in_block && !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    found.then_some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "TARGET_SFEN=lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1\nMAX_DEPTH=1\nLIMIT=1\n";

    fn kv(text: &str) -> KvFile {
        KvFile::parse(std::path::PathBuf::from("problem.txt"), text)
    }

    #[test]
    fn missing_start_sfen_defaults_to_standard_opening() {
        let problem = Problem::from_kv_and_text(&kv(MINIMAL), MINIMAL).unwrap();
        assert_eq!(problem.start_sfen, STANDARD_OPENING_SFEN);
    }

    #[test]
    fn limit_clamps_to_1_through_10() {
        let text = format!("{MINIMAL}LIMIT=99\n");
        let problem = Problem::from_kv_and_text(&kv(&text), &text).unwrap();
        assert_eq!(problem.limit, 10);
    }

    #[test]
    fn margin_clamps_to_0_through_5() {
        let text = format!("{MINIMAL}MARGIN=20\n");
        let problem = Problem::from_kv_and_text(&kv(&text), &text).unwrap();
        assert_eq!(problem.margin, 5);
    }

    #[test]
    fn missing_target_sfen_is_an_error() {
        let text = "MAX_DEPTH=1\nLIMIT=1\n";
        assert!(Problem::from_kv_and_text(&kv(text), text).is_err());
    }

    #[test]
    fn fixed_pieces_parse_as_squares() {
        // 77 and 73 are both pawn squares in the default start position.
        let text = format!("{MINIMAL}FIXED_PIECES=77, 73\n");
        let problem = Problem::from_kv_and_text(&kv(&text), &text).unwrap();
        assert_eq!(
            problem.fixed_squares,
            vec![file_rank_to_sq(7, 7), file_rank_to_sq(7, 3)]
        );
    }

    #[test]
    fn out_of_range_fixed_piece_code_is_an_error() {
        let text = format!("{MINIMAL}FIXED_PIECES=90\n");
        assert!(Problem::from_kv_and_text(&kv(&text), &text).is_err());
    }

    #[test]
    fn fixed_piece_on_empty_square_is_an_error() {
        let text = format!("{MINIMAL}FIXED_PIECES=55\n");
        assert!(Problem::from_kv_and_text(&kv(&text), &text).is_err());
    }

    #[test]
    fn zero_max_depth_is_an_error() {
        let text = "TARGET_SFEN=lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1\nMAX_DEPTH=0\nLIMIT=1\n";
        assert!(Problem::from_kv_and_text(&kv(text), text).is_err());
    }

    #[test]
    fn negative_margin_is_an_error() {
        let text = format!("{MINIMAL}MARGIN=-1\n");
        assert!(Problem::from_kv_and_text(&kv(&text), &text).is_err());
    }

    #[test]
    fn debug_sol_block_is_collected_between_markers() {
        let text = format!("{MINIMAL}DEBUG_SOL_START\n7g7f\n3c3d\nDEBUG_SOL_END\n");
        let problem = Problem::from_kv_and_text(&kv(&text), &text).unwrap();
        assert_eq!(
            problem.debug_solution,
            Some(vec!["7g7f".to_string(), "3c3d".to_string()])
        );
    }

    #[test]
    fn no_debug_sol_block_is_none() {
        let problem = Problem::from_kv_and_text(&kv(MINIMAL), MINIMAL).unwrap();
        assert_eq!(problem.debug_solution, None);
    }
}
