//! `config.txt` loading (§6): output verbosity, board-rendering mode, TT
//! memory budget, and the default input/output paths.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::kv::KvFile;

/// How much of the target position to print alongside the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StPosOutputMode {
    /// Print the target position alone.
    TargetOnly,
    /// Print both side by side, but only when the start position isn't the
    /// standard opening.
    SideBySideIfCustomStart,
    /// Always print both side by side.
    AlwaysSideBySide,
}

impl StPosOutputMode {
    fn from_int(value: i64, path: &Path) -> Result<Self, ConfigError> {
        match value {
            0 => Ok(Self::TargetOnly),
            1 => Ok(Self::SideBySideIfCustomStart),
            2 => Ok(Self::AlwaysSideBySide),
            other => Err(ConfigError::NotAnInteger {
                path: path.to_path_buf(),
                key: "ST_POS_OUTPUT_MODE",
                value: other.to_string(),
            }),
        }
    }
}

/// Engine-wide configuration loaded from `config.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Verbosity, `0..=3` (gates `tracing`'s `EnvFilter`).
    pub output_level: u8,
    /// How the target position is echoed alongside the start position.
    pub st_pos_output_mode: StPosOutputMode,
    /// Transposition-table memory budget, in megabytes.
    pub tt_memory_mb: u32,
    /// Default input (problem) file path, used when `-i` is absent.
    pub input_file: String,
    /// Default output path, used when `-o` is absent.
    pub output_file: String,
}

impl EngineConfig {
    /// Loads `config.txt`-formatted content from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let kv = KvFile::load(path)?;
        Self::from_kv(&kv)
    }

    fn from_kv(kv: &KvFile) -> Result<Self, ConfigError> {
        let output_level = kv.get_int("OUTPUT_LEVEL", 1)?.clamp(0, 3) as u8;
        let st_pos_output_mode =
            StPosOutputMode::from_int(kv.get_int("ST_POS_OUTPUT_MODE", 1)?, &kv.path)?;
        let tt_memory_mb = kv.get_int("TT_MEMORY_MB", 256)?.max(1) as u32;
        let input_file = kv.get("INPUT_FILE").unwrap_or("").to_string();
        let output_file = kv.get("OUTPUT_FILE").unwrap_or("").to_string();
        Ok(Self {
            output_level,
            st_pos_output_mode,
            tt_memory_mb,
            input_file,
            output_file,
        })
    }

    /// TT memory budget in bytes, as the search engine expects.
    pub fn tt_memory_bytes(&self) -> usize {
        self.tt_memory_mb as usize * 1024 * 1024
    }

    /// Builds an `EnvFilter` directive string from `output_level`, per the
    /// mapping: `0` errors only, `1` info (default), `2` debug, `3` trace.
    pub fn env_filter_directive(&self) -> &'static str {
        match self.output_level {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// The resolved input path: `override_path` if given, else
    /// [`Self::input_file`], unresolved if both are empty.
    pub fn resolve_input(&self, override_path: Option<&str>) -> Option<PathBuf> {
        resolve(override_path, &self.input_file)
    }

    /// The resolved output path: `override_path` if given, else
    /// [`Self::output_file`], unresolved if both are empty.
    pub fn resolve_output(&self, override_path: Option<&str>) -> Option<PathBuf> {
        resolve(override_path, &self.output_file)
    }
}

fn resolve(override_path: Option<&str>, configured: &str) -> Option<PathBuf> {
    override_path
        .filter(|s| !s.is_empty())
        .or_else(|| (!configured.is_empty()).then_some(configured))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(text: &str) -> KvFile {
        KvFile::parse(PathBuf::from("config.txt"), text)
    }

    #[test]
    fn defaults_apply_when_keys_absent() {
        let cfg = EngineConfig::from_kv(&kv("")).unwrap();
        assert_eq!(cfg.output_level, 1);
        assert_eq!(cfg.st_pos_output_mode, StPosOutputMode::SideBySideIfCustomStart);
        assert_eq!(cfg.tt_memory_mb, 256);
        assert_eq!(cfg.input_file, "");
        assert_eq!(cfg.output_file, "");
    }

    #[test]
    fn output_level_is_clamped_to_0_3() {
        let cfg = EngineConfig::from_kv(&kv("OUTPUT_LEVEL=9\n")).unwrap();
        assert_eq!(cfg.output_level, 3);
    }

    #[test]
    fn env_filter_directive_tracks_output_level() {
        assert_eq!(
            EngineConfig::from_kv(&kv("OUTPUT_LEVEL=0\n"))
                .unwrap()
                .env_filter_directive(),
            "error"
        );
        assert_eq!(
            EngineConfig::from_kv(&kv("OUTPUT_LEVEL=3\n"))
                .unwrap()
                .env_filter_directive(),
            "trace"
        );
    }

    #[test]
    fn tt_memory_bytes_converts_from_mb() {
        let cfg = EngineConfig::from_kv(&kv("TT_MEMORY_MB=4\n")).unwrap();
        assert_eq!(cfg.tt_memory_bytes(), 4 * 1024 * 1024);
    }

    #[test]
    fn cli_override_wins_over_config_path() {
        let cfg = EngineConfig::from_kv(&kv("INPUT_FILE=problem.txt\n")).unwrap();
        assert_eq!(
            cfg.resolve_input(Some("other.txt")),
            Some(PathBuf::from("other.txt"))
        );
        assert_eq!(
            cfg.resolve_input(None),
            Some(PathBuf::from("problem.txt"))
        );
    }

    #[test]
    fn unset_paths_resolve_to_none() {
        let cfg = EngineConfig::from_kv(&kv("")).unwrap();
        assert_eq!(cfg.resolve_input(None), None);
        assert_eq!(cfg.resolve_output(None), None);
    }
}
