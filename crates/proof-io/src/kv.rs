//! The `key=value` line format shared by the config file and problem file
//! (§6): comments start with `#`, blank lines are ignored, keys/values are
//! trimmed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// A parsed `key=value` file, keys in first-occurrence order of no
/// particular significance (later duplicate keys overwrite earlier ones).
pub struct KvFile {
    pub(crate) path: PathBuf,
    pub(crate) entries: HashMap<String, String>,
}

impl KvFile {
    /// Reads and parses `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Self::parse(path, &text))
    }

    pub(crate) fn parse(path: PathBuf, text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { path, entries }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub(crate) fn get_required(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            path: self.path.clone(),
            key,
        })
    }

    pub(crate) fn get_int(&self, key: &'static str, default: i64) -> Result<i64, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::NotAnInteger {
                path: self.path.clone(),
                key,
                value: value.to_string(),
            }),
        }
    }

    pub(crate) fn get_required_int(&self, key: &'static str) -> Result<i64, ConfigError> {
        let value = self.get_required(key)?;
        value.parse().map_err(|_| ConfigError::NotAnInteger {
            path: self.path.clone(),
            key,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let kv = KvFile::parse(
            PathBuf::from("test"),
            "# a comment\n\nKEY=value\n   \n# another\n",
        );
        assert_eq!(kv.get("KEY"), Some("value"));
        assert_eq!(kv.entries.len(), 1);
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let kv = KvFile::parse(PathBuf::from("test"), "  KEY  =  value with spaces  \n");
        assert_eq!(kv.get("KEY"), Some("value with spaces"));
    }

    #[test]
    fn missing_required_key_errors() {
        let kv = KvFile::parse(PathBuf::from("test"), "");
        assert!(matches!(
            kv.get_required("FOO"),
            Err(ConfigError::MissingKey { key: "FOO", .. })
        ));
    }

    #[test]
    fn non_integer_value_errors() {
        let kv = KvFile::parse(PathBuf::from("test"), "N=abc\n");
        assert!(matches!(
            kv.get_int("N", 0),
            Err(ConfigError::NotAnInteger { key: "N", .. })
        ));
    }

    #[test]
    fn missing_optional_int_falls_back_to_default() {
        let kv = KvFile::parse(PathBuf::from("test"), "");
        assert_eq!(kv.get_int("N", 42).unwrap(), 42);
    }
}
