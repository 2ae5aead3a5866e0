use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::words::exclusion::ExclusionSet;

/// Default number of words shown in the terminal table.
pub const DEFAULT_TOP_N: usize = 20;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// take precedence over everything here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extra excluded words (CHATCLOUD_EXCLUDE, comma separated)
    pub extra_excluded: ExclusionSet,
    /// Stop-word language added to the exclusion set (CHATCLOUD_STOP_WORDS)
    pub stop_words: Option<String>,
    /// Rows in the terminal table (CHATCLOUD_TOP_N)
    pub top_n: usize,
    /// Where default output files go (CHATCLOUD_OUTPUT_DIR)
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables. Nothing is required.
    pub fn load() -> Result<Self> {
        let top_n = match env::var("CHATCLOUD_TOP_N") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("CHATCLOUD_TOP_N must be a non-negative integer, got '{raw}'")
            })?,
            Err(_) => DEFAULT_TOP_N,
        };

        Ok(Self {
            extra_excluded: env::var("CHATCLOUD_EXCLUDE")
                .map(|list| ExclusionSet::parse_list(&list))
                .unwrap_or_default(),
            stop_words: env::var("CHATCLOUD_STOP_WORDS")
                .ok()
                .filter(|lang| !lang.trim().is_empty()),
            top_n,
            output_dir: env::var("CHATCLOUD_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }

    /// Resolve an output file: explicit path wins, else `default_name` in
    /// the configured output directory.
    pub fn output_path(&self, explicit: Option<PathBuf>, default_name: &str) -> PathBuf {
        explicit.unwrap_or_else(|| self.output_dir.join(default_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            extra_excluded: ExclusionSet::new(),
            stop_words: None,
            top_n: DEFAULT_TOP_N,
            output_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn test_output_path_prefers_explicit() {
        let cfg = config();
        assert_eq!(
            cfg.output_path(Some(PathBuf::from("x.json")), "d.json"),
            PathBuf::from("x.json")
        );
        assert_eq!(cfg.output_path(None, "d.json"), PathBuf::from("out/d.json"));
    }
}
