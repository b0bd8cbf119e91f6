//! Optional `.dupmap.toml` discovery and parsing.
//!
//! The file supplies defaults for the CLI; explicit flags always win. A
//! missing file is normal, a malformed one logs a warning and falls back to
//! defaults rather than failing the run.

use std::path::Path;

use serde::Deserialize;

const CONFIG_FILE_NAME: &str = ".dupmap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DupmapConfig {
    #[serde(default)]
    pub analysis: AnalysisDefaults,
    #[serde(default)]
    pub ignore: IgnoreDefaults,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnalysisDefaults {
    pub language: Option<String>,
    pub minimum_token_count: Option<u32>,
    pub encoding: Option<String>,
    #[serde(default)]
    pub ignore_annotations: bool,
    #[serde(default)]
    pub ignore_identifiers: bool,
    #[serde(default)]
    pub ignore_literals: bool,
    #[serde(default)]
    pub skip_duplicate_files: bool,
    #[serde(default)]
    pub skip_lexical_errors: bool,
    pub skip_blocks: Option<bool>,
    pub skip_blocks_pattern: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IgnoreDefaults {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Parse config file contents. Pure, for testability.
pub fn parse_config(contents: &str) -> Result<DupmapConfig, String> {
    toml::from_str::<DupmapConfig>(contents)
        .map_err(|e| format!("failed to parse {CONFIG_FILE_NAME}: {e}"))
}

fn try_load_from(path: &Path) -> Option<DupmapConfig> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read {}: {}", path.display(), e);
            }
            return None;
        }
    };
    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded configuration from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Search `start` and its ancestors (bounded depth) for a config file.
pub fn load_config(start: &Path) -> DupmapConfig {
    std::iter::successors(Some(start.to_path_buf()), |dir| {
        dir.parent().map(Path::to_path_buf)
    })
    .take(MAX_TRAVERSAL_DEPTH)
    .map(|dir| dir.join(CONFIG_FILE_NAME))
    .find_map(|path| try_load_from(&path))
    .unwrap_or_else(|| {
        log::debug!("No {CONFIG_FILE_NAME} found. Using defaults.");
        DupmapConfig::default()
    })
}

/// Default config file contents written by `dupmap init`.
pub fn default_config_contents() -> &'static str {
    r##"# dupmap configuration

[analysis]
language = "java"
minimum_token_count = 50
# encoding = "UTF-8"
# ignore_literals = true
# ignore_identifiers = true
# ignore_annotations = true
# skip_duplicate_files = true
# skip_lexical_errors = true
# skip_blocks = true
# skip_blocks_pattern = "#if 0|#endif"

[ignore]
patterns = [
    "target/**",
    "build/**",
    "node_modules/**",
]
"##
}

pub fn config_file_name() -> &'static str {
    CONFIG_FILE_NAME
}
