use std::io;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = "PShell>";
pub const DEFAULT_SEARCH_PATH: [&str; 4] = ["/bin/", "/usr/bin/", "/usr/local/bin/", "./"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub search_path: SearchPathList,
}

/// Ordered directory prefixes consulted when resolving a bare command name.
///
/// Every entry ends with `/`, so a candidate path is the plain concatenation
/// of prefix and command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPathList {
    dirs: Vec<String>,
}

impl SearchPathList {
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dirs = dirs
            .into_iter()
            .map(Into::into)
            .filter(|d: &String| !d.is_empty())
            .map(|mut d| {
                if !d.ends_with('/') {
                    d.push('/');
                }
                d
            })
            .collect();
        SearchPathList { dirs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl Default for SearchPathList {
    fn default() -> Self {
        SearchPathList::new(DEFAULT_SEARCH_PATH)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            search_path: SearchPathList::default(),
        }
    }

    /// `$HOME/.pshellrc`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".pshellrc"))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut prompt = None;
        let mut search_path = None;

        for (lineno, line) in src.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                let msg = format!("Line {}: No '=' found: {}", lineno + 1, line);
                return Err(ConfigError::Parse(msg));
            };

            // The prompt keeps its surrounding whitespace, e.g. `prompt=$ `.
            match key.trim() {
                "prompt" => prompt = Some(value.to_string()),
                "search_path" => {
                    search_path = Some(SearchPathList::new(value.trim().split(':')));
                }
                k => {
                    let msg = format!("Line {}: Unknown key: {}", lineno + 1, k);
                    return Err(ConfigError::Parse(msg));
                }
            }
        }

        let default = ConfigLoader::default_config();
        Ok(Config {
            prompt: prompt.unwrap_or(default.prompt),
            search_path: search_path.unwrap_or(default.search_path),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
