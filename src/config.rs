use std::io::Read;

use crate::engine::Target;

/// Settings for the `grid2048` driver, read from TOML.
///
/// ```toml
/// target = 2048
/// seed = 42
///
/// [simulate]
/// games = 500
/// max_moves = 10000
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: Target,
    /// Base RNG seed. When absent the driver picks one and logs it.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub simulate: Simulate,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Simulate {
    #[serde(default = "defaults::games")]
    pub games: u32,
    /// Stop a game after this many accepted moves.
    #[serde(default)]
    pub max_moves: Option<u64>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

mod defaults {
    pub fn games() -> u32 { 100 }
}

impl Default for Config {
    fn default() -> Self {
        Self { target: Target::DEFAULT, seed: None, simulate: Simulate::default() }
    }
}

impl Default for Simulate {
    fn default() -> Self {
        Self { games: defaults::games(), max_moves: None }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        Ok(cfg)
    }
}
