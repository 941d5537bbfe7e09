//! Runtime settings for the terminal game.
//!
//! Settings come from `AUTUMN_BURST_*` environment variables and can be
//! overridden by command line flags. Numbers that fail to parse fall back to the
//! preset for the chosen mode; an unknown mode name is an error.

use anyhow::{anyhow, Result};

use crate::core::{ConfigError, EngineConfig};
use crate::types::GameMode;

pub const ENV_MODE: &str = "AUTUMN_BURST_MODE";
pub const ENV_SEED: &str = "AUTUMN_BURST_SEED";
pub const ENV_WIDTH: &str = "AUTUMN_BURST_WIDTH";
pub const ENV_HEIGHT: &str = "AUTUMN_BURST_HEIGHT";
pub const ENV_TOKENS: &str = "AUTUMN_BURST_TOKENS";
pub const ENV_MIN_CLUSTER: &str = "AUTUMN_BURST_MIN_CLUSTER";
pub const ENV_CASCADE_MS: &str = "AUTUMN_BURST_CASCADE_MS";
pub const ENV_LOG_PATH: &str = "AUTUMN_BURST_LOG_PATH";
/// Filter directive for the log file (`tracing_subscriber::EnvFilter` syntax).
pub const ENV_LOG_FILTER: &str = "AUTUMN_BURST_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub mode: GameMode,
    /// `None` lets the binary pick a seed from the clock.
    pub seed: Option<u32>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub tokens: Option<u8>,
    pub min_cluster: Option<usize>,
    pub cascade_ms: Option<u32>,
    pub log_path: Option<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mode = match value(ENV_MODE) {
            Some(name) => {
                GameMode::from_str(&name).ok_or(ConfigError::UnknownMode(name))?
            }
            None => GameMode::default(),
        };

        Ok(Self {
            mode,
            seed: value(ENV_SEED).and_then(|s| s.parse().ok()),
            width: value(ENV_WIDTH).and_then(|s| s.parse().ok()),
            height: value(ENV_HEIGHT).and_then(|s| s.parse().ok()),
            tokens: value(ENV_TOKENS).and_then(|s| s.parse().ok()),
            min_cluster: value(ENV_MIN_CLUSTER).and_then(|s| s.parse().ok()),
            cascade_ms: value(ENV_CASCADE_MS).and_then(|s| s.parse().ok()),
            log_path: value(ENV_LOG_PATH),
        })
    }

    /// Apply `--mode`, `--seed`, `--size WxH` and `--cascade-ms` flags.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag.as_str() {
                "--mode" => {
                    let v = value()?;
                    self.mode = GameMode::from_str(v)
                        .ok_or_else(|| ConfigError::UnknownMode(v.clone()))?;
                }
                "--seed" => {
                    let v = value()?;
                    self.seed = Some(v.parse().map_err(|_| anyhow!("invalid --seed value: {}", v))?);
                }
                "--size" => {
                    let v = value()?;
                    let (w, h) = v
                        .split_once(['x', 'X'])
                        .ok_or_else(|| anyhow!("invalid --size value: {} (expected WxH)", v))?;
                    self.width = Some(w.parse().map_err(|_| anyhow!("invalid width: {}", w))?);
                    self.height = Some(h.parse().map_err(|_| anyhow!("invalid height: {}", h))?);
                }
                "--cascade-ms" => {
                    let v = value()?;
                    self.cascade_ms =
                        Some(v.parse().map_err(|_| anyhow!("invalid --cascade-ms value: {}", v))?);
                }
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
        }
        Ok(())
    }

    /// Engine configuration for these settings, validated.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = EngineConfig::for_mode(self.mode);
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tokens) = self.tokens {
            config.token_kinds = tokens;
        }
        if let Some(min) = self.min_cluster {
            config.min_cluster = min;
        }
        if let Some(ms) = self.cascade_ms {
            config.cascade_delay_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}
