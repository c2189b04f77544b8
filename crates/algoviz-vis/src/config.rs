//! Server configuration.

use algoviz_steps::ArrayConfig;

use crate::playback::Speed;

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// Port the HTTP server binds on all interfaces
    pub port: u16,
    /// Shape of generated arrays
    pub array: ArrayConfig,
    /// Initial playback speed
    pub speed: Speed,
    /// Seed for the first array; later arrays are always random
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            array: ArrayConfig::default(),
            speed: Speed::default(),
            seed: None,
        }
    }
}

impl VisConfig {
    /// Defaults, overridden by `ALGOVIZ_*` variables, then by positional
    /// `[array_len] [port]` arguments.
    pub fn from_env_and_args(args: &[String]) -> Self {
        Self::from_sources(args, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env_and_args`](Self::from_env_and_args) with an
    /// injectable environment lookup.
    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = env("ALGOVIZ_PORT").and_then(|s| s.parse().ok()) {
            config.port = port;
        }
        if let Some(speed) = env("ALGOVIZ_SPEED").and_then(|s| s.parse::<i64>().ok()) {
            config.speed = Speed::new(speed);
        }
        if let Some(seed) = env("ALGOVIZ_SEED").and_then(|s| s.parse().ok()) {
            config.seed = Some(seed);
        }

        if let Some(len) = args.first().and_then(|s| s.parse().ok()) {
            config.array = config.array.with_len(len);
        }
        if let Some(port) = args.get(1).and_then(|s| s.parse().ok()) {
            config.port = port;
        }

        config
    }
}
