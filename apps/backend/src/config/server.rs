//! Server configuration loaded from the process environment.
//!
//! Every variable is optional; unset or blank values fall back to the
//! defaults below. A value that is present but malformed is an
//! `AppError::Config`, never silently replaced.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::{registry, AiConfig, HeuristicOpponent};
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_MATCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_BOT_MOVE_DELAY_MS: u64 = 500;
pub const DEFAULT_BOT_THINK_DELAY_MS: u64 = 2_000;
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;
pub const DEFAULT_IDLE_GAME_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_IDLE_SWEEP_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a lone player waits before being paired with the bot.
    pub match_timeout: Duration,
    pub bot_move_delay: Duration,
    pub bot_think_delay: Duration,
    /// Capacity of each connection's outbound queue.
    pub outbound_buffer: usize,
    pub idle_game_timeout: Duration,
    pub idle_sweep_interval: Duration,
    pub leaderboard_size: usize,
    pub bot_ai: String,
    pub ai: AiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            match_timeout: Duration::from_millis(DEFAULT_MATCH_TIMEOUT_MS),
            bot_move_delay: Duration::from_millis(DEFAULT_BOT_MOVE_DELAY_MS),
            bot_think_delay: Duration::from_millis(DEFAULT_BOT_THINK_DELAY_MS),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            idle_game_timeout: Duration::from_secs(DEFAULT_IDLE_GAME_TIMEOUT_SECS),
            idle_sweep_interval: Duration::from_secs(DEFAULT_IDLE_SWEEP_INTERVAL_SECS),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            bot_ai: HeuristicOpponent::NAME.to_string(),
            ai: AiConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests never touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let mistake_rate = parse_or(&get, "BOT_MISTAKE_RATE", AiConfig::DEFAULT_MISTAKE_RATE)?;
        if !(0.0..=1.0).contains(&mistake_rate) {
            return Err(AppError::config(format!(
                "BOT_MISTAKE_RATE must be between 0 and 1, got {mistake_rate}"
            )));
        }
        let seed = match get("BOT_SEED") {
            Some(raw) => Some(parse_value::<u64>("BOT_SEED", &raw)?),
            None => None,
        };

        let bot_ai = get("BOT_AI").unwrap_or(defaults.bot_ai);
        if registry::by_name(&bot_ai).is_none() {
            return Err(AppError::config(format!("BOT_AI names no registered opponent: {bot_ai}")));
        }

        let outbound_buffer = parse_or(&get, "OUTBOUND_BUFFER", DEFAULT_OUTBOUND_BUFFER)?;
        if outbound_buffer == 0 {
            return Err(AppError::config("OUTBOUND_BUFFER must be at least 1"));
        }
        let idle_sweep_secs =
            parse_or(&get, "IDLE_SWEEP_INTERVAL_SECS", DEFAULT_IDLE_SWEEP_INTERVAL_SECS)?;
        if idle_sweep_secs == 0 {
            return Err(AppError::config("IDLE_SWEEP_INTERVAL_SECS must be at least 1"));
        }

        Ok(Self {
            host: get("BACKEND_HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "BACKEND_PORT", DEFAULT_PORT)?,
            match_timeout: Duration::from_millis(parse_or(
                &get,
                "MATCH_TIMEOUT_MS",
                DEFAULT_MATCH_TIMEOUT_MS,
            )?),
            bot_move_delay: Duration::from_millis(parse_or(
                &get,
                "BOT_MOVE_DELAY_MS",
                DEFAULT_BOT_MOVE_DELAY_MS,
            )?),
            bot_think_delay: Duration::from_millis(parse_or(
                &get,
                "BOT_THINK_DELAY_MS",
                DEFAULT_BOT_THINK_DELAY_MS,
            )?),
            outbound_buffer,
            idle_game_timeout: Duration::from_secs(parse_or(
                &get,
                "IDLE_GAME_TIMEOUT_SECS",
                DEFAULT_IDLE_GAME_TIMEOUT_SECS,
            )?),
            idle_sweep_interval: Duration::from_secs(idle_sweep_secs),
            leaderboard_size: parse_or(&get, "LEADERBOARD_SIZE", DEFAULT_LEADERBOARD_SIZE)?,
            bot_ai,
            ai: AiConfig { seed, mistake_rate },
        })
    }

    /// Zero delays and a strict opponent; tests override what they need.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            bot_move_delay: Duration::ZERO,
            bot_think_delay: Duration::ZERO,
            ai: AiConfig::strict(Some(7)),
            ..Self::default()
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| AppError::config(format!("{key} has invalid value {raw:?}: {e}")))
}
