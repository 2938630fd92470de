use std::{env, fs, path::Path, time::Duration};

use crate::{commands::DEFAULT_RESULTS_LIMIT, errors::Error, timing::DisplayZone, Result};

pub const DEFAULT_PREFIX: &str = "!f1";
pub const DEFAULT_ERGAST_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Typed configuration, read once at startup from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub telegram_safe_limit: usize,

    // Commands
    pub prefix: String,
    pub display_zone: DisplayZone,
    pub results_limit: usize,

    // Data provider
    pub ergast_base_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        let telegram_safe_limit = env_usize("TELEGRAM_SAFE_LIMIT").unwrap_or(4000);

        let prefix = env_str("BOT_PREFIX")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        // A bad zone is fatal: every time shown to users depends on it.
        let display_zone = match env_str("DISPLAY_TIMEZONE").and_then(non_empty) {
            Some(name) => DisplayZone::new(&name)?,
            None => DisplayZone::default(),
        };

        let results_limit = env_usize("RESULTS_LIMIT")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_RESULTS_LIMIT);

        let ergast_base_url = env_str("ERGAST_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ERGAST_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let http_timeout = Duration::from_millis(env_u64("HTTP_TIMEOUT_MS").unwrap_or(10_000));

        Ok(Self {
            telegram_bot_token,
            telegram_safe_limit,
            prefix,
            display_zone,
            results_limit,
            ergast_base_url,
            http_timeout,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
