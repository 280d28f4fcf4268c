//! Bot configuration loaded from environment variables (with a `.env` file
//! via dotenvy before startup).

use anyhow::Result;
use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://income-api.copperx.io/api";
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_LOG_FILE: &str = "logs/payout-bot.log";
const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

pub struct BotConfig {
    pub bot_token: String,
    pub api_base_url: String,
    pub redis_url: String,
    pub log_file: String,
    pub telegram_api_url: Option<String>,
    pub api_timeout: Duration,
}

impl BotConfig {
    /// Loads from env. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let api_base_url =
            env::var("PAYOUT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let api_timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_API_TIMEOUT_SECS));

        Ok(Self {
            bot_token,
            api_base_url,
            redis_url,
            log_file,
            telegram_api_url,
            api_timeout,
        })
    }

    /// Builds config with the given token; everything else defaulted.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            api_base_url: DEFAULT_API_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            telegram_api_url: None,
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}
