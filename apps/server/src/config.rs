use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use dailysteps_core::constants::DEFAULT_ACCOUNTING_MAX_ATTEMPTS;
use dailysteps_core::utils::time_utils::DEFAULT_TZ;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// HS256 key shared with the identity provider that issues tokens.
    pub jwt_secret: Vec<u8>,
    /// Zone whose calendar decides what "today" is.
    pub timezone: Tz,
    pub accounting_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("DS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid DS_LISTEN_ADDR")?;
        let db_path = std::env::var("DS_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("DS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("DS_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let jwt_secret = std::env::var("DS_JWT_SECRET").context("DS_JWT_SECRET is required")?;
        let jwt_secret = decode_secret_key(&jwt_secret)?;
        let timezone = match std::env::var("DS_TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid DS_TIMEZONE '{}': {}", name, e))?,
            Err(_) => DEFAULT_TZ,
        };
        let accounting_max_attempts = std::env::var("DS_ACCOUNTING_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ACCOUNTING_MAX_ATTEMPTS);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            timezone,
            accounting_max_attempts,
        })
    }
}
