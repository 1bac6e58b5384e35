use std::{env, str::FromStr};

use tracing::warn;

/// Server settings read from the environment. Rocket's own settings
/// (address, port, workers) still come from `Rocket.toml` / `ROCKET_*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_games_per_minute: u32,
    /// Take the client address from Rocket's `ip_header` (a reverse proxy).
    pub trust_proxy_header: bool,
    pub cleanup_interval_secs: u64,
    pub inactive_game_timeout_secs: u64,
    pub finished_game_timeout_secs: u64,
    pub max_board_cells: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            rate_limit_games_per_minute: 10,
            trust_proxy_header: false,
            cleanup_interval_secs: 60,
            inactive_game_timeout_secs: 86400,
            finished_game_timeout_secs: 600,
            max_board_cells: 10_000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", name, value);
            default
        }),
        Err(_) => default,
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| parse_origins(&origins))
            .unwrap_or(defaults.cors_allowed_origins);

        Self {
            cors_allowed_origins,
            rate_limit_games_per_minute: env_or(
                "RATE_LIMIT_GAMES_PER_MINUTE",
                defaults.rate_limit_games_per_minute,
            ),
            trust_proxy_header: env_or("TRUST_PROXY_HEADER", defaults.trust_proxy_header),
            cleanup_interval_secs: env_or("CLEANUP_INTERVAL_SECONDS", defaults.cleanup_interval_secs),
            inactive_game_timeout_secs: env_or(
                "INACTIVE_GAME_TIMEOUT_SECONDS",
                defaults.inactive_game_timeout_secs,
            ),
            finished_game_timeout_secs: env_or(
                "FINISHED_GAME_TIMEOUT_SECONDS",
                defaults.finished_game_timeout_secs,
            ),
            max_board_cells: env_or("MAX_BOARD_CELLS", defaults.max_board_cells),
        }
    }
}

fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
