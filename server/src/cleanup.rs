use std::time::Duration;

use rocket::{
    Build, Rocket,
    fairing::{Fairing, Info, Kind},
};
use tokio::time;
use tracing::{debug, info, warn};

use crate::{config::ServerConfig, rate_limit::RateLimiter, store::GameStore};

pub async fn start_cleanup_task(store: GameStore, rate_limiter: RateLimiter, config: ServerConfig) {
    let mut interval = time::interval(Duration::from_secs(config.cleanup_interval_secs.max(1)));

    info!(
        "Started game cleanup task: checking every {}s, finished timeout: {}s, inactive timeout: {}s",
        config.cleanup_interval_secs,
        config.finished_game_timeout_secs,
        config.inactive_game_timeout_secs
    );

    loop {
        interval.tick().await;
        cleanup_games(&store, &rate_limiter, &config);
    }
}

pub fn cleanup_games(store: &GameStore, rate_limiter: &RateLimiter, config: &ServerConfig) -> usize {
    let removed_count = store.remove_stale(
        config.finished_game_timeout_secs,
        config.inactive_game_timeout_secs,
    );

    if removed_count > 0 {
        info!("Cleaned up {} stale games", removed_count);
    } else {
        debug!("No stale games to clean up");
    }

    let removed_buckets = rate_limiter.remove_idle();
    if removed_buckets > 0 {
        debug!("Dropped {} idle rate limit buckets", removed_buckets);
    }
    removed_count
}

pub struct CleanupFairing;

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Cleanup Task",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        match (
            rocket.state::<GameStore>(),
            rocket.state::<RateLimiter>(),
            rocket.state::<ServerConfig>(),
        ) {
            (Some(store), Some(rate_limiter), Some(config)) => {
                info!("Starting cleanup task for game management");
                let store = store.clone();
                let rate_limiter = rate_limiter.clone();
                let config = config.clone();
                tokio::spawn(async move {
                    start_cleanup_task(store, rate_limiter, config).await;
                });
            }
            _ => warn!("Failed to get game store for cleanup task"),
        }
        Ok(rocket)
    }
}
