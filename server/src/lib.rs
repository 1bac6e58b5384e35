pub mod cleanup;
pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod rate_limit;
pub mod routes;
pub mod store;

use rocket::{Build, Rocket, catchers, routes};
use tracing::info;

use crate::{
    cleanup::CleanupFairing, config::ServerConfig, cors::create_cors, rate_limit::RateLimiter,
    store::GameStore,
};

/// Assembles the server: managed state, fairings, routes and catchers.
pub fn build(config: ServerConfig) -> Rocket<Build> {
    let store = GameStore::with_max_cells(config.max_board_cells);
    let rate_limiter = RateLimiter::new(config.rate_limit_games_per_minute);

    info!("📊 Initialized game storage and rate limiter");

    rocket::build()
        .attach(create_cors(&config))
        .attach(CleanupFairing)
        .manage(store)
        .manage(rate_limiter)
        .manage(config)
        .mount(
            "/",
            routes![
                routes::status,
                routes::start_game,
                routes::find_game,
                routes::reveal_cell,
                routes::mark_as_bomb,
                routes::mark_as_question,
            ],
        )
        .register(
            "/",
            catchers![
                routes::bad_request,
                routes::not_found,
                routes::unprocessable,
                routes::internal_error,
            ],
        )
}
