use minesweeper_server::config::ServerConfig;
use rocket::{Build, Rocket};
use tracing::info;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting Minesweeper server");

    let config = ServerConfig::from_env();
    let rocket = minesweeper_server::build(config);

    info!("🌐 Server configured with CORS, cleanup task, and routes");
    info!("📡 Endpoints: GET /status, POST /games, GET /games/<id>, POST /games/<id>/{{reveal,bomb,question}}");

    rocket
}
