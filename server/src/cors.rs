use rocket::http::Method;
use rocket_cors::{AllowedOrigins, CorsOptions};

use crate::config::ServerConfig;

pub fn create_cors(config: &ServerConfig) -> rocket_cors::Cors {
    let allowed_origins = AllowedOrigins::some_exact(&config.cors_allowed_origins);

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(|m| m.into())
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Accept", "Content-Type"]),
        allow_credentials: false,
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS configuration")
}
