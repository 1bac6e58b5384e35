use minesweeper_common::{
    models::CellStatus,
    protocol::{ErrorResponse, GameResponse, StartGameResponse, StatusResponse},
};
use minesweeper_server::{build, config::ServerConfig};
use rocket::{
    http::{Header, Status},
    local::blocking::Client,
};
use serde_json::{Value, json};

fn client() -> Client {
    client_with(ServerConfig {
        rate_limit_games_per_minute: 1000,
        ..ServerConfig::default()
    })
}

fn client_with(config: ServerConfig) -> Client {
    Client::tracked(build(config)).expect("valid rocket instance")
}

fn start(client: &Client, columns: i64, rows: i64, bombs: i64) -> StartGameResponse {
    let response = client
        .post("/games")
        .json(&json!({"columns": columns, "rows": rows, "bombCount": bombs}))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    response.into_json().expect("start response")
}

fn act(client: &Client, id: &str, action: &str, x: i64, y: i64) -> (Status, Value) {
    let response = client
        .post(format!("/games/{id}/{action}"))
        .json(&json!({"position": {"x": x, "y": y}}))
        .dispatch();
    (response.status(), response.into_json().expect("json body"))
}

#[test]
fn status_is_online() {
    let client = client();
    let response = client.get("/status").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: StatusResponse = response.into_json().unwrap();
    assert_eq!(body.status, "online");
}

#[test]
fn start_returns_game_summary() {
    let client = client();
    let game = start(&client, 10, 8, 12);

    assert_eq!(game.size.columns, 10);
    assert_eq!(game.size.rows, 8);
    assert_eq!(game.bombs, 12);
    assert!(!game.id.is_empty());
}

#[test]
fn start_accepts_short_field_names() {
    let client = client();
    let response = client
        .post("/games")
        .json(&json!({"x": 4, "y": 5, "bombCount": 2}))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let game: StartGameResponse = response.into_json().unwrap();
    assert_eq!(game.size.columns, 4);
    assert_eq!(game.size.rows, 5);
}

#[test]
fn start_rejects_bad_parameters() {
    let client = client();
    for body in [
        json!({"columns": 3, "rows": 3}),
        json!({"columns": 3, "rows": 3, "bombCount": 0}),
        json!({"columns": -3, "rows": 3, "bombCount": 1}),
        json!({"columns": 3, "rows": 3, "bombCount": 10}),
        json!({"columns": 1000, "rows": 1000, "bombCount": 10}),
    ] {
        let response = client.post("/games").json(&body).dispatch();
        assert_eq!(response.status(), Status::BadRequest, "body: {body}");
        let error: ErrorResponse = response.into_json().unwrap();
        assert!(error.error.contains("argument"), "error: {}", error.error);
    }
}

#[test]
fn start_is_rate_limited() {
    let client = client_with(ServerConfig {
        rate_limit_games_per_minute: 2,
        ..ServerConfig::default()
    });
    start(&client, 3, 3, 1);
    start(&client, 3, 3, 1);

    let response = client
        .post("/games")
        .json(&json!({"columns": 3, "rows": 3, "bombCount": 1}))
        .dispatch();
    assert_eq!(response.status(), Status::TooManyRequests);
}

#[test]
fn forwarded_headers_do_not_bypass_rate_limit() {
    let client = client_with(ServerConfig {
        rate_limit_games_per_minute: 2,
        ..ServerConfig::default()
    });

    let statuses: Vec<Status> = (0..5)
        .map(|i| {
            client
                .post("/games")
                .header(Header::new("X-Forwarded-For", format!("203.0.113.{i}")))
                .header(Header::new("X-Real-IP", format!("198.51.100.{i}")))
                .json(&json!({"columns": 3, "rows": 3, "bombCount": 1}))
                .dispatch()
                .status()
        })
        .collect();

    assert_eq!(&statuses[..2], &[Status::Ok, Status::Ok]);
    assert!(statuses[2..].iter().all(|status| *status == Status::TooManyRequests));
}

#[test]
fn unknown_game_is_404() {
    let client = client();
    let response = client.get("/games/missing").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    let error: ErrorResponse = response.into_json().unwrap();
    assert!(error.error.contains("not found"));

    let (status, _) = act(&client, "missing", "reveal", 0, 0);
    assert_eq!(status, Status::NotFound);
}

#[test]
fn revealing_a_bomb_ends_the_game() {
    let client = client();
    let game = start(&client, 3, 3, 9);

    let (status, body) = act(&client, &game.id, "reveal", 1, 1);
    assert_eq!(status, Status::Ok);
    let cells = body["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 9);
    assert!(cells.iter().all(|cell| cell["status"] == 4));
    assert!(cells.iter().all(|cell| cell["bombCount"] == -1));
    assert!(cells.iter().all(|cell| cell.get("bomb").is_none()));
    assert_eq!(body["finished"], true);

    let (status, body) = act(&client, &game.id, "bomb", 0, 0);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["cells"], json!([]));
}

#[test]
fn marks_are_reported_without_counts() {
    let client = client();
    let game = start(&client, 10, 10, 1);

    let (status, body) = act(&client, &game.id, "question", 2, 3);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["cells"], json!([{"x": 2, "y": 3, "status": 2}]));

    let (status, body) = act(&client, &game.id, "bomb", 2, 3);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["cells"], json!([{"x": 2, "y": 3, "status": 3}]));
    assert_eq!(body["finished"], false);
}

#[test]
fn lookup_lists_only_visible_cells() {
    let client = client();
    let game = start(&client, 10, 10, 1);
    act(&client, &game.id, "question", 0, 0);
    act(&client, &game.id, "bomb", 9, 9);

    let response = client.get(format!("/games/{}", game.id)).dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: GameResponse = response.into_json().unwrap();
    assert_eq!(body.id, game.id);
    assert_eq!(body.cells.len(), 2);
    assert!(body.cells.iter().all(|cell| cell.status != CellStatus::Hidden));
    assert!(body.cells.iter().all(|cell| cell.bomb_count.is_none()));
}

#[test]
fn position_validation_maps_to_400() {
    let client = client();
    let game = start(&client, 3, 3, 9);

    let (status, body) = act(&client, &game.id, "reveal", 4, 0);
    assert_eq!(status, Status::BadRequest);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid argument"));

    let response = client
        .post(format!("/games/{}/reveal", game.id))
        .json(&json!({"position": {"x": 1}}))
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let error: ErrorResponse = response.into_json().unwrap();
    assert!(error.error.starts_with("Missing argument"));
}

#[test]
fn inclusive_upper_bound_is_accepted() {
    let client = client();
    let game = start(&client, 3, 3, 9);

    let (status, body) = act(&client, &game.id, "reveal", 3, 0);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["cells"], json!([]));
    assert_eq!(body["finished"], false);
}

#[test]
fn malformed_body_is_a_client_error() {
    let client = client();
    let response = client
        .post("/games")
        .header(rocket::http::ContentType::JSON)
        .body("{not json")
        .dispatch();
    assert!(response.status().class().is_client_error());
    let error: ErrorResponse = response.into_json().unwrap();
    assert!(!error.error.is_empty());
}

#[test]
fn unknown_route_is_json_404() {
    let client = client();
    let response = client.get("/nowhere").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    let error: ErrorResponse = response.into_json().unwrap();
    assert_eq!(error.error, "Not found");
}
