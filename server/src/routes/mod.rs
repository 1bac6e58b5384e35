use minesweeper_common::{
    models::Position,
    protocol::{
        CellActionRequest, ErrorResponse, GameResponse, StartGameRequest, StartGameResponse,
        StatusResponse,
    },
};
use rocket::{
    Request, State, catch, get,
    http::Status,
    post,
    response::{self, Responder},
    serde::json::Json,
};
use tracing::{error, info, instrument, warn};

use crate::{
    data::{Cell, Minesweeper},
    error::{GameError, Result as GameResult},
    rate_limit::{ClientIp, RateLimiter},
    store::GameStore,
};

#[derive(Debug)]
pub enum ApiError {
    Game(GameError),
    RateLimited,
}

impl From<GameError> for ApiError {
    fn from(value: GameError) -> Self {
        Self::Game(value)
    }
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            ApiError::Game(GameError::NotFound(_)) => Status::NotFound,
            ApiError::Game(GameError::MissingArgument(_) | GameError::InvalidArgument(_)) => {
                Status::BadRequest
            }
            ApiError::Game(GameError::Storage(_)) => Status::InternalServerError,
            ApiError::RateLimited => Status::TooManyRequests,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Game(GameError::Storage(_)) => "Internal server error".to_string(),
            ApiError::Game(error) => error.to_string(),
            ApiError::RateLimited => "Too many games created, try again later".to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("Request failed: {:?}", self);
        }
        (status, Json(ErrorResponse { error: self.message() })).respond_to(request)
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[get("/status")]
pub fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
    })
}

#[post("/games", data = "<request>")]
#[instrument(level = "trace", skip(store, rate_limiter), fields(client_ip = %client_ip.0))]
pub fn start_game(
    request: Json<StartGameRequest>,
    store: &State<GameStore>,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
) -> ApiResult<StartGameResponse> {
    info!(
        "Game creation request from {}: {:?}x{:?} with {:?} bombs",
        client_ip.0, request.columns, request.rows, request.bomb_count
    );

    if !rate_limiter.check(&client_ip) {
        warn!("Rate limit exceeded for client {}", client_ip.0);
        return Err(ApiError::RateLimited);
    }

    let document = store
        .create(Some(&request.size()), request.bomb_count)
        .inspect_err(|e| warn!("Rejected game creation from {}: {}", client_ip.0, e))?;

    info!(
        "Successfully created game {} for client {}",
        document.id, client_ip.0
    );
    Ok(Json(StartGameResponse {
        id: document.id,
        size: document.size,
        bombs: document.bombs,
        started_at: document.started_at,
    }))
}

#[get("/games/<id>")]
#[instrument(level = "trace", skip(store))]
pub async fn find_game(id: &str, store: &State<GameStore>) -> ApiResult<GameResponse> {
    let document = store
        .find(id)
        .await
        .inspect_err(|e| warn!("Lookup of game {} failed: {}", id, e))?;
    Ok(Json(document.to_response()))
}

async fn apply(
    store: &GameStore,
    id: &str,
    request: CellActionRequest,
    action: fn(&mut Minesweeper, &Position) -> GameResult<Option<Vec<Cell>>>,
) -> ApiResult<GameResponse> {
    let position = request.position.unwrap_or_default();
    let (document, touched) = store
        .update(id, |game| action(game, &position))
        .await
        .inspect_err(|e| warn!("Action on game {} failed: {}", id, e))?;

    let touched = touched.unwrap_or_default();
    if document.finished {
        info!("Game {} finished at {:?}", id, document.finished_at);
    }
    Ok(Json(document.respond_with(&touched)))
}

#[post("/games/<id>/reveal", data = "<request>")]
#[instrument(level = "trace", skip(store, request))]
pub async fn reveal_cell(
    id: &str,
    request: Json<CellActionRequest>,
    store: &State<GameStore>,
) -> ApiResult<GameResponse> {
    apply(store, id, request.into_inner(), Minesweeper::reveal_cell).await
}

#[post("/games/<id>/bomb", data = "<request>")]
#[instrument(level = "trace", skip(store, request))]
pub async fn mark_as_bomb(
    id: &str,
    request: Json<CellActionRequest>,
    store: &State<GameStore>,
) -> ApiResult<GameResponse> {
    apply(store, id, request.into_inner(), Minesweeper::mark_cell_as_bomb).await
}

#[post("/games/<id>/question", data = "<request>")]
#[instrument(level = "trace", skip(store, request))]
pub async fn mark_as_question(
    id: &str,
    request: Json<CellActionRequest>,
    store: &State<GameStore>,
) -> ApiResult<GameResponse> {
    apply(store, id, request.into_inner(), Minesweeper::mark_cell_as_question).await
}

#[catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Malformed request".to_string(),
    })
}

#[catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Not found".to_string(),
    })
}

#[catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Malformed request body".to_string(),
    })
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Internal server error".to_string(),
    })
}
