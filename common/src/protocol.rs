use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BoardSize, CellView, Dimensions, Position};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[serde(default, alias = "x")]
    pub columns: Option<i64>,
    #[serde(default, alias = "y")]
    pub rows: Option<i64>,
    #[serde(default, alias = "bombs")]
    pub bomb_count: Option<i64>,
}

impl StartGameRequest {
    pub fn size(&self) -> BoardSize {
        BoardSize {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    pub id: String,
    pub size: Dimensions,
    pub bombs: usize,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CellActionRequest {
    #[serde(default)]
    pub position: Option<Position>,
}

/// Game envelope returned by the lookup and by every cell action.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub size: Dimensions,
    pub bombs: usize,
    pub started_at: DateTime<Utc>,
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
