use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visible state of a single cell.
///
/// On the wire a status travels as its numeric code (`HIDDEN` = 1 up to
/// `REVEALED` = 4). The upper-case tag names parse through [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CellStatus {
    Hidden,
    Question,
    BombMark,
    Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cell status not supported: {0}")]
pub struct UnsupportedStatus(pub String);

impl CellStatus {
    pub const ALL: [CellStatus; 4] = [
        CellStatus::Hidden,
        CellStatus::Question,
        CellStatus::BombMark,
        CellStatus::Revealed,
    ];

    pub fn code(self) -> u8 {
        match self {
            CellStatus::Hidden => 1,
            CellStatus::Question => 2,
            CellStatus::BombMark => 3,
            CellStatus::Revealed => 4,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            CellStatus::Hidden => "HIDDEN",
            CellStatus::Question => "QUESTION",
            CellStatus::BombMark => "BOMB_MARK",
            CellStatus::Revealed => "REVEALED",
        }
    }
}

impl From<CellStatus> for u8 {
    fn from(status: CellStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for CellStatus {
    type Error = UnsupportedStatus;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        CellStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| UnsupportedStatus(code.to_string()))
    }
}

impl FromStr for CellStatus {
    type Err = UnsupportedStatus;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        CellStatus::ALL
            .into_iter()
            .find(|status| status.tag() == tag)
            .ok_or_else(|| UnsupportedStatus(tag.to_string()))
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Board size as requested by a caller. Either field may be absent or
/// out of range; validation happens when a game is started.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardSize {
    pub columns: Option<i64>,
    pub rows: Option<i64>,
}

/// Cell coordinates as requested by a caller.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Dimensions of an existing board.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub columns: usize,
    pub rows: usize,
}

impl Dimensions {
    pub fn cell_count(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }
}

/// What a client may learn about a cell. The bomb count is only present
/// once the cell is revealed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub status: CellStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bomb_count: Option<i8>,
}
