use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use dashmap::{DashMap, Entry};
use minesweeper_common::{
    models::{BoardSize, CellStatus, CellView, Dimensions},
    protocol::GameResponse,
};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Board, Cell, Minesweeper},
    error::{GameError, Result},
    logic::validate_start,
};

/// Stored form of a game, one JSON document per id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    pub id: String,
    pub size: Dimensions,
    pub bombs: usize,
    pub board: Board,
    pub finished: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl GameDocument {
    fn new(id: String, bombs: usize, game: Minesweeper) -> Self {
        Self {
            id,
            size: game.board.dimensions(),
            bombs,
            board: game.board,
            finished: game.finished,
            started_at: game.started_at,
            finished_at: game.finished_at,
        }
    }

    fn into_game(self) -> (GameHeader, Minesweeper) {
        let header = GameHeader {
            id: self.id,
            bombs: self.bombs,
        };
        let game = Minesweeper {
            board: self.board,
            started_at: self.started_at,
            finished: self.finished,
            finished_at: self.finished_at,
        };
        (header, game)
    }

    /// Client view of the document: only cells that are no longer hidden.
    pub fn to_response(&self) -> GameResponse {
        self.respond_with(
            self.board
                .cells()
                .filter(|cell| cell.status() != CellStatus::Hidden),
        )
    }

    pub fn respond_with<'a>(&self, cells: impl IntoIterator<Item = &'a Cell>) -> GameResponse {
        GameResponse {
            id: self.id.clone(),
            size: self.size,
            bombs: self.bombs,
            started_at: self.started_at,
            finished: self.finished,
            finished_at: self.finished_at,
            cells: cells.into_iter().map(CellView::from).collect(),
        }
    }
}

struct GameHeader {
    id: String,
    bombs: usize,
}

struct StoredGame {
    document: String,
    finished: bool,
    last_activity: Instant,
}

impl StoredGame {
    fn new(document: &GameDocument) -> Result<Self> {
        Ok(Self {
            document: serde_json::to_string(document)?,
            finished: document.finished,
            last_activity: Instant::now(),
        })
    }

    fn load(&self) -> Result<GameDocument> {
        Ok(serde_json::from_str(&self.document)?)
    }

    fn save(&mut self, document: &GameDocument) -> Result<()> {
        self.document = serde_json::to_string(document)?;
        self.finished = document.finished;
        self.last_activity = Instant::now();
        Ok(())
    }

    fn should_cleanup(&self, finished_timeout_secs: u64, inactive_timeout_secs: u64) -> bool {
        let elapsed = Instant::now()
            .duration_since(self.last_activity)
            .as_secs();

        if self.finished {
            elapsed > finished_timeout_secs
        } else {
            elapsed > inactive_timeout_secs
        }
    }
}

/// In-memory document store for games. Each game sits behind its own lock,
/// so a load-mutate-save cycle on one id never interleaves with another.
#[derive(Clone, Default)]
pub struct GameStore {
    games: Arc<DashMap<String, Arc<Mutex<StoredGame>>>>,
    max_cells: Option<usize>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cells(max_cells: usize) -> Self {
        Self {
            games: Arc::default(),
            max_cells: Some(max_cells),
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Validates, starts and persists a new game.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&self, size: Option<&BoardSize>, bomb_count: Option<i64>) -> Result<GameDocument> {
        let (dimensions, bombs) = validate_start(size, bomb_count)?;
        if let Some(max_cells) = self.max_cells
            && dimensions.columns.saturating_mul(dimensions.rows) > max_cells
        {
            return Err(GameError::InvalidArgument(format!(
                "the board may not have more than {max_cells} cells"
            )));
        }

        let game = Minesweeper::start_validated(dimensions, bombs, &mut rand::rng());
        let mut id_length = 5;
        let max_attempts_per_length = 10;

        loop {
            for _ in 0..max_attempts_per_length {
                let id = nanoid!(id_length);
                match self.games.entry(id.clone()) {
                    Entry::Occupied(_) => {
                        debug!("Game ID collision, trying another: {}", id);
                        continue;
                    }
                    Entry::Vacant(entry) => {
                        let document = GameDocument::new(id, bombs, game);
                        entry.insert(Arc::new(Mutex::new(StoredGame::new(&document)?)));
                        info!("Created new game with ID: {}", document.id);
                        return Ok(document);
                    }
                }
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }

    fn entry(&self, id: &str) -> Result<Arc<Mutex<StoredGame>>> {
        match self.games.get(id) {
            Some(value) => Ok(value.value().clone()),
            None => Err(GameError::NotFound(id.to_string())),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub async fn find(&self, id: &str) -> Result<GameDocument> {
        let stored = self.entry(id)?;
        let stored = stored.lock().await;
        stored.load()
    }

    /// Loads a game, applies `action` and saves the board and finish state
    /// back. The document is left untouched when `action` fails.
    #[instrument(level = "trace", skip(self, action))]
    pub async fn update<T, F>(&self, id: &str, action: F) -> Result<(GameDocument, T)>
    where
        F: FnOnce(&mut Minesweeper) -> Result<T>,
    {
        let stored = self.entry(id)?;
        let mut stored = stored.lock().await;

        let (header, mut game) = stored.load()?.into_game();
        let was_finished = game.finished;
        let output = action(&mut game)?;

        let document = GameDocument::new(header.id, header.bombs, game);
        if was_finished {
            debug!("Game {} already finished, nothing to save", document.id);
            return Ok((document, output));
        }
        stored.save(&document)?;
        if document.finished {
            debug!("Game {} is finished", document.id);
        }
        Ok((document, output))
    }

    /// Removes games that have been idle past their timeout. Games that are
    /// currently locked are skipped.
    pub fn remove_stale(&self, finished_timeout_secs: u64, inactive_timeout_secs: u64) -> usize {
        let mut games_to_remove = Vec::new();

        for entry in self.games.iter() {
            if let Ok(stored) = entry.value().try_lock()
                && stored.should_cleanup(finished_timeout_secs, inactive_timeout_secs)
            {
                games_to_remove.push(entry.key().clone());
            }
        }

        let removed_count = games_to_remove.len();
        for game_id in games_to_remove {
            self.games.remove(&game_id);
            debug!("Cleaned up game: {}", game_id);
        }
        removed_count
    }
}
