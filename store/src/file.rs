use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use sapper_core::{GameStatus, Move};
use sapper_protocol::GameId;
use tempfile::NamedTempFile;

use crate::*;

/// Store kept as a single JSON document on disk.
///
/// Each write is applied to a copy, written to a temporary file next to the
/// target and renamed over it. If any part fails the file and the in-memory
/// state both stay as they were.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No store at {}, starting empty", path.display());
                MemoryStore::new()
            }
            Err(err) => return Err(err.into()),
        };
        log::debug!("Opened store {} with {} games", path.display(), data.game_count());
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let value = op(&mut next)?;
        self.persist(&next)?;
        self.data = next;
        Ok(value)
    }

    fn persist(&self, data: &MemoryStore) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, data)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;
        log::trace!("Persisted store to {}", self.path.display());
        Ok(())
    }
}

impl GameStore for JsonFileStore {
    fn create_game(&mut self, game: NewGame) -> Result<GameId> {
        self.update(|data| data.create_game(game))
    }

    fn append_move(&mut self, id: GameId, mv: Move) -> Result<()> {
        self.update(|data| data.append_move(id, mv))
    }

    fn set_game_status(&mut self, id: GameId, status: GameStatus) -> Result<()> {
        self.update(|data| data.set_game_status(id, status))
    }

    fn get_game(&self, id: GameId) -> Result<GameRecord> {
        self.data.get_game(id)
    }

    fn get_moves(&self, id: GameId) -> Result<Vec<Move>> {
        self.data.get_moves(id)
    }

    fn list_games(&self) -> Result<Vec<GameRecord>> {
        self.data.list_games()
    }
}
