//! In-memory tournament store. Every mutation is a read-modify-write of one
//! whole tournament record under the write lock.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Tournaments by id.
#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TournamentId, Tournament>>, TournamentError> {
        self.tournaments
            .read()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, Tournament>>, TournamentError> {
        self.tournaments
            .write()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    /// Store a new tournament and return its id.
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, TournamentError> {
        let id = tournament.id;
        self.write()?.insert(id, tournament);
        Ok(id)
    }

    /// Snapshot of one tournament.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or(TournamentError::NotFound(id))
    }

    /// Snapshots of all tournaments, newest first.
    pub fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let mut all: Vec<Tournament> = self.read()?.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    pub fn remove(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.write()?.remove(&id).ok_or(TournamentError::NotFound(id))
    }

    /// Run `f` against a working copy of tournament `id` and commit the copy
    /// only if `f` succeeds. Concurrent transactions on the store serialize,
    /// and a failed `f` leaves the stored record exactly as it was.
    ///
    /// Returns `f`'s value together with the committed record.
    pub fn transact<T, F>(&self, id: TournamentId, f: F) -> Result<(T, Tournament), TournamentError>
    where
        F: FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    {
        let mut guard = self.write()?;
        let stored = guard.get_mut(&id).ok_or(TournamentError::NotFound(id))?;
        let mut working = stored.clone();
        let value = f(&mut working)?;
        *stored = working.clone();
        Ok((value, working))
    }
}
