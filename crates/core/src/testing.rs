//! In-memory implementations of the persistence traits for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration, TimeZone, Utc};
use serde::Serialize;

use crate::entity::{EntityKind, EntityRef, Identified, UserId};
use crate::favorites::Favorite;
use crate::search::Page;
use crate::store::{EntityCatalog, FavoriteStore, InsertOutcome};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
#[error("memory store failure: {0}")]
pub struct MemoryError(pub String);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub kind: EntityKind,
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip)]
    pub target: EntityRef,
    pub name: String,
}

impl Identified for Record {
    fn entity_ref(&self) -> EntityRef {
        self.target
    }
}

#[derive(Default)]
struct State {
    users: HashSet<DbId>,
    entities: Vec<Hit>,
    favorites: Vec<Favorite>,
    next_favorite_id: DbId,
    failing: HashSet<EntityKind>,
    lose_insert_race: bool,
    drop_user_before_insert: bool,
    searched: Vec<EntityKind>,
}

/// A single store backing both traits.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_users(ids: &[DbId]) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().users.extend(ids);
        store
    }

    pub fn add_entity(&self, kind: EntityKind, id: DbId, name: &str) {
        self.state.lock().unwrap().entities.push(Hit {
            kind,
            id,
            name: name.to_string(),
        });
    }

    pub fn remove_entity(&self, kind: EntityKind, id: DbId) {
        self.state
            .lock()
            .unwrap()
            .entities
            .retain(|e| !(e.kind == kind && e.id == id));
    }

    /// Make every catalog call for `kind` fail.
    pub fn fail_kind(&self, kind: EntityKind) {
        self.state.lock().unwrap().failing.insert(kind);
    }

    /// Make the next inserts behave as if a concurrent insert won.
    pub fn lose_insert_race(&self) {
        self.state.lock().unwrap().lose_insert_race = true;
    }

    /// Make the next inserts behave as if the user was deleted after the
    /// existence check.
    pub fn drop_user_before_insert(&self) {
        self.state.lock().unwrap().drop_user_before_insert = true;
    }

    /// Number of trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn searched_kinds(&self) -> Vec<EntityKind> {
        self.state.lock().unwrap().searched.clone()
    }

    pub fn favorite_count(&self) -> usize {
        self.state.lock().unwrap().favorites.len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check(&self, state: &State, kind: EntityKind) -> Result<(), MemoryError> {
        if state.failing.contains(&kind) {
            Err(MemoryError(format!("{kind} table unavailable")))
        } else {
            Ok(())
        }
    }

    fn matching<'a>(state: &'a State, kind: EntityKind, pattern: &str) -> Vec<&'a Hit> {
        let needle = unescape(pattern).to_lowercase();
        let mut hits: Vec<&Hit> = state
            .entities
            .iter()
            .filter(|e| e.kind == kind && e.name.to_lowercase().contains(&needle))
            .collect();
        hits.sort_by(|a, b| b.id.cmp(&a.id));
        hits
    }
}

/// Undo [`crate::search::contains_pattern`].
fn unescape(pattern: &str) -> String {
    let inner = &pattern[1..pattern.len() - 1];
    let mut out = String::new();
    let mut escaped = false;
    for c in inner.chars() {
        if c == '\\' && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        out.push(c);
    }
    out
}

impl FavoriteStore for MemoryStore {
    type Error = MemoryError;

    async fn user_exists(&self, user_id: UserId) -> Result<bool, MemoryError> {
        self.touch();
        Ok(self.state.lock().unwrap().users.contains(&user_id.get()))
    }

    async fn find_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> Result<Option<Favorite>, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.target == target)
            .cloned())
    }

    async fn insert_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> Result<InsertOutcome, MemoryError> {
        self.touch();
        let mut state = self.state.lock().unwrap();
        if state.drop_user_before_insert {
            state.users.remove(&user_id.get());
        }
        if !state.users.contains(&user_id.get()) {
            return Ok(InsertOutcome::UserMissing);
        }
        if state.lose_insert_race
            || state
                .favorites
                .iter()
                .any(|f| f.user_id == user_id && f.target == target)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        state.next_favorite_id += 1;
        let id = state.next_favorite_id;
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let favorite = Favorite {
            id,
            user_id,
            target,
            created_at: base + Duration::seconds(id),
        };
        state.favorites.push(favorite.clone());
        Ok(InsertOutcome::Inserted(favorite))
    }

    async fn delete_favorite(&self, id: DbId) -> Result<bool, MemoryError> {
        self.touch();
        let mut state = self.state.lock().unwrap();
        let before = state.favorites.len();
        state.favorites.retain(|f| f.id != id);
        Ok(state.favorites.len() < before)
    }

    async fn list_favorites(
        &self,
        user_id: UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<Favorite>, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        let mut favorites: Vec<Favorite> = state
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id && kind.map_or(true, |k| f.target.kind() == k))
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(favorites)
    }

    async fn count_favorites(&self, user_id: UserId) -> Result<Vec<(EntityKind, i64)>, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        let mut counts = Vec::new();
        for kind in EntityKind::ALL {
            let n = state
                .favorites
                .iter()
                .filter(|f| f.user_id == user_id && f.target.kind() == kind)
                .count();
            if n > 0 {
                counts.push((kind, n as i64));
            }
        }
        Ok(counts)
    }
}

impl EntityCatalog for MemoryStore {
    type Error = MemoryError;
    type Hit = Hit;
    type Record = Record;

    async fn search(&self, kind: EntityKind, pattern: &str, page: Page) -> Result<Vec<Hit>, MemoryError> {
        self.touch();
        let mut state = self.state.lock().unwrap();
        self.check(&state, kind)?;
        state.searched.push(kind);
        Ok(Self::matching(&state, kind, pattern)
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_matches(&self, kind: EntityKind, pattern: &str) -> Result<i64, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        self.check(&state, kind)?;
        Ok(Self::matching(&state, kind, pattern).len() as i64)
    }

    async fn suggest_names(
        &self,
        kind: EntityKind,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<String>, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        self.check(&state, kind)?;
        Ok(Self::matching(&state, kind, pattern)
            .into_iter()
            .take(limit as usize)
            .map(|h| h.name.clone())
            .collect())
    }

    async fn fetch_by_ids(&self, kind: EntityKind, ids: &[DbId]) -> Result<Vec<Record>, MemoryError> {
        self.touch();
        let state = self.state.lock().unwrap();
        self.check(&state, kind)?;
        Ok(state
            .entities
            .iter()
            .filter(|e| e.kind == kind && ids.contains(&e.id))
            .map(|e| Record {
                target: EntityRef::from_parts(kind, e.id),
                name: e.name.clone(),
            })
            .collect())
    }
}
