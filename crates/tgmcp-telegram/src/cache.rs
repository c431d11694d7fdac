//! Entities seen on the current connection.
//!
//! Bare ids can only be resolved through the dialog list, so every entity a
//! scan or listing passes over is kept here and later references skip the scan.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use tgmcp_core::domain::Entity;

#[derive(Default)]
struct Known {
    /// Keyed by marked id, which is unique across entity kinds.
    by_id: HashMap<i64, Entity>,
    /// Lowercased usernames.
    by_handle: HashMap<String, Entity>,
}

#[derive(Default)]
pub struct EntityCache {
    known: Mutex<Known>,
}

impl EntityCache {
    fn known(&self) -> MutexGuard<'_, Known> {
        self.known.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn remember(&self, entity: &Entity) {
        let username = match entity {
            Entity::User(u) => u.username.as_deref(),
            Entity::Channel(c) => c.username.as_deref(),
            Entity::Group(_) => None,
            Entity::Other { .. } => return,
        };
        let mut known = self.known();
        if let Some(name) = username {
            known
                .by_handle
                .insert(name.to_ascii_lowercase(), entity.clone());
        }
        known.by_id.insert(entity.marked_id(), entity.clone());
    }

    /// A marked id matches exactly; a bare id matches the first entity with that id.
    pub fn by_id(&self, id: i64) -> Option<Entity> {
        let known = self.known();
        known
            .by_id
            .get(&id)
            .or_else(|| known.by_id.values().find(|e| e.matches_id(id)))
            .cloned()
    }

    pub fn by_handle(&self, handle: &str) -> Option<Entity> {
        self.known()
            .by_handle
            .get(&handle.to_ascii_lowercase())
            .cloned()
    }

    pub fn clear(&self) {
        *self.known() = Known::default();
    }
}
