//! The canonical entity store.
//!
//! [`EntityStore`] owns every user and group behind a single mutex. Reads
//! hand out deep copies; writes go through [`EntityStore::apply_delta`],
//! which holds the lock for the whole read-modify-write so concurrent
//! writers can never interleave inside one group update.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use murmur_shared::{GroupId, UserId};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::{Group, User};

/// Everything guarded by the store lock.
#[derive(Debug, Default)]
pub(crate) struct Entities {
    /// User directory, ordered by id.
    pub(crate) users: BTreeMap<UserId, User>,
    /// Groups in the order they entered the store.
    pub(crate) groups: Vec<Group>,
}

impl Entities {
    fn group_mut(&mut self, id: &GroupId) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| StoreError::GroupNotFound(id.clone()))
    }
}

/// Thread-safe holder of canonical state.
#[derive(Debug, Default)]
pub struct EntityStore {
    inner: Mutex<Entities>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Entities>> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Deep copy of every group. Mutating the result never affects
    /// canonical state.
    pub fn snapshot(&self) -> Result<Vec<Group>> {
        Ok(self.lock()?.groups.clone())
    }

    /// Deep copy of a single group.
    pub fn group(&self, id: &GroupId) -> Result<Group> {
        self.lock()?
            .groups
            .iter()
            .find(|g| &g.id == id)
            .cloned()
            .ok_or_else(|| StoreError::GroupNotFound(id.clone()))
    }

    pub fn contains_group(&self, id: &GroupId) -> Result<bool> {
        Ok(self.lock()?.groups.iter().any(|g| &g.id == id))
    }

    pub fn group_count(&self) -> Result<usize> {
        Ok(self.lock()?.groups.len())
    }

    /// Run `reader` against borrowed canonical state without cloning it.
    pub fn read<T>(&self, reader: impl FnOnce(&[Group], &BTreeMap<UserId, User>) -> T) -> Result<T> {
        let guard = self.lock()?;
        Ok(reader(&guard.groups, &guard.users))
    }

    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Add a group. It is normalized first (see [`Group::normalize`]), so
    /// a group from outside cannot break the store invariants. Its members
    /// are registered in the user directory (existing directory entries win).
    pub fn insert_group(&self, mut group: Group) -> Result<()> {
        let mut guard = self.lock()?;
        if guard.groups.iter().any(|g| g.id == group.id) {
            return Err(StoreError::DuplicateGroupId(group.id));
        }
        group.normalize();

        for member in &group.members {
            guard
                .users
                .entry(member.id.clone())
                .or_insert_with(|| member.clone());
        }

        info!(
            group = %group.id,
            name = %group.name,
            members = group.members.len(),
            messages = group.messages.len(),
            "Group added"
        );
        guard.groups.push(group);
        Ok(())
    }

    /// Apply a change to one group atomically.
    ///
    /// Fails with `GroupNotFound` if the group is absent. The mutator runs
    /// with the lock held; it must check its preconditions before touching
    /// the group so that a returned error leaves the group unchanged.
    pub fn apply_delta<T, E>(
        &self,
        group_id: &GroupId,
        mutator: impl FnOnce(&mut Group) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.lock()?;
        let group = guard.group_mut(group_id)?;
        let result = mutator(group);
        debug!(group = %group_id, ok = result.is_ok(), "Delta applied");
        result
    }
}
