// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout collection persistence.
//!
//! The whole collection is one JSON blob under [`keys::WORKOUTS`]:
//! `{"version": 1, "workouts": [...]}`. Every save rewrites the full blob.
//! A bare array of records (the unversioned layout) still loads.

use crate::db::{keys, KeyValueStore, StorageError};
use crate::models::WorkoutRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Current persisted format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct PersistedLogRef<'a> {
    version: u32,
    workouts: &'a [WorkoutRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedLog {
    Versioned {
        version: u32,
        workouts: Vec<WorkoutRecord>,
    },
    Unversioned(Vec<WorkoutRecord>),
}

/// Reads and writes the workout collection through a [`KeyValueStore`].
#[derive(Clone)]
pub struct WorkoutRepository {
    store: Arc<dyn KeyValueStore>,
}

impl WorkoutRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the stored collection with `workouts`, in order.
    pub fn save(&self, workouts: &[WorkoutRecord]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&PersistedLogRef {
            version: FORMAT_VERSION,
            workouts,
        })
        .map_err(|e| StorageError::Write(e.to_string()))?;

        self.store.set(keys::WORKOUTS, &blob)?;
        tracing::debug!(count = workouts.len(), "Workouts saved");
        Ok(())
    }

    /// Load the stored collection. An absent blob is an empty collection.
    pub fn load(&self) -> Result<Vec<WorkoutRecord>, StorageError> {
        let Some(blob) = self.store.get(keys::WORKOUTS)? else {
            return Ok(Vec::new());
        };

        let log: PersistedLog =
            serde_json::from_str(&blob).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        match log {
            PersistedLog::Versioned { version, workouts } if version == FORMAT_VERSION => {
                Ok(workouts)
            }
            PersistedLog::Versioned { version, .. } => {
                Err(StorageError::UnsupportedVersion(version))
            }
            PersistedLog::Unversioned(workouts) => {
                tracing::info!(
                    count = workouts.len(),
                    "Loaded unversioned workout blob; it will be upgraded on next save"
                );
                Ok(workouts)
            }
        }
    }

    /// Copy the raw stored blob to [`keys::WORKOUTS_UNREADABLE`] so a save
    /// does not destroy data this version cannot read. Returns whether a
    /// blob was copied.
    pub fn back_up_unreadable(&self) -> Result<bool, StorageError> {
        let Some(blob) = self.store.get(keys::WORKOUTS)? else {
            return Ok(false);
        };
        self.store.set(keys::WORKOUTS_UNREADABLE, &blob)?;
        tracing::warn!(
            key = keys::WORKOUTS_UNREADABLE,
            bytes = blob.len(),
            "Backed up unreadable workout blob"
        );
        Ok(true)
    }

    /// Remove the stored collection. Succeeds if nothing is stored.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::WORKOUTS)
    }
}
