// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot schema migrations.
//!
//! Snapshots are migrated as raw JSON before they are deserialized, so
//! nothing past the loader ever sees an old shape.

use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("snapshot version {0} is newer than supported version {1}")]
    TooNew(u32, u32),
    #[error("no migration path from version {0} to {1}")]
    NoPath(u32, u32),
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

pub trait Migration: Send + Sync {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError>;
}

pub struct MigrationRegistry {
    pub(crate) migrations: Vec<Box<dyn Migration>>,
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self { migrations: vec![Box::new(MaintenanceSlotsToTickets)] }
    }

    /// Step `snapshot` forward one migration at a time until it reaches
    /// `target`.
    pub fn migrate_to(&self, snapshot: Value, target: u32) -> Result<Value, MigrationError> {
        let mut snapshot = wrap_bare_state(snapshot);
        let mut version = version_of(&snapshot)?;

        if version > target {
            return Err(MigrationError::TooNew(version, target));
        }
        while version < target {
            let step = self
                .migrations
                .iter()
                .find(|m| m.source_version() == version)
                .ok_or(MigrationError::NoPath(version, target))?;
            step.migrate(&mut snapshot)?;
            version = step.target_version();
            if let Some(obj) = snapshot.as_object_mut() {
                obj.insert("v".into(), version.into());
            }
        }
        Ok(snapshot)
    }
}

fn version_of(snapshot: &Value) -> Result<u32, MigrationError> {
    snapshot
        .get("v")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| MigrationError::Malformed("missing version".into()))
}

/// Early builds persisted the bare board (`{"slots": ..}`) with no
/// envelope. Treat that shape as a version 1 snapshot at log position 0.
fn wrap_bare_state(snapshot: Value) -> Value {
    let bare = snapshot.get("v").is_none()
        && (snapshot.get("slots").is_some() || snapshot.get("tickets").is_some());
    if !bare {
        return snapshot;
    }
    json!({
        "v": 1,
        "seq": 0,
        "state": snapshot,
        "created_at": chrono::Utc::now(),
    })
}

const MAINTENANCE: &str = "maintenance";

/// v1 → v2: maintenance moved from a single call slot per cell to a list
/// of tickets. A waiting slot becomes one open ticket under the same id.
struct MaintenanceSlotsToTickets;

impl Migration for MaintenanceSlotsToTickets {
    fn source_version(&self) -> u32 {
        1
    }

    fn target_version(&self) -> u32 {
        2
    }

    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError> {
        let state = snapshot
            .get_mut("state")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| MigrationError::Malformed("state is not an object".into()))?;

        let legacy = state
            .get_mut("slots")
            .and_then(Value::as_object_mut)
            .and_then(|slots| slots.remove(MAINTENANCE));

        let tickets = state.entry("tickets").or_insert_with(|| Value::Object(Map::new()));
        let tickets = tickets
            .as_object_mut()
            .ok_or_else(|| MigrationError::Malformed("tickets is not an object".into()))?;

        let Some(Value::Object(cells)) = legacy else {
            return Ok(());
        };
        for (cell, slot) in cells {
            let Some(ticket) = ticket_from_slot(&slot) else {
                continue;
            };
            let list = tickets.entry(cell).or_insert_with(|| Value::Array(Vec::new()));
            if let Some(list) = list.as_array_mut() {
                list.push(ticket);
            }
        }
        Ok(())
    }
}

fn ticket_from_slot(slot: &Value) -> Option<Value> {
    if slot.get("status").and_then(Value::as_str) != Some("WAITING") {
        return None;
    }
    let id = slot.get("call_id").and_then(Value::as_str)?;
    let created = slot.get("requested_at_ms").and_then(Value::as_u64).unwrap_or(0);
    let mut ticket = json!({
        "ticket_id": id,
        "status": "OPEN",
        "created_at_ms": created,
        "priority": "Medium",
    });
    if let (Some(obj), Some(work_order)) = (ticket.as_object_mut(), slot.get("work_order")) {
        obj.insert("work_order".into(), work_order.clone());
    }
    Some(ticket)
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
