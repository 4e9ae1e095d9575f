//! Translate a snapshot transition into remote document writes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use dataroom_core::result::AppResult;
use dataroom_core::types::Collection;
use dataroom_entity::{Preferences, Snapshot};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One document write against the remote store.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteWrite {
    /// Create or replace a document.
    Set {
        collection: Collection,
        id: Uuid,
        doc: Value,
    },
    /// Merge-patch the changed fields of a document.
    Update {
        collection: Collection,
        id: Uuid,
        patch: Value,
    },
    /// Remove a document.
    Delete { collection: Collection, id: Uuid },
}

impl RemoteWrite {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Set { collection, .. }
            | Self::Update { collection, .. }
            | Self::Delete { collection, .. } => *collection,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Set { id, .. } | Self::Update { id, .. } | Self::Delete { id, .. } => *id,
        }
    }
}

impl fmt::Display for RemoteWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Set { .. } => "set",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        };
        write!(f, "{verb} {}/{}", self.collection(), self.id())
    }
}

/// Writes that turn the remote state of `before` into `after`.
///
/// Documents are compared in their serialized form, so content handles
/// (never serialized) do not produce writes.
pub fn plan_writes(before: &Snapshot, after: &Snapshot) -> AppResult<Vec<RemoteWrite>> {
    let mut writes = Vec::new();
    diff_collection(Collection::Rooms, &before.rooms, &after.rooms, &mut writes)?;
    diff_collection(Collection::Folders, &before.folders, &after.folders, &mut writes)?;
    diff_collection(Collection::Files, &before.files, &after.files, &mut writes)?;
    Ok(writes)
}

/// Merge patch for the preference document, if the active pointers moved.
pub fn preference_patch(before: &Snapshot, after: &Snapshot) -> AppResult<Option<Value>> {
    if before.active_room_id == after.active_room_id
        && before.active_folder_id == after.active_folder_id
    {
        return Ok(None);
    }
    let preferences = Preferences {
        active_room_id: after.active_room_id,
        active_folder_id: after.active_folder_id,
    };
    Ok(Some(serde_json::to_value(preferences)?))
}

fn diff_collection<K, T>(
    collection: Collection,
    before: &HashMap<K, T>,
    after: &HashMap<K, T>,
    writes: &mut Vec<RemoteWrite>,
) -> AppResult<()>
where
    K: Copy + Eq + Hash + Into<Uuid>,
    T: Serialize + PartialEq,
{
    let mut sets = BTreeMap::new();
    let mut updates = BTreeMap::new();
    for (key, entity) in after {
        let id: Uuid = (*key).into();
        match before.get(key) {
            None => {
                sets.insert(id, serde_json::to_value(entity)?);
            }
            Some(old) if old != entity => {
                let patch = field_patch(&serde_json::to_value(old)?, &serde_json::to_value(entity)?);
                if patch.as_object().is_some_and(|fields| !fields.is_empty()) {
                    updates.insert(id, patch);
                }
            }
            Some(_) => {}
        }
    }
    let mut deletes: Vec<Uuid> = before
        .keys()
        .filter(|key| !after.contains_key(*key))
        .map(|key| (*key).into())
        .collect();
    deletes.sort();

    writes.extend(
        sets.into_iter()
            .map(|(id, doc)| RemoteWrite::Set { collection, id, doc }),
    );
    writes.extend(
        updates
            .into_iter()
            .map(|(id, patch)| RemoteWrite::Update { collection, id, patch }),
    );
    writes.extend(
        deletes
            .into_iter()
            .map(|id| RemoteWrite::Delete { collection, id }),
    );
    Ok(())
}

/// Top-level fields of `new` that differ from `old`; removed fields map to
/// null, as merge-patch deletion requires.
fn field_patch(old: &Value, new: &Value) -> Value {
    let (Some(old), Some(new)) = (old.as_object(), new.as_object()) else {
        return new.clone();
    };
    let mut patch = Map::new();
    for (key, value) in new {
        if old.get(key) != Some(value) {
            patch.insert(key.clone(), value.clone());
        }
    }
    for key in old.keys() {
        if !new.contains_key(key) {
            patch.insert(key.clone(), Value::Null);
        }
    }
    Value::Object(patch)
}
