//! Local writes waiting for their feed echo.
//!
//! The remote store republishes a whole collection after every document
//! write, so a commit of several writes produces intermediate deliveries
//! that predate the final state. Until a delivery shows a written document
//! the way it was committed, the committed version is laid over what
//! arrived.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use dataroom_core::result::AppResult;
use dataroom_core::types::{Collection, FileId, FolderId, RoomId};
use dataroom_entity::Snapshot;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::plan::RemoteWrite;

/// Committed documents per collection whose echo has not arrived yet.
///
/// `None` marks a document the commit deleted.
#[derive(Debug, Clone, Default)]
pub struct PendingWrites {
    expected: HashMap<Collection, BTreeMap<Uuid, Option<Value>>>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the documents `writes` leave behind in `committed`.
    pub fn record(&mut self, writes: &[RemoteWrite], committed: &Snapshot) -> AppResult<()> {
        for write in writes {
            let (collection, id) = (write.collection(), write.id());
            let document = match write {
                RemoteWrite::Delete { .. } => None,
                RemoteWrite::Set { .. } | RemoteWrite::Update { .. } => {
                    committed_document(committed, collection, id)?
                }
            };
            self.expected
                .entry(collection)
                .or_default()
                .insert(id, document);
        }
        Ok(())
    }

    /// The documents to merge for one delivery.
    ///
    /// Expectations the delivery already reflects are settled; the rest
    /// are laid over it.
    pub fn reconcile<'d>(
        &mut self,
        collection: Collection,
        documents: &'d BTreeMap<Uuid, Value>,
    ) -> Cow<'d, BTreeMap<Uuid, Value>> {
        let Some(expected) = self.expected.get_mut(&collection) else {
            return Cow::Borrowed(documents);
        };
        expected.retain(|id, document| !reflects(documents.get(id), document.as_ref()));
        if expected.is_empty() {
            self.expected.remove(&collection);
            debug!(%collection, "Local writes confirmed by feed");
            return Cow::Borrowed(documents);
        }

        let mut merged = documents.clone();
        for (id, document) in expected.iter() {
            match document {
                Some(document) => {
                    merged.insert(*id, document.clone());
                }
                None => {
                    merged.remove(id);
                }
            }
        }
        debug!(
            %collection,
            pending = expected.len(),
            "Delivery predates local writes"
        );
        Cow::Owned(merged)
    }

    /// Number of unconfirmed documents in one collection.
    pub fn pending(&self, collection: Collection) -> usize {
        self.expected.get(&collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Forget every expectation, as when the session ends.
    pub fn clear(&mut self) {
        self.expected.clear();
    }
}

fn committed_document(
    snapshot: &Snapshot,
    collection: Collection,
    id: Uuid,
) -> AppResult<Option<Value>> {
    let document = match collection {
        Collection::Rooms => snapshot
            .rooms
            .get(&RoomId::from_uuid(id))
            .map(serde_json::to_value),
        Collection::Folders => snapshot
            .folders
            .get(&FolderId::from_uuid(id))
            .map(serde_json::to_value),
        Collection::Files => snapshot
            .files
            .get(&FileId::from_uuid(id))
            .map(serde_json::to_value),
    };
    Ok(document.transpose()?)
}

/// Whether a delivered document matches the committed one. Merge patches
/// drop `null` members, so those are ignored on both sides.
fn reflects(delivered: Option<&Value>, committed: Option<&Value>) -> bool {
    match (delivered, committed) {
        (None, None) => true,
        (Some(delivered), Some(committed)) => without_nulls(delivered) == without_nulls(committed),
        _ => false,
    }
}

fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(_, field)| !field.is_null())
                .map(|(key, field)| (key.clone(), without_nulls(field)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}
