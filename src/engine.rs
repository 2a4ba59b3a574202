use crate::collection::Collection;
use crate::document::Document;
use crate::errors::DbError;
use crate::types::CollectionName;
use crate::utils::json::{document_to_ext_json, ext_json_to_document};
use crate::wal::{OpKind, Wal, WalRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// The embedded document store: named collections, optionally backed by a WAL.
#[derive(Debug, Default)]
pub struct Engine {
    collections: RwLock<HashMap<CollectionName, Arc<Collection>>>,
    wal: Option<Arc<Wal>>,
}

impl Engine {
    /// A store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the WAL at `path`, replaying whatever it already holds.
    ///
    /// A damaged tail left by a crash is cut off before new records are appended.
    /// When the log holds superseded records it is compacted to one record per live item.
    ///
    /// # Errors
    /// Returns an error if the log cannot be read, repaired or opened for appending.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let replay = Wal::replay(path)?;
        let n = replay.records.len();
        let scratch = Self::in_memory();
        for rec in replay.records {
            scratch.apply_replayed(rec);
        }
        let snapshot = scratch.snapshot_records()?;
        if snapshot.len() < n {
            Wal::rewrite(path, &snapshot)?;
            log::info!("wal compacted: {n} records -> {}", snapshot.len());
        } else if replay.torn {
            Wal::truncate(path, replay.valid_len)?;
        }
        let wal = Arc::new(Wal::open(path)?);
        let engine = Self { collections: RwLock::new(HashMap::new()), wal: Some(wal) };
        for rec in snapshot {
            engine.apply_replayed(rec);
        }
        log::info!("engine opened at {} ({n} wal records replayed)", path.display());
        Ok(engine)
    }

    /// The records that rebuild the current state: each collection, its text index, then its
    /// documents in insertion order.
    fn snapshot_records(&self) -> Result<Vec<WalRecord>, DbError> {
        let mut out = Vec::new();
        for name in self.list_collection_names() {
            let Some(col) = self.get_collection(&name) else { continue };
            out.push(WalRecord::new(OpKind::CreateCollection, &name));
            let fields = col.text_index_fields();
            if !fields.is_empty() {
                out.push(WalRecord::new(OpKind::CreateTextIndex, &name).with_fields(fields));
            }
            for doc in col.get_all_documents() {
                out.push(
                    WalRecord::new(OpKind::Upsert, &name)
                        .with_id(doc.id)
                        .with_value(document_to_ext_json(&doc.data)?),
                );
            }
        }
        Ok(out)
    }

    fn apply_replayed(&self, rec: WalRecord) {
        match rec.op {
            OpKind::CreateCollection => {
                self.attach(&rec.collection);
            }
            OpKind::DropCollection => {
                self.collections.write().remove(&rec.collection);
            }
            OpKind::CreateTextIndex => self.attach(&rec.collection).apply_text_index(rec.fields),
            OpKind::Upsert => {
                let (Some(id), Some(bytes)) = (rec.id, rec.value_json) else {
                    log::warn!("wal upsert for '{}' without id or value; skipped", rec.collection);
                    return;
                };
                match ext_json_to_document(&bytes) {
                    Ok(data) => self.attach(&rec.collection).apply_upsert(Document::with_id(id, data)),
                    Err(e) => log::warn!("wal upsert for '{}' undecodable: {e}", rec.collection),
                }
            }
            OpKind::Delete => {
                if let Some(id) = rec.id {
                    self.attach(&rec.collection).apply_delete(&id);
                }
            }
        }
    }

    fn attach(&self, name: &str) -> Arc<Collection> {
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new(name.to_string(), self.wal.clone())))
            .clone()
    }

    /// Returns the named collection, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if recording a new collection in the WAL fails.
    pub fn create_collection(&self, name: &str) -> Result<Arc<Collection>, DbError> {
        if let Some(existing) = self.get_collection(name) {
            return Ok(existing);
        }
        if let Some(w) = &self.wal {
            w.append(&WalRecord::new(OpKind::CreateCollection, name))?;
        }
        Ok(self.attach(name))
    }

    #[must_use]
    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    /// # Errors
    /// Returns an error if recording the drop in the WAL fails.
    pub fn delete_collection(&self, name: &str) -> Result<bool, DbError> {
        if self.get_collection(name).is_none() {
            return Ok(false);
        }
        if let Some(w) = &self.wal {
            w.append(&WalRecord::new(OpKind::DropCollection, name))?;
        }
        Ok(self.collections.write().remove(name).is_some())
    }

    #[must_use]
    pub fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}
