use crate::document::Document;
use crate::errors::DbError;
use crate::logger;
use crate::types::DocumentId;
use crate::utils::json::document_to_ext_json;
use crate::wal::{OpKind, Wal, WalRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Store {
    // insertion order; ties in sorted results fall back to it
    order: Vec<DocumentId>,
    by_id: HashMap<DocumentId, Document>,
}

#[derive(Debug)]
pub struct Collection {
    name: String,
    store: RwLock<Store>,
    text_fields: RwLock<Vec<String>>,
    wal: Option<Arc<Wal>>,
}

impl Collection {
    #[must_use]
    pub fn new(name: String, wal: Option<Arc<Wal>>) -> Self {
        Self { name, store: RwLock::new(Store::default()), text_fields: RwLock::new(Vec::new()), wal }
    }

    #[must_use]
    pub fn name_str(&self) -> &str {
        &self.name
    }

    fn persist(&self, rec: &WalRecord) -> Result<(), DbError> {
        match &self.wal {
            Some(w) => w.append(rec),
            None => Ok(()),
        }
    }

    /// Persists first, then applies to memory.
    ///
    /// # Errors
    /// Returns an error if the WAL append fails; memory is left untouched.
    pub fn insert_document(&self, document: Document) -> Result<DocumentId, DbError> {
        let id = document.id.clone();
        let rec = WalRecord::new(OpKind::Upsert, &self.name)
            .with_id(id.clone())
            .with_value(document_to_ext_json(&document.data)?);
        self.persist(&rec)?;
        self.apply_upsert(document);
        logger::log_audit("insert", &self.name, &id.to_string());
        Ok(id)
    }

    #[must_use]
    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.store.read().by_id.get(id).cloned()
    }

    /// Replaces the document stored under `id`. Returns `false` if there is none.
    ///
    /// # Errors
    /// Returns an error if the WAL append fails.
    pub fn update_document(&self, id: &DocumentId, new_document: Document) -> Result<bool, DbError> {
        if !self.store.read().by_id.contains_key(id) {
            return Ok(false);
        }
        let current = Document::with_id(id.clone(), new_document.data);
        let rec = WalRecord::new(OpKind::Upsert, &self.name)
            .with_id(id.clone())
            .with_value(document_to_ext_json(&current.data)?);
        self.persist(&rec)?;
        self.apply_upsert(current);
        logger::log_audit("update", &self.name, &id.to_string());
        Ok(true)
    }

    /// # Errors
    /// Returns an error if the WAL append fails.
    pub fn delete_document(&self, id: &DocumentId) -> Result<bool, DbError> {
        if !self.store.read().by_id.contains_key(id) {
            return Ok(false);
        }
        self.persist(&WalRecord::new(OpKind::Delete, &self.name).with_id(id.clone()))?;
        let removed = self.apply_delete(id);
        logger::log_audit("delete", &self.name, &id.to_string());
        Ok(removed)
    }

    pub(crate) fn apply_upsert(&self, document: Document) {
        let mut st = self.store.write();
        if !st.by_id.contains_key(&document.id) {
            st.order.push(document.id.clone());
        }
        st.by_id.insert(document.id.clone(), document);
    }

    pub(crate) fn apply_delete(&self, id: &DocumentId) -> bool {
        let mut st = self.store.write();
        if st.by_id.remove(id).is_some() {
            st.order.retain(|x| x != id);
            true
        } else {
            false
        }
    }

    /// Documents in insertion order.
    #[must_use]
    pub fn get_all_documents(&self) -> Vec<Document> {
        let st = self.store.read();
        st.order.iter().filter_map(|id| st.by_id.get(id).cloned()).collect()
    }

    #[must_use]
    pub fn list_ids(&self) -> Vec<DocumentId> {
        self.store.read().order.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declares which string fields free-text search looks at. Replaces any previous index.
    ///
    /// # Errors
    /// Returns an error if the WAL append fails.
    pub fn create_text_index(&self, fields: &[&str]) -> Result<(), DbError> {
        let fields: Vec<String> = fields.iter().map(|f| (*f).to_string()).collect();
        self.persist(&WalRecord::new(OpKind::CreateTextIndex, &self.name).with_fields(fields.clone()))?;
        self.apply_text_index(fields);
        Ok(())
    }

    pub(crate) fn apply_text_index(&self, fields: Vec<String>) {
        *self.text_fields.write() = fields;
    }

    #[must_use]
    pub fn text_index_fields(&self) -> Vec<String> {
        self.text_fields.read().clone()
    }
}
