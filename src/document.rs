use crate::types::DocumentId;
use bson::Document as BsonDocument;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: BsonDocument,
}

impl Document {
    #[must_use]
    pub fn new(data: BsonDocument) -> Self {
        Self { id: DocumentId::new(), data }
    }

    /// Rebuilds a document whose id is already known (WAL replay).
    #[must_use]
    pub fn with_id(id: DocumentId, data: BsonDocument) -> Self {
        Self { id, data }
    }
}
