use crate::document::Document;

/// Materialized, ordered result set of one query execution.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    docs: Vec<Document>,
    pos: usize,
}

impl Cursor {
    #[must_use]
    pub(crate) const fn new(docs: Vec<Document>) -> Self {
        Self { docs, pos: 0 }
    }

    /// Results not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.docs.len().saturating_sub(self.pos)
    }

    #[must_use]
    pub fn to_vec(mut self) -> Vec<Document> {
        self.docs.split_off(self.pos.min(self.docs.len()))
    }
}

impl Iterator for Cursor {
    type Item = Document;
    fn next(&mut self) -> Option<Self::Item> {
        let d = self.docs.get(self.pos).cloned()?;
        self.pos += 1;
        Some(d)
    }
}
