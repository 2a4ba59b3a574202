use crate::collection::Collection;
use crate::document::Document;
use crate::errors::DbError;
use std::sync::Arc;

use super::exec::find_docs;
use super::types::{Filter, FindOptions, Projection, SortSpec};

/// An unexecuted find over one collection, narrowed step by step.
///
/// `execute` takes `self`, so a descriptor runs at most once.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    collection: Arc<Collection>,
    filter: Filter,
    options: FindOptions,
}

impl QueryDescriptor {
    /// Matches every record of `collection`, unordered and unpaged.
    #[must_use]
    pub fn find(collection: Arc<Collection>) -> Self {
        Self { collection, filter: Filter::True, options: FindOptions::default() }
    }

    /// ANDs `criteria` with whatever was narrowed before.
    pub fn narrow(&mut self, criteria: Filter) -> &mut Self {
        self.filter = std::mem::replace(&mut self.filter, Filter::True).and(criteria);
        self
    }

    pub fn order_by(&mut self, sort: Vec<SortSpec>) -> &mut Self {
        self.options.sort = Some(sort);
        self
    }

    pub fn project(&mut self, projection: Projection) -> &mut Self {
        self.options.projection = Some(projection);
        self
    }

    pub fn skip(&mut self, n: usize) -> &mut Self {
        self.options.skip = Some(n);
        self
    }

    pub fn take(&mut self, n: usize) -> &mut Self {
        self.options.limit = Some(n);
        self
    }

    #[must_use]
    pub fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub const fn options(&self) -> &FindOptions {
        &self.options
    }

    /// Runs the query and returns the matching records in order.
    ///
    /// # Errors
    /// Propagates storage errors unchanged.
    pub fn execute(self) -> Result<Vec<Document>, DbError> {
        Ok(find_docs(&self.collection, &self.filter, &self.options)?.to_vec())
    }
}
