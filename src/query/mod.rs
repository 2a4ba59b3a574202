// Storage-side evaluation
mod cursor;
mod eval;
mod exec;
mod types;
pub mod geo;
pub mod text;

// Request-side translation
mod builder;
mod descriptor;
mod raw;
mod schema;

pub use builder::{DEFAULT_SORT_FIELD, QueryBuilder, VERSION_FIELD};
pub use cursor::Cursor;
pub use descriptor::QueryDescriptor;
pub use eval::{compare_bson, eval_filter, get_path};
pub use exec::{count_docs, find_docs};
pub use raw::{RESERVED_KEYS, RawQuery, RawValue, is_reserved};
pub use schema::{FieldKind, FieldSpec, cast_value};
pub use types::{CmpOp, FindOptions, Filter, Order, Projection, SortSpec};
