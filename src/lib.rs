pub mod ast;
pub mod database;
pub mod error;
pub mod executor;
pub mod parser;
pub mod predicate;
pub mod row;
pub mod store;
pub mod value;

pub use ast::{ColumnDef, Projection, Statement};
pub use database::{Database, NlTranslator};
pub use error::{Error, Result};
pub use executor::Output;
pub use row::Row;
pub use store::{JsonDirStore, MemoryStore, TableStore};
pub use value::Value;
