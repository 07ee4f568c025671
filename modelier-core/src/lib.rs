mod as_value;
mod attribute;
mod connection;
mod error;
mod field_map;
mod model;
mod model_def;
mod query;
mod record;
mod registry;
mod relationship;
mod row;
mod schema;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use attribute::*;
pub use connection::*;
pub use error::*;
pub use field_map::*;
pub use model::*;
pub use model_def::*;
pub use query::*;
pub use record::*;
pub use registry::*;
pub use relationship::*;
pub use row::*;
pub use schema::*;
pub use util::*;
pub use value::*;
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
