mod config;
mod connection;
mod sql_writer;
mod table;

pub use config::*;
pub use connection::*;
pub use sql_writer::*;
pub use table::*;
