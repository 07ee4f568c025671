mod concurrency;
mod queries;
mod records;
mod relationships;
mod schema;

use crate::{
    concurrency::concurrency, queries::queries, records::records, relationships::relationships,
    schema::schema,
};
use log::LevelFilter;
use modelier::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every suite against connections opened from `url`.
///
/// Each suite opens its own connection and registry, and starts by deleting the rows of the
/// models it declares.
pub async fn execute_tests<C: Connection>(url: &str) {
    schema::<C>(url).await;
    queries::<C>(url)
        .await
        .expect("Query examples test did not succeed");
    records::<C>(url)
        .await
        .expect("Record examples test did not succeed");
    relationships::<C>(url)
        .await
        .expect("Relationship examples test did not succeed");
    concurrency::<C>(url)
        .await
        .expect("Concurrency examples test did not succeed");
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
