use crate::{FieldMap, Query, Result, RowLabeled, RowsAffected};
use std::future::Future;

/// Storage backend a [`Query`] executes against.
///
/// Every method is one request/response round trip. The query carries the model (and its
/// table) plus the accumulated parameters; implementations decide how to turn those into
/// their own protocol. Failures are returned as they are: callers of the terminal query
/// methods receive them unchanged.
///
/// Conditions compare by equality. A null condition value matches no row, like `= NULL` in
/// SQL, so a record with an unset foreign key navigates to nothing.
///
/// Implementations may use `async fn` directly:
/// ```rust,ignore
/// impl Connection for MyConnection {
///     async fn count(&self, query: &Query<Self>) -> Result<u64> {
///         self.client.count(query.model().table(), &query.params().conditions).await
///     }
///     // ...
/// }
/// ```
pub trait Connection: Send + Sync + Sized + 'static {
    /// Open a connection described by the given URL.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Rows matching the conditions, grouped, ordered and sliced per the query parameters.
    fn select(&self, query: &Query<Self>) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send;

    /// Number of rows matching the conditions, ignoring ordering, offset and limit.
    fn count(&self, query: &Query<Self>) -> impl Future<Output = Result<u64>> + Send;

    /// Persist new rows, returning each one as stored (with its assigned `id`).
    fn insert(
        &self,
        query: &Query<Self>,
        rows: &[FieldMap],
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send;

    /// Apply `params` to every row matching the conditions.
    fn update(
        &self,
        query: &Query<Self>,
        params: &FieldMap,
    ) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Remove every row matching the conditions.
    fn delete(&self, query: &Query<Self>) -> impl Future<Output = Result<RowsAffected>> + Send;
}
