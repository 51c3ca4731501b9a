use alloc::vec::Vec;

use lazylist::{FetchBatch, FetchError, RowId};

/// Loads the content of a batch of rows.
///
/// Ids missing from the returned rows simply stay unloaded. Hosts with an asynchronous
/// transport skip this trait: they take the batch from [`crate::Controller::tick`] and report
/// back through [`crate::Controller::complete_fetch`].
pub trait RowFetcher<R> {
    fn fetch(&mut self, batch: &FetchBatch) -> Result<Vec<(RowId, R)>, FetchError>;
}

impl<R, F> RowFetcher<R> for F
where
    F: FnMut(&FetchBatch) -> Result<Vec<(RowId, R)>, FetchError>,
{
    fn fetch(&mut self, batch: &FetchBatch) -> Result<Vec<(RowId, R)>, FetchError> {
        self(batch)
    }
}

/// The query parameter under which a batch's ids are sent.
pub const ID_QUERY_PARAM: &str = "q[id_in][]";

/// Query pairs encoding `batch` as repeated `q[id_in][]=<id>` parameters.
pub fn query_pairs(batch: &FetchBatch) -> impl Iterator<Item = (&'static str, &str)> {
    batch.ids.iter().map(|id| (ID_QUERY_PARAM, id.as_str()))
}
