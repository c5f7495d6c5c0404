//! Bounded concurrent map that keeps results in input order.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// Run `f` over `items` with at most `limit` futures in flight.
///
/// Output order matches input order regardless of which future finishes
/// first. The first error stops the map and is returned.
pub async fn map_ordered<I, T, E, F, Fut>(items: I, limit: usize, f: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .try_collect()
        .await
}
